//! Listing-page scraping source.
//!
//! Fetches every configured listing page concurrently and runs the
//! selector strategies and admission heuristics over each one. A page
//! that fails is logged and skipped; the source only fails when every
//! page does.

use async_trait::async_trait;

use crate::config::CatalogConfig;
use crate::error::CatalogError;
use crate::extract::{extract_listing, ListingPage};
use crate::http;
use crate::source::SourceAdapter;
use crate::types::{RawRow, SourceKind};

/// Rows scraped from announcement listing pages.
pub struct WebSource {
    enabled: bool,
    min_nodes: usize,
    pages: Vec<ListingPage>,
    client: reqwest::Client,
}

impl WebSource {
    /// Build the source from the catalog configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        Ok(Self {
            enabled: config.web.enabled,
            min_nodes: config.web.min_nodes,
            pages: config.web.pages.clone(),
            client: http::build_client(config)?,
        })
    }

    /// Scrape all pages regardless of the `enabled` flag.
    ///
    /// Rows keep page order, then node order within each page.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Http`] only if every page failed.
    pub async fn scrape(&self) -> Result<Vec<RawRow>, CatalogError> {
        if self.pages.is_empty() {
            return Ok(Vec::new());
        }

        let futures = self.pages.iter().map(|page| async move {
            let outcome = self.scrape_page(page).await;
            (page, outcome)
        });
        let outcomes = futures::future::join_all(futures).await;

        let mut rows = Vec::new();
        let mut errors = Vec::new();
        for (page, outcome) in outcomes {
            match outcome {
                Ok(page_rows) => {
                    tracing::debug!(source = %page.source, count = page_rows.len(), "listing page scraped");
                    rows.extend(page_rows);
                }
                Err(err) => {
                    tracing::warn!(source = %page.source, error = %err, "listing page failed");
                    errors.push(format!("{}: {err}", page.source));
                }
            }
        }

        if errors.len() == self.pages.len() {
            return Err(CatalogError::Http(format!(
                "all listing pages failed: {}",
                errors.join("; ")
            )));
        }
        Ok(rows)
    }

    async fn scrape_page(&self, page: &ListingPage) -> Result<Vec<RawRow>, CatalogError> {
        let context = format!("{} request failed", page.source);
        let html = http::get_text(&self.client, &page.url, &context).await?;
        tracing::trace!(source = %page.source, bytes = html.len(), "listing page received");

        let extraction = extract_listing(&html, page, self.min_nodes);
        Ok(extraction
            .candidates
            .iter()
            .map(|candidate| page.to_raw_row(candidate))
            .collect())
    }
}

#[async_trait]
impl SourceAdapter for WebSource {
    async fn fetch(&self) -> Result<Vec<RawRow>, CatalogError> {
        if !self.enabled {
            return Err(CatalogError::Disabled("listing-page scraping disabled".into()));
        }
        self.scrape().await
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Web
    }
}
