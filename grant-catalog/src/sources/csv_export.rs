//! Published CSV export source.
//!
//! Fetches a CSV document over HTTP and keys each data row by the
//! header row. Blank lines are skipped and ragged rows are tolerated.

use async_trait::async_trait;

use crate::config::CatalogConfig;
use crate::error::CatalogError;
use crate::http;
use crate::source::SourceAdapter;
use crate::types::{RawRow, SourceKind};

/// Rows from a published CSV URL.
pub struct CsvSource {
    url: Option<String>,
    client: reqwest::Client,
}

impl CsvSource {
    /// Build the source from the catalog configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        Ok(Self {
            url: config
                .csv
                .url
                .as_deref()
                .map(str::trim)
                .filter(|u| !u.is_empty())
                .map(str::to_string),
            client: http::build_client(config)?,
        })
    }
}

#[async_trait]
impl SourceAdapter for CsvSource {
    async fn fetch(&self) -> Result<Vec<RawRow>, CatalogError> {
        let Some(url) = self.url.as_deref() else {
            return Err(CatalogError::Disabled("CSV url not configured".into()));
        };

        let text = http::get_text(&self.client, url, "CSV fetch failed").await?;
        tracing::trace!(bytes = text.len(), "CSV export received");
        parse_csv(&text)
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Csv
    }
}

/// Parse CSV text using the first record as column names.
///
/// # Errors
///
/// Returns [`CatalogError::Parse`] on malformed CSV (for example invalid
/// UTF-8 or an unterminated quote).
pub fn parse_csv(text: &str) -> Result<Vec<RawRow>, CatalogError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let header: Vec<String> = reader
        .headers()
        .map_err(|e| CatalogError::Parse(format!("invalid CSV header: {e}")))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| CatalogError::Parse(format!("invalid CSV row: {e}")))?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        let row: RawRow = header
            .iter()
            .zip(record.iter())
            .map(|(key, value)| (key.clone(), value.to_string()))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}
