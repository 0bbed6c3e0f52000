//! Snapshot collector.
//!
//! Scrapes the configured listing pages once and persists the rows as a
//! snapshot file, which the snapshot source then serves on later runs.

use std::path::Path;

use serde::Serialize;

use crate::config::CatalogConfig;
use crate::error::CatalogError;
use crate::normalize::normalize;
use crate::sources::snapshot::write_snapshot;
use crate::sources::{SnapshotRow, WebSource};

/// What a [`collect`] run produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectReport {
    /// Rows scraped and kept.
    pub rows: usize,
    /// Whether the snapshot file was written.
    pub written: bool,
}

/// Scrape every listing page in `config` and write the rows to `path`.
///
/// Scraping runs even when the web source is disabled for catalog
/// refreshes. An empty result leaves any existing snapshot in place.
///
/// # Errors
///
/// Returns [`CatalogError::Http`] if every listing page failed, or
/// [`CatalogError::Io`] if the snapshot cannot be written.
pub async fn collect(config: &CatalogConfig, path: &Path) -> Result<CollectReport, CatalogError> {
    config.validate()?;
    let source = WebSource::new(config)?;
    let raw = source.scrape().await?;

    let rows: Vec<SnapshotRow> = raw
        .iter()
        .map(|row| SnapshotRow {
            source: row.get("source").unwrap_or_default().to_string(),
            record: normalize(row),
        })
        .filter(|row| row.record.has_title())
        .collect();

    if rows.is_empty() {
        tracing::warn!(path = %path.display(), "collector found nothing; snapshot left untouched");
        return Ok(CollectReport {
            rows: 0,
            written: false,
        });
    }

    write_snapshot(path, &rows).await?;
    tracing::info!(path = %path.display(), count = rows.len(), "snapshot written");
    Ok(CollectReport {
        rows: rows.len(),
        written: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn no_pages_writes_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("policies.json");
        std::fs::write(&path, "[{\"title\":\"기존 공고\"}]").expect("seed");

        let mut config = CatalogConfig::default();
        config.web.pages.clear();
        let report = collect(&config, &path).await.expect("collect");

        assert_eq!(
            report,
            CollectReport {
                rows: 0,
                written: false
            }
        );
        let kept = std::fs::read_to_string(&path).expect("read");
        assert!(kept.contains("기존 공고"));
    }

    #[tokio::test]
    async fn invalid_config_is_rejected() {
        let config = CatalogConfig {
            timeout_seconds: 0,
            ..Default::default()
        };
        let dir = tempfile::tempdir().expect("tempdir");
        let err = collect(&config, &dir.path().join("p.json"))
            .await
            .expect_err("zero timeout");
        assert!(matches!(err, CatalogError::Config(_)));
    }
}
