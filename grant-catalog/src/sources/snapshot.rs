//! Local JSON snapshot source and writer.
//!
//! The snapshot is a flat file holding a JSON array of near-canonical
//! row objects. The collector writes it; this source reads it back.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::CatalogConfig;
use crate::error::CatalogError;
use crate::source::SourceAdapter;
use crate::types::{RawRow, Record, SourceKind};

/// One row of a snapshot file: a canonical record plus where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRow {
    #[serde(default)]
    pub source: String,
    #[serde(flatten)]
    pub record: Record,
}

/// Rows from a local snapshot file.
pub struct SnapshotSource {
    path: PathBuf,
}

impl SnapshotSource {
    pub fn new(config: &CatalogConfig) -> Self {
        Self::at(config.snapshot.path.clone())
    }

    /// Read the snapshot at `path`.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SourceAdapter for SnapshotSource {
    async fn fetch(&self) -> Result<Vec<RawRow>, CatalogError> {
        let text = tokio::fs::read_to_string(&self.path).await?;
        parse_snapshot(&text)
    }

    fn kind(&self) -> SourceKind {
        SourceKind::LocalSnapshot
    }
}

/// Parse snapshot text. Array elements that are not objects are skipped.
///
/// # Errors
///
/// Returns [`CatalogError::Parse`] if the text is not JSON or not an array.
pub fn parse_snapshot(text: &str) -> Result<Vec<RawRow>, CatalogError> {
    let value: serde_json::Value = serde_json::from_str(text)
        .map_err(|e| CatalogError::Parse(format!("invalid snapshot JSON: {e}")))?;
    let serde_json::Value::Array(items) = value else {
        return Err(CatalogError::Parse("snapshot is not a JSON array".into()));
    };
    Ok(items
        .iter()
        .filter_map(serde_json::Value::as_object)
        .map(RawRow::from_json_object)
        .collect())
}

/// Write `rows` to `path` as a pretty-printed JSON array, creating parent
/// directories as needed. The file is replaced atomically via a sibling
/// temporary file.
///
/// # Errors
///
/// Returns [`CatalogError::Io`] if the file cannot be written.
pub async fn write_snapshot(path: &Path, rows: &[SnapshotRow]) -> Result<(), CatalogError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let json = serde_json::to_string_pretty(rows)
        .map_err(|e| CatalogError::Parse(format!("failed to encode snapshot: {e}")))?;

    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, json).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_array_of_objects() {
        let rows = parse_snapshot(
            r#"[{"title":"청년창업지원","budget":"1억"},{"사업명":"바우처"}]"#,
        )
        .expect("parse");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("budget"), Some("1억"));
        assert_eq!(rows[1].get("사업명"), Some("바우처"));
    }

    #[test]
    fn non_array_rejected() {
        let err = parse_snapshot(r#"{"title":"x"}"#).unwrap_err();
        assert!(err.to_string().contains("not a JSON array"));
    }

    #[test]
    fn invalid_json_rejected() {
        assert!(matches!(parse_snapshot("[{"), Err(CatalogError::Parse(_))));
    }

    #[test]
    fn non_object_elements_skipped() {
        let rows = parse_snapshot(r#"["x", 1, null, {"title":"패키지"}]"#).expect("parse");
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let source = SnapshotSource::at(dir.path().join("absent.json"));
        assert!(matches!(source.fetch().await, Err(CatalogError::Io(_))));
    }

    #[tokio::test]
    async fn write_then_read_back() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("policies.json");
        let rows = vec![SnapshotRow {
            source: "K-Startup".into(),
            record: Record {
                title: "창업 패키지".into(),
                region: "중앙".into(),
                ..Default::default()
            },
        }];
        write_snapshot(&path, &rows).await.expect("write");

        let read = SnapshotSource::at(&path).fetch().await.expect("read");
        assert_eq!(read.len(), 1);
        assert_eq!(read[0].get("source"), Some("K-Startup"));
        assert_eq!(read[0].get("title"), Some("창업 패키지"));
        assert_eq!(read[0].get("summary"), Some(""));
    }
}
