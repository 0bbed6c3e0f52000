//! Trait definition for pluggable catalog sources.
//!
//! Each source (spreadsheet, CSV export, local snapshot, listing pages)
//! implements [`SourceAdapter`] to provide a uniform interface for
//! fetching raw rows. The catalog manager turns every fetch into a
//! [`SourceReport`], so a failing source never blocks the others.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::CatalogError;
use crate::types::{RawRow, SourceKind};

/// A pluggable catalog source.
///
/// Implementors handle their own transport and parsing and return rows
/// in source order. Return [`CatalogError::Disabled`] when the source is
/// intentionally switched off, and any other error for a real failure.
///
/// All implementations must be `Send + Sync` for concurrent fetches.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Fetch every row this source currently holds.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if the source is disabled, unreachable, or
    /// its payload cannot be parsed.
    async fn fetch(&self) -> Result<Vec<RawRow>, CatalogError>;

    /// Which [`SourceKind`] this adapter represents.
    fn kind(&self) -> SourceKind;
}

/// How a single source fared during a refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SourceOutcome {
    /// The source answered; `records` normalised records were kept.
    Loaded { records: usize },
    /// The source is configured but failed; it contributed nothing.
    Failed { reason: String },
    /// The source is switched off by configuration.
    Disabled { reason: String },
}

impl SourceOutcome {
    /// Classify a fetch error.
    pub fn from_error(err: &CatalogError) -> Self {
        match err {
            CatalogError::Disabled(reason) => Self::Disabled {
                reason: reason.clone(),
            },
            other => Self::Failed {
                reason: other.to_string(),
            },
        }
    }
}

/// Per-source line of a refresh report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceReport {
    pub source: SourceKind,
    #[serde(flatten)]
    pub outcome: SourceOutcome,
}
