//! Error types for the grant-catalog crate.
//!
//! All errors use stable string messages suitable for operator logs.
//! No credentials, private keys, or access tokens appear in error
//! messages.

/// Errors that can occur while fetching or preparing catalog data.
///
/// Source adapters return these to the catalog manager, which records
/// them as a [`crate::SourceOutcome`] and never lets them reach callers
/// of [`crate::GrantCatalog::search`].
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// An HTTP request to a source failed or returned a non-success status.
    #[error("HTTP error: {0}")]
    Http(String),

    /// A source did not answer within the configured timeout.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// A source answered but its payload could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid catalog configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Credential exchange with the spreadsheet API failed.
    #[error("auth error: {0}")]
    Auth(String),

    /// Local file access failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The source is intentionally switched off (missing settings).
    #[error("source disabled: {0}")]
    Disabled(String),
}

impl CatalogError {
    /// Map a [`reqwest::Error`] into either [`CatalogError::Timeout`] or
    /// [`CatalogError::Http`], prefixed with `context`.
    pub(crate) fn from_reqwest(context: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(format!("{context}: {err}"))
        } else {
            Self::Http(format!("{context}: {err}"))
        }
    }
}

/// Convenience type alias for grant-catalog results.
pub type Result<T> = std::result::Result<T, CatalogError>;
