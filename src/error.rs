//! Error types for the grantgenie service.

/// Top-level error type for the service and its commands.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Configuration could not be read or is invalid.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Catalog construction or collection failed.
    #[error("catalog error: {0}")]
    Catalog(#[from] grant_catalog::CatalogError),

    /// HTTP listener error.
    #[error("server error: {0}")]
    Server(String),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, AppError>;
