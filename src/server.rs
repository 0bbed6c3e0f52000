//! HTTP routes over the grant catalog.
//!
//! ## Endpoints
//!
//! - `GET /api/search?q=&count=&category=&target=` ranked search
//! - `GET /policies.json` the cached catalog as a JSON array
//! - `GET /debug/reload` force a refresh and report the new size
//! - `GET /health` liveness probe
//!
//! Every error body is `{ "error": "<message>" }` with a fixed message;
//! internal details only go to the log.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use grant_catalog::{GrantCatalog, Record, SearchFilters, SourceKind, SourceOutcome, SourceReport};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::info;

use crate::config::ServerConfig;
use crate::error::{AppError, Result};

// ---------------------------------------------------------------------------
// Request and response types
// ---------------------------------------------------------------------------

/// Query string of `GET /api/search`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    /// Free-text query; blank lists the catalog.
    #[serde(default)]
    pub q: Option<String>,
    /// Maximum results. Kept as text so a bad value gets our own 400.
    #[serde(default)]
    pub count: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
}

/// Body of `GET /api/search`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    /// The query as received.
    pub query: String,
    /// The effective result limit.
    pub count: usize,
    /// Matches before truncation.
    pub matched_count: usize,
    pub results: Vec<Record>,
}

/// Body of `GET /debug/reload`.
#[derive(Debug, Clone, Serialize)]
pub struct ReloadResponse {
    pub reloaded: bool,
    pub size: usize,
    pub sources: Vec<ReloadSource>,
}

/// One source's line in a reload answer.
///
/// Failure reasons carry upstream URLs and local paths, so they stay in the
/// log and only the status crosses the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReloadSource {
    pub source: SourceKind,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub records: Option<usize>,
}

impl From<&SourceReport> for ReloadSource {
    fn from(report: &SourceReport) -> Self {
        let (status, records) = match report.outcome {
            SourceOutcome::Loaded { records } => ("loaded", Some(records)),
            SourceOutcome::Failed { .. } => ("failed", None),
            SourceOutcome::Disabled { .. } => ("disabled", None),
        };
        Self {
            source: report.source,
            status,
            records,
        }
    }
}

/// Error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Errors a handler can answer with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiError {
    /// `count` was not an integer.
    InvalidCount,
    /// The query string could not be decoded.
    InvalidQuery,
    /// Anything that is the server's fault.
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::InvalidCount => (StatusCode::BAD_REQUEST, "count must be an integer"),
            Self::InvalidQuery => (StatusCode::BAD_REQUEST, "invalid query string"),
            Self::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "search failed"),
        };
        let body = ErrorResponse {
            error: message.to_owned(),
        };
        (status, Json(body)).into_response()
    }
}

/// Interpret the `count` parameter.
///
/// Absent or blank means `default`. Negative values clamp to zero.
pub fn parse_count(raw: Option<&str>, default: usize) -> std::result::Result<usize, ApiError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(default);
    };
    let count: i64 = raw.parse().map_err(|_| ApiError::InvalidCount)?;
    Ok(usize::try_from(count).unwrap_or(0))
}

// ---------------------------------------------------------------------------
// Shared application state
// ---------------------------------------------------------------------------

/// Shared state for axum handlers.
#[derive(Clone)]
struct AppState {
    catalog: Arc<GrantCatalog>,
    default_count: usize,
}

/// Build the service router.
pub fn router(catalog: Arc<GrantCatalog>, default_count: usize) -> Router {
    let state = AppState {
        catalog,
        default_count,
    };
    Router::new()
        .route("/api/search", get(handle_search))
        .route("/policies.json", get(handle_policies))
        .route("/debug/reload", get(handle_reload))
        .route("/health", get(handle_health))
        .fallback(handle_not_found)
        .with_state(state)
}

// ---------------------------------------------------------------------------
// CatalogServer
// ---------------------------------------------------------------------------

/// The HTTP service, running in a background task.
pub struct CatalogServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl CatalogServer {
    /// Bind `{config.host}:{config.port}` (port `0` for auto-assign) and
    /// start serving.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Server`] if the listener cannot bind.
    pub async fn start(catalog: Arc<GrantCatalog>, config: &ServerConfig) -> Result<Self> {
        let app = router(catalog, config.default_count);

        let bind_addr = format!("{}:{}", config.host, config.port);
        let listener = TcpListener::bind(&bind_addr)
            .await
            .map_err(|e| AppError::Server(format!("bind {bind_addr} failed: {e}")))?;
        let addr = listener
            .local_addr()
            .map_err(|e| AppError::Server(format!("failed to get local addr: {e}")))?;

        info!("grantgenie listening on http://{addr}");

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("HTTP server error: {e}");
            }
        });

        Ok(Self { addr, handle })
    }

    /// Returns the address the server is listening on.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Returns the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Wait until the server task ends.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Server`] if the task panicked.
    pub async fn wait(&mut self) -> Result<()> {
        (&mut self.handle)
            .await
            .map_err(|e| AppError::Server(format!("server task failed: {e}")))
    }

    /// Abort the server task.
    pub fn shutdown(&self) {
        self.handle.abort();
    }
}

impl Drop for CatalogServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// `GET /api/search`
async fn handle_search(
    State(state): State<AppState>,
    params: std::result::Result<Query<SearchParams>, QueryRejection>,
) -> std::result::Result<Json<SearchResponse>, ApiError> {
    let Query(params) = params.map_err(|e| {
        tracing::debug!(error = %e, "rejected search query string");
        ApiError::InvalidQuery
    })?;
    let count = parse_count(params.count.as_deref(), state.default_count)?;
    let query = params.q.unwrap_or_default();
    let filters = SearchFilters {
        category: params.category,
        target: params.target,
    };

    // Run on its own task so a panic becomes an opaque 500.
    let catalog = Arc::clone(&state.catalog);
    let q = query.clone();
    let outcome = tokio::spawn(async move { catalog.search(&q, &filters, count).await })
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "search task failed");
            ApiError::Internal
        })?;

    Ok(Json(SearchResponse {
        query,
        count,
        matched_count: outcome.matched_count,
        results: outcome.results,
    }))
}

/// `GET /policies.json`
async fn handle_policies(State(state): State<AppState>) -> Response {
    let records = state.catalog.catalog(false).await;
    Json(records.as_slice()).into_response()
}

/// `GET /debug/reload`
async fn handle_reload(State(state): State<AppState>) -> Json<ReloadResponse> {
    let report = state.catalog.refresh(true).await;
    Json(ReloadResponse {
        reloaded: true,
        size: report.size,
        sources: report.sources.iter().map(ReloadSource::from).collect(),
    })
}

/// `GET /health`
async fn handle_health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn handle_not_found() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "not found".to_owned(),
        }),
    )
}
