//! # grant-catalog
//!
//! Aggregated catalog of public grant and subsidy programs.
//!
//! Rows are pulled from a spreadsheet, a published CSV export, a local
//! JSON snapshot, and live announcement listing pages. Each row is
//! normalised into a fixed ten-field [`Record`], merged in source
//! precedence order, cached for a short TTL, and served through a
//! keyword search with category and target filters.
//!
//! ## Design
//!
//! - Every source implements [`SourceAdapter`] and is fetched concurrently
//! - A failing source is reported as a [`SourceOutcome`] and costs only
//!   its own rows
//! - The merged catalog is published with a single pointer swap, so
//!   readers never see a partial merge
//! - Overlapping refreshes share one upstream round
//! - Scoring counts distinct query tokens found anywhere in a record,
//!   with a stable sort so ties keep catalog order
//!
//! ## Security
//!
//! - No network listeners; this is a library
//! - Service-account keys and access tokens never appear in logs or
//!   error messages
//! - Query strings are logged only at trace level

pub mod cache;
pub mod catalog;
pub mod clock;
pub mod collector;
pub mod config;
pub mod error;
pub mod extract;
pub mod http;
pub mod normalize;
pub mod orchestrator;
pub mod source;
pub mod sources;
pub mod types;

pub use catalog::{GrantCatalog, RefreshReport, RefreshStatus};
pub use clock::{Clock, ManualClock, SystemClock};
pub use collector::{collect, CollectReport};
pub use config::CatalogConfig;
pub use error::{CatalogError, Result};
pub use normalize::normalize;
pub use source::{SourceAdapter, SourceOutcome, SourceReport};
pub use types::{RawRow, Record, SearchFilters, SearchOutcome, SourceKind};

/// Search an already built catalog without any caching or I/O.
///
/// # Examples
///
/// ```
/// use grant_catalog::{search_records, Record, SearchFilters};
///
/// let catalog = vec![
///     Record { title: "청년창업지원".into(), ..Default::default() },
///     Record { title: "한부모가정 바우처".into(), ..Default::default() },
/// ];
/// let outcome = search_records(&catalog, "청년 지원", &SearchFilters::default(), 10);
/// assert_eq!(outcome.matched_count, 1);
/// assert_eq!(outcome.results[0].title, "청년창업지원");
/// ```
pub fn search_records(
    catalog: &[Record],
    query: &str,
    filters: &SearchFilters,
    limit: usize,
) -> SearchOutcome {
    orchestrator::search::search_catalog(catalog, query, filters, limit)
}
