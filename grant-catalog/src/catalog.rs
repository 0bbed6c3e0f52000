//! The catalog manager: cached, merged view over every source.
//!
//! [`GrantCatalog`] owns the source adapters and the [`CatalogCache`].
//! Reads within the TTL never touch a source. A stale or forced read
//! rebuilds the catalog behind a single-flight gate, so overlapping
//! refreshes cost one round of upstream fetches.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::cache::{CacheEntry, CatalogCache};
use crate::clock::{Clock, SystemClock};
use crate::config::CatalogConfig;
use crate::error::CatalogError;
use crate::orchestrator::merge::merge_sources;
use crate::orchestrator::search::search_catalog;
use crate::source::{SourceAdapter, SourceOutcome, SourceReport};
use crate::sources::{CsvSource, SheetSource, SnapshotSource, WebSource};
use crate::types::{Record, SearchFilters, SearchOutcome};

/// Fallback per-source deadline for catalogs built with
/// [`GrantCatalog::with_sources`].
const DEFAULT_FETCH_DEADLINE: Duration = Duration::from_secs(40);

/// How a [`GrantCatalog::refresh`] call was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshStatus {
    /// The cached catalog was still fresh.
    Cached,
    /// Another caller rebuilt the catalog while this one waited.
    Coalesced,
    /// This call fetched every source and published a new catalog.
    Fetched,
}

/// Summary of a refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshReport {
    pub status: RefreshStatus,
    /// Records in the catalog now being served.
    pub size: usize,
    /// Per-source outcomes. Empty unless `status` is `Fetched`.
    pub sources: Vec<SourceReport>,
}

/// Cached catalog merged from all configured sources.
pub struct GrantCatalog {
    sources: Vec<Arc<dyn SourceAdapter>>,
    cache: CatalogCache,
    clock: Arc<dyn Clock>,
    fetch_deadline: Duration,
}

impl GrantCatalog {
    /// Build the standard source line-up (spreadsheet, CSV, snapshot, web)
    /// from `config`.
    ///
    /// Sources with missing settings are still constructed; they report
    /// themselves disabled on every refresh.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Config`] if `config` is invalid, or
    /// [`CatalogError::Http`] if an HTTP client cannot be built.
    pub fn from_config(config: &CatalogConfig) -> Result<Self, CatalogError> {
        config.validate()?;

        let sources: Vec<Arc<dyn SourceAdapter>> = vec![
            Arc::new(SheetSource::new(config)?),
            Arc::new(CsvSource::new(config)?),
            Arc::new(SnapshotSource::new(config)),
            Arc::new(WebSource::new(config)?),
        ];

        // Token exchange plus one read for the spreadsheet.
        let deadline = Duration::from_secs(config.timeout_seconds.saturating_mul(2));

        Ok(Self::with_sources(
            sources,
            Duration::from_secs(config.cache_ttl_seconds),
            Arc::new(SystemClock),
        )
        .with_fetch_deadline(deadline))
    }

    /// Build a catalog over arbitrary adapters.
    ///
    /// Adapters are ordered by [`crate::types::SourceKind::precedence`];
    /// adapters of the same kind keep the order given.
    pub fn with_sources(
        mut sources: Vec<Arc<dyn SourceAdapter>>,
        ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        sources.sort_by_key(|s| s.kind().precedence());
        Self {
            sources,
            cache: CatalogCache::new(ttl),
            clock,
            fetch_deadline: DEFAULT_FETCH_DEADLINE,
        }
    }

    /// Upper bound on a single source fetch. A source that overruns it
    /// contributes nothing to that refresh.
    pub fn with_fetch_deadline(mut self, deadline: Duration) -> Self {
        self.fetch_deadline = deadline;
        self
    }

    /// Cache lifetime.
    pub fn ttl(&self) -> Duration {
        self.cache.ttl()
    }

    /// Make sure the cache is usable, rebuilding it if stale or if
    /// `force` is set.
    pub async fn refresh(&self, force: bool) -> RefreshReport {
        let (entry, status, sources) = self.ensure(force).await;
        RefreshReport {
            status,
            size: entry.catalog.len(),
            sources,
        }
    }

    /// The merged catalog, refreshing first if needed.
    pub async fn catalog(&self, force: bool) -> Arc<Vec<Record>> {
        let (entry, _, _) = self.ensure(force).await;
        Arc::clone(&entry.catalog)
    }

    /// Filter, score, and rank the catalog against `query`.
    ///
    /// Returns at most `limit` records. Source failures are never
    /// surfaced here; an unreachable upstream only shrinks the catalog.
    pub async fn search(
        &self,
        query: &str,
        filters: &SearchFilters,
        limit: usize,
    ) -> SearchOutcome {
        let catalog = self.catalog(false).await;
        tracing::trace!(query, limit, "search");
        search_catalog(&catalog, query, filters, limit)
    }

    async fn ensure(&self, force: bool) -> (Arc<CacheEntry>, RefreshStatus, Vec<SourceReport>) {
        let seen = self.cache.current();
        if !force && seen.is_fresh(self.clock.now(), self.cache.ttl()) {
            return (seen, RefreshStatus::Cached, Vec::new());
        }

        let _gate = self.cache.lock_refresh().await;

        let latest = self.cache.current();
        if latest.generation != seen.generation {
            tracing::debug!(size = latest.catalog.len(), "refresh coalesced");
            return (latest, RefreshStatus::Coalesced, Vec::new());
        }

        let started = self.clock.now();
        let (catalog, reports) = merge_sources(&self.sources, self.fetch_deadline).await;
        let loaded = reports
            .iter()
            .filter(|r| matches!(r.outcome, SourceOutcome::Loaded { .. }))
            .count();
        let entry = self.cache.publish(catalog, started);
        tracing::info!(
            size = entry.catalog.len(),
            loaded,
            sources = reports.len(),
            generation = entry.generation,
            force,
            "catalog refreshed"
        );
        (entry, RefreshStatus::Fetched, reports)
    }
}

impl std::fmt::Debug for GrantCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kinds: Vec<_> = self.sources.iter().map(|s| s.kind()).collect();
        f.debug_struct("GrantCatalog")
            .field("sources", &kinds)
            .field("ttl", &self.cache.ttl())
            .field("fetch_deadline", &self.fetch_deadline)
            .finish()
    }
}
