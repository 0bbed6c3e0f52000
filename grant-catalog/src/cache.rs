//! Copy-then-swap cache for the merged catalog.
//!
//! The catalog is rebuilt off to the side and published by replacing a
//! single [`Arc`], so readers see either the previous catalog or the new
//! one, never a half-merged list. A separate async gate serialises
//! rebuilds.

use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use tokio::sync::{Mutex, MutexGuard};

use crate::types::Record;

/// A published catalog and when it was built.
#[derive(Debug, Clone, Default)]
pub struct CacheEntry {
    /// Records in precedence order.
    pub catalog: Arc<Vec<Record>>,
    /// Build time; `None` while the cache is cold.
    pub loaded_at: Option<Instant>,
    /// Incremented on every swap. Zero while cold.
    pub generation: u64,
}

impl CacheEntry {
    /// Whether this entry may be served without a refresh at `now`.
    ///
    /// An empty catalog is never fresh, so a cache that loaded nothing
    /// keeps retrying.
    pub fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
        if self.catalog.is_empty() {
            return false;
        }
        self.loaded_at
            .is_some_and(|loaded| now.saturating_duration_since(loaded) < ttl)
    }
}

/// Process-wide catalog slot owned by the catalog manager.
#[derive(Debug)]
pub struct CatalogCache {
    entry: RwLock<Arc<CacheEntry>>,
    refresh_gate: Mutex<()>,
    ttl: Duration,
}

impl CatalogCache {
    /// Create a cold cache.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entry: RwLock::new(Arc::new(CacheEntry::default())),
            refresh_gate: Mutex::new(()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The currently published entry.
    pub fn current(&self) -> Arc<CacheEntry> {
        let guard = self.entry.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&*guard)
    }

    /// Publish `catalog` built at `loaded_at`, replacing the previous entry.
    pub fn publish(&self, catalog: Vec<Record>, loaded_at: Instant) -> Arc<CacheEntry> {
        let mut guard = self.entry.write().unwrap_or_else(|e| e.into_inner());
        let next = Arc::new(CacheEntry {
            catalog: Arc::new(catalog),
            loaded_at: Some(loaded_at),
            generation: guard.generation + 1,
        });
        *guard = Arc::clone(&next);
        next
    }

    /// Wait for exclusive rights to rebuild the catalog.
    pub async fn lock_refresh(&self) -> MutexGuard<'_, ()> {
        self.refresh_gate.lock().await
    }
}
