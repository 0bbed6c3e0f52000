//! Catalog orchestration: source fan-out and merge, filtering, scoring,
//! ranking.
//!
//! [`merge`] builds a catalog from the configured sources. The other
//! modules answer queries against an already built catalog and never
//! touch the network.

pub mod filter;
pub mod merge;
pub mod scoring;
pub mod search;
