//! Listing-page extraction: selector strategies and admission heuristics.
//!
//! Used only by the web source and the snapshot collector.

pub mod heuristics;
pub mod listing;

pub use heuristics::{is_detail_link, passes_title, resolve_link};
pub use listing::{extract_listing, Extraction, ExtractionCandidate, ListingPage, SelectorStrategy};
