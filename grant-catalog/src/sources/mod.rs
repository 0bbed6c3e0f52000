//! Catalog source implementations.
//!
//! Each module provides a struct implementing [`crate::source::SourceAdapter`].

pub mod csv_export;
pub mod sheet;
pub mod snapshot;
pub mod web;

pub use csv_export::CsvSource;
pub use sheet::SheetSource;
pub use snapshot::{SnapshotRow, SnapshotSource};
pub use web::WebSource;
