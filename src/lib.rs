//! grantgenie: HTTP and command-line front end for the grant catalog.
//!
//! The catalog itself (sources, merging, caching, scoring) lives in the
//! [`grant_catalog`] crate. This crate adds configuration loading,
//! logging setup, and the HTTP routes.

pub mod app_dirs;
pub mod config;
pub mod error;
pub mod server;

pub use config::{AppConfig, ServerConfig};
pub use error::{AppError, Result};
pub use server::{CatalogServer, router};
