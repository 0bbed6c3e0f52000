//! Application directory paths for grantgenie.
//!
//! Uses the [`dirs`] crate for platform-appropriate directory resolution.
//!
//! | Purpose | macOS | Linux |
//! |---------|-------|-------|
//! | Config | `~/Library/Application Support/grantgenie/` | `~/.config/grantgenie/` |
//!
//! # Environment Overrides
//!
//! - `GRANTGENIE_CONFIG_DIR` overrides [`config_dir`]

use std::path::PathBuf;

/// Application config directory.
///
/// Resolves to `dirs::config_dir()/grantgenie/` by default. Override with
/// the `GRANTGENIE_CONFIG_DIR` environment variable.
#[must_use]
pub fn config_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("GRANTGENIE_CONFIG_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::config_dir()
        .map(|d| d.join("grantgenie"))
        .unwrap_or_else(|| PathBuf::from("/tmp/grantgenie-config"))
}

/// Main config file path (`config_dir()/config.toml`).
#[must_use]
pub fn config_file() -> PathBuf {
    config_dir().join("config.toml")
}
