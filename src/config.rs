//! Service configuration.
//!
//! [`AppConfig`] is read from TOML, then selected environment variables
//! are layered on top so deployments can keep credentials out of the
//! file:
//!
//! | Variable | Field |
//! |----------|-------|
//! | `PORT` | `server.port` |
//! | `SHEET_ID` | `catalog.sheet.spreadsheet_id` |
//! | `GOOGLE_CLIENT_EMAIL` | `catalog.sheet.client_email` |
//! | `GOOGLE_PRIVATE_KEY` | `catalog.sheet.private_key` |
//! | `CSV_URL` | `catalog.csv.url` |
//! | `GRANTGENIE_SNAPSHOT` | `catalog.snapshot.path` |

use std::path::{Path, PathBuf};

use grant_catalog::CatalogConfig;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind host.
    pub host: String,
    /// Bind port. `0` picks a free port.
    pub port: u16,
    /// Results returned by `/api/search` when `count` is absent.
    pub default_count: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 3000,
            default_count: 10,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub catalog: CatalogConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Load the effective configuration.
    ///
    /// An explicit `path` must exist. Without one, the default config file
    /// is used if present, otherwise built-in defaults. Environment
    /// overrides are applied last and the result is validated.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] for unreadable, unparsable or invalid
    /// configuration.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Self::default_config_path();
                if default_path.is_file() {
                    Self::from_file(&default_path)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env_from(|key| std::env::var(key).ok())?;
        config
            .catalog
            .validate()
            .map_err(|e| AppError::Config(e.to_string()))?;
        Ok(config)
    }

    /// Apply environment overrides, reading variables through `get`.
    ///
    /// Blank values are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] if `PORT` is not a valid port number.
    pub fn apply_env_from(&mut self, get: impl Fn(&str) -> Option<String>) -> Result<()> {
        let var = |key: &str| get(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());

        if let Some(port) = var("PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| AppError::Config(format!("PORT is not a valid port: {port}")))?;
        }
        if let Some(id) = var("SHEET_ID") {
            self.catalog.sheet.spreadsheet_id = Some(id);
        }
        if let Some(email) = var("GOOGLE_CLIENT_EMAIL") {
            self.catalog.sheet.client_email = Some(email);
        }
        if let Some(key) = var("GOOGLE_PRIVATE_KEY") {
            self.catalog.sheet.private_key = Some(key.replace("\\n", "\n"));
        }
        if let Some(url) = var("CSV_URL") {
            self.catalog.csv.url = Some(url);
        }
        if let Some(path) = var("GRANTGENIE_SNAPSHOT") {
            self.catalog.snapshot.path = PathBuf::from(path);
        }
        Ok(())
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> PathBuf {
        crate::app_dirs::config_file()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.default_count, 10);
        assert_eq!(config.catalog.cache_ttl_seconds, 300);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [server]
            port = 8080

            [catalog]
            cache_ttl_seconds = 60

            [catalog.csv]
            url = "https://docs.example/pub?output=csv"
            "#,
        )
        .expect("parse");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.catalog.cache_ttl_seconds, 60);
        assert_eq!(config.catalog.timeout_seconds, 20);
        assert_eq!(
            config.catalog.csv.url.as_deref(),
            Some("https://docs.example/pub?output=csv")
        );
        assert_eq!(config.catalog.sheet.range, "A1:J9999");
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = AppConfig::default();
        config
            .apply_env_from(env(&[
                ("PORT", "4100"),
                ("SHEET_ID", "sheet-1"),
                ("GOOGLE_CLIENT_EMAIL", "svc@example.iam"),
                ("GOOGLE_PRIVATE_KEY", "-----BEGIN-----\\nabc\\n-----END-----"),
                ("CSV_URL", "https://docs.example/csv"),
                ("GRANTGENIE_SNAPSHOT", "/var/lib/grantgenie/policies.json"),
            ]))
            .expect("apply");

        assert_eq!(config.server.port, 4100);
        assert_eq!(config.catalog.sheet.spreadsheet_id.as_deref(), Some("sheet-1"));
        assert_eq!(
            config.catalog.sheet.private_key.as_deref(),
            Some("-----BEGIN-----\nabc\n-----END-----")
        );
        assert_eq!(config.catalog.csv.url.as_deref(), Some("https://docs.example/csv"));
        assert_eq!(
            config.catalog.snapshot.path,
            PathBuf::from("/var/lib/grantgenie/policies.json")
        );
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let mut config = AppConfig::default();
        config
            .apply_env_from(env(&[("CSV_URL", "  "), ("PORT", "")]))
            .expect("apply");
        assert!(config.catalog.csv.url.is_none());
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn invalid_port_is_config_error() {
        let mut config = AppConfig::default();
        let err = config.apply_env_from(env(&[("PORT", "http")])).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn from_file_nonexistent_returns_error() {
        let result = AppConfig::from_file(Path::new("/nonexistent/path/config.toml"));
        assert!(matches!(result, Err(AppError::Io(_))));
    }

    #[test]
    fn from_file_invalid_toml_returns_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "this is not valid toml {{{").expect("write");
        assert!(matches!(AppConfig::from_file(&path), Err(AppError::Config(_))));
    }

    #[test]
    fn load_rejects_invalid_catalog_settings() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[catalog]\ntimeout_seconds = 0\n").expect("write");
        let err = AppConfig::load(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("timeout_seconds"));
    }

    #[test]
    fn default_config_path_ends_with_config_toml() {
        let path = AppConfig::default_config_path();
        assert!(path.to_string_lossy().ends_with("config.toml"));
    }
}
