//! Spreadsheet API source.
//!
//! Authenticates with a service account (RS256 JWT exchanged for an
//! OAuth access token), reads one rectangular range, and treats the
//! first row as the header.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::config::{CatalogConfig, SheetConfig, SheetCredentials};
use crate::error::CatalogError;
use crate::http;
use crate::source::SourceAdapter;
use crate::types::{RawRow, SourceKind};

/// Read-only scope requested for the access token.
const SHEETS_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets.readonly";

/// Lifetime requested for the signed assertion.
const ASSERTION_LIFETIME_SECS: u64 = 3600;

/// Tokens are renewed this long before they expire.
const TOKEN_RENEW_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: u64,
    exp: u64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    ASSERTION_LIFETIME_SECS
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

struct CachedToken {
    value: String,
    expires_at: Instant,
}

/// Rows from a spreadsheet range.
pub struct SheetSource {
    config: SheetConfig,
    client: reqwest::Client,
    token: Mutex<Option<CachedToken>>,
}

impl SheetSource {
    /// Build the source from the catalog configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        Ok(Self {
            config: config.sheet.clone(),
            client: http::build_client(config)?,
            token: Mutex::new(None),
        })
    }

    async fn access_token(&self, creds: &SheetCredentials<'_>) -> Result<String, CatalogError> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() + TOKEN_RENEW_MARGIN < token.expires_at {
                return Ok(token.value.clone());
            }
        }

        let assertion = sign_assertion(creds, &self.config.token_url)?;
        let response = self
            .client
            .post(&self.config.token_url)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await
            .map_err(|e| CatalogError::from_reqwest("token request failed", e))?;

        if !response.status().is_success() {
            return Err(CatalogError::Auth(format!(
                "token endpoint returned {}",
                response.status()
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| CatalogError::Auth(format!("unreadable token response: {e}")))?;

        tracing::debug!(expires_in = token.expires_in, "spreadsheet access token issued");
        *cached = Some(CachedToken {
            value: token.access_token.clone(),
            expires_at: Instant::now() + Duration::from_secs(token.expires_in),
        });
        Ok(token.access_token)
    }

    fn values_url(&self, spreadsheet_id: &str) -> Result<url::Url, CatalogError> {
        let mut url = url::Url::parse(&self.config.api_base_url)
            .map_err(|e| CatalogError::Config(format!("invalid sheet api_base_url: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| CatalogError::Config("sheet api_base_url cannot be a base".into()))?
            .pop_if_empty()
            .extend(["v4", "spreadsheets", spreadsheet_id, "values", self.config.range.as_str()]);
        Ok(url)
    }
}

#[async_trait]
impl SourceAdapter for SheetSource {
    async fn fetch(&self) -> Result<Vec<RawRow>, CatalogError> {
        let creds = self.config.credentials().ok_or_else(|| {
            CatalogError::Disabled("spreadsheet id or service account not configured".into())
        })?;

        let token = self.access_token(&creds).await?;
        let url = self.values_url(creds.spreadsheet_id)?;

        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| CatalogError::from_reqwest("sheet request failed", e))?
            .error_for_status()
            .map_err(|e| CatalogError::Http(format!("sheet HTTP error: {e}")))?;

        let range: ValueRange = response
            .json()
            .await
            .map_err(|e| CatalogError::Parse(format!("unreadable sheet values: {e}")))?;

        let rows = rows_from_values(range.values);
        tracing::debug!(count = rows.len(), "sheet rows read");
        Ok(rows)
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Sheet
    }
}

/// Sign the service-account assertion for the token endpoint.
fn sign_assertion(creds: &SheetCredentials<'_>, audience: &str) -> Result<String, CatalogError> {
    // Keys pasted into env files often carry literal "\n" sequences.
    let pem = creds.private_key.replace("\\n", "\n");
    let key = EncodingKey::from_rsa_pem(pem.as_bytes())
        .map_err(|e| CatalogError::Auth(format!("invalid service account key: {e}")))?;

    let iat = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    let claims = Claims {
        iss: creds.client_email,
        scope: SHEETS_READONLY_SCOPE,
        aud: audience,
        iat,
        exp: iat + ASSERTION_LIFETIME_SECS,
    };

    jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &key)
        .map_err(|e| CatalogError::Auth(format!("failed to sign assertion: {e}")))
}

/// Convert a 2-D value grid into header-keyed rows.
///
/// Fewer than two rows means there is no data. Short rows are padded
/// with `""`; cells beyond the header are dropped.
pub(crate) fn rows_from_values(values: Vec<Vec<String>>) -> Vec<RawRow> {
    let mut grid = values.into_iter();
    let Some(header) = grid.next() else {
        return Vec::new();
    };
    let header: Vec<String> = header.iter().map(|h| h.trim().to_string()).collect();

    grid.map(|cells| {
        header
            .iter()
            .enumerate()
            .map(|(i, key)| (key.clone(), cells.get(i).cloned().unwrap_or_default()))
            .collect::<RawRow>()
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|c| (*c).to_string()).collect())
            .collect()
    }

    #[test]
    fn header_only_yields_nothing() {
        assert!(rows_from_values(grid(&[&["title", "region"]])).is_empty());
        assert!(rows_from_values(Vec::new()).is_empty());
    }

    #[test]
    fn rows_keyed_by_trimmed_header() {
        let rows = rows_from_values(grid(&[
            &[" title ", "region"],
            &["청년창업지원", "서울"],
            &["R&D 지원사업", "부산"],
        ]));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("title"), Some("청년창업지원"));
        assert_eq!(rows[1].get("region"), Some("부산"));
    }

    #[test]
    fn short_rows_padded_and_long_rows_clipped() {
        let rows = rows_from_values(grid(&[
            &["title", "region", "budget"],
            &["바우처"],
            &["패키지", "대구", "1억", "extra"],
        ]));
        assert_eq!(rows[0].get("region"), Some(""));
        assert_eq!(rows[0].get("budget"), Some(""));
        assert_eq!(rows[1].len(), 3);
    }

    #[tokio::test]
    async fn missing_credentials_disable_source() {
        let source = SheetSource::new(&CatalogConfig::default()).expect("client");
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, CatalogError::Disabled(_)));
    }

    #[test]
    fn invalid_key_is_auth_error() {
        let creds = SheetCredentials {
            spreadsheet_id: "id",
            client_email: "svc@example.iam",
            private_key: "not a pem",
        };
        let err = sign_assertion(&creds, "https://oauth2.example/token").unwrap_err();
        assert!(matches!(err, CatalogError::Auth(_)));
        assert!(!err.to_string().contains("not a pem"));
    }

    #[test]
    fn values_url_encodes_range() {
        let mut config = CatalogConfig::default();
        config.sheet.api_base_url = "https://sheets.example/".into();
        config.sheet.range = "시트1!A1:J9999".into();
        let source = SheetSource::new(&config).expect("client");
        let url = source.values_url("abc123").expect("url");
        assert!(url
            .as_str()
            .starts_with("https://sheets.example/v4/spreadsheets/abc123/values/"));
        assert!(!url.as_str().contains('시'));
    }
}
