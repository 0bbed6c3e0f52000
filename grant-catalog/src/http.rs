//! HTTP client shared by the network sources.
//!
//! Government listing pages serve stripped-down or blocked markup to
//! clients that do not look like a browser, so every client carries a
//! browser User-Agent, Korean-first language preferences and a cookie
//! jar. Each request is bounded by the configured timeout.

use std::time::Duration;

use rand::seq::SliceRandom;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};

use crate::config::CatalogConfig;
use crate::error::CatalogError;

/// Browser identities picked from when no User-Agent is configured.
const BROWSER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/134.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_4) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/134.0.0.0 Safari/537.36 Edg/134.0.0.0",
    "Mozilla/5.0 (X11; Linux x86_64; rv:136.0) Gecko/20100101 Firefox/136.0",
];

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const ACCEPT_KO: &str = "ko-KR,ko;q=0.9,en;q=0.8";

/// Redirect hops followed before giving up.
const MAX_REDIRECTS: usize = 5;

/// Build the client used by the spreadsheet, CSV and listing sources.
///
/// # Errors
///
/// Returns [`CatalogError::Http`] if the TLS backend cannot be set up.
pub fn build_client(config: &CatalogConfig) -> Result<reqwest::Client, CatalogError> {
    let agent = config
        .user_agent
        .clone()
        .unwrap_or_else(|| random_user_agent().to_owned());

    reqwest::Client::builder()
        .user_agent(agent)
        .default_headers(browser_headers())
        .cookie_store(true)
        .timeout(Duration::from_secs(config.timeout_seconds))
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .build()
        .map_err(|e| CatalogError::Http(format!("failed to build HTTP client: {e}")))
}

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_KO));
    headers
}

/// One of the built-in browser User-Agents, chosen at random.
pub fn random_user_agent() -> &'static str {
    BROWSER_AGENTS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(BROWSER_AGENTS[0])
}

/// GET `url` and return the body text. Non-2xx answers are errors.
pub(crate) async fn get_text(
    client: &reqwest::Client,
    url: &str,
    context: &str,
) -> Result<String, CatalogError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| CatalogError::from_reqwest(context, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(CatalogError::Http(format!("{context}: status {status}")));
    }

    response
        .text()
        .await
        .map_err(|e| CatalogError::from_reqwest(context, e))
}
