// src/fetch.rs
// =============================================================================
// Single-page fetcher for the audit path.
//
// Fetches one URL with the configured timeout and user agent and captures
// everything the analyzers need into a PageSnapshot: the raw HTML, the
// response time, the payload size, and the URL components. The snapshot is a
// plain owned struct, so tests can build one from a static HTML string
// without touching the network.
// =============================================================================

use std::time::Instant;

use anyhow::{anyhow, Result};
use reqwest::Client;
use url::Url;

/// Everything the single-page analyzers consume.
#[derive(Debug, Clone)]
pub struct PageSnapshot {
    pub url: String,
    pub status_code: u16,
    pub html: String,
    pub elapsed_ms: u64,
    pub page_size_kb: f64,
    pub scheme: String,
    pub domain: String,
    pub base_url: String,
}

impl PageSnapshot {
    /// Build a snapshot from already-fetched HTML. Used by tests and by any
    /// caller that obtained the body some other way.
    pub fn from_html(url: &str, html: &str, status_code: u16, elapsed_ms: u64) -> Result<Self> {
        let parsed = Url::parse(url).map_err(|e| anyhow!("Invalid URL '{}': {}", url, e))?;
        let domain = parsed
            .host_str()
            .ok_or_else(|| anyhow!("URL has no host: {}", url))?;
        let authority = match parsed.port() {
            Some(port) => format!("{}:{}", domain, port),
            None => domain.to_string(),
        };
        Ok(PageSnapshot {
            url: url.to_string(),
            status_code,
            html: html.to_string(),
            elapsed_ms,
            page_size_kb: html.len() as f64 / 1024.0,
            scheme: parsed.scheme().to_string(),
            base_url: format!("{}://{}", parsed.scheme(), authority),
            domain: authority,
        })
    }
}

/// Builds the shared HTTP client: fixed user agent, bounded timeout,
/// redirects followed up to a small limit.
pub fn build_client(timeout: std::time::Duration, user_agent: &str) -> Result<Client> {
    let client = Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()?;
    Ok(client)
}

/// GETs the URL and returns a PageSnapshot. Any non-2xx status is an error:
/// there is nothing meaningful to audit on an error page. The timeout and
/// user agent are already baked into the client.
pub async fn fetch_page(client: &Client, url: &str) -> Result<PageSnapshot> {
    // Validate up front so a malformed URL fails before any request goes out
    Url::parse(url).map_err(|e| anyhow!("Invalid URL '{}': {}", url, e))?;

    let started = Instant::now();
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(anyhow!("HTTP {}", status));
    }

    let bytes = response.bytes().await?;
    let elapsed_ms = started.elapsed().as_millis() as u64;
    let html = String::from_utf8_lossy(&bytes).into_owned();

    let mut snapshot = PageSnapshot::from_html(url, &html, status.as_u16(), elapsed_ms)?;
    // Size from the wire payload, not the decoded string
    snapshot.page_size_kb = bytes.len() as f64 / 1024.0;
    Ok(snapshot)
}
