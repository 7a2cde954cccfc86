//! HTTP transport for the Hacker News API.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header;
use tracing::debug;

use super::types::REQUEST_TIMEOUT;
use crate::TARGET_WEB_REQUEST;

pub const DEFAULT_BASE_URL: &str = "https://hacker-news.firebaseio.com/v0/";

const USER_AGENT: &str = "beststories/0.1 (+https://example)";

/// Fetches the raw JSON payload for a named resource path.
///
/// The production implementation is [`HttpTransport`]; tests substitute
/// stubs to control payloads and count calls.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch_json(&self, path: &str) -> Result<Vec<u8>>;
}

/// Transport backed by a shared reqwest client. Request timeout and
/// connection pooling live here; the pipeline itself never retries.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .gzip(true)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))?;

        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Ok(HttpTransport { client, base_url })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch_json(&self, path: &str) -> Result<Vec<u8>> {
        let url = format!("{}{}", self.base_url, path);
        debug!(target: TARGET_WEB_REQUEST, "Fetching {}", url);

        let response = self
            .client
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .with_context(|| format!("request to {} failed", url))?
            .error_for_status()
            .with_context(|| format!("non-success status from {}", url))?;

        let bytes = response
            .bytes()
            .await
            .with_context(|| format!("failed to read response body from {}", url))?;

        Ok(bytes.to_vec())
    }
}
