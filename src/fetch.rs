//! Page fetching.
//!
//! Scrapers talk to the network through the [`FetchPage`] trait so the
//! crawl logic can be driven by canned pages in tests. [`HttpFetcher`] is
//! the real implementation: plain GETs with a fixed User-Agent and the
//! per-request timeout. There are no retries; a failed fetch is a dropped
//! unit of work for the caller to record.

use reqwest::Client;
use std::time::Instant;
use tracing::{debug, instrument, warn};

use crate::config::{REQUEST_TIMEOUT, USER_AGENT};
use crate::error::{Result, ScrapeError};

/// Anything that can turn a URL into an HTML body.
pub trait FetchPage {
    /// Fetch `url` and return the response body as text.
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// HTTP fetcher backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }
}

impl FetchPage for HttpFetcher {
    #[instrument(level = "debug", skip_all, fields(%url))]
    async fn fetch(&self, url: &str) -> Result<String> {
        let t0 = Instant::now();
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Non-success response");
            return Err(ScrapeError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let body = response.text().await?;
        debug!(
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched page"
        );
        Ok(body)
    }
}
