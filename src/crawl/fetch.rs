// src/crawl/fetch.rs
// =============================================================================
// Downloads pages for the crawler.
//
// One reqwest::Client is built up front and cloned into every crawl step, so
// all requests share a connection pool. Cloning a Client only bumps a
// reference count.
//
// Any HTTP status counts as a successful fetch as long as the body can be
// read: a 404 page is still a page, it just usually has few links.
//
// Rust concepts:
// - #[derive(Clone)]: cheap copies of the client for each task
// - map_err: wraps reqwest errors into our own CrawlError
// =============================================================================

use std::time::Duration;

use reqwest::Client;

use crate::error::{CrawlError, Result};

const USER_AGENT: &str = concat!("site-crawler/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    // Builds the shared HTTP client
    //
    // timeout: None means a request may wait forever. That is the default,
    // and it means a server that never answers holds one task slot for good.
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| CrawlError::InvalidConfig(format!("failed to build http client: {}", e)))?;

        Ok(Self { client })
    }

    /// Fetches a page and returns its body as text
    pub async fn fetch_text(&self, url: &str) -> Result<String> {
        let fetch_error = |source| CrawlError::Fetch {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(fetch_error)?;
        response.text().await.map_err(fetch_error)
    }
}
