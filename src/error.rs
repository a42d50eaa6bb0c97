// src/error.rs
// =============================================================================
// Error types for the crawl engine.
//
// Only the construction errors (bad seed URL, bad limits) ever reach the
// caller. Fetch and resolve errors are produced per page / per link and are
// logged where they happen; the crawl keeps going.
// =============================================================================

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CrawlError {
    /// The seed URL is empty, not a URL, or has no host
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Concurrency limit or dispatch interval out of range
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Downloading a page failed (connection, TLS, body decoding, timeout)
    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// An href could not be turned into an absolute URL
    #[error("failed to resolve '{href}': {source}")]
    Resolve {
        href: String,
        #[source]
        source: url::ParseError,
    },
}

pub type Result<T> = std::result::Result<T, CrawlError>;
