// src/config.rs
// =============================================================================
// Settings for one crawl run.
//
// The values are kept raw (signed integers) on purpose: the Dispatcher and
// DomainRegistry constructors do the validation, so a bad value gives the
// same InvalidConfig / InvalidInput error whether it came from the command
// line or from code using the library.
// =============================================================================

use std::time::Duration;

pub const DEFAULT_SEED_URL: &str = "https://books.toscrape.com";
pub const DEFAULT_TASK_LIMIT: i64 = 50;
pub const DEFAULT_INTERVAL_MS: i64 = 0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlConfig {
    /// Where the crawl starts; also decides which host is crawled
    pub seed_url: String,
    /// Maximum number of pages being fetched at the same time
    pub task_limit: i64,
    /// Minimum milliseconds between two page fetches being started
    pub interval_ms: i64,
    /// Per-request timeout. None waits forever.
    pub fetch_timeout: Option<Duration>,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            seed_url: DEFAULT_SEED_URL.to_string(),
            task_limit: DEFAULT_TASK_LIMIT,
            interval_ms: DEFAULT_INTERVAL_MS,
            fetch_timeout: None,
        }
    }
}
