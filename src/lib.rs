// src/lib.rs
// =============================================================================
// site_crawler: a bounded-concurrency crawler for a single website.
//
// Give it a seed URL and it follows every same-host link it can find,
// fetching each page at most once, and returns a site map of
// page -> links found on that page.
//
//     let config = CrawlConfig { seed_url: "https://example.com".into(), ..Default::default() };
//     let site_map = Crawler::new(&config)?.start().await;
// =============================================================================

pub mod config;
pub mod crawl;
pub mod error;

pub use config::CrawlConfig;
pub use crawl::{Crawler, SiteMap};
pub use error::{CrawlError, Result};
