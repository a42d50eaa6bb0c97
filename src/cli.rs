// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Usage:
//   site-crawler [SEED_URL] [TASK_LIMIT] [INTERVAL_MS] [--json] [--timeout-secs N] [--quiet]
//
// All three positionals are optional and fall back to the defaults in
// config.rs. The numbers are parsed as signed integers so that "-5" reaches
// the crawler and is rejected there with a proper InvalidConfig error.
//
// Rust concepts:
// - Derive macros: #[derive(Parser)] generates the argument parser
// - Option<u64>: a flag that may or may not be given
// =============================================================================

use std::time::Duration;

use clap::Parser;

use site_crawler::config::{
    CrawlConfig, DEFAULT_INTERVAL_MS, DEFAULT_SEED_URL, DEFAULT_TASK_LIMIT,
};

#[derive(Parser, Debug)]
#[command(
    name = "site-crawler",
    version,
    about = "Crawl a single website and print its site map",
    long_about = "site-crawler starts at a seed URL, follows every link that stays on the same host, \
                  and reports which links were found on each page. Each page is fetched once."
)]
pub struct Cli {
    /// URL to start crawling from; its host is the only host crawled
    #[arg(default_value = DEFAULT_SEED_URL)]
    pub seed_url: String,

    /// Maximum number of pages fetched at the same time
    #[arg(default_value_t = DEFAULT_TASK_LIMIT, allow_negative_numbers = true)]
    pub task_limit: i64,

    /// Minimum milliseconds between starting two fetches
    #[arg(default_value_t = DEFAULT_INTERVAL_MS, allow_negative_numbers = true)]
    pub interval_ms: i64,

    /// Print the site map as JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Give up on a single request after this many seconds (default: never)
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Only log warnings and errors (RUST_LOG still wins when set)
    #[arg(long, short)]
    pub quiet: bool,
}

impl Cli {
    pub fn crawl_config(&self) -> CrawlConfig {
        CrawlConfig {
            seed_url: self.seed_url.clone(),
            task_limit: self.task_limit,
            interval_ms: self.interval_ms,
            fetch_timeout: self.timeout_secs.map(Duration::from_secs),
        }
    }
}
