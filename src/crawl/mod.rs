// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Pieces, from the bottom up:
// - queue: FIFO of URLs waiting to be crawled
// - domain: target host, dedup history and the resulting site map
// - dispatcher: concurrency limit + minimum interval between fetches
// - fetch / links: download a page, pull out its same-host links
// - crawler: the loop that drives all of the above
// =============================================================================

mod crawler;
mod dispatcher;
mod domain;
mod fetch;
mod links;
mod queue;

pub use crawler::{Crawler, PageLinks};
pub use dispatcher::Dispatcher;
pub use domain::{DomainRegistry, SiteMap};
pub use fetch::Fetcher;
pub use links::{extract_links, resolve_link, ExtractedLinks, SkippedLink};
pub use queue::Queue;
