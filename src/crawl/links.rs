// src/crawl/links.rs
// =============================================================================
// This module turns a downloaded page into the set of links worth crawling.
//
// Steps for every <a href="..."> on the page:
// 1. Ignore it if the href is empty
// 2. Resolve it against the page URL (relative -> absolute)
// 3. Drop the #fragment, so "page#top" and "page" are the same link
// 4. Keep it only if it is http(s) and on the target host
//
// Everything we throw away is returned as a SkippedLink so the caller can
// report it. Nothing in here is fatal to the page.
//
// Rust concepts:
// - Enums with data: SkippedLink says why a link was dropped
// - impl Display: turns a SkippedLink into the log message
// - match guards: `Some(host) if host == target_host`
// =============================================================================

use std::collections::BTreeSet;
use std::fmt;

use scraper::{Html, Selector};
use url::Url;

use crate::error::CrawlError;

/// Why a link found on a page was not kept
#[derive(Debug)]
pub enum SkippedLink {
    /// Resolved fine, but points at another host
    OutOfDomain { url: String, host: String },
    /// Resolved fine, but is not http/https (mailto:, javascript:, ftp:, ...)
    UnsupportedScheme { url: String },
    /// The href could not be resolved at all
    Unresolvable(CrawlError),
}

impl fmt::Display for SkippedLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkippedLink::OutOfDomain { host, .. } => {
                write!(f, "skipped adding invalid url to queue: {}", host)
            }
            SkippedLink::UnsupportedScheme { url } => {
                write!(f, "skipped non-http url: {}", url)
            }
            SkippedLink::Unresolvable(e) => write!(f, "skipped unresolvable link: {}", e),
        }
    }
}

/// Result of scanning one page
#[derive(Debug, Default)]
pub struct ExtractedLinks {
    /// Absolute, same-host, deduplicated links
    pub links: BTreeSet<String>,
    pub skipped: Vec<SkippedLink>,
}

// Extracts the same-host links from an HTML page
//
// Parameters:
//   html: the page body
//   base: the URL the page was fetched from (for resolving relative links)
//   target_host: the only host we are allowed to follow
pub fn extract_links(html: &str, base: &Url, target_host: &str) -> ExtractedLinks {
    let mut extracted = ExtractedLinks::default();

    let document = Html::parse_document(html);

    // "a[href]" is a constant selector, it always parses
    let selector = Selector::parse("a[href]").unwrap();

    for element in document.select(&selector) {
        let href = match element.value().attr("href") {
            Some(href) if !href.trim().is_empty() => href,
            _ => continue,
        };

        let url = match resolve_link(base, href) {
            Ok(url) => url,
            Err(e) => {
                extracted.skipped.push(SkippedLink::Unresolvable(e));
                continue;
            }
        };

        if url.scheme() != "http" && url.scheme() != "https" {
            extracted.skipped.push(SkippedLink::UnsupportedScheme {
                url: url.to_string(),
            });
            continue;
        }

        match url.host_str() {
            Some(host) if host == target_host => {
                extracted.links.insert(url.to_string());
            }
            host => {
                extracted.skipped.push(SkippedLink::OutOfDomain {
                    host: host.unwrap_or_default().to_string(),
                    url: url.to_string(),
                });
            }
        }
    }

    extracted
}

// Resolves a (possibly relative) href against the page URL
//
// Examples with base = "https://example.com/page":
//   "/docs"              -> https://example.com/docs
//   "https://other.com"  -> https://other.com/
//   "#section"           -> https://example.com/page
//
// The fragment is dropped on purpose: "page#a" and "page#b" are the same
// document, and keeping them apart would fetch it once per anchor.
pub fn resolve_link(base: &Url, href: &str) -> Result<Url, CrawlError> {
    let mut url = base.join(href.trim()).map_err(|source| CrawlError::Resolve {
        href: href.to_string(),
        source,
    })?;
    url.set_fragment(None);
    Ok(url)
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What does Url::join do?
//    - Resolves a link the way a browser does
//    - "/docs" against "https://example.com/page" -> "https://example.com/docs"
//    - An absolute href just replaces the base
//
// 2. Why collect into a BTreeSet?
//    - The same link often appears several times on a page (header, footer)
//    - A set keeps one copy; BTree keeps them sorted
//
// 3. Why return skipped links instead of printing them?
//    - The caller decides how to report them (here: tracing warn!)
//    - Tests can check exactly what was skipped and why
// -----------------------------------------------------------------------------
