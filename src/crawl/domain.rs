// src/crawl/domain.rs
// =============================================================================
// The DomainRegistry owns everything the crawl knows about its target site:
//
// - the target hostname, derived once from the seed URL
// - the history: every URL ever admitted to the queue (seed included)
// - the site map: page URL -> same-host links found on that page
//
// mark_seen() is the only place where dedup happens. A URL that makes it
// through mark_seen() once is never queued again, which is what makes the
// crawl terminate on sites full of cycles.
//
// Rust concepts:
// - HashSet: O(1) "have we seen this URL?" checks
// - BTreeMap / BTreeSet: sorted maps and sets, so output is stable
// - Result + ?: constructor errors go straight back to the caller
// =============================================================================

use std::collections::{BTreeMap, BTreeSet, HashSet};

use url::Url;

use crate::error::{CrawlError, Result};

/// Page URL -> set of absolute, same-host links found on it
pub type SiteMap = BTreeMap<String, BTreeSet<String>>;

#[derive(Debug)]
pub struct DomainRegistry {
    seed: String,
    target_host: String,
    history: HashSet<String>,
    site_map: SiteMap,
}

impl DomainRegistry {
    // Validates the seed and derives the target host from it
    //
    // The seed is stored in its parsed form ("https://example.com" becomes
    // "https://example.com/") because every link we resolve later comes out
    // of Url::join in that same form. Otherwise a page linking back to "/"
    // would look like a brand new URL.
    pub fn new(seed_url: &str) -> Result<Self> {
        if seed_url.trim().is_empty() {
            return Err(CrawlError::InvalidInput(
                "seed url must not be empty".to_string(),
            ));
        }

        let parsed = Url::parse(seed_url).map_err(|e| {
            CrawlError::InvalidInput(format!("invalid seed url '{}': {}", seed_url, e))
        })?;

        let target_host = parsed
            .host_str()
            .filter(|host| !host.is_empty())
            .ok_or_else(|| CrawlError::InvalidInput(format!("seed url has no host: {}", seed_url)))?
            .to_string();

        let seed = parsed.to_string();
        let history = HashSet::from([seed.clone()]);

        Ok(Self {
            seed,
            target_host,
            history,
            site_map: SiteMap::new(),
        })
    }

    /// The normalized seed URL (already present in the history)
    pub fn seed(&self) -> &str {
        &self.seed
    }

    pub fn target_host(&self) -> &str {
        &self.target_host
    }

    pub fn history(&self) -> &HashSet<String> {
        &self.history
    }

    // Stores the links found on one page. Each page is recorded once; the
    // crawl loop guarantees that by only ever dispatching a URL once.
    pub fn record_page(&mut self, url: String, links: BTreeSet<String>) {
        debug_assert!(
            !self.site_map.contains_key(&url),
            "page recorded twice: {}",
            url
        );
        self.site_map.insert(url, links);
    }

    /// Returns true the first time a URL is seen, false on every later call
    pub fn mark_seen(&mut self, url: &str) -> bool {
        if self.history.contains(url) {
            return false;
        }
        self.history.insert(url.to_string())
    }

    pub fn site_map(&self) -> &SiteMap {
        &self.site_map
    }

    pub fn into_site_map(self) -> SiteMap {
        self.site_map
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why host_str() and not domain()?
//    - domain() is None for IP addresses like 127.0.0.1
//    - host_str() works for both names and IPs
//
// 2. What does HashSet::insert return?
//    - true if the value was new, false if it was already there
//    - That is exactly the answer mark_seen() has to give
//
// 3. Why debug_assert! in record_page()?
//    - It checks the "recorded once" rule in debug builds and tests
//    - Release builds compile it away
// -----------------------------------------------------------------------------
