// src/crawl/crawler.rs
// =============================================================================
// The Crawler ties everything together and drives the crawl loop.
//
// How it works:
// 1. Collect crawl steps that have finished and apply their results
// 2. Stop when the queue is empty and nothing is in flight
// 3. If there is a queued URL and a free slot: wait for the interval, then
//    dispatch the next crawl step
// 4. Otherwise sleep a few milliseconds and check again
//
// A crawl step runs as its own tokio task. It only fetches and parses; it
// never touches the queue, history or site map. Those are changed only here,
// in apply(), by the loop that owns them.
//
// Rust concepts:
// - Ownership: start(self) consumes the crawler, so one crawler = one crawl
// - move closures: each crawl step gets its own clone of the fetcher
// - Send futures: crawl steps may run on any tokio worker thread
// =============================================================================

use std::collections::BTreeSet;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{info, warn};
use url::Url;

use super::dispatcher::Dispatcher;
use super::domain::{DomainRegistry, SiteMap};
use super::fetch::Fetcher;
use super::links::extract_links;
use crate::config::CrawlConfig;
use crate::error::{CrawlError, Result};

// How long the loop sleeps when it cannot dispatch anything
const IDLE_DELAY: Duration = Duration::from_millis(5);

/// What one crawl step found on one page
#[derive(Debug)]
pub struct PageLinks {
    pub url: String,
    pub links: BTreeSet<String>,
}

pub struct Crawler {
    domain: DomainRegistry,
    dispatcher: Dispatcher<PageLinks>,
    fetcher: Fetcher,
}

impl Crawler {
    // Validates the configuration and prepares a crawl
    //
    // Fails with InvalidInput for a bad seed URL and InvalidConfig for a bad
    // task limit or interval. Nothing is fetched yet.
    pub fn new(config: &CrawlConfig) -> Result<Self> {
        let domain = DomainRegistry::new(&config.seed_url)?;
        let dispatcher = Dispatcher::new(
            vec![domain.seed().to_string()],
            config.task_limit,
            config.interval_ms,
        )?;
        let fetcher = Fetcher::new(config.fetch_timeout)?;

        Ok(Self {
            domain,
            dispatcher,
            fetcher,
        })
    }

    pub fn domain(&self) -> &DomainRegistry {
        &self.domain
    }

    pub fn dispatcher(&self) -> &Dispatcher<PageLinks> {
        &self.dispatcher
    }

    // Crawls until every reachable same-host page has been visited
    //
    // Returns the site map: every page that was fetched successfully, mapped
    // to the same-host links found on it. Pages that failed are just absent.
    pub async fn start(mut self) -> SiteMap {
        info!(
            seed = %self.domain.seed(),
            limit = self.dispatcher.limit(),
            interval_ms = self.dispatcher.interval().as_millis() as u64,
            "crawl started"
        );

        loop {
            for page in self.dispatcher.settle() {
                self.apply(page);
            }

            let queued = self.dispatcher.queue().count();
            if queued == 0 && self.dispatcher.in_flight() == 0 {
                break;
            }

            if queued > 0 && self.dispatcher.capacity_available() {
                self.dispatcher.wait_for_interval(Instant::now()).await;

                let fetcher = self.fetcher.clone();
                let target_host = self.domain.target_host().to_string();
                let dispatched = self
                    .dispatcher
                    .dispatch(move |url| crawl_page(fetcher, target_host, url));
                debug_assert!(dispatched, "dispatch refused with queue and capacity available");
            } else {
                // Don't spin while every slot is busy
                self.dispatcher.delay(IDLE_DELAY).await;
            }
        }

        info!(pages = self.domain.site_map().len(), "crawl finished");
        self.domain.into_site_map()
    }

    // Runs one crawl step right here (no task, no interval) and applies it
    //
    // The URL must be waiting in the queue: it is taken out of the queue
    // first, so neither start() nor a second visit() will fetch it again.
    // A URL that is not queued is rejected with InvalidInput. Unlike start(), a fetch failure is
    // returned to the caller; the URL stays consumed either way.
    pub async fn visit(&mut self, url: &str) -> Result<()> {
        if !self.dispatcher.queue_mut().remove(url) {
            return Err(CrawlError::InvalidInput(format!(
                "url is not waiting in the crawl queue: {}",
                url
            )));
        }

        let page = crawl_page(
            self.fetcher.clone(),
            self.domain.target_host().to_string(),
            url.to_string(),
        )
        .await?;
        self.apply(page);
        Ok(())
    }

    // Records a finished page and queues the links nobody has seen before.
    // This is the only place where the queue grows.
    fn apply(&mut self, page: PageLinks) {
        let PageLinks { url, links } = page;

        for link in &links {
            if self.domain.mark_seen(link) {
                self.dispatcher.queue_mut().push(link.clone());
            }
        }

        info!(%url, links = links.len(), "crawled page");
        self.domain.record_page(url, links);
    }
}

// The crawl step: fetch one page and pull out its same-host links
async fn crawl_page(fetcher: Fetcher, target_host: String, url: String) -> Result<PageLinks> {
    let base = Url::parse(&url).map_err(|source| CrawlError::Resolve {
        href: url.clone(),
        source,
    })?;

    let body = fetcher.fetch_text(&url).await?;

    // Parsing is synchronous; the parsed document never lives across an await
    let extracted = extract_links(&body, &base, &target_host);
    for skipped in &extracted.skipped {
        warn!(page = %url, "{}", skipped);
    }

    Ok(PageLinks {
        url,
        links: extracted.links,
    })
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why does crawl_page() take owned values (Fetcher, String, String)?
//    - A spawned task may outlive the function that spawned it
//    - So it cannot borrow anything from the Crawler ('static requirement)
//    - Cloning a Fetcher is cheap: reqwest::Client is reference counted
//
// 2. Why not let each task update the site map itself?
//    - Several tasks run at the same time, possibly on different threads
//    - Shared mutation would need a Mutex around every structure
//    - Returning PageLinks and applying it in one place needs no locks at all
//
// 3. What does `let PageLinks { url, links } = page;` do?
//    - Destructuring: moves both fields out of the struct into variables
//    - Lets us give `links` to record_page() without cloning it
//
// 4. Why sleep in the loop at all?
//    - When every slot is busy there is nothing to do until a task finishes
//    - Without the short sleep the loop would spin at 100% CPU
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Mock, ServerGuard};

    fn config(seed_url: &str, task_limit: i64, interval_ms: i64) -> CrawlConfig {
        CrawlConfig {
            seed_url: seed_url.to_string(),
            task_limit,
            interval_ms,
            fetch_timeout: Some(Duration::from_secs(5)),
        }
    }

    // Serves one HTML page that must be fetched exactly once
    async fn page(server: &mut ServerGuard, path: &str, body: &str) -> Mock {
        server
            .mock("GET", path)
            .with_header("content-type", "text/html")
            .with_body(body)
            .expect(1)
            .create_async()
            .await
    }

    fn set(items: &[String]) -> BTreeSet<String> {
        items.iter().cloned().collect()
    }

    #[test]
    fn test_new_rejects_bad_seed() {
        let result = Crawler::new(&config("not-a-url", 5, 0));
        assert!(matches!(result, Err(CrawlError::InvalidInput(_))));

        let result = Crawler::new(&config("", 5, 0));
        assert!(matches!(result, Err(CrawlError::InvalidInput(_))));
    }

    #[test]
    fn test_new_rejects_bad_limits() {
        let result = Crawler::new(&config("https://example.com", 0, 0));
        assert!(matches!(result, Err(CrawlError::InvalidConfig(_))));

        let result = Crawler::new(&config("https://example.com", 5, -1));
        assert!(matches!(result, Err(CrawlError::InvalidConfig(_))));
    }

    #[test]
    fn test_new_queues_normalized_seed() {
        let crawler = Crawler::new(&config("https://example.com", 5, 1000)).unwrap();

        assert_eq!(crawler.domain().target_host(), "example.com");
        assert_eq!(
            crawler.dispatcher().queue().snapshot(),
            vec!["https://example.com/".to_string()]
        );
    }

    fn mixed_links_page(base: &str) -> String {
        format!(
            r#"<html><body>
                <a href="{base}/page1">Page 1</a>
                <a href="/page2">Page 2</a>
                <a href="https://other-domain.com/page3">External Page</a>
                <a>No href</a>
            </body></html>"#
        )
    }

    #[tokio::test]
    async fn test_visit_extracts_and_queues_links() {
        let mut server = mockito::Server::new_async().await;
        let base = server.url();
        page(&mut server, "/", &mixed_links_page(&base)).await;

        let seed = format!("{base}/");
        let mut crawler = Crawler::new(&config(&seed, 5, 0)).unwrap();
        crawler.visit(&seed).await.unwrap();

        let expected = set(&[format!("{base}/page1"), format!("{base}/page2")]);
        assert_eq!(crawler.domain().site_map()[&seed], expected);
        // the seed left the queue, the two new links joined it
        assert_eq!(
            crawler.dispatcher().queue().snapshot(),
            vec![format!("{base}/page1"), format!("{base}/page2")]
        );
    }

    // Seed page with an absolute same-host link, a relative one and an
    // external one: only the two same-host links are kept and followed
    #[tokio::test]
    async fn test_keeps_only_same_host_links() {
        let mut server = mockito::Server::new_async().await;
        let base = server.url();
        page(&mut server, "/", &mixed_links_page(&base)).await;
        page(&mut server, "/page1", "<html></html>").await;
        page(&mut server, "/page2", "<html></html>").await;

        let seed = format!("{base}/");
        let site_map = Crawler::new(&config(&seed, 5, 0)).unwrap().start().await;

        let expected = set(&[format!("{base}/page1"), format!("{base}/page2")]);
        assert_eq!(site_map.len(), 3);
        assert_eq!(site_map[&seed], expected);
        assert!(!site_map.keys().any(|k| k.contains("other-domain.com")));
    }

    // Two pages linking to each other: the crawl ends with two entries
    #[tokio::test]
    async fn test_cycle_terminates() {
        let mut server = mockito::Server::new_async().await;
        let base = server.url();
        let a = page(&mut server, "/", r#"<a href="/b">B</a>"#).await;
        let b = page(&mut server, "/b", r#"<a href="/">A</a>"#).await;

        let seed = format!("{base}/");
        let site_map = Crawler::new(&config(&seed, 5, 0)).unwrap().start().await;

        assert_eq!(site_map.len(), 2);
        assert_eq!(site_map[&seed], set(&[format!("{base}/b")]));
        assert_eq!(site_map[&format!("{base}/b")], set(&[seed.clone()]));
        a.assert_async().await;
        b.assert_async().await;
    }

    // A page without anchors still gets an entry, with no links
    #[tokio::test]
    async fn test_page_without_anchors() {
        let mut server = mockito::Server::new_async().await;
        page(&mut server, "/", "<html><body><p>nothing here</p></body></html>").await;

        let seed = format!("{}/", server.url());
        let site_map = Crawler::new(&config(&seed, 5, 0)).unwrap().start().await;

        assert_eq!(site_map.len(), 1);
        assert!(site_map[&seed].is_empty());
    }

    // The seed links back to itself in three spellings: it is never queued
    // again and the queue drains
    #[tokio::test]
    async fn test_seed_self_link_is_not_requeued() {
        let mut server = mockito::Server::new_async().await;
        let base = server.url();
        let html = format!(r##"<a href="{base}">home</a><a href="/">home</a><a href="#top">top</a>"##);
        let seed_mock = page(&mut server, "/", &html).await;

        let mut crawler = Crawler::new(&config(&base, 5, 0)).unwrap();
        let seed = crawler.domain().seed().to_string();
        crawler.visit(&seed).await.unwrap();

        assert!(crawler.dispatcher().queue().is_empty());
        assert_eq!(crawler.domain().history().len(), 1);

        let site_map = crawler.start().await;
        assert_eq!(site_map.len(), 1);
        assert_eq!(site_map[&seed], set(&[seed.clone()]));
        seed_mock.assert_async().await;
    }

    // visit() followed by start() fetches and records every page once
    #[tokio::test]
    async fn test_visit_then_start_records_each_page_once() {
        let mut server = mockito::Server::new_async().await;
        let base = server.url();
        let seed_mock = page(&mut server, "/", r#"<a href="/a">a</a>"#).await;
        let a_mock = page(&mut server, "/a", r#"<a href="/">home</a>"#).await;

        let seed = format!("{base}/");
        let mut crawler = Crawler::new(&config(&seed, 5, 0)).unwrap();
        crawler.visit(&seed).await.unwrap();
        let site_map = crawler.start().await;

        assert_eq!(site_map.len(), 2);
        assert_eq!(site_map[&seed], set(&[format!("{base}/a")]));
        seed_mock.assert_async().await;
        a_mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_visit_twice_is_rejected() {
        let mut server = mockito::Server::new_async().await;
        let seed_mock = page(&mut server, "/", "<html></html>").await;

        let seed = format!("{}/", server.url());
        let mut crawler = Crawler::new(&config(&seed, 5, 0)).unwrap();
        crawler.visit(&seed).await.unwrap();

        let result = crawler.visit(&seed).await;
        assert!(matches!(result, Err(CrawlError::InvalidInput(_))));
        assert_eq!(crawler.domain().site_map().len(), 1);
        seed_mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_visit_unqueued_url_is_rejected() {
        let mut crawler = Crawler::new(&config("https://example.com/", 5, 0)).unwrap();

        let result = crawler.visit("https://example.com/never-seen").await;
        assert!(matches!(result, Err(CrawlError::InvalidInput(_))));
        assert_eq!(crawler.dispatcher().queue().count(), 1);
        assert!(crawler.domain().site_map().is_empty());
    }

    // A same-host link whose fetch fails gets no entry; the crawl still ends
    #[tokio::test]
    async fn test_fetch_failure_is_contained() {
        let mut server = mockito::Server::new_async().await;
        let base = server.url();
        // same host as the mock server, but nothing listens on port 1
        let html = r#"<a href="/alive">alive</a><a href="http://127.0.0.1:1/dead">dead</a>"#;
        page(&mut server, "/", html).await;
        page(&mut server, "/alive", "<html></html>").await;

        let seed = format!("{base}/");
        let site_map = Crawler::new(&config(&seed, 2, 0)).unwrap().start().await;

        assert_eq!(site_map.len(), 2);
        assert!(site_map.contains_key(&format!("{base}/alive")));
        assert!(!site_map.contains_key("http://127.0.0.1:1/dead"));
        assert!(site_map[&seed].contains("http://127.0.0.1:1/dead"));
    }

    #[tokio::test]
    async fn test_unreachable_seed_gives_empty_site_map() {
        let site_map = Crawler::new(&config("http://127.0.0.1:1/", 2, 0))
            .unwrap()
            .start()
            .await;
        assert!(site_map.is_empty());
    }

    #[tokio::test]
    async fn test_visit_returns_fetch_error() {
        let mut crawler = Crawler::new(&config("http://127.0.0.1:1/", 2, 0)).unwrap();
        let result = crawler.visit("http://127.0.0.1:1/").await;

        assert!(matches!(result, Err(CrawlError::Fetch { .. })));
        assert!(crawler.domain().site_map().is_empty());
        // the failed URL was consumed, so there is nothing left to retry
        assert!(crawler.dispatcher().queue().is_empty());
        assert!(crawler.start().await.is_empty());
    }

    #[tokio::test]
    async fn test_crawl_with_limit_one_and_interval() {
        let mut server = mockito::Server::new_async().await;
        let base = server.url();
        page(&mut server, "/", r#"<a href="/a">a</a><a href="/b">b</a>"#).await;
        page(&mut server, "/a", r#"<a href="/c">c</a>"#).await;
        page(&mut server, "/b", "<html></html>").await;
        page(&mut server, "/c", r#"<a href="/a">a</a>"#).await;

        let seed = format!("{base}/");
        let started = std::time::Instant::now();
        let site_map = Crawler::new(&config(&seed, 1, 20)).unwrap().start().await;

        assert_eq!(site_map.len(), 4);
        // four dispatches, three gaps of at least 20ms
        assert!(started.elapsed() >= Duration::from_millis(60));
    }
}
