// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (tracing events go to stderr)
// 3. Build the crawler and run it to completion
// 4. Print the site map and exit (0 = done, 2 = could not start the crawl)
//
// The crawl itself lives in the library (src/lib.rs); this file is only
// glue around it.
//
// Rust concepts:
// - async/await: the crawl runs inside the tokio runtime
// - anyhow::Result: any error type can bubble up with ?
// - Lifetimes: CrawlReport<'a> borrows the site map instead of copying it
// =============================================================================

mod cli;

use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use site_crawler::{Crawler, SiteMap};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.quiet);

    let exit_code = match run(cli).await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Logs go to stderr so that --json output on stdout stays clean.
// RUST_LOG overrides the default level, e.g. RUST_LOG=site_crawler=debug
fn init_logging(quiet: bool) {
    let default_level = if quiet { "warn" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let crawler = Crawler::new(&cli.crawl_config())?;

    info!("starting crawler for {} ...", cli.seed_url);
    let started = Instant::now();

    let site_map = crawler.start().await;
    let elapsed_secs = started.elapsed().as_secs_f64();

    info!("crawled {} urls in {} seconds", site_map.len(), elapsed_secs);

    let report = CrawlReport {
        seed_url: &cli.seed_url,
        pages: site_map.len(),
        elapsed_secs,
        site_map: &site_map,
    };
    print_report(&report, cli.json)
}

// What --json prints: a small summary plus the full site map
#[derive(Debug, Serialize)]
struct CrawlReport<'a> {
    seed_url: &'a str,
    pages: usize,
    elapsed_secs: f64,
    site_map: &'a SiteMap,
}

// Prints the report either as a table or JSON
fn print_report(report: &CrawlReport<'_>, json: bool) -> Result<()> {
    if json {
        let json_output = serde_json::to_string_pretty(report)?;
        println!("{}", json_output);
    } else {
        print_table(report.site_map);
    }
    Ok(())
}

fn print_table(site_map: &SiteMap) {
    println!("{:<80} {:>8}", "PAGE", "LINKS");
    println!("{}", "=".repeat(89));

    for (page, links) in site_map {
        // Truncate long URLs so the table stays aligned
        let page_display = if page.chars().count() > 77 {
            format!("{}...", page.chars().take(77).collect::<String>())
        } else {
            page.clone()
        };

        println!("{:<80} {:>8}", page_display, links.len());
    }

    println!();

    let total_links: usize = site_map.values().map(|links| links.len()).sum();

    println!("📊 Summary:");
    println!("   📄 Pages: {}", site_map.len());
    println!("   🔗 Links: {}", total_links);
}
