//! Crawler module: fetching, parsing, and crawl orchestration
//!
//! This module contains the concurrent core:
//! - HTTP fetching with a fixed timeout ([`fetcher`])
//! - HTML link extraction ([`parser`])
//! - Per-entry processing into audit records ([`worker`])
//! - The worker pool with quiescence-based termination ([`dispatcher`])

mod dispatcher;
mod fetcher;
mod parser;
mod worker;

pub use dispatcher::Dispatcher;
pub use fetcher::{build_http_client, fetch_url, FetchResult};
pub use parser::extract_links;
pub use worker::process_entry;

use crate::audit::{AuditSink, CounterSnapshot, CrawlCounters, CsvAuditSink};
use crate::config::Config;
use crate::frontier::Frontier;
use crate::scope::CrawlScope;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// Final totals of one crawl run
#[derive(Debug, Clone, Copy)]
pub struct CrawlSummary {
    pub pages_crawled: u64,
    pub successful_fetches: u64,
    pub failed_fetches: u64,
    pub elapsed: Duration,
}

impl CrawlSummary {
    fn new(snapshot: CounterSnapshot, elapsed: Duration) -> Self {
        Self {
            pages_crawled: snapshot.pages_crawled,
            successful_fetches: snapshot.successful_fetches,
            failed_fetches: snapshot.failed_fetches,
            elapsed,
        }
    }
}

/// Runs a complete crawl, writing the audit streams as CSV files
///
/// This is the main entry point: it derives the crawl scope from the seed,
/// seeds the frontier, creates the CSV audit sink in the configured
/// directory, and runs the dispatcher to completion.
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `seed` - The URL the crawl starts from; its host becomes the root domain
///
/// # Returns
///
/// * `Ok(CrawlSummary)` - Crawl terminated (cap exhaustion or quiescence)
/// * `Err(CrawlError)` - Initialization failed (bad seed, sink I/O)
pub async fn crawl(config: &Config, seed: Url) -> crate::Result<CrawlSummary> {
    let sink: Arc<dyn AuditSink> =
        Arc::new(CsvAuditSink::create(Path::new(&config.output.audit_dir))?);
    crawl_with_sink(config, seed, sink).await
}

/// Runs a complete crawl against a caller-provided audit sink
///
/// Used by tests and by consumers that want records somewhere other than
/// CSV files.
pub async fn crawl_with_sink(
    config: &Config,
    seed: Url,
    sink: Arc<dyn AuditSink>,
) -> crate::Result<CrawlSummary> {
    let scope = Arc::new(CrawlScope::for_seed(&seed, &config.crawler)?);
    let frontier = Arc::new(Frontier::new(scope.max_depth, scope.max_pages));
    let counters = Arc::new(CrawlCounters::new());
    let client = build_http_client(
        &config.user_agent,
        Duration::from_secs(config.crawler.request_timeout_secs),
    )?;

    tracing::info!(
        "Starting crawl from {} (root domain: {})",
        seed,
        scope.root_domain
    );
    frontier.enqueue(seed, 0);

    let start = Instant::now();
    let dispatcher = Dispatcher::new(
        &config.crawler,
        scope,
        Arc::clone(&frontier),
        sink,
        Arc::clone(&counters),
        client,
    );
    dispatcher.run().await?;

    let summary = CrawlSummary::new(counters.snapshot(), start.elapsed());
    tracing::info!(
        "Crawl completed: {} pages in {:?} ({} succeeded, {} failed)",
        summary.pages_crawled,
        summary.elapsed,
        summary.successful_fetches,
        summary.failed_fetches
    );

    Ok(summary)
}
