//! Dispatcher: the fixed-size worker pool and its termination logic
//!
//! The dispatcher spawns N worker tasks over one shared frontier. Each
//! worker loops: claim an entry, process it, repeat. A claim can also report
//! that the queue is momentarily empty while other workers are still in
//! flight (the worker polls again shortly) or that the crawl is over (cap
//! reached, or empty queue with zero in-flight work). The in-flight count is
//! maintained inside the frontier's critical section, so "looks empty" can
//! never be confused with quiescence.
//!
//! A shared cancellation flag is checked before every claim; in-flight
//! fetches are allowed to complete and their records are still written.

use crate::audit::{AuditSink, CrawlCounters};
use crate::config::CrawlerConfig;
use crate::crawler::worker::process_entry;
use crate::frontier::{Claim, Frontier};
use crate::scope::CrawlScope;
use reqwest::Client;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

/// How long an idle worker sleeps before polling the frontier again
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Owns the worker pool and the shared crawl state for one run
pub struct Dispatcher {
    scope: Arc<CrawlScope>,
    frontier: Arc<Frontier>,
    sink: Arc<dyn AuditSink>,
    counters: Arc<CrawlCounters>,
    client: Client,
    workers: usize,
    progress_interval: u64,
    politeness_delay: Duration,
    cancelled: Arc<AtomicBool>,
}

impl Dispatcher {
    pub fn new(
        config: &CrawlerConfig,
        scope: Arc<CrawlScope>,
        frontier: Arc<Frontier>,
        sink: Arc<dyn AuditSink>,
        counters: Arc<CrawlCounters>,
        client: Client,
    ) -> Self {
        Self {
            scope,
            frontier,
            sink,
            counters,
            client,
            workers: config.workers,
            // Used as a modulus in the worker loop; zero would panic
            progress_interval: config.progress_interval.max(1),
            politeness_delay: Duration::from_millis(config.politeness_delay_ms),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Returns the shared cancellation flag
    ///
    /// Setting it to `true` stops workers from claiming new entries;
    /// in-flight fetches finish and record normally.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    /// Runs the worker pool to completion
    ///
    /// Returns once every worker has observed termination (cap exhaustion,
    /// quiescence, or cancellation) and the audit sink has been flushed.
    pub async fn run(&self) -> crate::Result<()> {
        tracing::info!(
            "Dispatching {} workers over {} (max {} pages, depth {})",
            self.workers,
            self.scope.root_domain,
            self.scope.max_pages,
            self.scope.max_depth
        );

        let mut tasks = JoinSet::new();
        for worker_id in 0..self.workers {
            tasks.spawn(worker_loop(
                worker_id,
                self.client.clone(),
                Arc::clone(&self.scope),
                Arc::clone(&self.frontier),
                Arc::clone(&self.sink),
                Arc::clone(&self.counters),
                Arc::clone(&self.cancelled),
                self.progress_interval,
                self.politeness_delay,
            ));
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                tracing::error!("Worker task failed: {}", e);
            }
        }

        self.sink.flush()?;
        Ok(())
    }
}

/// One worker's claim/process loop
#[allow(clippy::too_many_arguments)]
async fn worker_loop(
    worker_id: usize,
    client: Client,
    scope: Arc<CrawlScope>,
    frontier: Arc<Frontier>,
    sink: Arc<dyn AuditSink>,
    counters: Arc<CrawlCounters>,
    cancelled: Arc<AtomicBool>,
    progress_interval: u64,
    politeness_delay: Duration,
) {
    tracing::debug!("Worker {} started", worker_id);

    loop {
        if cancelled.load(Ordering::Relaxed) {
            tracing::debug!("Worker {} stopping: cancelled", worker_id);
            break;
        }

        match frontier.claim() {
            Claim::Entry(claimed) => {
                let completed = counters.record_page();
                let entry = &claimed.entry;
                tracing::debug!(
                    "Worker {} fetching {} (depth {})",
                    worker_id,
                    entry.url,
                    entry.depth
                );

                if let Err(e) =
                    process_entry(entry, &client, &scope, &frontier, sink.as_ref(), &counters)
                        .await
                {
                    tracing::error!("Audit write failed for {}: {}", entry.url, e);
                }

                // Release the in-flight slot before idling
                drop(claimed);

                if completed % progress_interval == 0 {
                    let snapshot = counters.snapshot();
                    tracing::info!(
                        "Progress: {} pages crawled ({} ok, {} failed), {} queued",
                        snapshot.pages_crawled,
                        snapshot.successful_fetches,
                        snapshot.failed_fetches,
                        frontier.queued_len()
                    );
                }

                if !politeness_delay.is_zero() {
                    tokio::time::sleep(politeness_delay).await;
                }
            }

            Claim::Pending => {
                tokio::time::sleep(POLL_INTERVAL).await;
            }

            Claim::Exhausted => {
                tracing::debug!("Worker {} stopping: frontier exhausted", worker_id);
                break;
            }
        }
    }
}
