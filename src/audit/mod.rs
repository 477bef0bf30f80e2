//! Audit trail: the crawl's observable contract
//!
//! Every dequeued URL produces exactly one [`FetchRecord`]; processed content
//! additionally produces a [`VisitRecord`]; every link extracted from an HTML
//! page produces a [`DiscoveryRecord`]. The three streams are independent and
//! append-only, written in completion order. Running totals live in
//! [`CrawlCounters`].
//!
//! [`AuditSink`] is the seam between workers and the concrete writer: the
//! crawler uses [`CsvAuditSink`] in production and [`MemoryAuditSink`] in
//! tests.

mod csv_sink;

use crate::url::Validity;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use thiserror::Error;

pub use csv_sink::{CsvAuditSink, DISCOVERY_LOG, FETCH_LOG, VISIT_LOG};

/// Audit sink errors
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Outcome of one fetch attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The server answered with an HTTP status code
    Status(u16),
    /// Timeout, DNS, TLS, or connection failure before any status arrived
    NetworkFailure,
}

impl FetchOutcome {
    /// CSV marker used by the fetch stream
    pub fn marker(&self) -> String {
        match self {
            Self::Status(code) => code.to_string(),
            Self::NetworkFailure => "FAILED".to_string(),
        }
    }
}

/// One fetch attempt, emitted for every dequeued URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRecord {
    pub url: String,
    pub outcome: FetchOutcome,
}

/// One processed page or whitelisted binary download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitRecord {
    pub url: String,
    pub byte_size: u64,
    pub out_link_count: u64,
    pub content_type: String,
}

/// One link extracted from an HTML page, duplicates included
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryRecord {
    pub url: String,
    pub validity: Validity,
}

/// Thread-safe append-only writer for the three record streams
///
/// Implementations must serialize writes per stream but keep the streams
/// independent, so a slow writer on one stream does not block the others.
/// All methods take `&self`; workers share the sink behind an `Arc`.
pub trait AuditSink: Send + Sync {
    fn record_fetch(&self, record: &FetchRecord) -> Result<(), AuditError>;

    fn record_visit(&self, record: &VisitRecord) -> Result<(), AuditError>;

    fn record_discovery(&self, record: &DiscoveryRecord) -> Result<(), AuditError>;

    /// Flushes buffered records to their destination
    fn flush(&self) -> Result<(), AuditError>;
}

/// Monotonically increasing crawl totals
///
/// `pages_crawled` counts claimed frontier entries; `successful_fetches`
/// counts 200 responses; `failed_fetches` counts network failures and
/// non-2xx, non-redirect statuses.
#[derive(Debug, Default)]
pub struct CrawlCounters {
    pages_crawled: AtomicU64,
    successful_fetches: AtomicU64,
    failed_fetches: AtomicU64,
}

/// Point-in-time copy of the counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterSnapshot {
    pub pages_crawled: u64,
    pub successful_fetches: u64,
    pub failed_fetches: u64,
}

impl CrawlCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one claimed page; returns the new total
    pub fn record_page(&self) -> u64 {
        self.pages_crawled.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn record_success(&self) {
        self.successful_fetches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failed_fetches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn pages_crawled(&self) -> u64 {
        self.pages_crawled.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            pages_crawled: self.pages_crawled.load(Ordering::Relaxed),
            successful_fetches: self.successful_fetches.load(Ordering::Relaxed),
            failed_fetches: self.failed_fetches.load(Ordering::Relaxed),
        }
    }
}

/// In-memory sink used by tests and library consumers that want records as
/// values instead of CSV files
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    fetches: Mutex<Vec<FetchRecord>>,
    visits: Mutex<Vec<VisitRecord>>,
    discoveries: Mutex<Vec<DiscoveryRecord>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fetches(&self) -> Vec<FetchRecord> {
        self.fetches.lock().unwrap().clone()
    }

    pub fn visits(&self) -> Vec<VisitRecord> {
        self.visits.lock().unwrap().clone()
    }

    pub fn discoveries(&self) -> Vec<DiscoveryRecord> {
        self.discoveries.lock().unwrap().clone()
    }
}

impl AuditSink for MemoryAuditSink {
    fn record_fetch(&self, record: &FetchRecord) -> Result<(), AuditError> {
        self.fetches.lock().unwrap().push(record.clone());
        Ok(())
    }

    fn record_visit(&self, record: &VisitRecord) -> Result<(), AuditError> {
        self.visits.lock().unwrap().push(record.clone());
        Ok(())
    }

    fn record_discovery(&self, record: &DiscoveryRecord) -> Result<(), AuditError> {
        self.discoveries.lock().unwrap().push(record.clone());
        Ok(())
    }

    fn flush(&self) -> Result<(), AuditError> {
        Ok(())
    }
}
