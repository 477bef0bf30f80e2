//! Offline report generation
//!
//! Reads the three audit streams back from disk after a run and aggregates
//! them into summary tables: fetch outcomes grouped by status, visit sizes
//! bucketed into size classes, content-type counts, and unique discovered
//! URLs partitioned by whether their host falls within the crawled root
//! domain. This is pure post-processing; it never touches live crawler
//! state.

use crate::audit::CsvAuditSink;
use crate::url::host_within_domain;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use thiserror::Error;
use url::Url;

/// Report generation errors
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Malformed audit row: {0}")]
    Malformed(String),
}

/// Visit size classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SizeBucket {
    Under1Kb,
    From1KbTo10Kb,
    From10KbTo100Kb,
    From100KbTo1Mb,
    AtLeast1Mb,
}

impl SizeBucket {
    /// All buckets in ascending order
    pub const ALL: [SizeBucket; 5] = [
        Self::Under1Kb,
        Self::From1KbTo10Kb,
        Self::From10KbTo100Kb,
        Self::From100KbTo1Mb,
        Self::AtLeast1Mb,
    ];

    /// Buckets a byte size
    pub fn for_size(bytes: u64) -> Self {
        match bytes {
            0..=1_023 => Self::Under1Kb,
            1_024..=10_239 => Self::From1KbTo10Kb,
            10_240..=102_399 => Self::From10KbTo100Kb,
            102_400..=1_048_575 => Self::From100KbTo1Mb,
            _ => Self::AtLeast1Mb,
        }
    }

    /// Human-readable bucket label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Under1Kb => "< 1KB",
            Self::From1KbTo10Kb => "1KB ~ <10KB",
            Self::From10KbTo100Kb => "10KB ~ <100KB",
            Self::From100KbTo1Mb => "100KB ~ <1MB",
            Self::AtLeast1Mb => ">= 1MB",
        }
    }
}

/// Aggregated view of one run's audit streams
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Root domain the run was confined to
    pub root_domain: String,

    /// Fetch stream totals
    pub fetches_attempted: u64,
    pub fetches_succeeded: u64,
    pub fetches_failed: u64,

    /// Fetch outcomes grouped by status marker (`FAILED` included)
    pub status_counts: BTreeMap<String, u64>,

    /// Visit sizes grouped into size classes
    pub size_counts: BTreeMap<SizeBucket, u64>,

    /// Visits grouped by content type
    pub content_type_counts: BTreeMap<String, u64>,

    /// Sum of out-link counts over all visits
    pub total_links_extracted: u64,

    /// Discovery stream, deduplicated
    pub unique_urls: u64,
    pub unique_within: u64,
    pub unique_outside: u64,
}

/// Aggregates the three audit streams of a finished run
///
/// # Arguments
///
/// * `audit_dir` - Directory holding `fetch.csv`, `visit.csv`, `urls.csv`
/// * `root_domain` - The crawled root domain, for the within/outside split
pub fn generate_report(audit_dir: &Path, root_domain: &str) -> Result<CrawlReport, ReportError> {
    let mut report = CrawlReport {
        root_domain: root_domain.to_string(),
        fetches_attempted: 0,
        fetches_succeeded: 0,
        fetches_failed: 0,
        status_counts: BTreeMap::new(),
        size_counts: BTreeMap::new(),
        content_type_counts: BTreeMap::new(),
        total_links_extracted: 0,
        unique_urls: 0,
        unique_within: 0,
        unique_outside: 0,
    };

    aggregate_fetch_stream(&CsvAuditSink::fetch_path(audit_dir), &mut report)?;
    aggregate_visit_stream(&CsvAuditSink::visit_path(audit_dir), &mut report)?;
    aggregate_discovery_stream(&CsvAuditSink::discovery_path(audit_dir), &mut report)?;

    Ok(report)
}

fn aggregate_fetch_stream(path: &Path, report: &mut CrawlReport) -> Result<(), ReportError> {
    let mut reader = csv::Reader::from_path(path)?;
    for row in reader.records() {
        let row = row?;
        let status = row
            .get(1)
            .ok_or_else(|| ReportError::Malformed(format!("fetch row: {:?}", row)))?;

        report.fetches_attempted += 1;
        if status.starts_with('2') {
            report.fetches_succeeded += 1;
        } else {
            report.fetches_failed += 1;
        }
        *report.status_counts.entry(status.to_string()).or_insert(0) += 1;
    }
    Ok(())
}

fn aggregate_visit_stream(path: &Path, report: &mut CrawlReport) -> Result<(), ReportError> {
    let mut reader = csv::Reader::from_path(path)?;
    for row in reader.records() {
        let row = row?;
        let malformed = || ReportError::Malformed(format!("visit row: {:?}", row));

        let size: u64 = row
            .get(1)
            .and_then(|v| v.parse().ok())
            .ok_or_else(malformed)?;
        let out_links: u64 = row
            .get(2)
            .and_then(|v| v.parse().ok())
            .ok_or_else(malformed)?;
        let content_type = row.get(3).ok_or_else(malformed)?;

        *report
            .size_counts
            .entry(SizeBucket::for_size(size))
            .or_insert(0) += 1;
        *report
            .content_type_counts
            .entry(content_type.to_string())
            .or_insert(0) += 1;
        report.total_links_extracted += out_links;
    }
    Ok(())
}

fn aggregate_discovery_stream(path: &Path, report: &mut CrawlReport) -> Result<(), ReportError> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut unique = HashSet::new();
    let mut within = 0u64;
    let mut outside = 0u64;

    for row in reader.records() {
        let row = row?;
        let url = row
            .get(0)
            .ok_or_else(|| ReportError::Malformed(format!("discovery row: {:?}", row)))?;

        if !unique.insert(url.to_string()) {
            continue;
        }

        let in_domain = Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.to_lowercase()))
            .map(|host| host_within_domain(&host, &report.root_domain))
            .unwrap_or(false);

        if in_domain {
            within += 1;
        } else {
            outside += 1;
        }
    }

    report.unique_urls = unique.len() as u64;
    report.unique_within = within;
    report.unique_outside = outside;
    Ok(())
}

/// Renders a report as the classic text summary
pub fn render_report(report: &CrawlReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("Site crawled: {}\n\n", report.root_domain));

    out.push_str("Fetch Statistics\n================\n");
    out.push_str(&format!(
        "# fetches attempted: {}\n",
        report.fetches_attempted
    ));
    out.push_str(&format!(
        "# fetches succeeded: {}\n",
        report.fetches_succeeded
    ));
    out.push_str(&format!(
        "# fetches failed or aborted: {}\n\n",
        report.fetches_failed
    ));

    out.push_str("Outgoing URLs\n=============\n");
    out.push_str(&format!(
        "Total URLs extracted: {}\n",
        report.total_links_extracted
    ));
    out.push_str(&format!("# unique URLs extracted: {}\n", report.unique_urls));
    out.push_str(&format!(
        "# unique URLs within site: {}\n",
        report.unique_within
    ));
    out.push_str(&format!(
        "# unique URLs outside site: {}\n\n",
        report.unique_outside
    ));

    out.push_str("Status Codes\n============\n");
    for (status, count) in &report.status_counts {
        out.push_str(&format!("{}: {}\n", status, count));
    }
    out.push('\n');

    out.push_str("File Sizes\n==========\n");
    for bucket in SizeBucket::ALL {
        let count = report.size_counts.get(&bucket).copied().unwrap_or(0);
        out.push_str(&format!("{}: {}\n", bucket.label(), count));
    }
    out.push('\n');

    out.push_str("Content Types\n=============\n");
    for (content_type, count) in &report.content_type_counts {
        out.push_str(&format!("{}: {}\n", content_type, count));
    }

    out
}

/// Generates the report and writes the rendered text to `report_path`
pub fn write_report(
    audit_dir: &Path,
    root_domain: &str,
    report_path: &Path,
) -> Result<CrawlReport, ReportError> {
    let report = generate_report(audit_dir, root_domain)?;
    std::fs::write(report_path, render_report(&report))?;
    Ok(report)
}
