//! Per-entry fetch processing
//!
//! A worker claims one frontier entry, fetches it, and turns the response
//! into audit records: always one fetch record, a visit record when the
//! content is actually processed, and one discovery record per extracted
//! link. In-scope links re-enter the frontier at depth + 1; redirect targets
//! re-enter at the SAME depth, since following a redirect is not a descent.
//!
//! Nothing here propagates a per-URL failure: network errors become
//! `FAILED` fetch records and the crawl moves on. Only audit sink I/O errors
//! bubble up, and the dispatcher logs those without stopping.

use crate::audit::{
    AuditError, AuditSink, CrawlCounters, DiscoveryRecord, FetchOutcome, FetchRecord, VisitRecord,
};
use crate::crawler::fetcher::{fetch_url, FetchResult};
use crate::crawler::parser::extract_links;
use crate::frontier::{Frontier, FrontierEntry};
use crate::scope::CrawlScope;
use crate::url::{classify, resolve_link, Validity};
use reqwest::Client;
use std::collections::HashSet;

/// Non-HTML content types that still get a visit record (no link extraction)
const BINARY_CONTENT_TYPES: &[&str] =
    &["application/pdf", "image/jpeg", "image/png", "image/gif"];

/// Processes one claimed frontier entry
///
/// All records reach the sink before this function returns, so a worker
/// never claims its next task with records still pending.
pub async fn process_entry(
    entry: &FrontierEntry,
    client: &Client,
    scope: &CrawlScope,
    frontier: &Frontier,
    sink: &dyn AuditSink,
    counters: &CrawlCounters,
) -> Result<(), AuditError> {
    let url_str = entry.url.as_str();

    let (status_code, content_type, body, redirect_target) =
        match fetch_url(client, url_str).await {
            FetchResult::Response {
                status_code,
                content_type,
                body,
                redirect_target,
            } => (status_code, content_type, body, redirect_target),
            FetchResult::NetworkFailure { error } => {
                tracing::debug!("Fetch failed for {}: {}", url_str, error);
                counters.record_failure();
                sink.record_fetch(&FetchRecord {
                    url: url_str.to_string(),
                    outcome: FetchOutcome::NetworkFailure,
                })?;
                return Ok(());
            }
        };

    sink.record_fetch(&FetchRecord {
        url: url_str.to_string(),
        outcome: FetchOutcome::Status(status_code),
    })?;

    match status_code {
        200 => {
            counters.record_success();
            if content_type.contains("text/html") {
                process_html_page(entry, &content_type, &body, scope, frontier, sink)?;
            } else if BINARY_CONTENT_TYPES.contains(&content_type.as_str()) {
                sink.record_visit(&VisitRecord {
                    url: url_str.to_string(),
                    byte_size: body.len() as u64,
                    out_link_count: 0,
                    content_type,
                })?;
            } else {
                tracing::debug!("Skipping unprocessed content type {:?} for {}", content_type, url_str);
            }
        }

        301 | 302 => {
            // Not counted as a failure; the target re-enters at the same depth
            if let Some(location) = redirect_target {
                if let Some(target) = resolve_link(&location, &entry.url) {
                    if classify(&target, scope) == Validity::InScope {
                        tracing::debug!("Redirect {} -> {}", url_str, target);
                        frontier.enqueue(target, entry.depth);
                    }
                }
            }
        }

        _ => {
            tracing::debug!("HTTP {} for {}", status_code, url_str);
            counters.record_failure();
        }
    }

    Ok(())
}

/// Extracts, classifies, and records the links of a 200 HTML response
fn process_html_page(
    entry: &FrontierEntry,
    content_type: &str,
    body: &[u8],
    scope: &CrawlScope,
    frontier: &Frontier,
    sink: &dyn AuditSink,
) -> Result<(), AuditError> {
    let html = String::from_utf8_lossy(body);
    let links = extract_links(&html, &entry.url);

    // Visit rows count distinct out-links; the discovery stream keeps
    // duplicates
    let mut distinct_links = HashSet::new();

    for link in &links {
        distinct_links.insert(link.as_str().to_string());

        let validity = classify(link, scope);
        sink.record_discovery(&DiscoveryRecord {
            url: link.to_string(),
            validity,
        })?;

        if validity == Validity::InScope {
            frontier.enqueue(link.clone(), entry.depth + 1);
        }
    }

    sink.record_visit(&VisitRecord {
        url: entry.url.to_string(),
        byte_size: body.len() as u64,
        out_link_count: distinct_links.len() as u64,
        content_type: content_type.to_string(),
    })?;

    tracing::debug!(
        "Visited {} ({} bytes, {} distinct links)",
        entry.url,
        body.len(),
        distinct_links.len()
    );

    Ok(())
}
