//! URL handling module for Driftnet
//!
//! This module provides href resolution, host extraction, and crawl-scope
//! classification of candidate URLs.

mod domain;
mod resolve;

use crate::scope::CrawlScope;
use url::Url;

// Re-export main functions
pub use domain::{extract_host, host_within_domain};
pub use resolve::resolve_link;

/// Whether a discovered URL falls inside the crawl scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Validity {
    /// URL is within the root domain and passes the exclusion rules
    InScope,
    /// URL points outside the crawl scope
    OutOfScope,
}

impl Validity {
    /// CSV marker used by the discovery stream
    pub fn marker(&self) -> &'static str {
        match self {
            Self::InScope => "OK",
            Self::OutOfScope => "N_OK",
        }
    }

    /// Parses a discovery stream marker back into a validity
    pub fn from_marker(marker: &str) -> Option<Self> {
        match marker {
            "OK" => Some(Self::InScope),
            "N_OK" => Some(Self::OutOfScope),
            _ => None,
        }
    }
}

/// Classifies a candidate URL against the crawl scope
///
/// The rules are applied in order, first match wins:
/// 1. Out of scope if the host is not the root domain or a subdomain of it.
/// 2. Out of scope if the path contains a telephone-link segment (`/tel:`).
/// 3. Out of scope if the lowercased file extension (the substring after the
///    last `.` in the path) is in the excluded set.
/// 4. In scope otherwise.
///
/// Relative URLs must already be resolved against the fetching page (see
/// [`resolve_link`]); this function is pure and deterministic.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use driftnet::config::CrawlerConfig;
/// use driftnet::scope::CrawlScope;
/// use driftnet::url::{classify, Validity};
///
/// let seed = Url::parse("https://example.com/").unwrap();
/// let scope = CrawlScope::for_seed(&seed, &CrawlerConfig::default()).unwrap();
///
/// let inside = Url::parse("https://example.com/news").unwrap();
/// assert_eq!(classify(&inside, &scope), Validity::InScope);
///
/// let outside = Url::parse("https://other.com/news").unwrap();
/// assert_eq!(classify(&outside, &scope), Validity::OutOfScope);
/// ```
pub fn classify(url: &Url, scope: &CrawlScope) -> Validity {
    let host = match extract_host(url) {
        Some(h) => h,
        None => return Validity::OutOfScope,
    };

    if !host_within_domain(&host, &scope.root_domain) {
        return Validity::OutOfScope;
    }

    if url.path().contains("/tel:") {
        return Validity::OutOfScope;
    }

    if let Some((_, ext)) = url.path().rsplit_once('.') {
        if scope.excluded_extensions.contains(&ext.to_lowercase()) {
            return Validity::OutOfScope;
        }
    }

    Validity::InScope
}
