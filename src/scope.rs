//! Crawl scope: the immutable bounds of one crawl run
//!
//! A [`CrawlScope`] is derived from the configuration and the seed URL when
//! the run starts and never changes afterwards. The URL classifier, the
//! frontier, and the dispatcher all borrow it; none of them mutate it.

use crate::config::CrawlerConfig;
use crate::url::extract_host;
use crate::UrlError;
use std::collections::HashSet;
use url::Url;

/// Immutable bounds of a crawl run
#[derive(Debug, Clone)]
pub struct CrawlScope {
    /// Root domain the crawl is confined to (the seed URL's host, lowercase)
    pub root_domain: String,

    /// Maximum number of pages to claim from the frontier
    pub max_pages: usize,

    /// Maximum link depth measured from the seed (seed is depth 0)
    pub max_depth: u32,

    /// Lowercased file extensions excluded from the crawl
    pub excluded_extensions: HashSet<String>,
}

impl CrawlScope {
    /// Builds the scope for a seed URL from the crawler configuration
    ///
    /// # Errors
    ///
    /// Returns [`UrlError::MissingHost`] if the seed URL has no host
    /// component (e.g. a `file:` URL).
    pub fn for_seed(seed: &Url, config: &CrawlerConfig) -> Result<Self, UrlError> {
        let root_domain =
            extract_host(seed).ok_or_else(|| UrlError::MissingHost(seed.to_string()))?;

        Ok(Self {
            root_domain,
            max_pages: config.max_pages,
            max_depth: config.max_depth,
            excluded_extensions: config.excluded_extensions.iter().cloned().collect(),
        })
    }
}
