//! Driftnet: a bounded, polite, breadth-first site crawler
//!
//! This crate implements a domain-bounded web crawler that fetches pages up
//! to page-count and depth limits, extracts outbound links, classifies
//! content, and emits three append-only audit streams (fetch, visit,
//! discovered-URL) alongside running counters. An offline report generator
//! aggregates the streams after the run.

pub mod audit;
pub mod config;
pub mod crawler;
pub mod frontier;
pub mod report;
pub mod scope;
pub mod url;

use thiserror::Error;

/// Main error type for Driftnet operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Audit sink error: {0}")]
    Audit(#[from] audit::AuditError),

    #[error("Report error: {0}")]
    Report(#[from] report::ReportError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("URL has no host: {0}")]
    MissingHost(String),
}

/// Result type alias for Driftnet operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use audit::{CrawlCounters, DiscoveryRecord, FetchOutcome, FetchRecord, VisitRecord};
pub use config::Config;
pub use scope::CrawlScope;
pub use url::{classify, Validity};
