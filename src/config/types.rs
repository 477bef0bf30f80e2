use serde::Deserialize;

/// Main configuration structure for Driftnet
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            crawler: CrawlerConfig::default(),
            user_agent: UserAgentConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of pages to crawl
    #[serde(rename = "max-pages")]
    pub max_pages: usize,

    /// Maximum depth to crawl from the seed URL
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Number of concurrent fetch workers
    pub workers: usize,

    /// Per-request timeout in seconds
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Delay between requests from the same worker (milliseconds, 0 = off)
    #[serde(rename = "politeness-delay-ms")]
    pub politeness_delay_ms: u64,

    /// Log a progress line every N completed fetches
    #[serde(rename = "progress-interval")]
    pub progress_interval: u64,

    /// File extensions excluded from the crawl scope (lowercase, no dot)
    #[serde(rename = "excluded-extensions")]
    pub excluded_extensions: Vec<String>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: 20_000,
            max_depth: 16,
            workers: 8,
            request_timeout_secs: 10,
            politeness_delay_ms: 0,
            progress_interval: 10,
            excluded_extensions: default_excluded_extensions(),
        }
    }
}

/// Style sheets, scripts, media, archives, fonts, images, PDFs and
/// structured-data formats that carry no crawlable links.
fn default_excluded_extensions() -> Vec<String> {
    [
        "css", "js", "mid", "mp2", "mp3", "mp4", "wav", "avi", "mov", "mpeg", "ram", "m4v", "rm",
        "smil", "wmv", "swf", "wma", "zip", "rar", "gz", "json", "ttf", "svg", "ico", "jpg",
        "jpeg", "png", "gif", "pdf", "xml",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "Driftnet".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://example.com/driftnet".to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the full user-agent header value
    ///
    /// Format: `CrawlerName/Version (compatible; +ContactURL)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (compatible; +{})",
            self.crawler_name, self.crawler_version, self.contact_url
        )
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving the three audit stream CSV files
    #[serde(rename = "audit-dir")]
    pub audit_dir: String,

    /// Path of the generated text report
    #[serde(rename = "report-path")]
    pub report_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            audit_dir: "./audit".to_string(),
            report_path: "./crawl_report.txt".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_bounded_crawl() {
        let config = Config::default();
        assert_eq!(config.crawler.max_pages, 20_000);
        assert_eq!(config.crawler.max_depth, 16);
        assert_eq!(config.crawler.request_timeout_secs, 10);
        assert!(config.crawler.workers >= 1);
    }

    #[test]
    fn test_default_extensions_are_lowercase() {
        let config = CrawlerConfig::default();
        for ext in &config.excluded_extensions {
            assert_eq!(ext, &ext.to_lowercase());
            assert!(!ext.starts_with('.'));
        }
        assert!(config.excluded_extensions.contains(&"pdf".to_string()));
        assert!(config.excluded_extensions.contains(&"css".to_string()));
    }

    #[test]
    fn test_user_agent_header_value() {
        let ua = UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "2.0".to_string(),
            contact_url: "https://example.com/bot".to_string(),
        };
        assert_eq!(
            ua.header_value(),
            "TestBot/2.0 (compatible; +https://example.com/bot)"
        );
    }
}
