//! Configuration validation
//!
//! Checks that a parsed configuration describes a runnable crawl before any
//! shared state is built from it.

use crate::config::types::Config;
use crate::ConfigError;

/// Validates a configuration
///
/// # Arguments
///
/// * `config` - The configuration to validate
///
/// # Returns
///
/// * `Ok(())` - Configuration is valid
/// * `Err(ConfigError::Validation)` - A field is out of range
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.crawler.max_pages == 0 {
        return Err(ConfigError::Validation(
            "crawler.max-pages must be at least 1".to_string(),
        ));
    }

    if config.crawler.workers == 0 {
        return Err(ConfigError::Validation(
            "crawler.workers must be at least 1".to_string(),
        ));
    }

    if config.crawler.request_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "crawler.request-timeout-secs must be at least 1".to_string(),
        ));
    }

    if config.crawler.progress_interval == 0 {
        return Err(ConfigError::Validation(
            "crawler.progress-interval must be at least 1".to_string(),
        ));
    }

    for ext in &config.crawler.excluded_extensions {
        if ext.is_empty() || ext.starts_with('.') || *ext != ext.to_lowercase() {
            return Err(ConfigError::Validation(format!(
                "excluded extension {:?} must be lowercase without a leading dot",
                ext
            )));
        }
    }

    if config.user_agent.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent.crawler-name must not be empty".to_string(),
        ));
    }

    if config.output.audit_dir.is_empty() {
        return Err(ConfigError::Validation(
            "output.audit-dir must not be empty".to_string(),
        ));
    }

    Ok(())
}
