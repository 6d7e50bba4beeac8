use crate::config::types::{Config, CrawlConfig, DirectoryConfig, NetworkConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawl_config(&config.crawler)?;
    validate_network_config(&config.network)?;
    validate_directory_config(&config.directory)?;
    Ok(())
}

/// Validates crawl behavior configuration
fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.delay_seconds < 1.0 {
        return Err(ConfigError::Validation(format!(
            "delay-seconds must be >= 1.0, got {}",
            config.delay_seconds
        )));
    }

    if config.max_items_per_page < 1 {
        return Err(ConfigError::Validation(format!(
            "max-items-per-page must be >= 1, got {}",
            config.max_items_per_page
        )));
    }

    if let Some(total) = config.max_total_items {
        if total < 1 {
            return Err(ConfigError::Validation(format!(
                "max-total-items must be >= 1 when set, got {}",
                total
            )));
        }
    }

    if config.max_depth > 3 {
        return Err(ConfigError::Validation(format!(
            "max-depth must be between 0 and 3, got {}",
            config.max_depth
        )));
    }

    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max-pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.domain_marker.trim().is_empty() {
        return Err(ConfigError::Validation(
            "domain-marker cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates network egress configuration
fn validate_network_config(config: &NetworkConfig) -> Result<(), ConfigError> {
    if config.timeout_seconds < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout-seconds must be >= 1, got {}",
            config.timeout_seconds
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if let Some(proxy) = &config.proxy {
        Url::parse(proxy)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid proxy '{}': {}", proxy, e)))?;
    }

    Ok(())
}

/// Validates directory search configuration
fn validate_directory_config(config: &DirectoryConfig) -> Result<(), ConfigError> {
    let endpoint = Url::parse(&config.endpoint).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid endpoint '{}': {}", config.endpoint, e))
    })?;

    if endpoint.scheme() != "http" && endpoint.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "endpoint must use http or https, got '{}'",
            config.endpoint
        )));
    }

    if config.max_results < 1 {
        return Err(ConfigError::Validation(format!(
            "max-results must be >= 1, got {}",
            config.max_results
        )));
    }

    Ok(())
}
