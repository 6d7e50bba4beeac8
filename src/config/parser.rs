use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    // Read the configuration file
    let content = std::fs::read_to_string(path)?;

    // Parse TOML
    let config: Config = toml::from_str(&content)?;

    // Validate the configuration
    validate(&config)?;

    Ok(config)
}

/// Parses a comma-separated keyword list supplied by the caller
///
/// Entries are trimmed; empty entries are dropped. An all-whitespace
/// input yields an empty list, which disables keyword filtering.
///
/// # Example
///
/// ```
/// use lanternfish::config::parse_keywords;
///
/// let keywords = parse_keywords("market, forum ,,news");
/// assert_eq!(keywords, vec!["market", "forum", "news"]);
/// ```
pub fn parse_keywords(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parses a newline-separated selector list supplied by the caller
///
/// Blank lines and lines starting with `#` are ignored; remaining lines
/// are trimmed and kept in order.
pub fn parse_selectors(input: &str) -> Vec<String> {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
