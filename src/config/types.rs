use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Lanternfish
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlConfig,
    pub network: NetworkConfig,
    pub directory: DirectoryConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            crawler: CrawlConfig::default(),
            network: NetworkConfig::default(),
            directory: DirectoryConfig::default(),
        }
    }
}

/// Crawl behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// Pacing delay applied after every fetch or search attempt (seconds)
    #[serde(rename = "delay-seconds")]
    pub delay_seconds: f64,

    /// Maximum number of records extracted from a single page
    #[serde(rename = "max-items-per-page")]
    pub max_items_per_page: usize,

    /// Overall cap on the returned record collection.
    ///
    /// Defaults to `max_items_per_page` when unset, which matches the
    /// historical behavior of using one number for both caps.
    #[serde(rename = "max-total-items")]
    pub max_total_items: Option<usize>,

    /// Maximum depth to crawl from seed locations
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Maximum number of pages visited in one crawl run
    #[serde(rename = "max-pages")]
    pub max_pages: usize,

    /// Substring that admits a location as crawlable (e.g. ".onion")
    #[serde(rename = "domain-marker")]
    pub domain_marker: String,

    /// Keywords a record's text must contain (case-insensitive, any match);
    /// empty list disables the filter
    pub keywords: Vec<String>,

    /// Ordered CSS selector rules tried before the default tag scan;
    /// empty list goes straight to the default tags
    pub selectors: Vec<String>,
}

impl CrawlConfig {
    /// The overall result cap, falling back to the per-page cap.
    pub fn total_cap(&self) -> usize {
        self.max_total_items.unwrap_or(self.max_items_per_page)
    }

    /// The pacing delay as a [`Duration`].
    pub fn delay(&self) -> Duration {
        Duration::from_secs_f64(self.delay_seconds)
    }
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            delay_seconds: 2.0,
            max_items_per_page: 20,
            max_total_items: None,
            max_depth: 1,
            max_pages: 30,
            domain_marker: ".onion".to_string(),
            keywords: Vec::new(),
            selectors: Vec::new(),
        }
    }
}

/// Network egress configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Forward proxy for all page fetches; `None` connects directly.
    /// The directory search never goes through this proxy.
    pub proxy: Option<String>,

    /// Per-request timeout (seconds)
    #[serde(rename = "timeout-seconds")]
    pub timeout_seconds: u64,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            proxy: Some("socks5h://127.0.0.1:9050".to_string()),
            timeout_seconds: 25,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
                         AppleWebKit/537.36 (KHTML, like Gecko) \
                         Chrome/91.0.4472.124 Safari/537.36"
                .to_string(),
        }
    }
}

/// Directory search configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    /// Search endpoint queried for seed locations
    pub endpoint: String,

    /// Maximum number of seed locations returned by one search
    #[serde(rename = "max-results")]
    pub max_results: usize,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://ahmia.fi/search/".to_string(),
            max_results: 10,
        }
    }
}
