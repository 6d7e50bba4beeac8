//! HTTP fetcher implementation
//!
//! This module handles all page retrievals for the crawler, including:
//! - Building an HTTP client routed through the forward proxy
//! - Scheme and domain-marker admission checks
//! - GET requests with a fixed timeout and browser-like User-Agent
//! - Request pacing after every attempt
//! - Error classification

use crate::config::{CrawlConfig, NetworkConfig};
use crate::crawler::document::Document;
use crate::{FetchError, FetchResult};
use reqwest::{Client, Proxy};
use std::time::Duration;

/// Builds the HTTP client used for page fetches
///
/// All page traffic goes through the configured forward proxy when one is
/// set; `socks5h://` endpoints resolve hostnames on the proxy side, which
/// is required for hidden-service addresses.
///
/// # Arguments
///
/// * `config` - The network egress configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &NetworkConfig) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.timeout_seconds))
        .gzip(true)
        .brotli(true);

    if let Some(proxy) = &config.proxy {
        builder = builder.proxy(Proxy::all(proxy)?);
    }

    builder.build()
}

/// Performs single page retrievals with admission checks and pacing
pub struct Fetcher {
    client: Client,
    marker: String,
    delay: Duration,
}

impl Fetcher {
    /// Creates a fetcher from the crawl and network configuration.
    pub fn new(crawler: &CrawlConfig, network: &NetworkConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(network)?,
            marker: crawler.domain_marker.clone(),
            delay: crawler.delay(),
        })
    }

    /// Checks whether a location is admissible for fetching.
    ///
    /// Rejections are pure: no network traffic, no pacing delay, no state
    /// change, so applying the check twice yields the same error kind.
    pub fn admit(&self, location: &str) -> FetchResult<()> {
        if !location.starts_with("http://") && !location.starts_with("https://") {
            return Err(FetchError::InvalidScheme(location.to_string()));
        }
        if !location.contains(&self.marker) {
            return Err(FetchError::DomainNotAllowed(location.to_string()));
        }
        Ok(())
    }

    /// Fetches a single page and parses it into a [`Document`].
    ///
    /// Inadmissible locations are rejected before any network traffic.
    /// Once a network attempt is made, the pacing delay is slept before
    /// returning, on success and on failure alike, so a run of failing
    /// locations is paced the same as a run of successes.
    ///
    /// # Arguments
    ///
    /// * `location` - The absolute address to fetch
    ///
    /// # Returns
    ///
    /// * `Ok(Document)` - Parsed page body
    /// * `Err(FetchError)` - Rejected or failed; the caller skips the
    ///   location and continues the crawl
    pub async fn fetch(&self, location: &str) -> FetchResult<Document> {
        self.admit(location)?;

        let outcome = self.get(location).await;
        tokio::time::sleep(self.delay).await;

        let body = outcome?;
        Ok(Document::parse(&body, location))
    }

    /// Issues the GET and reads the body, classifying failures.
    async fn get(&self, location: &str) -> FetchResult<String> {
        let response = self
            .client
            .get(location)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(|source| FetchError::Transport {
                location: location.to_string(),
                source,
            })?;

        response.text().await.map_err(|source| FetchError::Transport {
            location: location.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_fetcher() -> Fetcher {
        let crawler = CrawlConfig {
            delay_seconds: 0.01,
            ..CrawlConfig::default()
        };
        let network = NetworkConfig {
            proxy: None,
            ..NetworkConfig::default()
        };
        Fetcher::new(&crawler, &network).unwrap()
    }

    #[test]
    fn test_build_http_client() {
        let network = NetworkConfig {
            proxy: None,
            ..NetworkConfig::default()
        };
        assert!(build_http_client(&network).is_ok());
    }

    #[test]
    fn test_build_http_client_with_socks_proxy() {
        let network = NetworkConfig::default();
        assert!(build_http_client(&network).is_ok());
    }

    #[test]
    fn test_admit_rejects_bad_scheme() {
        let fetcher = create_test_fetcher();

        let result = fetcher.admit("ftp://a.onion/file");
        assert!(matches!(result, Err(FetchError::InvalidScheme(_))));

        let result = fetcher.admit("a.onion/no-scheme");
        assert!(matches!(result, Err(FetchError::InvalidScheme(_))));
    }

    #[test]
    fn test_admit_rejects_missing_marker() {
        let fetcher = create_test_fetcher();

        let result = fetcher.admit("http://clearnet.example/");
        assert!(matches!(result, Err(FetchError::DomainNotAllowed(_))));
    }

    #[test]
    fn test_admit_accepts_both_http_schemes() {
        let fetcher = create_test_fetcher();

        assert!(fetcher.admit("http://a.onion/").is_ok());
        assert!(fetcher.admit("https://a.onion/page").is_ok());
    }

    #[test]
    fn test_admit_is_idempotent() {
        let fetcher = create_test_fetcher();

        for _ in 0..2 {
            let result = fetcher.admit("http://clearnet.example/");
            assert!(matches!(result, Err(FetchError::DomainNotAllowed(_))));
        }
    }

    #[tokio::test]
    async fn test_fetch_rejects_without_network_call() {
        // No server exists for these addresses; an attempted connection
        // would surface as Transport, not as the admission errors
        let fetcher = create_test_fetcher();

        let result = fetcher.fetch("ftp://a.onion/").await;
        assert!(matches!(result, Err(FetchError::InvalidScheme(_))));

        let result = fetcher.fetch("http://clearnet.example/").await;
        assert!(matches!(result, Err(FetchError::DomainNotAllowed(_))));
    }
}
