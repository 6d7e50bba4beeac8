//! Directory seeder - discovers seed locations from a search directory
//!
//! The seeder asks an external directory service for locations matching
//! free-text query terms. It is the one piece of the pipeline that goes
//! out unproxied: the directory itself lives on the open web even though
//! the locations it returns do not.

use crate::config::{CrawlConfig, DirectoryConfig, NetworkConfig};
use crate::events::ProgressSink;
use crate::SeedError;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;

/// Selector for title links inside the directory's result listing
const RESULT_SELECTOR: &str = ".result .title a";

/// Queries a search directory for crawl seed locations
pub struct DirectorySeeder {
    client: Client,
    endpoint: String,
    marker: String,
    delay: Duration,
    progress: ProgressSink,
}

impl DirectorySeeder {
    /// Creates a seeder from the configuration.
    ///
    /// The client is built without the forward proxy on purpose; only the
    /// User-Agent and timeout carry over from the network configuration.
    pub fn new(
        crawler: &CrawlConfig,
        network: &NetworkConfig,
        directory: &DirectoryConfig,
        progress: ProgressSink,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(network.user_agent.clone())
            .timeout(Duration::from_secs(network.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            endpoint: directory.endpoint.clone(),
            marker: crawler.domain_marker.clone(),
            delay: crawler.delay(),
            progress,
        })
    }

    /// Discovers up to `max_results` seed locations for the query terms.
    ///
    /// Any failure - network, non-2xx, unreadable body - yields an empty
    /// list and an error event. An empty list is not fatal here; the
    /// caller decides whether it means "nothing to crawl". The pacing
    /// delay is applied after the call either way.
    pub async fn discover(&self, query: &str, max_results: usize) -> Vec<String> {
        let outcome = self.search(query, max_results).await;
        tokio::time::sleep(self.delay).await;

        match outcome {
            Ok(seeds) => {
                for seed in &seeds {
                    self.progress.info(format!("Discovered seed {}", seed));
                }
                seeds
            }
            Err(e) => {
                self.progress
                    .error(format!("Directory search for '{}' failed: {}", query, e));
                Vec::new()
            }
        }
    }

    /// One GET against the directory endpoint, parsed for result links.
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<String>, SeedError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("q", query)])
            .send()
            .await?
            .error_for_status()?;
        let body = response.text().await?;

        let selector = Selector::parse(RESULT_SELECTOR)
            .map_err(|e| SeedError::Parse(e.to_string()))?;

        let document = Html::parse_document(&body);
        let mut seeds = Vec::new();
        for element in document.select(&selector) {
            if seeds.len() >= max_results {
                break;
            }
            if let Some(href) = element.value().attr("href") {
                if href.contains(&self.marker) {
                    seeds.push(href.to_string());
                }
            }
        }

        Ok(seeds)
    }
}
