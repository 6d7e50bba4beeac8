//! Crawl engine - breadth-first traversal loop
//!
//! This module owns the frontier, the visited set, and the traversal
//! loop. It drives the fetcher and both extractors per visited location,
//! bounds the crawl by depth and page count, and aggregates records up to
//! the overall cap. The whole crawl runs on one worker: a single fetch in
//! flight at a time, results appended in strict visitation order.

use crate::config::Config;
use crate::crawler::content::{ContentExtractor, ExtractionRule, Record};
use crate::crawler::fetcher::Fetcher;
use crate::crawler::frontier::{Frontier, FrontierEntry, VisitedSet};
use crate::crawler::links::extract_links;
use crate::events::ProgressSink;
use crate::{FetchError, LanternError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Terminal state of a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlStatus {
    /// Frontier exhausted or page cap reached
    Completed,

    /// Stop signal observed between frontier entries
    Stopped,

    /// The worker task died; treated as a programming-error signal
    Failed,
}

/// Outcome of one crawl run
#[derive(Debug)]
pub struct CrawlSummary {
    /// Accumulated records in visitation order, truncated to the
    /// overall cap
    pub records: Vec<Record>,

    /// Number of frontier entries actually processed (fetch attempted)
    pub pages_visited: usize,

    pub status: CrawlStatus,
}

/// Shared stop signal for a running crawl
///
/// Setting it makes the engine cease dequeuing at the next iteration; an
/// in-flight fetch is allowed to complete.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    flag: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Breadth-first crawl engine
pub struct CrawlEngine {
    fetcher: Fetcher,
    extractor: ContentExtractor,
    marker: String,
    max_depth: u32,
    max_pages: usize,
    total_cap: usize,
    progress: ProgressSink,
    stop: StopHandle,
}

impl CrawlEngine {
    /// Creates an engine from the configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - The full configuration
    /// * `progress` - Injected notification sink for progress lines
    /// * `stop` - Stop signal shared with the controlling context
    pub fn new(config: &Config, progress: ProgressSink, stop: StopHandle) -> Result<Self, LanternError> {
        let fetcher = Fetcher::new(&config.crawler, &config.network)?;

        let rules: Vec<ExtractionRule> = config
            .crawler
            .selectors
            .iter()
            .cloned()
            .map(ExtractionRule::Selector)
            .collect();
        let extractor = ContentExtractor::new(
            config.crawler.max_items_per_page,
            &config.crawler.keywords,
            &rules,
        );

        Ok(Self {
            fetcher,
            extractor,
            marker: config.crawler.domain_marker.clone(),
            max_depth: config.crawler.max_depth,
            max_pages: config.crawler.max_pages,
            total_cap: config.crawler.total_cap(),
            progress,
            stop,
        })
    }

    /// The stop signal controlling this engine.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Runs the crawl to completion on the current task.
    ///
    /// Seeds enter the frontier at depth 0 in the given order. The loop
    /// pops the oldest entry, re-checks the visited set and depth bound at
    /// pop time, fetches, extracts content, and - below the depth bound -
    /// enqueues newly discovered links at depth+1. Fetch failures are
    /// reported and skipped; nothing here aborts the run.
    ///
    /// # Returns
    ///
    /// The accumulated records (visitation order, truncated to the
    /// overall cap), the number of pages processed, and the terminal
    /// status.
    pub async fn run(&self, seeds: Vec<String>) -> CrawlSummary {
        let mut frontier = Frontier::new();
        let mut visited = VisitedSet::new();
        for seed in seeds {
            frontier.push(FrontierEntry::new(seed, 0));
        }

        self.progress.info(format!(
            "Starting crawl with {} seed locations (max depth {}, max pages {})",
            frontier.len(),
            self.max_depth,
            self.max_pages
        ));

        let mut records: Vec<Record> = Vec::new();
        let mut pages_visited = 0usize;
        let mut status = CrawlStatus::Completed;

        while !frontier.is_empty() && pages_visited < self.max_pages {
            if self.stop.is_stopped() {
                status = CrawlStatus::Stopped;
                self.progress.warn("Crawl stopped by caller");
                break;
            }

            let Some(entry) = frontier.pop() else {
                break;
            };

            // Pop-time re-check: an entry queued earlier may have been
            // visited through another path since, and queued entries are
            // still subject to the depth bound.
            if visited.contains(&entry.location) || entry.depth > self.max_depth {
                continue;
            }
            visited.insert(&entry.location);

            self.progress.info(format!(
                "Crawling {} (depth {})",
                entry.location, entry.depth
            ));

            match self.fetcher.fetch(&entry.location).await {
                Ok(doc) => {
                    // The parsed page is scoped to this arm: it is not
                    // Send and must be gone before the next await.
                    records.extend(self.extractor.extract(&doc));

                    if entry.depth < self.max_depth {
                        for link in extract_links(&doc, &self.marker) {
                            if !visited.contains(&link) {
                                frontier.push(FrontierEntry::new(link, entry.depth + 1));
                            }
                        }
                    }
                }
                Err(FetchError::DomainNotAllowed(location)) => {
                    self.progress
                        .warn(format!("Non-matching address skipped: {}", location));
                }
                Err(e) => {
                    self.progress
                        .error(format!("Failed to fetch {}: {}", entry.location, e));
                }
            }

            pages_visited += 1;
        }

        records.truncate(self.total_cap);

        if status == CrawlStatus::Completed {
            self.progress.info(format!(
                "Crawl completed: {} pages visited, {} records",
                pages_visited,
                records.len()
            ));
        }

        CrawlSummary {
            records,
            pages_visited,
            status,
        }
    }

    /// Runs the crawl on a dedicated worker task.
    ///
    /// The controlling context stays responsive and observes the crawl
    /// only through the progress channel and the returned handle.
    pub fn spawn(self, seeds: Vec<String>) -> CrawlHandle {
        let stop = self.stop.clone();
        let join = tokio::spawn(async move { self.run(seeds).await });
        CrawlHandle { stop, join }
    }
}

/// Handle to a crawl running on its own worker task
pub struct CrawlHandle {
    stop: StopHandle,
    join: JoinHandle<CrawlSummary>,
}

impl CrawlHandle {
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Waits for the worker and returns its summary.
    ///
    /// A panicking worker is reported as a `Failed` summary rather than
    /// propagating the panic into the controlling context.
    pub async fn join(self) -> CrawlSummary {
        match self.join.await {
            Ok(summary) => summary,
            Err(e) => {
                tracing::error!("Crawl worker failed: {}", e);
                CrawlSummary {
                    records: Vec::new(),
                    pages_visited: 0,
                    status: CrawlStatus::Failed,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, CrawlConfig, NetworkConfig};

    /// Config with no proxy and a near-zero delay; nothing here touches
    /// the network unless a test asks for an unreachable address.
    fn create_test_config() -> Config {
        Config {
            crawler: CrawlConfig {
                delay_seconds: 0.01,
                max_items_per_page: 5,
                max_depth: 1,
                max_pages: 10,
                domain_marker: ".onion".to_string(),
                ..CrawlConfig::default()
            },
            network: NetworkConfig {
                proxy: None,
                timeout_seconds: 1,
                ..NetworkConfig::default()
            },
            ..Config::default()
        }
    }

    fn create_test_engine(config: &Config) -> CrawlEngine {
        CrawlEngine::new(config, ProgressSink::disabled(), StopHandle::new()).unwrap()
    }

    #[tokio::test]
    async fn test_empty_seed_list_completes_immediately() {
        let config = create_test_config();
        let engine = create_test_engine(&config);

        let summary = engine.run(Vec::new()).await;

        assert_eq!(summary.status, CrawlStatus::Completed);
        assert_eq!(summary.pages_visited, 0);
        assert!(summary.records.is_empty());
    }

    #[tokio::test]
    async fn test_inadmissible_seed_counts_as_processed() {
        // Admission failure is a fetch outcome; the entry is consumed and
        // counted without any network traffic
        let config = create_test_config();
        let engine = create_test_engine(&config);

        let summary = engine
            .run(vec!["not-a-location.onion".to_string()])
            .await;

        assert_eq!(summary.status, CrawlStatus::Completed);
        assert_eq!(summary.pages_visited, 1);
        assert!(summary.records.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_seeds_processed_once() {
        let config = create_test_config();
        let engine = create_test_engine(&config);

        let seeds = vec![
            "not-a-location.onion".to_string(),
            "not-a-location.onion".to_string(),
        ];
        let summary = engine.run(seeds).await;

        assert_eq!(summary.pages_visited, 1);
    }

    #[tokio::test]
    async fn test_non_marker_seed_skipped_with_warning() {
        let config = create_test_config();
        let (sink, mut rx) = ProgressSink::channel();
        let engine = CrawlEngine::new(&config, sink, StopHandle::new()).unwrap();

        let summary = engine
            .run(vec!["http://clearnet.example/".to_string()])
            .await;
        assert_eq!(summary.pages_visited, 1);

        let mut saw_warning = false;
        while let Ok(event) = rx.try_recv() {
            if event.severity == crate::events::Severity::Warning
                && event.message.contains("clearnet.example")
            {
                saw_warning = true;
            }
        }
        assert!(saw_warning);
    }

    #[tokio::test]
    async fn test_pre_set_stop_returns_stopped_without_visiting() {
        let config = create_test_config();
        let stop = StopHandle::new();
        stop.stop();
        let engine = CrawlEngine::new(&config, ProgressSink::disabled(), stop).unwrap();

        let summary = engine
            .run(vec!["http://a.onion/".to_string()])
            .await;

        assert_eq!(summary.status, CrawlStatus::Stopped);
        assert_eq!(summary.pages_visited, 0);
        assert!(summary.records.is_empty());
    }

    #[tokio::test]
    async fn test_page_cap_bounds_processing() {
        let mut config = create_test_config();
        config.crawler.max_pages = 2;
        let engine = create_test_engine(&config);

        // All inadmissible, so no network; only two may be processed
        let seeds: Vec<String> = (0..5)
            .map(|i| format!("seed-{}.onion", i))
            .collect();
        let summary = engine.run(seeds).await;

        assert_eq!(summary.pages_visited, 2);
        assert_eq!(summary.status, CrawlStatus::Completed);
    }

    #[test]
    fn test_stop_handle_is_shared() {
        let handle = StopHandle::new();
        let clone = handle.clone();

        assert!(!handle.is_stopped());
        clone.stop();
        assert!(handle.is_stopped());
    }
}
