//! Lanternfish: a bounded, polite hidden-service crawler
//!
//! This crate implements a breadth-first crawler that discovers pages
//! reachable from a seed set, fetches each page through a forward proxy,
//! extracts structured records via configurable selection rules, and
//! deduplicates visited locations.

pub mod config;
pub mod crawler;
pub mod events;
pub mod output;
pub mod seed;

use thiserror::Error;

/// Main error type for Lanternfish operations
#[derive(Debug, Error)]
pub enum LanternError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Directory search error: {0}")]
    Seed(#[from] SeedError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors produced by a single fetch attempt.
///
/// None of these abort a running crawl: the engine logs the failure,
/// skips the location, and moves on to the next frontier entry.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The location does not use an allowed scheme (http or https).
    #[error("Invalid scheme for location: {0}")]
    InvalidScheme(String),

    /// The location does not contain the configured domain marker.
    #[error("Location outside the target domain: {0}")]
    DomainNotAllowed(String),

    /// The request failed on the wire or returned a non-2xx status.
    #[error("Transport failure for {location}: {source}")]
    Transport {
        location: String,
        source: reqwest::Error,
    },
}

/// Errors produced by the directory seeder
///
/// The seeder's public entry point swallows these into an empty seed
/// list; the caller decides whether that means "nothing to crawl".
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Directory search request failed: {0}")]
    Search(#[from] reqwest::Error),

    #[error("Directory response could not be parsed: {0}")]
    Parse(String),
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

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Lanternfish operations
pub type Result<T> = std::result::Result<T, LanternError>;

/// Result type alias for fetch operations
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlEngine, CrawlStatus, CrawlSummary, Record, StopHandle};
pub use events::{CrawlEvent, ProgressSink, Severity};
pub use seed::DirectorySeeder;
