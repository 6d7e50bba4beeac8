//! Configuration module for Lanternfish
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files, plus the free-text inputs a caller supplies per run (keyword
//! lists and selector lists).
//!
//! # Example
//!
//! ```no_run
//! use lanternfish::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlConfig, DirectoryConfig, NetworkConfig};

// Re-export parser functions
pub use parser::{load_config, parse_keywords, parse_selectors};

// Re-export validation entry point
pub use validation::validate;
