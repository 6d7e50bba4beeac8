//! Crawler module for page fetching and traversal
//!
//! This module contains the core crawling logic, including:
//! - Proxied HTTP fetching with admission checks and pacing
//! - Link extraction restricted to the target domain
//! - Content extraction with ordered selection rules
//! - Breadth-first traversal with depth and page bounds

mod content;
mod document;
mod engine;
mod fetcher;
mod frontier;
mod links;

pub use content::{ContentExtractor, ExtractionRule, Record};
pub use document::Document;
pub use engine::{CrawlEngine, CrawlHandle, CrawlStatus, CrawlSummary, StopHandle};
pub use fetcher::{build_http_client, Fetcher};
pub use frontier::{Frontier, FrontierEntry, VisitedSet};
pub use links::extract_links;
