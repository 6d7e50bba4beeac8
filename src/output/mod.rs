//! Output helpers for crawl results
//!
//! Export formatting (CSV/JSON writers, result tables) belongs to the
//! callers of this crate; what lives here is the summary statistics over
//! a finished crawl's record collection.

mod stats;

pub use stats::{collect_statistics, print_statistics, RecordStatistics};
