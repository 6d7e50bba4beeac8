//! Statistics over an extracted record collection

use crate::crawler::Record;
use std::collections::HashMap;

/// Summary statistics for one crawl's records
#[derive(Debug, Clone)]
pub struct RecordStatistics {
    /// Total number of records
    pub total_records: usize,

    /// Records carrying a non-empty link
    pub records_with_links: usize,

    /// Mean text length in characters (0.0 for an empty collection)
    pub average_text_length: f64,

    /// Record counts by element tag
    pub by_tag: HashMap<String, usize>,

    /// Record counts by source location
    pub by_source: HashMap<String, usize>,
}

/// Computes statistics over a record collection
pub fn collect_statistics(records: &[Record]) -> RecordStatistics {
    let mut by_tag: HashMap<String, usize> = HashMap::new();
    let mut by_source: HashMap<String, usize> = HashMap::new();
    let mut records_with_links = 0;
    let mut total_chars = 0usize;

    for record in records {
        *by_tag.entry(record.tag.clone()).or_insert(0) += 1;
        *by_source.entry(record.source.clone()).or_insert(0) += 1;
        if !record.link.is_empty() {
            records_with_links += 1;
        }
        total_chars += record.text.chars().count();
    }

    let average_text_length = if records.is_empty() {
        0.0
    } else {
        total_chars as f64 / records.len() as f64
    };

    RecordStatistics {
        total_records: records.len(),
        records_with_links,
        average_text_length,
        by_tag,
        by_source,
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &RecordStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Total records: {}", stats.total_records);
    println!("Records with links: {}", stats.records_with_links);
    println!(
        "Average text length: {:.1} characters",
        stats.average_text_length
    );
    println!();

    println!("By tag:");
    // Sort tags by count (descending)
    let mut tag_counts: Vec<_> = stats.by_tag.iter().collect();
    tag_counts.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    for (tag, count) in tag_counts {
        println!("  {}: {}", tag, count);
    }
    println!();

    println!("By source:");
    let mut source_counts: Vec<_> = stats.by_source.iter().collect();
    source_counts.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    for (source, count) in source_counts {
        println!("  {}: {}", source, count);
    }
}
