//! Lanternfish main entry point
//!
//! Command-line interface: discovers seed locations for a query, runs the
//! crawl on a worker task, prints progress lines as they arrive, and ends
//! with a result table and statistics.

use anyhow::Context;
use clap::Parser;
use lanternfish::config::{load_config, parse_keywords, parse_selectors, validate, Config};
use lanternfish::crawler::{CrawlEngine, Record, StopHandle};
use lanternfish::events::ProgressSink;
use lanternfish::output::{collect_statistics, print_statistics};
use lanternfish::seed::DirectorySeeder;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Lanternfish: a bounded hidden-service crawler
///
/// Lanternfish queries a directory service for seed locations matching
/// the given words, then crawls outward breadth-first through the
/// configured forward proxy, extracting text records along the way.
#[derive(Parser, Debug)]
#[command(name = "lanternfish")]
#[command(version)]
#[command(about = "A bounded hidden-service crawler", long_about = None)]
struct Cli {
    /// Free-text query used to discover seed locations
    #[arg(value_name = "QUERY")]
    query: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Comma-separated keywords a record's text must contain
    #[arg(short, long)]
    keywords: Option<String>,

    /// File with one CSS selector per line (blank lines and # comments ignored)
    #[arg(long, value_name = "FILE")]
    selectors_file: Option<PathBuf>,

    /// Crawl depth (0-3)
    #[arg(short, long)]
    depth: Option<u32>,

    /// Pacing delay between fetches, in seconds
    #[arg(long)]
    delay: Option<f64>,

    /// Maximum records extracted per page
    #[arg(long)]
    max_items: Option<usize>,

    /// Maximum pages visited
    #[arg(long)]
    max_pages: Option<usize>,

    /// Seed location to crawl from; repeatable; skips the directory search
    #[arg(long = "seed", value_name = "LOCATION")]
    seeds: Vec<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let query = cli.query.trim().to_string();
    anyhow::ensure!(!query.is_empty(), "query must not be empty");

    // Load configuration and apply CLI overrides
    let mut config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => Config::default(),
    };
    apply_overrides(&mut config, &cli)?;
    validate(&config).context("configuration rejected")?;

    let (sink, mut events) = ProgressSink::channel();

    // Seed locations: explicit --seed flags win over the directory search
    let seeds = if cli.seeds.is_empty() {
        let seeder = DirectorySeeder::new(
            &config.crawler,
            &config.network,
            &config.directory,
            sink.clone(),
        )?;
        seeder.discover(&query, config.directory.max_results).await
    } else {
        cli.seeds.clone()
    };

    if seeds.is_empty() {
        tracing::warn!("No seed locations found for '{}', nothing to crawl", query);
        return Ok(());
    }

    // Run the crawl on its worker task
    let engine = CrawlEngine::new(&config, sink, StopHandle::new())?;
    let handle = engine.spawn(seeds);

    // Ctrl-C requests a stop; the in-flight fetch is allowed to complete
    let interrupt = handle.stop_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping after the current fetch");
            interrupt.stop();
        }
    });

    // Print progress lines until the worker finishes
    let join = handle.join();
    tokio::pin!(join);
    let summary = loop {
        tokio::select! {
            Some(event) = events.recv() => {
                println!("[{}] {}", event.severity, event.message);
            }
            summary = &mut join => break summary,
        }
    };
    while let Ok(event) = events.try_recv() {
        println!("[{}] {}", event.severity, event.message);
    }

    print_records(&summary.records);

    let stats = collect_statistics(&summary.records);
    print_statistics(&stats);

    tracing::info!(
        "Crawl finished with status {:?}: {} pages, {} records",
        summary.status,
        summary.pages_visited,
        summary.records.len()
    );

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("lanternfish=info,warn"),
            1 => EnvFilter::new("lanternfish=debug,info"),
            2 => EnvFilter::new("lanternfish=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Applies CLI overrides onto the loaded configuration
fn apply_overrides(config: &mut Config, cli: &Cli) -> anyhow::Result<()> {
    if let Some(keywords) = &cli.keywords {
        config.crawler.keywords = parse_keywords(keywords);
    }

    if let Some(path) = &cli.selectors_file {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read selectors from {}", path.display()))?;
        config.crawler.selectors = parse_selectors(&content);
    }

    if let Some(depth) = cli.depth {
        config.crawler.max_depth = depth;
    }
    if let Some(delay) = cli.delay {
        config.crawler.delay_seconds = delay;
    }
    if let Some(max_items) = cli.max_items {
        config.crawler.max_items_per_page = max_items;
    }
    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = max_pages;
    }

    Ok(())
}

/// Prints the result table with truncated columns
fn print_records(records: &[Record]) {
    if records.is_empty() {
        println!("\nNo records extracted.");
        return;
    }

    println!("\n=== Records ({}) ===", records.len());
    for (index, record) in records.iter().enumerate() {
        println!(
            "{:>3}. [{}] {}",
            index + 1,
            record.tag,
            clip(&record.text, 100)
        );
        if !record.link.is_empty() {
            println!("     link:   {}", clip(&record.link, 80));
        }
        println!("     source: {}", clip(&record.source, 60));
    }
    println!();
}

/// Truncates a string to `max` characters for display
fn clip(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let mut clipped: String = text.chars().take(max).collect();
        clipped.push_str("...");
        clipped
    }
}
