//! bibliocrawl main entry point
//!
//! This is the command-line interface for the bibliocrawl book and author crawler.

use anyhow::Context;
use bibliocrawl::config::{
    compute_config_hash, parse_config, parse_flag, validate, Config, CrawlMode,
};
use bibliocrawl::crawl::{initial_requests, EmitObserver};
use bibliocrawl::engine::run_crawl;
use bibliocrawl::output::{open_sink, print_statistics, CrawlStats};
use bibliocrawl::{Orchestrator, Record};
use clap::Parser;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Log a progress line every this many records
const PROGRESS_EVERY: u64 = 25;

/// bibliocrawl: book and author extraction from list, book and author pages
///
/// Walks a range of list pages (or starts from author pages), follows each
/// book to its author, and writes typed records as JSON Lines or SQLite.
#[derive(Parser, Debug)]
#[command(name = "bibliocrawl")]
#[command(version)]
#[command(about = "Book and author crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,

    /// Override author-crawl ("true", "yes", "y" enable it)
    #[arg(long, value_name = "FLAG")]
    author_crawl: Option<String>,

    /// Override the list to crawl
    #[arg(long, value_name = "NAME")]
    list: Option<String>,

    /// Override the list page range, e.g. "1-5" or "3"
    #[arg(long, value_name = "START-END", value_parser = parse_page_range)]
    pages: Option<(u32, u32)>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let mut config = parse_config(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;
    let config_hash = compute_config_hash(&cli.config)?;

    apply_overrides(&mut config, &cli);
    if let Err(e) = validate(&config) {
        tracing::error!("Invalid configuration: {}", e);
        return Err(e.into());
    }
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config)
    } else {
        handle_crawl(config).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("bibliocrawl=info,warn"),
            1 => EnvFilter::new("bibliocrawl=debug,info"),
            2 => EnvFilter::new("bibliocrawl=trace,debug"),
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

/// Layers command-line overrides on top of the file configuration
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(flag) = &cli.author_crawl {
        config.crawl.author_crawl = parse_flag(flag);
    }

    if let Some(list) = &cli.list {
        config.crawl.list_name = Some(list.clone());
    }

    if let Some((start, end)) = cli.pages {
        config.crawl.start_page = start;
        config.crawl.end_page = end;
    }
}

/// Parses "START-END" or a single page number
fn parse_page_range(value: &str) -> Result<(u32, u32), String> {
    let parse = |part: &str| {
        part.trim()
            .parse::<u32>()
            .map_err(|e| format!("invalid page number '{}': {}", part.trim(), e))
    };

    match value.split_once('-') {
        Some((start, end)) => Ok((parse(start)?, parse(end)?)),
        None => {
            let page = parse(value)?;
            Ok((page, page))
        }
    }
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    println!("=== bibliocrawl Dry Run ===\n");

    println!("Site: {}", config.base_url()?);

    println!("\nCrawl Configuration:");
    println!("  Mode: {:?}", config.crawl.mode);
    if config.crawl.mode == CrawlMode::List {
        println!(
            "  List: {}",
            config.crawl.list_name.as_deref().unwrap_or_default()
        );
        println!(
            "  Pages: {}-{}",
            config.crawl.start_page, config.crawl.end_page
        );
    }
    println!("  Author crawl: {}", config.crawl.author_crawl);
    println!(
        "  Max concurrent pages: {}",
        config.crawl.max_concurrent_pages_open
    );
    println!(
        "  Minimum time between requests: {}ms",
        config.crawl.minimum_time_between_requests
    );
    if let Some(max_pages) = config.crawl.max_pages {
        println!("  Max pages: {}", max_pages);
    }

    println!("\nUser Agent: {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Format: {:?}", config.output.format);
    println!("  Path: {}", config.output.path);

    let seeds = initial_requests(config)?;
    println!("\nSeed Requests ({}):", seeds.len());
    for seed in &seeds {
        println!("  - [{}] {}", seed.role, seed.url);
    }

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Observer that logs a progress line every few records
fn progress_observer() -> EmitObserver {
    let seen = AtomicU64::new(0);
    Box::new(move |record: &Record| {
        let count = seen.fetch_add(1, Ordering::Relaxed) + 1;
        if count % PROGRESS_EVERY == 0 {
            tracing::info!("{} records so far, latest {} {}", count, record.kind(), record.url());
        }
        Ok(())
    })
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    tracing::info!(
        "Starting {:?} crawl (author crawl: {})",
        config.crawl.mode,
        config.crawl.author_crawl
    );

    let orchestrator = Orchestrator::with_author_crawl(config.crawl.author_crawl)
        .with_observer(progress_observer());
    let mut sink = open_sink(&config.output).context("Failed to open output")?;
    let stats = Arc::new(CrawlStats::new());

    match run_crawl(&config, orchestrator, sink.as_mut(), Arc::clone(&stats)).await {
        Ok(snapshot) => {
            tracing::info!("Crawl completed successfully");
            print_statistics(&snapshot);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            print_statistics(&stats.snapshot());
            Err(e.into())
        }
    }
}
