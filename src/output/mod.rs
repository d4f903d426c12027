//! Output module for crawl records
//!
//! This module handles:
//! - The `RecordSink` trait the engine writes emitted records to
//! - JSON Lines and SQLite sinks
//! - Crawl statistics

mod jsonl;
mod sqlite_output;
pub mod stats;
mod traits;

pub use jsonl::JsonLinesSink;
pub use sqlite_output::SqliteSink;
pub use stats::{print_statistics, CrawlStats, StatsSnapshot};
pub use traits::{OutputError, OutputResult, RecordSink};

use crate::config::{OutputConfig, OutputFormat};
use std::path::Path;

/// Opens the sink selected by the output configuration
///
/// # Arguments
///
/// * `config` - Output section of the crawl configuration
///
/// # Returns
///
/// * `Ok(Box<dyn RecordSink>)` - A ready sink; JSON Lines files are truncated
/// * `Err(OutputError)` - Failed to create the file or database
pub fn open_sink(config: &OutputConfig) -> OutputResult<Box<dyn RecordSink>> {
    let path = Path::new(&config.path);

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    tracing::info!("Writing {:?} output to {}", config.format, path.display());

    Ok(match config.format {
        OutputFormat::Jsonl => Box::new(JsonLinesSink::create(path)?),
        OutputFormat::Sqlite => Box::new(SqliteSink::open(path)?),
    })
}
