//! Record sink trait and output errors

use crate::record::Record;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON encoding error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Destination for records emitted during a crawl
///
/// The engine calls `write_record` from its driver task in emission order,
/// then `finish` once the frontier is exhausted.
pub trait RecordSink: Send {
    /// Persists one record
    ///
    /// A record whose URL was written before replaces the earlier one where
    /// the format allows it (SQLite); append-only formats keep both.
    fn write_record(&mut self, record: &Record) -> OutputResult<()>;

    /// Flushes buffered output
    fn finish(&mut self) -> OutputResult<()>;
}
