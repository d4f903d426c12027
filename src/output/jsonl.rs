//! JSON Lines record sink

use crate::output::traits::{OutputResult, RecordSink};
use crate::record::Record;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes one tagged JSON object per record, one per line
pub struct JsonLinesSink<W: Write> {
    writer: W,
    written: u64,
}

impl JsonLinesSink<BufWriter<File>> {
    /// Creates (or truncates) the file at `path`
    pub fn create(path: &Path) -> OutputResult<Self> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    /// Number of records written so far
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Flushes and returns the underlying writer
    pub fn into_inner(mut self) -> OutputResult<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write + Send> RecordSink for JsonLinesSink<W> {
    fn write_record(&mut self, record: &Record) -> OutputResult<()> {
        serde_json::to_writer(&mut self.writer, record)?;
        self.writer.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        self.writer.flush()?;
        tracing::debug!("JSON Lines sink flushed after {} records", self.written);
        Ok(())
    }
}
