//! JSON Lines sink

use crate::output::traits::{OutputResult, Record, RowSink};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes one JSON object per line; missing values become `null`
pub struct JsonLinesSink<W: Write> {
    writer: BufWriter<W>,
}

impl JsonLinesSink<File> {
    /// Creates (or truncates) `path`
    pub fn create(path: &Path) -> OutputResult<Self> {
        Ok(Self::from_writer(File::create(path)?))
    }
}

impl<W: Write> JsonLinesSink<W> {
    pub fn from_writer(inner: W) -> Self {
        Self {
            writer: BufWriter::new(inner),
        }
    }

    /// Flushes and returns the underlying writer
    pub fn into_inner(self) -> OutputResult<W> {
        self.writer
            .into_inner()
            .map_err(|e| e.into_error().into())
    }
}

impl<W: Write> RowSink for JsonLinesSink<W> {
    fn write_row<R: Record>(&mut self, row: &R) -> OutputResult<()> {
        serde_json::to_writer(&mut self.writer, row)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}
