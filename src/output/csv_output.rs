//! CSV sink

use crate::output::traits::{OutputError, OutputResult, Record, RowSink};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes rows as CSV with a header row
///
/// The header is written up front from the record's column list, so an
/// empty result still produces a file with a header.
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
}

impl CsvSink<File> {
    /// Creates (or truncates) `path` and writes the header
    pub fn create(path: &Path, columns: &[&str]) -> OutputResult<Self> {
        let file = File::create(path)?;
        Self::from_writer(file, columns)
    }
}

impl<W: Write> CsvSink<W> {
    /// Wraps any writer and writes the header
    pub fn from_writer(inner: W, columns: &[&str]) -> OutputResult<Self> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(inner);
        writer.write_record(columns)?;
        Ok(Self { writer })
    }

    /// Flushes and returns the underlying writer
    pub fn into_inner(self) -> OutputResult<W> {
        self.writer
            .into_inner()
            .map_err(|e| OutputError::from(e.into_error()))
    }
}

impl<W: Write> RowSink for CsvSink<W> {
    fn write_row<R: Record>(&mut self, row: &R) -> OutputResult<()> {
        self.writer.serialize(row)?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}
