//! Output sink traits and types
//!
//! A sink receives rows one at a time and owns the file they end up in.
//! Rows describe their own column layout through [`Record`].

use serde::Serialize;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// A row type with a fixed column layout
pub trait Record: Serialize {
    /// Column names, in serialization order
    const COLUMNS: &'static [&'static str];
}

/// File formats a sink can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Comma-separated values with a header row
    Csv,
    /// One JSON object per line
    JsonLines,
}

impl OutputFormat {
    /// Picks the format from the file extension: `.jsonl` (any case) selects
    /// JSON Lines, everything else CSV
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("jsonl") => OutputFormat::JsonLines,
            _ => OutputFormat::Csv,
        }
    }
}

/// Trait for row sinks
///
/// Implementations truncate their target when created; rows are never
/// appended to a previous run's file.
pub trait RowSink {
    /// Writes a single row
    fn write_row<R: Record>(&mut self, row: &R) -> OutputResult<()>;

    /// Flushes buffered rows to disk
    fn finish(&mut self) -> OutputResult<()>;
}
