//! Output module for writing harvested rows
//!
//! This module handles:
//! - Writing post and comment rows as CSV or JSON Lines
//! - Recording run statistics and printing the final summary

mod csv_output;
mod jsonl_output;
pub mod stats;
mod traits;

pub use csv_output::CsvSink;
pub use jsonl_output::JsonLinesSink;
pub use stats::{print_statistics, HarvestStats, SubredditStats};
pub use traits::{OutputError, OutputFormat, OutputResult, Record, RowSink};

use std::path::Path;

/// Writes `rows` to `path`, replacing any existing file
///
/// The format follows the extension (see [`OutputFormat::from_path`]).
/// Missing parent directories are created.
///
/// # Returns
///
/// * `Ok(usize)` - Number of rows written
/// * `Err(OutputError)` - The file could not be created or written
pub fn write_rows<R: Record>(path: &Path, rows: &[R]) -> OutputResult<usize> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let written = match OutputFormat::from_path(path) {
        OutputFormat::Csv => {
            let mut sink = CsvSink::create(path, R::COLUMNS)?;
            write_all(&mut sink, rows)?
        }
        OutputFormat::JsonLines => {
            let mut sink = JsonLinesSink::create(path)?;
            write_all(&mut sink, rows)?
        }
    };

    tracing::debug!("Wrote {} rows to {}", written, path.display());
    Ok(written)
}

fn write_all<S: RowSink, R: Record>(sink: &mut S, rows: &[R]) -> OutputResult<usize> {
    for row in rows {
        sink.write_row(row)?;
    }
    sink.finish()?;
    Ok(rows.len())
}
