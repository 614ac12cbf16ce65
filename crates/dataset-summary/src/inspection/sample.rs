//! Bounded CSV sampling with polars.

use crate::error::{Result, ResultExt, SummaryError};
use crate::utils::format_cell;
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor};
use std::path::Path;
use tracing::{debug, warn};

/// The first rows of a CSV file, with inferred column types.
#[derive(Debug, Clone)]
pub struct Sample {
    frame: DataFrame,
}

impl Sample {
    /// Wrap an already loaded DataFrame.
    pub fn from_frame(frame: DataFrame) -> Self {
        Self { frame }
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Column names in header order.
    pub fn column_names(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect()
    }

    /// Number of sampled rows.
    pub fn height(&self) -> usize {
        self.frame.height()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.frame.width()
    }

    /// The first `limit` rows, every cell formatted for display.
    pub fn preview_rows(&self, limit: usize) -> Vec<Vec<String>> {
        let rows = self.height().min(limit);
        let columns = self.frame.get_columns();

        (0..rows)
            .map(|row| {
                columns
                    .iter()
                    .map(|column| {
                        column
                            .get(row)
                            .map(|value| format_cell(&value))
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect()
    }
}

/// Read the header and at most `max_rows` data rows of a CSV file.
///
/// Only those records are handed to polars, so anything after them (ragged
/// rows, values of another type) cannot fail the sample. Empty files,
/// malformed sampled rows, invalid UTF-8 and unreadable paths all return an
/// error describing the problem.
pub fn sample_csv(path: &Path, max_rows: usize) -> Result<Sample> {
    let prefix = read_record_prefix(path, max_rows).map_err(|e| {
        warn!("Failed to read sample from {}: {}", path.display(), e);
        SummaryError::SampleFailed(e.to_string())
    })?;

    let frame = CsvReadOptions::default()
        .with_has_header(true)
        .with_n_rows(Some(max_rows))
        .with_infer_schema_length(Some(max_rows.max(1)))
        .into_reader_with_file_handle(Cursor::new(prefix))
        .finish()
        .context(format!("Failed to read sample from {}", path.display()))
        .map_err(|e| {
            warn!("{}", e);
            SummaryError::SampleFailed(sample_error_message(&e))
        })?;

    debug!(
        "Sampled {} rows x {} columns from {}",
        frame.height(),
        frame.width(),
        path.display()
    );
    Ok(Sample::from_frame(frame))
}

/// Raw bytes of the header plus the next `max_rows` records.
fn read_record_prefix(path: &Path, max_rows: usize) -> io::Result<Vec<u8>> {
    read_record_prefix_from(BufReader::new(File::open(path)?), max_rows)
}

/// Copy lines until `max_rows + 1` records have ended. A newline inside a
/// quoted field does not end a record, and blank lines are not counted.
fn read_record_prefix_from<R: BufRead>(mut reader: R, max_rows: usize) -> io::Result<Vec<u8>> {
    let wanted = max_rows + 1;
    let mut buffer = Vec::new();
    let mut records = 0;
    let mut in_quotes = false;
    let mut record_has_content = false;

    while records < wanted {
        let start = buffer.len();
        if reader.read_until(b'\n', &mut buffer)? == 0 {
            break;
        }
        let line = &buffer[start..];
        for &byte in line {
            if byte == b'"' {
                in_quotes = !in_quotes;
            }
        }
        if line.iter().any(|b| !matches!(b, b'\r' | b'\n')) {
            record_has_content = true;
        }
        if !in_quotes && line.ends_with(b"\n") {
            if record_has_content {
                records += 1;
            }
            record_has_content = false;
        }
    }
    Ok(buffer)
}

/// The innermost error message, without the context wrappers.
fn sample_error_message(error: &SummaryError) -> String {
    match error {
        SummaryError::WithContext { source, .. } => sample_error_message(source),
        other => other.to_string(),
    }
}
