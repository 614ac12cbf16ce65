//! Per-dataset inspection: existence, row estimate and sample.
//!
//! Inspection never fails. Every problem with a single dataset is captured
//! in the returned [`Inspection`] so the page renderer can show it.

mod rows;
mod sample;

pub use rows::{RowEstimate, count_lines, count_lines_from, estimate_rows};
pub use sample::{Sample, sample_csv};

use crate::error::Result;
use std::path::Path;
use tracing::debug;

/// What is known about one dataset before rendering its page.
#[derive(Debug)]
pub enum Inspection {
    /// The path does not exist.
    Missing,
    /// The path exists. Either part may have failed independently.
    Present {
        estimate: RowEstimate,
        sample: Result<Sample>,
    },
}

impl Inspection {
    /// Whether the dataset path existed.
    pub fn exists(&self) -> bool {
        matches!(self, Self::Present { .. })
    }
}

/// Check existence, estimate rows, then read a bounded sample.
pub fn inspect(path: &Path, sample_rows: usize) -> Inspection {
    if !path.exists() {
        debug!("Dataset not found: {}", path.display());
        return Inspection::Missing;
    }

    let estimate = estimate_rows(path);
    debug!("Estimated rows for {}: {}", path.display(), estimate);

    let sample = sample_csv(path, sample_rows);
    Inspection::Present { estimate, sample }
}
