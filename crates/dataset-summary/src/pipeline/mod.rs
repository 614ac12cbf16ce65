//! Run orchestration and progress reporting.

pub mod progress;
pub mod runner;

pub use progress::{ClosureProgressReporter, ProgressReporter, ProgressUpdate, RunStage};
pub use runner::{DOCUMENT_TITLE, ReportRunner, ReportRunnerBuilder};
