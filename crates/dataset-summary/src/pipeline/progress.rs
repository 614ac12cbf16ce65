//! Progress reporting for report runs.
//!
//! # Example
//!
//! ```rust,ignore
//! use dataset_summary::ReportRunner;
//!
//! let summary = ReportRunner::builder()
//!     .config(config)
//!     .on_progress(|update| {
//!         println!("[{}] {}", update.stage.display_name(), update.message);
//!     })
//!     .build()?
//!     .run()?;
//! ```

use serde::{Deserialize, Serialize};

/// Stages of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStage {
    /// Creating the output directory and opening the document
    Starting,
    /// Inspecting and rendering one dataset
    Processing,
    /// Writing the document to disk
    Finalizing,
    /// Run completed successfully
    Done,
    /// Run aborted with a fatal error
    Failed,
}

impl RunStage {
    /// Returns a human-readable name for the stage.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Starting => "Starting",
            Self::Processing => "Processing Dataset",
            Self::Finalizing => "Finalizing",
            Self::Done => "Done",
            Self::Failed => "Failed",
        }
    }
}

/// A progress update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub stage: RunStage,

    /// Label of the dataset being processed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset: Option<String>,

    /// Number of datasets finished, including the current one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items_processed: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub items_total: Option<usize>,

    /// Human-readable message describing current activity
    pub message: String,
}

impl ProgressUpdate {
    /// Creates an update for a stage without dataset info.
    pub fn new(stage: RunStage, message: impl Into<String>) -> Self {
        Self {
            stage,
            dataset: None,
            items_processed: None,
            items_total: None,
            message: message.into(),
        }
    }

    /// Creates an update for dataset `current` of `total` (1-based).
    pub fn dataset(
        label: impl Into<String>,
        current: usize,
        total: usize,
        message: impl Into<String>,
    ) -> Self {
        Self {
            stage: RunStage::Processing,
            dataset: Some(label.into()),
            items_processed: Some(current),
            items_total: Some(total),
            message: message.into(),
        }
    }

    pub fn done(message: impl Into<String>) -> Self {
        Self::new(RunStage::Done, message)
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self::new(RunStage::Failed, message)
    }

    /// Fraction of datasets handled, 0.0 - 1.0.
    pub fn progress(&self) -> f32 {
        match self.stage {
            RunStage::Starting => 0.0,
            RunStage::Finalizing | RunStage::Done => 1.0,
            RunStage::Failed => 0.0,
            RunStage::Processing => match (self.items_processed, self.items_total) {
                (Some(current), Some(total)) if total > 0 => current as f32 / total as f32,
                _ => 0.0,
            },
        }
    }
}

/// Trait for receiving progress updates during a run.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, update: ProgressUpdate);
}

/// Wrapper that implements [`ProgressReporter`] using a closure.
pub struct ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    callback: F,
}

impl<F> ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    /// Creates a new closure-based progress reporter.
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressReporter for ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    fn report(&self, update: ProgressUpdate) {
        (self.callback)(update);
    }
}
