//! Error types for the dataset summary report.
//!
//! Errors fall into two groups. Per-dataset failures (an unreadable sample,
//! for example) are turned into page content by the runner and never abort a
//! run. Run-level failures (the output directory or the PDF cannot be written)
//! are fatal and propagate to the binary.
//!
//! Errors are serializable so they can be embedded in the JSON run summary.

use crate::config::ConfigValidationError;
use serde::Serialize;
use serde::ser::SerializeStruct;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for report generation.
#[derive(Error, Debug)]
pub enum SummaryError {
    /// The output directory could not be created.
    #[error("Failed to create output directory '{}': {source}", path.display())]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The output document could not be opened for writing.
    #[error("Failed to open output document '{}': {source}", path.display())]
    DocumentOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The output document could not be finalized on disk.
    #[error("Failed to write output document '{}': {source}", path.display())]
    DocumentWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The PDF backend rejected an operation.
    #[error("PDF error: {0}")]
    Pdf(String),

    /// A dataset sample could not be read.
    #[error("{0}")]
    SampleFailed(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigValidationError),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("{0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<SummaryError>,
    },
}

impl SummaryError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        SummaryError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable error code, used in the JSON run summary.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::OutputDirectory { .. } => "OUTPUT_DIRECTORY",
            Self::DocumentOpen { .. } => "DOCUMENT_OPEN",
            Self::DocumentWrite { .. } => "DOCUMENT_WRITE",
            Self::Pdf(_) => "PDF_ERROR",
            Self::SampleFailed(_) => "SAMPLE_FAILED",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Whether this error aborts the whole run rather than a single page.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::OutputDirectory { .. }
            | Self::DocumentOpen { .. }
            | Self::DocumentWrite { .. }
            | Self::Pdf(_)
            | Self::InvalidConfig(_) => true,
            Self::WithContext { source, .. } => source.is_fatal(),
            _ => false,
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for SummaryError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("SummaryError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for report operations.
pub type Result<T> = std::result::Result<T, SummaryError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| SummaryError::Polars(e).with_context(context))
    }
}
