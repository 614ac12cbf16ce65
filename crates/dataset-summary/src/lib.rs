//! Cleaned Dataset Summary
//!
//! Builds a multi-page PDF that summarizes a list of CSV datasets, one page
//! per dataset, in configuration order.
//!
//! # Overview
//!
//! For each dataset the report shows:
//!
//! - **Existence**: a "File not found" page when the path is missing
//! - **Row estimate**: line count minus the header, or "unknown"
//! - **Columns**: the first 20 column names
//! - **Preview**: the first 12 rows of a 50-row sample, read with polars
//!
//! A dataset that cannot be read only affects its own page. The run fails
//! only when the output directory or the PDF cannot be written.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use dataset_summary::{ReportConfig, ReportRunner};
//!
//! let summary = ReportRunner::builder()
//!     .config(ReportConfig::for_root("/srv/pollution"))
//!     .on_progress(|update| println!("{}", update.message))
//!     .build()?
//!     .run()?;
//!
//! for page in &summary.pages {
//!     println!("{}: {:?}", page.label, page.outcome);
//! }
//! ```
//!
//! # Custom datasets
//!
//! ```rust,ignore
//! use dataset_summary::config::{DatasetDescriptor, ReportConfig};
//!
//! let config = ReportConfig::builder()
//!     .output_dir("reports")
//!     .dataset(DatasetDescriptor::new("train", "data/train.csv"))
//!     .dataset(DatasetDescriptor::new("test", "data/test.csv"))
//!     .build()?;
//! ```

pub mod config;
pub mod error;
pub mod inspection;
pub mod pipeline;
pub mod reporting;
pub mod utils;

// Re-exports for convenient access
pub use config::{ConfigValidationError, DatasetDescriptor, ReportConfig, ReportConfigBuilder};
pub use error::{Result as SummaryResult, ResultExt, SummaryError};
pub use inspection::{Inspection, RowEstimate, Sample, estimate_rows, inspect, sample_csv};
pub use pipeline::{
    ClosureProgressReporter, ProgressReporter, ProgressUpdate, ReportRunner, ReportRunnerBuilder,
    RunStage,
};
pub use reporting::{
    DocumentSink, InMemoryDocument, PageOutcome, PageSummary, PdfDocumentSink, RenderOptions,
    ReportPage, RunSummary, WrittenDocument, render_page,
};
