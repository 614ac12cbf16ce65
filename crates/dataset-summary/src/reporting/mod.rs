//! Report pages and output documents.
//!
//! - [`page`]: the page model and [`render_page`]
//! - [`document`]: [`DocumentSink`] with PDF and in-memory implementations
//! - [`summary`]: the JSON [`RunSummary`]
//!
//! # Example
//!
//! ```rust,ignore
//! use dataset_summary::reporting::{DocumentSink, PdfDocumentSink, RenderOptions, render_page};
//! use dataset_summary::inspection::inspect;
//!
//! let mut pdf = PdfDocumentSink::create("outputs/summary.pdf", "Summary")?;
//! let inspection = inspect(&dataset.path, 50);
//! pdf.append_page(&render_page(&dataset, &inspection, &RenderOptions::default()))?;
//! pdf.finish()?;
//! ```

pub mod document;
pub mod page;
pub mod summary;

pub use document::{DocumentSink, InMemoryDocument, PdfDocumentSink, WrittenDocument};
pub use page::{
    LayoutError, PageBlock, PageOutcome, RenderOptions, ReportPage, TableLayout, TablePreview,
    render_page,
};
pub use summary::{PageSummary, RunSummary};
