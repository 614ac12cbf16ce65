//! Run orchestration.
//!
//! [`ReportRunner`] walks the configured datasets in order, inspects each,
//! renders its page and appends it to a [`DocumentSink`]. Per-dataset
//! problems become page content; only document and directory failures end
//! the run.

use crate::config::{DatasetDescriptor, ReportConfig};
use crate::error::{Result, SummaryError};
use crate::inspection::inspect;
use crate::pipeline::progress::{
    ClosureProgressReporter, ProgressReporter, ProgressUpdate, RunStage,
};
use crate::reporting::{
    DocumentSink, InMemoryDocument, PageSummary, PdfDocumentSink, RenderOptions, ReportPage,
    RunSummary, render_page,
};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Title stored in the PDF metadata.
pub const DOCUMENT_TITLE: &str = "Cleaned datasets summary";

/// Generates the summary report.
///
/// # Example
///
/// ```rust,ignore
/// use dataset_summary::{ReportConfig, ReportRunner};
///
/// let summary = ReportRunner::builder()
///     .config(ReportConfig::for_root("."))
///     .build()?
///     .run()?;
/// println!("Wrote PDF: {}", summary.output_file.unwrap());
/// ```
pub struct ReportRunner {
    config: ReportConfig,
    options: RenderOptions,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

static_assertions::assert_impl_all!(ReportRunner: Send, Sync);

impl ReportRunner {
    /// Create a new runner builder.
    pub fn builder() -> ReportRunnerBuilder {
        ReportRunnerBuilder::default()
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Write the PDF (and the JSON summary, if configured).
    ///
    /// # Errors
    ///
    /// Fails only when the output directory cannot be created or the
    /// document cannot be opened or written.
    pub fn run(&self) -> Result<RunSummary> {
        match self.run_internal() {
            Ok(summary) => {
                self.report_progress(ProgressUpdate::done(format!(
                    "Wrote {} page(s)",
                    summary.pages.len()
                )));
                Ok(summary)
            }
            Err(e) => {
                self.report_progress(ProgressUpdate::failed(e.to_string()));
                error!("Report generation failed: {}", e);
                Err(e)
            }
        }
    }

    fn run_internal(&self) -> Result<RunSummary> {
        let start = Instant::now();
        let output_path = self.config.output_path();

        self.report_progress(ProgressUpdate::new(
            RunStage::Starting,
            format!("Opening {}", output_path.display()),
        ));
        ensure_dir(&self.config.output_dir)?;
        let sink = PdfDocumentSink::create(&output_path, DOCUMENT_TITLE)?;

        let (written, pages) = self.render_into(sink)?;
        let summary = RunSummary::new(Some(&written.path), written.page_count, pages);

        // The PDF is already on disk; a missing JSON summary only warrants a warning.
        if self.config.emit_summary {
            let stem = written
                .path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("report");
            if let Err(e) = summary.write_to_file(&self.config.output_dir, stem) {
                warn!("Could not write run summary: {}", e);
            }
        }

        info!(
            "Report complete in {}ms: {}",
            start.elapsed().as_millis(),
            written.path.display()
        );
        Ok(summary)
    }

    /// Render every page into memory without touching the disk.
    pub fn dry_run(&self) -> Result<(Vec<ReportPage>, RunSummary)> {
        let (document, pages) = self.render_into(InMemoryDocument::new())?;
        let page_count = document.pages().len();
        Ok((document.into_pages(), RunSummary::new(None, page_count, pages)))
    }

    /// Append one page per dataset to `sink`, in order, then finalize it.
    pub fn render_into<S: DocumentSink>(&self, mut sink: S) -> Result<(S::Output, Vec<PageSummary>)> {
        let total = self.config.datasets.len();
        let mut summaries = Vec::with_capacity(total);

        for (index, dataset) in self.config.datasets.iter().enumerate() {
            let (page, summary) = self.render_dataset(dataset);
            sink.append_page(&page)?;

            self.report_progress(ProgressUpdate::dataset(
                &dataset.label,
                index + 1,
                total,
                format!("{} ({:?})", page.title, page.outcome),
            ));
            summaries.push(summary);
        }

        self.report_progress(ProgressUpdate::new(
            RunStage::Finalizing,
            "Finalizing document",
        ));
        let output = sink.finish()?;
        Ok((output, summaries))
    }

    /// Inspect and render a single dataset. Never fails.
    pub fn render_dataset(&self, dataset: &DatasetDescriptor) -> (ReportPage, PageSummary) {
        debug!("Inspecting '{}' at {}", dataset.label, dataset.path.display());

        let inspection = inspect(&dataset.path, self.config.sample_rows);
        let page = render_page(dataset, &inspection, &self.options);
        let summary = PageSummary::new(dataset, &inspection, &page);

        match &summary.error {
            Some(e) => warn!("Sample failed for '{}': {}", dataset.label, e),
            None if !summary.exists => {
                warn!("Dataset '{}' not found: {}", dataset.label, summary.path)
            }
            None => info!(
                "Rendered '{}' (~{} rows, {} columns)",
                dataset.label,
                summary
                    .row_estimate
                    .map_or_else(|| "unknown".to_string(), |n| n.to_string()),
                summary.columns.unwrap_or(0)
            ),
        }

        (page, summary)
    }

    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }
}

fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|source| SummaryError::OutputDirectory {
        path: dir.to_path_buf(),
        source,
    })
}

/// Builder for [`ReportRunner`].
#[derive(Default)]
pub struct ReportRunnerBuilder {
    config: Option<ReportConfig>,
    options: Option<RenderOptions>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

impl ReportRunnerBuilder {
    pub fn config(mut self, config: ReportConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Override the render options derived from the config.
    pub fn render_options(mut self, options: RenderOptions) -> Self {
        self.options = Some(options);
        self
    }

    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Receive progress updates through a closure.
    pub fn on_progress<F>(self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter(Arc::new(ClosureProgressReporter::new(callback)))
    }

    /// Build the runner, validating the configuration.
    pub fn build(self) -> Result<ReportRunner> {
        let config = self.config.unwrap_or_default();
        config.validate()?;
        let options = self
            .options
            .unwrap_or_else(|| RenderOptions::from_config(&config));

        Ok(ReportRunner {
            config,
            options,
            progress_reporter: self.progress_reporter,
        })
    }
}
