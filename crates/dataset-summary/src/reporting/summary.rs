//! JSON run summary.
//!
//! A [`RunSummary`] records what ended up on each page. The runner returns
//! it from every run, and writes it next to the PDF when asked to.

use super::page::{PageOutcome, ReportPage};
use crate::config::DatasetDescriptor;
use crate::error::{Result, SummaryError};
use crate::inspection::Inspection;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Outcome of one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Timestamp when the run finished
    pub generated_at: String,
    /// Path of the PDF, if one was written
    pub output_file: Option<String>,
    /// Pages in the document
    pub page_count: usize,
    /// One entry per page, in page order
    pub pages: Vec<PageSummary>,
}

/// What one page shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSummary {
    pub label: String,
    pub path: String,
    pub exists: bool,
    pub outcome: PageOutcome,
    /// `None` when the estimate is unknown or the file is missing
    pub row_estimate: Option<usize>,
    /// Column count of the sample
    pub columns: Option<usize>,
    /// Rows read into the sample
    pub sampled_rows: Option<usize>,
    /// Rows shown in the preview table
    pub preview_rows: usize,
    /// Sample error, if sampling failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PageSummary {
    /// Summarize a rendered page together with the inspection behind it.
    pub fn new(dataset: &DatasetDescriptor, inspection: &Inspection, page: &ReportPage) -> Self {
        let (row_estimate, columns, sampled_rows, error) = match inspection {
            Inspection::Missing => (None, None, None, None),
            Inspection::Present { estimate, sample } => match sample {
                Ok(sample) => (
                    estimate.known(),
                    Some(sample.width()),
                    Some(sample.height()),
                    None,
                ),
                Err(e) => (estimate.known(), None, None, Some(e.to_string())),
            },
        };

        Self {
            label: dataset.label.clone(),
            path: dataset.path.display().to_string(),
            exists: inspection.exists(),
            outcome: page.outcome,
            row_estimate,
            columns,
            sampled_rows,
            preview_rows: page.table().map_or(0, |table| table.rows.len()),
            error,
        }
    }
}

impl RunSummary {
    /// Summary of a document with `page_count` pages. `output_file` is
    /// `None` when nothing was written.
    pub fn new(output_file: Option<&Path>, page_count: usize, pages: Vec<PageSummary>) -> Self {
        Self {
            generated_at: Local::now().to_rfc3339(),
            output_file: output_file.map(|path| path.display().to_string()),
            page_count,
            pages,
        }
    }

    /// Number of pages whose outcome matches.
    pub fn count(&self, outcome: PageOutcome) -> usize {
        self.pages.iter().filter(|p| p.outcome == outcome).count()
    }

    /// Write the summary as pretty JSON to `<dir>/<base_name>_summary.json`.
    pub fn write_to_file(&self, dir: &Path, base_name: &str) -> Result<PathBuf> {
        fs::create_dir_all(dir).map_err(|source| SummaryError::OutputDirectory {
            path: dir.to_path_buf(),
            source,
        })?;

        let summary_path = dir.join(format!("{base_name}_summary.json"));
        let mut file = File::create(&summary_path)?;
        file.write_all(serde_json::to_string_pretty(self)?.as_bytes())?;

        info!("Summary saved: {}", summary_path.display());

        Ok(summary_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inspection::{RowEstimate, Sample};
    use crate::reporting::page::{RenderOptions, render_page};
    use polars::prelude::*;
    use pretty_assertions::assert_eq;

    fn summarize(inspection: Inspection) -> PageSummary {
        let dataset = DatasetDescriptor::new("numeric_fixed", "outputs/fixed.csv");
        let page = render_page(&dataset, &inspection, &RenderOptions::default());
        PageSummary::new(&dataset, &inspection, &page)
    }

    #[test]
    fn test_missing_summary() {
        let summary = summarize(Inspection::Missing);
        assert_eq!(
            summary,
            PageSummary {
                label: "numeric_fixed".to_string(),
                path: "outputs/fixed.csv".to_string(),
                exists: false,
                outcome: PageOutcome::Missing,
                row_estimate: None,
                columns: None,
                sampled_rows: None,
                preview_rows: 0,
                error: None,
            }
        );
    }

    #[test]
    fn test_sampled_summary() {
        let frame = df!("a" => (0..20i64).collect::<Vec<_>>()).unwrap();
        let summary = summarize(Inspection::Present {
            estimate: RowEstimate::Known(20),
            sample: Ok(Sample::from_frame(frame)),
        });

        assert_eq!(summary.outcome, PageOutcome::Sampled);
        assert_eq!(summary.row_estimate, Some(20));
        assert_eq!(summary.columns, Some(1));
        assert_eq!(summary.sampled_rows, Some(20));
        assert_eq!(summary.preview_rows, 12);
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let summary = RunSummary::new(
            Some(Path::new("out/report.pdf")),
            1,
            vec![summarize(Inspection::Present {
                estimate: RowEstimate::Unknown,
                sample: Err(SummaryError::SampleFailed("bad header".to_string())),
            })],
        );
        assert_eq!(summary.count(PageOutcome::SampleFailed), 1);

        let path = summary.write_to_file(dir.path(), "report").unwrap();
        assert_eq!(path, dir.path().join("report_summary.json"));

        let json = fs::read_to_string(&path).unwrap();
        let parsed: RunSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.output_file.as_deref(), Some("out/report.pdf"));
        assert_eq!(parsed.page_count, 1);
        assert_eq!(parsed.pages[0].error.as_deref(), Some("bad header"));
        assert_eq!(parsed.pages[0].outcome, PageOutcome::SampleFailed);
    }
}
