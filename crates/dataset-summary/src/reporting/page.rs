//! Page model and renderer.
//!
//! [`render_page`] turns one dataset's [`Inspection`] into a [`ReportPage`]:
//! plain data describing what goes on the page. Drawing it is left to a
//! [`DocumentSink`](super::DocumentSink), which keeps the renderer pure and
//! lets tests look at page content without parsing a PDF.

use crate::config::{DatasetDescriptor, ReportConfig};
use crate::error::SummaryError;
use crate::inspection::{Inspection, RowEstimate, Sample};
use crate::utils::truncate_str;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Font sizes in points.
pub const TITLE_FONT_SIZE: f32 = 14.0;
pub const PATH_FONT_SIZE: f32 = 8.0;
pub const ROWS_FONT_SIZE: f32 = 10.0;
pub const COLUMNS_FONT_SIZE: f32 = 8.0;
pub const NOTICE_FONT_SIZE: f32 = 9.0;
pub const NOT_FOUND_FONT_SIZE: f32 = 10.0;
pub const TABLE_FONT_SIZE: f32 = 7.0;

/// Vertical scaling applied to table rows.
pub const TABLE_ROW_SCALE: f32 = 1.2;

/// Notice shown when the preview table does not fit the page.
pub const TABLE_FALLBACK_NOTICE: &str = "Could not render table preview (too many columns).";

/// Millimetres per typographic point.
pub const MM_PER_PT: f32 = 0.352_778;

/// Average Helvetica glyph width as a fraction of the font size.
pub const AVG_CHAR_WIDTH_EM: f32 = 0.5;

/// Width of one average character at `font_size` points, in millimetres.
pub fn char_width_mm(font_size: f32) -> f32 {
    font_size * MM_PER_PT * AVG_CHAR_WIDTH_EM
}

/// How a page turned out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageOutcome {
    /// The dataset file does not exist.
    Missing,
    /// Sample read and preview table laid out.
    Sampled,
    /// Sample read failed; the error is shown instead of a table.
    SampleFailed,
    /// Sample read, but the table did not fit; a notice is shown instead.
    TableFallback,
}

/// One block of page content, top to bottom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageBlock {
    Text { text: String, font_size: f32 },
    Table(TablePreview),
}

/// A laid-out preview table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TablePreview {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub column_width_mm: f32,
    pub font_size: f32,
    pub row_scale: f32,
}

/// One page of the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportPage {
    pub title: String,
    pub outcome: PageOutcome,
    pub blocks: Vec<PageBlock>,
}

impl ReportPage {
    fn new(title: String, outcome: PageOutcome) -> Self {
        Self {
            title,
            outcome,
            blocks: Vec::new(),
        }
    }

    fn push_text(&mut self, text: impl Into<String>, font_size: f32) {
        self.blocks.push(PageBlock::Text {
            text: text.into(),
            font_size,
        });
    }

    /// Text blocks in page order, without the title.
    pub fn text_lines(&self) -> Vec<&str> {
        self.blocks
            .iter()
            .filter_map(|block| match block {
                PageBlock::Text { text, .. } => Some(text.as_str()),
                PageBlock::Table(_) => None,
            })
            .collect()
    }

    /// The preview table, if the page has one.
    pub fn table(&self) -> Option<&TablePreview> {
        self.blocks.iter().find_map(|block| match block {
            PageBlock::Table(table) => Some(table),
            PageBlock::Text { .. } => None,
        })
    }

    /// All page text as plain lines, tables tab-separated.
    pub fn plain_text(&self) -> String {
        let mut out = vec![self.title.clone()];
        for block in &self.blocks {
            match block {
                PageBlock::Text { text, .. } => out.push(text.clone()),
                PageBlock::Table(table) => {
                    out.push(table.headers.join("\t"));
                    out.extend(table.rows.iter().map(|row| row.join("\t")));
                }
            }
        }
        out.join("\n")
    }
}

/// Table layout could not fit the page.
#[derive(Debug, Error, PartialEq)]
pub enum LayoutError {
    #[error("sample has no columns")]
    NoColumns,

    #[error("{columns} columns do not fit (at most {max} fit the page width)")]
    TooManyColumns { columns: usize, max: usize },
}

/// Horizontal constraints of the preview table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableLayout {
    /// Width available to the table.
    pub available_width_mm: f32,
    /// Narrowest column still considered readable.
    pub min_column_width_mm: f32,
    pub font_size: f32,
    pub row_scale: f32,
}

impl Default for TableLayout {
    /// US-letter landscape with half-inch margins.
    fn default() -> Self {
        Self {
            available_width_mm: 279.4 - 2.0 * 12.7,
            min_column_width_mm: 6.0,
            font_size: TABLE_FONT_SIZE,
            row_scale: TABLE_ROW_SCALE,
        }
    }
}

impl TableLayout {
    /// Largest column count that fits.
    pub fn max_columns(&self) -> usize {
        (self.available_width_mm / self.min_column_width_mm).floor() as usize
    }

    /// Lay out headers and rows as equal-width columns, truncating cells
    /// that would overflow their column.
    pub fn fit(
        &self,
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    ) -> Result<TablePreview, LayoutError> {
        let columns = headers.len();
        if columns == 0 {
            return Err(LayoutError::NoColumns);
        }
        let max = self.max_columns();
        if columns > max {
            return Err(LayoutError::TooManyColumns { columns, max });
        }

        let column_width_mm = self.available_width_mm / columns as f32;
        // One character of padding per cell.
        let cell_chars = ((column_width_mm / char_width_mm(self.font_size)) as usize)
            .saturating_sub(1)
            .max(1);
        let fit_cell = |cell: String| truncate_str(&cell, cell_chars);

        Ok(TablePreview {
            headers: headers.into_iter().map(fit_cell).collect(),
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(fit_cell).collect())
                .collect(),
            column_width_mm,
            font_size: self.font_size,
            row_scale: self.row_scale,
        })
    }
}

/// Limits applied when rendering a page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    pub preview_rows: usize,
    pub max_listed_columns: usize,
    pub table: TableLayout,
}

impl RenderOptions {
    pub fn from_config(config: &ReportConfig) -> Self {
        Self {
            preview_rows: config.preview_rows,
            max_listed_columns: config.max_listed_columns,
            table: TableLayout::default(),
        }
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::from_config(&ReportConfig::default())
    }
}

/// Page title for a dataset.
pub fn page_title(label: &str) -> String {
    format!("Dataset: {label}")
}

/// Build the page for one dataset.
pub fn render_page(
    dataset: &DatasetDescriptor,
    inspection: &Inspection,
    options: &RenderOptions,
) -> ReportPage {
    let title = page_title(&dataset.label);
    let path = dataset.path.display();

    let (estimate, sample) = match inspection {
        Inspection::Missing => {
            let mut page = ReportPage::new(title, PageOutcome::Missing);
            page.push_text(format!("File not found: {path}"), NOT_FOUND_FONT_SIZE);
            return page;
        }
        Inspection::Present { estimate, sample } => (estimate, sample),
    };

    let mut page = ReportPage::new(title, PageOutcome::Sampled);
    page.push_text(format!("Path: {path}"), PATH_FONT_SIZE);
    page.push_text(estimate_text(estimate), ROWS_FONT_SIZE);

    match sample {
        Ok(sample) => render_sample(&mut page, sample, options),
        Err(e) => {
            page.outcome = PageOutcome::SampleFailed;
            page.push_text(sample_error_text(e), NOTICE_FONT_SIZE);
        }
    }
    page
}

fn estimate_text(estimate: &RowEstimate) -> String {
    format!("Estimated total rows: {estimate}")
}

fn sample_error_text(error: &SummaryError) -> String {
    format!("Error reading sample: {error}")
}

fn render_sample(page: &mut ReportPage, sample: &Sample, options: &RenderOptions) {
    let names = sample.column_names();
    let listed: Vec<&str> = names
        .iter()
        .take(options.max_listed_columns)
        .map(String::as_str)
        .collect();
    page.push_text(
        format!(
            "Columns (first {} shown): {}",
            options.max_listed_columns,
            listed.join(", ")
        ),
        COLUMNS_FONT_SIZE,
    );

    let rows = sample.preview_rows(options.preview_rows);
    match options.table.fit(names, rows) {
        Ok(table) => page.blocks.push(PageBlock::Table(table)),
        Err(e) => {
            tracing::debug!("Table preview skipped for '{}': {}", page.title, e);
            page.outcome = PageOutcome::TableFallback;
            page.push_text(TABLE_FALLBACK_NOTICE, NOTICE_FONT_SIZE);
        }
    }
}
