//! Output documents.
//!
//! A [`DocumentSink`] receives finished pages in order and is finalized once.
//! [`PdfDocumentSink`] writes a multi-page PDF with `printpdf`;
//! [`InMemoryDocument`] just keeps the pages (dry runs and tests).

use super::page::{MM_PER_PT, PageBlock, ReportPage, TITLE_FONT_SIZE, TablePreview, char_width_mm};
use crate::error::{Result, SummaryError};
use crate::utils::{pdf_safe_text, wrap_text};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Rgb,
};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// US-letter landscape, 11in x 8.5in.
pub const PAGE_WIDTH_MM: f32 = 279.4;
pub const PAGE_HEIGHT_MM: f32 = 215.9;
pub const MARGIN_MM: f32 = 12.7;

/// Line height as a multiple of the font size.
const LINE_SPACING: f32 = 1.4;

/// Gap after each text block.
const BLOCK_GAP_MM: f32 = 2.5;

const LAYER_NAME: &str = "Content";

/// Destination for report pages.
pub trait DocumentSink {
    /// What finalizing produces.
    type Output;

    /// Append one page after the previous ones.
    fn append_page(&mut self, page: &ReportPage) -> Result<()>;

    /// Finalize the document. Called exactly once.
    fn finish(self) -> Result<Self::Output>;
}

/// Keeps pages in memory.
#[derive(Debug, Default, Clone)]
pub struct InMemoryDocument {
    pages: Vec<ReportPage>,
}

impl InMemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pages(&self) -> &[ReportPage] {
        &self.pages
    }

    pub fn into_pages(self) -> Vec<ReportPage> {
        self.pages
    }
}

impl DocumentSink for InMemoryDocument {
    type Output = InMemoryDocument;

    fn append_page(&mut self, page: &ReportPage) -> Result<()> {
        self.pages.push(page.clone());
        Ok(())
    }

    fn finish(self) -> Result<Self::Output> {
        Ok(self)
    }
}

/// A PDF that has been saved to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenDocument {
    pub path: PathBuf,
    pub page_count: usize,
}

/// Multi-page PDF written with `printpdf`.
///
/// The destination file is created up front, so an unwritable path fails
/// before any dataset is processed. Pages are assembled in memory and the
/// file is written by [`finish`](DocumentSink::finish).
pub struct PdfDocumentSink {
    path: PathBuf,
    writer: BufWriter<File>,
    doc: PdfDocumentReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    initial_layer: Option<PdfLayerReference>,
    page_count: usize,
}

impl PdfDocumentSink {
    /// Open `path` for writing and start an empty document.
    pub fn create(path: impl AsRef<Path>, title: &str) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path).map_err(|source| SummaryError::DocumentOpen {
            path: path.clone(),
            source,
        })?;

        // printpdf always starts with one page; the first appended page uses it.
        let (doc, page, layer) = PdfDocument::new(
            title,
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            LAYER_NAME,
        );
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| SummaryError::Pdf(e.to_string()))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| SummaryError::Pdf(e.to_string()))?;
        let initial_layer = Some(doc.get_page(page).get_layer(layer));

        debug!("Opened PDF for writing: {}", path.display());
        Ok(Self {
            path,
            writer: BufWriter::new(file),
            doc,
            regular,
            bold,
            initial_layer,
            page_count: 0,
        })
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    fn next_layer(&mut self) -> PdfLayerReference {
        match self.initial_layer.take() {
            Some(layer) => layer,
            None => {
                let (page, layer) =
                    self.doc
                        .add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), LAYER_NAME);
                self.doc.get_page(page).get_layer(layer)
            }
        }
    }
}

impl DocumentSink for PdfDocumentSink {
    type Output = WrittenDocument;

    fn append_page(&mut self, page: &ReportPage) -> Result<()> {
        let layer = self.next_layer();
        // The canvas only lives for this page.
        let mut canvas = PageCanvas::new(layer, &self.regular, &self.bold);
        canvas.draw(page);
        self.page_count += 1;
        Ok(())
    }

    fn finish(self) -> Result<WrittenDocument> {
        let Self {
            path,
            mut writer,
            doc,
            page_count,
            ..
        } = self;

        doc.save(&mut writer)
            .map_err(|e| SummaryError::Pdf(e.to_string()))?;
        writer
            .flush()
            .map_err(|source| SummaryError::DocumentWrite {
                path: path.clone(),
                source,
            })?;

        info!("Saved {} page(s) to {}", page_count, path.display());
        Ok(WrittenDocument { path, page_count })
    }
}

/// Top-down drawing state for one page.
struct PageCanvas<'a> {
    layer: PdfLayerReference,
    regular: &'a IndirectFontRef,
    bold: &'a IndirectFontRef,
    /// Baseline of the next line, measured from the page bottom.
    cursor_mm: f32,
}

impl<'a> PageCanvas<'a> {
    fn new(layer: PdfLayerReference, regular: &'a IndirectFontRef, bold: &'a IndirectFontRef) -> Self {
        Self {
            layer,
            regular,
            bold,
            cursor_mm: PAGE_HEIGHT_MM - MARGIN_MM,
        }
    }

    fn draw(&mut self, page: &ReportPage) {
        self.paragraph(&page.title, TITLE_FONT_SIZE, true);
        self.cursor_mm -= BLOCK_GAP_MM;

        for block in &page.blocks {
            match block {
                PageBlock::Text { text, font_size } => self.paragraph(text, *font_size, false),
                PageBlock::Table(table) => self.table(table),
            }
            self.cursor_mm -= BLOCK_GAP_MM;
        }
    }

    fn line_height(font_size: f32) -> f32 {
        font_size * MM_PER_PT * LINE_SPACING
    }

    /// Wrapped text across the content width.
    fn paragraph(&mut self, text: &str, font_size: f32, bold: bool) {
        let width = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;
        let max_chars = (width / char_width_mm(font_size)) as usize;
        let font = if bold { self.bold } else { self.regular };

        for line in wrap_text(text, max_chars) {
            self.cursor_mm -= Self::line_height(font_size);
            if self.cursor_mm < MARGIN_MM {
                return;
            }
            self.layer.use_text(
                pdf_safe_text(&line),
                font_size,
                Mm(MARGIN_MM),
                Mm(self.cursor_mm),
                font,
            );
        }
    }

    fn table(&mut self, table: &TablePreview) {
        let row_height = Self::line_height(table.font_size) * table.row_scale;
        let total_width = table.column_width_mm * table.headers.len() as f32;
        let padding = char_width_mm(table.font_size) / 2.0;

        self.layer.set_outline_thickness(0.3);
        self.layer
            .set_outline_color(Color::Rgb(Rgb::new(0.6, 0.6, 0.6, None)));

        let top = self.cursor_mm;
        self.rule(top, total_width);

        let rows = std::iter::once((&table.headers, true))
            .chain(table.rows.iter().map(|row| (row, false)));
        for (cells, header) in rows {
            if self.cursor_mm - row_height < MARGIN_MM {
                break;
            }
            let font = if header { self.bold } else { self.regular };
            let baseline = self.cursor_mm - row_height * 0.7;
            for (i, cell) in cells.iter().enumerate() {
                let x = MARGIN_MM + i as f32 * table.column_width_mm + padding;
                self.layer.use_text(
                    pdf_safe_text(cell),
                    table.font_size,
                    Mm(x),
                    Mm(baseline),
                    font,
                );
            }
            self.cursor_mm -= row_height;
            self.rule(self.cursor_mm, total_width);
        }

        for i in 0..=table.headers.len() {
            let x = MARGIN_MM + i as f32 * table.column_width_mm;
            self.segment((x, top), (x, self.cursor_mm));
        }
    }

    fn rule(&self, y: f32, width: f32) {
        self.segment((MARGIN_MM, y), (MARGIN_MM + width, y));
    }

    fn segment(&self, from: (f32, f32), to: (f32, f32)) {
        self.layer.add_line(Line {
            points: vec![
                (Point::new(Mm(from.0), Mm(from.1)), false),
                (Point::new(Mm(to.0), Mm(to.1)), false),
            ],
            is_closed: false,
        });
    }
}
