//! Paginated PDF table export.
//!
//! Builds minimal but valid PDF 1.4 files with raw content streams and the
//! built-in Helvetica fonts, so no external font files are required. The
//! header row is repeated at the top of every page.

use super::Exporter;
use crate::error::ExportError;
use crate::models::{GridColumn, RowRecord};

// A4 portrait, in points.
const PAGE_WIDTH: f64 = 595.0;
const PAGE_HEIGHT: f64 = 842.0;
const MARGIN: f64 = 40.0;
const ROW_HEIGHT: f64 = 18.0;

/// Body rows that fit on one page after the header row:
/// (842 - 2 * 40) / 18 rows of space, minus one for the header.
const ROWS_PER_PAGE: usize = 41;

pub struct PdfExporter;

impl Exporter for PdfExporter {
    fn file_name(&self) -> &'static str {
        "aggrid-data.pdf"
    }

    fn render(&self, columns: &[GridColumn], rows: &[RowRecord]) -> Result<Vec<u8>, ExportError> {
        let mut builder = PdfBuilder::new();

        for chunk in rows.chunks(ROWS_PER_PAGE) {
            builder.add_page(page_content(columns, chunk));
        }

        Ok(builder.build())
    }
}

/// Content stream for one page: header band, header row, body rows.
fn page_content(columns: &[GridColumn], rows: &[RowRecord]) -> String {
    let usable_width = PAGE_WIDTH - 2.0 * MARGIN;
    let total_ratio: f64 = columns.iter().map(|c| c.width).sum();
    // Left edge of each column, derived from the fixed width ratios.
    let mut col_x = Vec::with_capacity(columns.len());
    let mut x = MARGIN;
    for column in columns {
        col_x.push(x);
        x += usable_width * column.width / total_ratio;
    }

    let mut content = String::new();
    let mut y = PAGE_HEIGHT - MARGIN;

    // Header band.
    content.push_str("0.9 0.9 0.9 rg\n");
    content.push_str(&format!(
        "{MARGIN:.0} {:.0} {usable_width:.0} {ROW_HEIGHT:.0} re f\n",
        y - ROW_HEIGHT
    ));

    content.push_str("0 0 0 rg\n");
    for (column, x) in columns.iter().zip(&col_x) {
        push_text(&mut content, "F1", *x + 4.0, y - ROW_HEIGHT + 5.0, &column.header);
    }
    y -= ROW_HEIGHT;

    for (row_idx, record) in rows.iter().enumerate() {
        if row_idx % 2 == 1 {
            content.push_str("0.96 0.96 0.96 rg\n");
            content.push_str(&format!(
                "{MARGIN:.0} {:.0} {usable_width:.0} {ROW_HEIGHT:.0} re f\n",
                y - ROW_HEIGHT
            ));
            content.push_str("0 0 0 rg\n");
        }
        for (column, x) in columns.iter().zip(&col_x) {
            push_text(
                &mut content,
                "F2",
                *x + 4.0,
                y - ROW_HEIGHT + 5.0,
                record.field(column.field),
            );
        }
        y -= ROW_HEIGHT;
    }

    // Table border.
    let table_top = PAGE_HEIGHT - MARGIN;
    content.push_str("0.6 0.6 0.6 RG\n0.5 w\n");
    content.push_str(&format!(
        "{MARGIN:.0} {y:.0} {usable_width:.0} {:.0} re S\n",
        table_top - y
    ));

    content
}

fn push_text(content: &mut String, font: &str, x: f64, y: f64, text: &str) {
    content.push_str("BT\n");
    content.push_str(&format!("/{font} 10 Tf\n"));
    content.push_str(&format!("{x:.0} {y:.0} Td\n"));
    content.push_str(&format!("({}) Tj\n", pdf_escape(text)));
    content.push_str("ET\n");
}

/// Escape special characters for PDF string literals.
fn pdf_escape(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('(', "\\(")
        .replace(')', "\\)")
}

/// Minimal multi-page PDF 1.4 builder with uncompressed content streams.
struct PdfBuilder {
    pages: Vec<String>,
}

impl PdfBuilder {
    fn new() -> Self {
        Self { pages: Vec::new() }
    }

    fn add_page(&mut self, content: String) {
        self.pages.push(content);
    }

    fn build(&self) -> Vec<u8> {
        // Object layout: 1 catalog, 2 page tree, then a (page, content) pair
        // per page, then the two fonts, then the info dictionary.
        let page_count = self.pages.len();
        let font_bold_id = 3 + 2 * page_count;
        let font_regular_id = 4 + 2 * page_count;
        let info_id = 5 + 2 * page_count;

        let mut pdf = String::new();
        let mut offsets: Vec<usize> = Vec::new();

        pdf.push_str("%PDF-1.4\n");

        offsets.push(pdf.len());
        pdf.push_str("1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n");

        let kids: Vec<String> = (0..page_count).map(|i| format!("{} 0 R", 3 + 2 * i)).collect();
        offsets.push(pdf.len());
        pdf.push_str(&format!(
            "2 0 obj\n<< /Type /Pages /Kids [{}] /Count {page_count} >>\nendobj\n",
            kids.join(" ")
        ));

        for (i, content) in self.pages.iter().enumerate() {
            let page_id = 3 + 2 * i;
            let content_id = page_id + 1;

            offsets.push(pdf.len());
            pdf.push_str(&format!(
                "{page_id} 0 obj\n<< /Type /Page /Parent 2 0 R \
                 /MediaBox [0 0 {PAGE_WIDTH:.0} {PAGE_HEIGHT:.0}] \
                 /Contents {content_id} 0 R \
                 /Resources << /Font << /F1 {font_bold_id} 0 R /F2 {font_regular_id} 0 R >> >> >>\nendobj\n"
            ));

            offsets.push(pdf.len());
            pdf.push_str(&format!(
                "{content_id} 0 obj\n<< /Length {} >>\nstream\n{content}\nendstream\nendobj\n",
                content.len()
            ));
        }

        offsets.push(pdf.len());
        pdf.push_str(&format!(
            "{font_bold_id} 0 obj\n<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold >>\nendobj\n"
        ));

        offsets.push(pdf.len());
        pdf.push_str(&format!(
            "{font_regular_id} 0 obj\n<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>\nendobj\n"
        ));

        offsets.push(pdf.len());
        pdf.push_str(&format!(
            "{info_id} 0 obj\n<< /Title (AG Grid Data) /Producer (aggrid_exporter) >>\nendobj\n"
        ));

        let xref_offset = pdf.len();
        let num_objects = offsets.len() + 1;
        pdf.push_str(&format!("xref\n0 {num_objects}\n"));
        pdf.push_str("0000000000 65535 f \n");
        for offset in &offsets {
            pdf.push_str(&format!("{offset:010} 00000 n \n"));
        }

        pdf.push_str(&format!(
            "trailer\n<< /Size {num_objects} /Root 1 0 R /Info {info_id} 0 R >>\n"
        ));
        pdf.push_str(&format!("startxref\n{xref_offset}\n%%EOF\n"));

        pdf.into_bytes()
    }
}
