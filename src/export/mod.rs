pub mod excel;
pub mod pdf;
pub mod pptx;

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ExportError;
use crate::models::{GridColumn, RowRecord};

pub use excel::ExcelExporter;
pub use pdf::PdfExporter;
pub use pptx::PptxExporter;

/// Encodes the current row set into one export artifact.
///
/// Implementations are pure functions of `(columns, rows)`: no shared state,
/// no ordering dependency between formats.
pub trait Exporter {
    /// Fixed output file name, e.g. `aggrid-data.xlsx`.
    fn file_name(&self) -> &'static str;

    fn render(&self, columns: &[GridColumn], rows: &[RowRecord]) -> Result<Vec<u8>, ExportError>;
}

/// Renders an artifact, short-circuiting to `None` when there are no rows.
///
/// The empty case is a deliberate no-op, not an error.
pub fn render_artifact(
    exporter: &dyn Exporter,
    columns: &[GridColumn],
    rows: &[RowRecord],
) -> Result<Option<Vec<u8>>, ExportError> {
    if rows.is_empty() {
        return Ok(None);
    }
    exporter.render(columns, rows).map(Some)
}

/// Renders an artifact and writes it under `dir` using the exporter's fixed
/// file name. Returns the written path, or `None` when there were no rows.
pub fn write_artifact(
    exporter: &dyn Exporter,
    columns: &[GridColumn],
    rows: &[RowRecord],
    dir: &Path,
) -> Result<Option<PathBuf>, ExportError> {
    match render_artifact(exporter, columns, rows)? {
        Some(bytes) => {
            let path = dir.join(exporter.file_name());
            fs::write(&path, &bytes)?;
            Ok(Some(path))
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::default_columns;

    #[test]
    fn empty_rows_are_a_no_op_for_every_format() {
        let columns = default_columns();
        let exporters: Vec<Box<dyn Exporter>> = vec![
            Box::new(ExcelExporter),
            Box::new(PdfExporter),
            Box::new(PptxExporter),
        ];
        for exporter in &exporters {
            let rendered = render_artifact(exporter.as_ref(), &columns, &[]).unwrap();
            assert!(
                rendered.is_none(),
                "{} rendered an empty table",
                exporter.file_name()
            );
        }
    }

    #[test]
    fn write_artifact_skips_the_file_for_empty_rows() {
        let dir = tempfile::tempdir().unwrap();
        let columns = default_columns();
        let written = write_artifact(&ExcelExporter, &columns, &[], dir.path()).unwrap();
        assert!(written.is_none());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn write_artifact_uses_the_fixed_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let columns = default_columns();
        let rows = vec![crate::models::RowRecord::new("Ada", "ada@x.com", "UK", "1")];
        let written = write_artifact(&ExcelExporter, &columns, &rows, dir.path())
            .unwrap()
            .unwrap();
        assert_eq!(written, dir.path().join("aggrid-data.xlsx"));
        assert!(written.exists());
    }
}
