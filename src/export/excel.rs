use rust_xlsxwriter::Workbook;

use super::Exporter;
use crate::error::ExportError;
use crate::models::{GridColumn, RowRecord};

/// Single-sheet workbook: header row first, body rows in grid order.
pub struct ExcelExporter;

impl Exporter for ExcelExporter {
    fn file_name(&self) -> &'static str {
        "aggrid-data.xlsx"
    }

    fn render(&self, columns: &[GridColumn], rows: &[RowRecord]) -> Result<Vec<u8>, ExportError> {
        let mut workbook = Workbook::new();

        let worksheet = workbook.add_worksheet();
        worksheet.set_name("Sheet1")?;

        for (col_num, column) in columns.iter().enumerate() {
            let col = col_num as u16;
            // Width ratios are in rough inches; Excel widths are in characters.
            worksheet.set_column_width(col, column.width * 10.0)?;
            worksheet.write(0, col, column.header.as_str())?;
        }

        // Freeze the header row and make it filterable.
        worksheet.set_freeze_panes(1, 0)?;
        worksheet.autofilter(0, 0, rows.len() as u32, (columns.len() - 1) as u16)?;

        for (row_num, record) in rows.iter().enumerate() {
            let row = (row_num + 1) as u32;
            for (col_num, column) in columns.iter().enumerate() {
                worksheet.write(row, col_num as u16, record.field(column.field))?;
            }
        }

        Ok(workbook.save_to_buffer()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::default_columns;
    use calamine::{Data, Reader, Xlsx};
    use std::io::Cursor;

    fn sample_rows() -> Vec<RowRecord> {
        vec![
            RowRecord::new("Ada", "ada@x.com", "UK", "1"),
            RowRecord::new("Grace", "grace@x.com", "US", "2"),
        ]
    }

    fn decode_sheet(bytes: Vec<u8>) -> Vec<Vec<String>> {
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes)).unwrap();
        let range = workbook.worksheet_range("Sheet1").unwrap();
        range
            .rows()
            .map(|row| {
                row.iter()
                    .map(|cell| match cell {
                        Data::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn workbook_round_trips_the_table() {
        let bytes = ExcelExporter
            .render(&default_columns(), &sample_rows())
            .unwrap();
        let decoded = decode_sheet(bytes);

        assert_eq!(
            decoded,
            vec![
                vec!["Name", "Email", "Country", "Phone"],
                vec!["Ada", "ada@x.com", "UK", "1"],
                vec!["Grace", "grace@x.com", "US", "2"],
            ]
        );
    }

    #[test]
    fn workbook_has_a_single_sheet() {
        let bytes = ExcelExporter
            .render(&default_columns(), &sample_rows())
            .unwrap();
        let workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes)).unwrap();
        assert_eq!(workbook.sheet_names().to_vec(), vec!["Sheet1".to_string()]);
    }
}
