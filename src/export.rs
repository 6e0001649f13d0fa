//! Spreadsheet export of a computed plan.
//!
//! Every [`Sheet`] becomes one worksheet with the same name, rows written
//! verbatim. Column widths follow the longest cell text in the column.

use std::path::Path;

use chrono::NaiveDate;
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use thiserror::Error;

use crate::core::{Cell, Sheet};

/// Narrowest column width, in characters.
pub const MIN_COLUMN_WIDTH: usize = 10;

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("nothing to export: the plan has no sheets")]
    Empty,

    #[error("failed to create sheet '{name}': {source}")]
    Sheet {
        name: String,
        #[source]
        source: XlsxError,
    },

    #[error("failed to write '{sheet}' row {row} column {col}: {source}")]
    Cell {
        sheet: String,
        row: u32,
        col: u16,
        #[source]
        source: XlsxError,
    },

    #[error("sheet '{sheet}' is too large to export")]
    TooLarge { sheet: String },

    #[error("failed to save workbook: {0}")]
    Save(#[source] XlsxError),

    #[error("failed to write workbook file: {0}")]
    Io(#[from] std::io::Error),
}

/// Port for turning plan sheets into a downloadable file.
pub trait SheetExporter: Send + Sync {
    fn content_type(&self) -> &'static str;

    fn export(&self, sheets: &[Sheet]) -> Result<Vec<u8>, ExportError>;

    fn save(&self, sheets: &[Sheet], path: &Path) -> Result<(), ExportError> {
        let bytes = self.export(sheets)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxExporter;

impl XlsxExporter {
    fn build(&self, sheets: &[Sheet]) -> Result<Workbook, ExportError> {
        if sheets.is_empty() {
            return Err(ExportError::Empty);
        }

        let header_format = Format::new().set_bold();
        let mut workbook = Workbook::new();
        for sheet in sheets {
            let worksheet = workbook
                .add_worksheet()
                .set_name(&sheet.name)
                .map_err(|source| ExportError::Sheet {
                    name: sheet.name.clone(),
                    source,
                })?;
            write_sheet(worksheet, sheet, &header_format)?;
        }
        Ok(workbook)
    }
}

impl SheetExporter for XlsxExporter {
    fn content_type(&self) -> &'static str {
        XLSX_CONTENT_TYPE
    }

    fn export(&self, sheets: &[Sheet]) -> Result<Vec<u8>, ExportError> {
        let mut workbook = self.build(sheets)?;
        let bytes = workbook.save_to_buffer().map_err(ExportError::Save)?;
        tracing::info!(sheets = sheets.len(), bytes = bytes.len(), "exported workbook");
        Ok(bytes)
    }

    fn save(&self, sheets: &[Sheet], path: &Path) -> Result<(), ExportError> {
        let mut workbook = self.build(sheets)?;
        workbook.save(path).map_err(ExportError::Save)?;
        tracing::info!(sheets = sheets.len(), path = %path.display(), "saved workbook");
        Ok(())
    }
}

fn write_sheet(
    worksheet: &mut Worksheet,
    sheet: &Sheet,
    header_format: &Format,
) -> Result<(), ExportError> {
    let too_large = || ExportError::TooLarge {
        sheet: sheet.name.clone(),
    };

    for (row_idx, row) in sheet.rows.iter().enumerate() {
        let row32 = u32::try_from(row_idx).map_err(|_| too_large())?;
        for (col_idx, cell) in row.iter().enumerate() {
            let col16 = u16::try_from(col_idx).map_err(|_| too_large())?;
            let written = match (cell, row_idx == 0) {
                (Cell::Text(text), true) => {
                    worksheet.write_string_with_format(row32, col16, text, header_format)
                }
                (Cell::Text(text), false) => worksheet.write_string(row32, col16, text),
                (Cell::Number(n), _) => worksheet.write_number(row32, col16, *n),
            };
            written.map_err(|source| ExportError::Cell {
                sheet: sheet.name.clone(),
                row: row32,
                col: col16,
                source,
            })?;
        }
    }

    for (col_idx, width) in column_widths(sheet).into_iter().enumerate() {
        let col16 = u16::try_from(col_idx).map_err(|_| too_large())?;
        worksheet
            .set_column_width(col16, width as f64)
            .map_err(|source| ExportError::Cell {
                sheet: sheet.name.clone(),
                row: 0,
                col: col16,
                source,
            })?;
    }
    Ok(())
}

/// Width in characters of each header column: the longest cell text in
/// that column, never below [`MIN_COLUMN_WIDTH`].
pub fn column_widths(sheet: &Sheet) -> Vec<usize> {
    (0..sheet.header().len())
        .map(|col| {
            sheet
                .rows
                .iter()
                .filter_map(|row| row.get(col))
                .map(|cell| cell.display().chars().count())
                .fold(MIN_COLUMN_WIDTH, usize::max)
        })
        .collect()
}

pub fn default_file_name(date: NaiveDate) -> String {
    format!("personal_finance_plan_{}.xlsx", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{PlanInput, generate_plan, sheets};
    use calamine::{Data, Reader, Xlsx, open_workbook_from_rs};
    use std::io::Cursor;

    fn read_back(bytes: Vec<u8>) -> Xlsx<Cursor<Vec<u8>>> {
        open_workbook_from_rs(Cursor::new(bytes)).expect("exported bytes should be valid xlsx")
    }

    fn as_string(cell: &Data) -> String {
        match cell {
            Data::String(s) => s.clone(),
            Data::Float(f) => f.to_string(),
            Data::Int(i) => i.to_string(),
            other => format!("{other:?}"),
        }
    }

    #[test]
    fn plan_workbook_has_one_tab_per_sheet_in_order() {
        let plan = generate_plan(&PlanInput::default());
        let bytes = XlsxExporter.export(&plan.sheets).expect("export");
        let workbook = read_back(bytes);
        assert_eq!(workbook.sheet_names(), sheets::SHEET_ORDER.to_vec());
    }

    #[test]
    fn tab_contents_match_sheet_rows_verbatim() {
        let plan = generate_plan(&PlanInput::default());
        let bytes = XlsxExporter.export(&plan.sheets).expect("export");
        let mut workbook = read_back(bytes);

        for sheet in &plan.sheets {
            let range = workbook
                .worksheet_range(&sheet.name)
                .expect("worksheet should exist");
            let actual: Vec<Vec<String>> = range
                .rows()
                .map(|row| row.iter().map(as_string).collect())
                .collect();
            let expected: Vec<Vec<String>> = sheet
                .rows
                .iter()
                .map(|row| row.iter().map(Cell::display).collect())
                .collect();
            assert_eq!(actual, expected, "sheet {}", sheet.name);
        }
    }

    #[test]
    fn numeric_cells_stay_numeric() {
        let mut sheet = Sheet::new("Numbers", &["Month", "Value"]);
        sheet.push_row(vec![Cell::Number(1.0), Cell::Number(1_250.5)]);
        let bytes = XlsxExporter.export(&[sheet]).expect("export");
        let mut workbook = read_back(bytes);
        let range = workbook.worksheet_range("Numbers").expect("range");
        let row = range.rows().nth(1).expect("data row");
        assert_eq!(row[1], Data::Float(1_250.5));
    }

    #[test]
    fn column_width_tracks_longest_text_with_floor() {
        let mut sheet = Sheet::new("Widths", &["A", "Long header here"]);
        sheet.push_row(vec![Cell::from("short"), Cell::from("x")]);
        sheet.push_row(vec![
            Cell::from("a considerably longer value"),
            Cell::from("₹1,00,000"),
        ]);
        assert_eq!(column_widths(&sheet), vec![27, 16]);

        let narrow = Sheet::new("Narrow", &["Id"]);
        assert_eq!(column_widths(&narrow), vec![MIN_COLUMN_WIDTH]);
    }

    #[test]
    fn empty_sheet_list_is_rejected() {
        let err = XlsxExporter.export(&[]).expect_err("must reject empty export");
        assert!(matches!(err, ExportError::Empty));
    }

    #[test]
    fn invalid_sheet_name_reports_sheet() {
        let sheet = Sheet::new("Bad[Name]", &["x"]);
        let err = XlsxExporter.export(&[sheet]).expect_err("brackets are not allowed");
        assert!(err.to_string().contains("Bad[Name]"));
    }

    #[test]
    fn default_file_name_uses_iso_date() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 18).expect("valid date");
        assert_eq!(
            default_file_name(date),
            "personal_finance_plan_2026-10-18.xlsx"
        );
    }
}
