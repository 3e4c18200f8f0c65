//! Write a Table to a single-sheet Excel workbook

use std::path::Path;

use anyhow::{Context, Result, bail};
use rust_xlsxwriter::{Format, Workbook};

use crate::table::Table;

pub const DEFAULT_SHEET_NAME: &str = "Sheet1";

/// Excel's hard limits, header row included
const MAX_ROWS: usize = 1_048_576;
const MAX_COLUMNS: usize = 16_384;

/// Write `table` to `path` as one worksheet.
///
/// Row 0 holds the column names in bold; every cell is written as text and
/// empty cells are left blank. Nothing is written to disk until the whole
/// workbook has been built.
pub fn write_table_excel(table: &Table, path: &Path, sheet_name: &str) -> Result<()> {
    if table.row_count() + 1 > MAX_ROWS {
        bail!(
            "Table has {} rows, more than an Excel sheet can hold ({})",
            table.row_count(),
            MAX_ROWS - 1
        );
    }
    if table.column_count() > MAX_COLUMNS {
        bail!(
            "Table has {} columns, more than an Excel sheet can hold ({})",
            table.column_count(),
            MAX_COLUMNS
        );
    }

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    worksheet
        .set_name(sheet_name)
        .with_context(|| format!("Invalid sheet name: {}", sheet_name))?;

    let header_format = Format::new().set_bold();

    // Header
    for (col, name) in table.columns().iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, name, &header_format)?;
    }

    // Data rows
    for (row_idx, row) in table.rows().iter().enumerate() {
        let excel_row = (row_idx + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            match cell.as_deref() {
                Some(value) if !value.is_empty() => {
                    worksheet
                        .write_string(excel_row, col as u16, value)
                        .with_context(|| {
                            format!(
                                "Failed to write cell at row {}, column '{}'",
                                excel_row + 1,
                                table.columns()[col]
                            )
                        })?;
                }
                _ => { /* Leave cell empty */ }
            }
        }
    }

    worksheet.set_freeze_panes(1, 0)?;
    worksheet.autofit();

    workbook
        .save(path)
        .with_context(|| format!("Failed to save Excel file: {}", path.display()))?;

    log::info!(
        "Wrote {} rows x {} columns to {}",
        table.row_count(),
        table.column_count(),
        path.display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{Data, Reader, Xlsx, open_workbook};

    fn read_back(path: &Path, sheet: &str) -> Vec<Vec<Data>> {
        let mut workbook: Xlsx<_> = open_workbook(path).unwrap();
        let range = workbook.worksheet_range(sheet).unwrap();
        range.rows().map(|r| r.to_vec()).collect()
    }

    fn text(s: &str) -> Data {
        Data::String(s.to_string())
    }

    #[test]
    fn test_writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");

        let mut table = Table::new(["id", "Nombre_profesional", "Link_chat"]);
        table.push_row(vec![Some("1".into()), Some("Dr Lee".into()), Some("".into())]);
        table.push_row(vec![Some("2".into()), None, Some("http://chat".into())]);

        write_table_excel(&table, &path, DEFAULT_SHEET_NAME).unwrap();

        let rows = read_back(&path, DEFAULT_SHEET_NAME);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], vec![text("id"), text("Nombre_profesional"), text("Link_chat")]);
        assert_eq!(rows[1], vec![text("1"), text("Dr Lee"), Data::Empty]);
        assert_eq!(rows[2], vec![text("2"), Data::Empty, text("http://chat")]);
    }

    #[test]
    fn test_numbers_stay_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");

        let mut table = Table::new(["Id_paciente"]);
        table.push_row(vec![Some("00042".into())]);

        write_table_excel(&table, &path, DEFAULT_SHEET_NAME).unwrap();

        let rows = read_back(&path, DEFAULT_SHEET_NAME);
        assert_eq!(rows[1][0], text("00042"));
    }

    #[test]
    fn test_custom_sheet_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");

        let mut table = Table::new(["a"]);
        table.push_row(vec![Some("x".into())]);

        write_table_excel(&table, &path, "Contactos").unwrap();

        let workbook: Xlsx<_> = open_workbook(&path).unwrap();
        assert_eq!(workbook.sheet_names(), vec!["Contactos".to_string()]);
    }

    #[test]
    fn test_invalid_sheet_name_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");

        let mut table = Table::new(["a"]);
        table.push_row(vec![Some("x".into())]);

        let result = write_table_excel(&table, &path, "bad/name");

        assert!(result.is_err());
        assert!(!path.exists());
    }
}
