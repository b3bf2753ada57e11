//! Excel file import (xlsx, xls, xlsb, ods) and export (xlsx only)
//!
//! Import reads the first sheet, taking the first row as headers. Cell
//! dates come through as `CellValue::Date` when the cell holds a pure
//! date; datetimes with a time component stay textual.

use crate::error::{Error, Result};
use crate::table::{CellValue, Column, Row, Table};
use calamine::{open_workbook_auto, Data, Reader, Sheets};
use chrono::NaiveTime;
use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;

/// Import an Excel file into a Table
pub fn import_xlsx<P: AsRef<Path>>(path: P) -> Result<Table> {
    let path = path.as_ref();
    let mut workbook: Sheets<_> = open_workbook_auto(path).map_err(|e| Error::Xlsx {
        path: path.to_path_buf(),
        source: e,
    })?;

    let sheet_names = workbook.sheet_names().to_vec();
    let first_sheet = sheet_names.first().ok_or_else(|| Error::XlsxParse {
        path: path.to_path_buf(),
        message: "workbook contains no sheets".to_string(),
    })?;

    let range = workbook
        .worksheet_range(first_sheet)
        .map_err(|e| Error::Xlsx {
            path: path.to_path_buf(),
            source: e,
        })?;

    let mut rows_iter = range.rows();
    let header_row = rows_iter.next().ok_or_else(|| Error::XlsxParse {
        path: path.to_path_buf(),
        message: format!("sheet '{}' is empty", first_sheet),
    })?;

    let columns: Vec<Column> = header_row
        .iter()
        .enumerate()
        .map(|(i, cell)| Column::new(header_text(cell), i))
        .collect();

    if let Some(name) = crate::table::duplicate_column_name(&columns) {
        return Err(Error::DuplicateHeader {
            path: path.to_path_buf(),
            column: name.to_string(),
        });
    }

    let mut rows = Vec::new();
    for row in rows_iter {
        let cells: Vec<CellValue> = row.iter().map(convert_cell).collect();
        rows.push(Row::new(cells));
    }

    Ok(Table {
        columns,
        rows,
        source_path: path.to_path_buf(),
    })
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}

/// Map a calamine cell onto our cell model
///
/// Text cells go through the same type detection as CSV fields, so the
/// same data compares equal across the two formats. Whole floats are
/// normalized to integers for the same reason.
fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::parse(s),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                CellValue::Integer(*f as i64)
            } else {
                CellValue::Float(*f)
            }
        }
        Data::Int(i) => CellValue::Integer(*i),
        Data::Bool(b) => CellValue::Text(if *b { "TRUE" } else { "FALSE" }.to_string()),
        Data::Error(e) => CellValue::Text(format!("#{:?}", e)),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(ndt) if ndt.time() == NaiveTime::MIN => CellValue::Date(ndt.date()),
            Some(ndt) => CellValue::Text(ndt.format("%Y-%m-%d %H:%M:%S").to_string()),
            None => CellValue::Float(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

/// Export a table to an xlsx file with a bold header row
pub fn export_xlsx<P: AsRef<Path>>(table: &Table, path: P, sheet_name: &str) -> Result<()> {
    let path = path.as_ref();
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name).map_err(|e| Error::XlsxWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    for (col_idx, column) in table.columns.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col_idx as u16, &column.name, &bold)
            .map_err(|e| Error::XlsxWrite {
                path: path.to_path_buf(),
                source: e,
            })?;
    }

    for (row_idx, row) in table.rows.iter().enumerate() {
        let row_num = (row_idx + 1) as u32;
        for (col_idx, cell) in row.cells.iter().enumerate() {
            let col_num = col_idx as u16;
            match cell {
                CellValue::Integer(i) => worksheet.write_number(row_num, col_num, *i as f64),
                CellValue::Float(f) => worksheet.write_number(row_num, col_num, *f),
                CellValue::Text(s) => worksheet.write_string(row_num, col_num, s),
                CellValue::Date(d) => {
                    worksheet.write_datetime_with_format(row_num, col_num, d, &date_format)
                }
                CellValue::Empty => continue,
            }
            .map_err(|e| Error::XlsxWrite {
                path: path.to_path_buf(),
                source: e,
            })?;
        }
    }

    workbook.save(path).map_err(|e| Error::XlsxWrite {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(())
}
