//! CSV reading and writing for spreadsheet tables

use crate::error::{Error, Result};
use crate::table::{CellValue, Column, Row, Table};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Parse a CSV file into a Table
pub fn parse_csv<P: AsRef<Path>>(path: P) -> Result<Table> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    read_from(BufReader::new(file), path.to_path_buf())
}

/// Parse CSV from a string (useful for testing and in-memory callers)
pub fn parse_csv_str(content: &str, source_name: &str) -> Result<Table> {
    read_from(content.as_bytes(), PathBuf::from(source_name))
}

fn read_from<R: std::io::Read>(reader: R, path: PathBuf) -> Result<Table> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true) // Allow varying number of fields
        .from_reader(reader);

    // Parse headers into columns
    let headers = csv_reader.headers().map_err(|e| Error::Csv {
        path: path.clone(),
        source: e,
    })?;

    let columns: Vec<Column> = headers
        .iter()
        .enumerate()
        .map(|(i, name)| Column::new(name.to_string(), i))
        .collect();

    if columns.is_empty() {
        return Err(Error::CsvParse {
            path,
            message: "no columns found in CSV".to_string(),
        });
    }

    if let Some(name) = crate::table::duplicate_column_name(&columns) {
        let column = name.to_string();
        return Err(Error::DuplicateHeader { path, column });
    }

    // Parse rows
    let mut rows = Vec::new();
    for (row_idx, result) in csv_reader.records().enumerate() {
        let record = result.map_err(|e| Error::Csv {
            path: path.clone(),
            source: e,
        })?;

        let mut cells: Vec<CellValue> = record.iter().map(CellValue::parse).collect();

        // Warn if row is longer than header (truncate)
        if cells.len() > columns.len() {
            eprintln!(
                "Warning: row {} in {} has more cells than columns, truncating",
                row_idx + 1,
                path.display()
            );
            cells.truncate(columns.len());
        }

        // Pad with empty cells if row is shorter than header
        while cells.len() < columns.len() {
            cells.push(CellValue::Empty);
        }

        rows.push(Row::new(cells));
    }

    Ok(Table {
        columns,
        rows,
        source_path: path,
    })
}

/// Write a table to a CSV file
pub fn write_csv<P: AsRef<Path>>(table: &Table, path: P) -> Result<()> {
    let path = path.as_ref();
    let mut writer = csv::WriterBuilder::new()
        .from_path(path)
        .map_err(|e| Error::Csv {
            path: path.to_path_buf(),
            source: e,
        })?;

    write_records(table, &mut writer).map_err(|e| Error::Csv {
        path: path.to_path_buf(),
        source: e,
    })?;
    writer.flush()?;
    Ok(())
}

/// Write a table to a CSV string
pub fn write_csv_string(table: &Table) -> Result<String> {
    let mut buf = Vec::new();
    {
        let mut writer = csv::Writer::from_writer(&mut buf);
        write_records(table, &mut writer).map_err(|e| Error::Csv {
            path: table.source_path.clone(),
            source: e,
        })?;
        writer.flush()?;
    }

    String::from_utf8(buf).map_err(|e| Error::CsvParse {
        path: table.source_path.clone(),
        message: e.to_string(),
    })
}

fn write_records<W: std::io::Write>(
    table: &Table,
    writer: &mut csv::Writer<W>,
) -> std::result::Result<(), csv::Error> {
    writer.write_record(table.columns.iter().map(|c| c.name.as_str()))?;
    for row in &table.rows {
        writer.write_record(row.cells.iter().map(|c| c.to_string_value()))?;
    }
    Ok(())
}
