//! Row differ: positional cell-level comparison of two tables
//!
//! Both tables must have the same number of rows; row N of the left table
//! is always compared to row N of the right table. For every compared
//! column the report gains a `<column>_diff` annotation column, and each
//! row gets an aggregate flag telling whether anything in it changed.

use crate::error::{Error, Result, Side};
use crate::table::{CellValue, Table};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Suffix appended to a compared column's name to form its diff column
pub const DIFF_SUFFIX: &str = "_diff";
/// Name of the per-row aggregate flag column
pub const STATUS_COLUMN: &str = "diff_status";
/// Flag value for rows with at least one differing cell
pub const HAS_DIFFERENCE: &str = "has_difference";
/// Flag value for rows where every compared cell matches
pub const NO_DIFFERENCE: &str = "no_difference";

/// Identifying metadata attached to a report
#[derive(Debug, Clone, Serialize)]
pub struct ReportMeta {
    /// Source path of the left table
    pub left_source: PathBuf,
    /// Source path of the right table
    pub right_source: PathBuf,
    /// Version of the engine that produced the report
    pub engine_version: String,
    /// When the comparison ran
    pub run_at: DateTime<Utc>,
}

/// Aggregate statistics for one comparison
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiffSummary {
    /// Rows examined (equal on both sides by precondition)
    pub rows_compared: usize,
    /// Rows with at least one differing cell
    pub rows_with_differences: usize,
    /// Cells examined (rows times compared columns)
    pub cells_compared: usize,
    /// Cells that differed
    pub cells_with_differences: usize,
    /// Differing cell count per compared column
    pub per_column: BTreeMap<String, usize>,
}

/// The output of a comparison
#[derive(Debug, Clone, Serialize)]
pub struct DiffReport {
    /// Provenance and engine metadata
    pub meta: ReportMeta,
    /// Aggregate statistics
    pub summary: DiffSummary,
    /// The left table's columns and data, then one `<column>_diff` column
    /// per compared column, then the flag column
    pub table: Table,
    /// Per-row difference flag, aligned with `table.rows`
    pub row_flags: Vec<bool>,
    /// Columns that were compared, in order
    pub compare_columns: Vec<String>,
}

impl DiffReport {
    /// True when any row differs
    pub fn has_differences(&self) -> bool {
        self.summary.rows_with_differences > 0
    }

    /// The report table filtered to rows with differences
    pub fn differing_rows(&self) -> Table {
        let rows = self
            .table
            .rows
            .iter()
            .zip(&self.row_flags)
            .filter(|(_, flag)| **flag)
            .map(|(row, _)| row.clone())
            .collect();
        Table {
            columns: self.table.columns.clone(),
            rows,
            source_path: self.table.source_path.clone(),
        }
    }

    /// The first `n` report rows
    pub fn preview(&self, n: usize) -> Table {
        Table {
            columns: self.table.columns.clone(),
            rows: self.table.rows.iter().take(n).cloned().collect(),
            source_path: self.table.source_path.clone(),
        }
    }
}

/// Compare two tables cell by cell over the given columns
///
/// The inputs are not modified. Equal cells produce an empty diff cell;
/// unequal cells produce `"{left} --> {right}"` using each value's
/// display form. A single pass over the rows covers every compared
/// column, so the cost is rows times compared columns.
pub fn diff(left: &Table, right: &Table, compare_columns: &[String]) -> Result<DiffReport> {
    if left.row_count() != right.row_count() {
        return Err(Error::RowCountMismatch {
            left: left.row_count(),
            right: right.row_count(),
        });
    }

    // Resolve compared columns on both sides up front
    let mut left_indices = Vec::with_capacity(compare_columns.len());
    let mut right_indices = Vec::with_capacity(compare_columns.len());
    for name in compare_columns {
        let l = left
            .column_index(name)
            .ok_or_else(|| Error::InvalidColumnReference {
                column: name.clone(),
                side: Side::Left,
            })?;
        let r = right
            .column_index(name)
            .ok_or_else(|| Error::InvalidColumnReference {
                column: name.clone(),
                side: Side::Right,
            })?;
        left_indices.push(l);
        right_indices.push(r);
    }

    // Report columns: left columns, then diff columns, then the flag
    let mut column_names: Vec<String> = left.columns.iter().map(|c| c.name.clone()).collect();
    for name in compare_columns {
        column_names.push(format!("{}{}", name, DIFF_SUFFIX));
    }
    column_names.push(STATUS_COLUMN.to_string());

    let mut table = Table::from_columns(column_names, left.source_path.clone());

    let mut row_flags = Vec::with_capacity(left.row_count());
    let mut per_column: BTreeMap<String, usize> =
        compare_columns.iter().map(|n| (n.clone(), 0)).collect();
    let mut cells_with_differences = 0usize;

    for (left_row, right_row) in left.rows.iter().zip(&right.rows) {
        let mut cells: Vec<CellValue> = left_row.cells.clone();
        let mut row_differs = false;

        for (i, name) in compare_columns.iter().enumerate() {
            let a = &left_row.cells[left_indices[i]];
            let b = &right_row.cells[right_indices[i]];
            if a == b {
                cells.push(CellValue::Text(String::new()));
            } else {
                cells.push(CellValue::Text(format!("{} --> {}", a, b)));
                row_differs = true;
                cells_with_differences += 1;
                if let Some(count) = per_column.get_mut(name) {
                    *count += 1;
                }
            }
        }

        cells.push(CellValue::Text(
            if row_differs {
                HAS_DIFFERENCE
            } else {
                NO_DIFFERENCE
            }
            .to_string(),
        ));
        table.push_row(cells);
        row_flags.push(row_differs);
    }

    let rows_with_differences = row_flags.iter().filter(|f| **f).count();
    let summary = DiffSummary {
        rows_compared: left.row_count(),
        rows_with_differences,
        cells_compared: left.row_count() * compare_columns.len(),
        cells_with_differences,
        per_column,
    };

    let meta = ReportMeta {
        left_source: left.source_path.clone(),
        right_source: right.source_path.clone(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        run_at: Utc::now(),
    };

    Ok(DiffReport {
        meta,
        summary,
        table,
        row_flags,
        compare_columns: compare_columns.to_vec(),
    })
}
