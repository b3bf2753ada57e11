//! Error types for sheetdiff-core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Which input table an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

/// Errors that can occur in sheetdiff-core
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse CSV
    #[error("failed to parse CSV '{path}': {message}")]
    CsvParse { path: PathBuf, message: String },

    /// CSV parsing error from the csv crate
    #[error("CSV error in '{path}': {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Failed to parse a spreadsheet file
    #[error("failed to parse spreadsheet '{path}': {message}")]
    XlsxParse { path: PathBuf, message: String },

    /// Spreadsheet reading error from the calamine crate
    #[error("spreadsheet error in '{path}': {source}")]
    Xlsx {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    /// Spreadsheet writing error from the rust_xlsxwriter crate
    #[error("failed to write spreadsheet '{path}': {source}")]
    XlsxWrite {
        path: PathBuf,
        #[source]
        source: rust_xlsxwriter::XlsxError,
    },

    /// Two header cells in a loaded file share the same name
    #[error("duplicate column header '{column}' in '{path}'")]
    DuplicateHeader { path: PathBuf, column: String },

    /// File extension does not map to a supported format
    #[error("unsupported file format: '{path}'")]
    UnsupportedFormat { path: PathBuf },

    /// Finalizing a mapping with no entries
    #[error("column mapping is empty: add at least one source/target pair")]
    EmptyMapping,

    /// No mapped source column exists in the left table
    #[error("no common columns to compare after applying the mapping")]
    NoCommonColumns,

    /// Tables have different row counts
    #[error("row count mismatch: left table has {left} rows, right table has {right}")]
    RowCountMismatch { left: usize, right: usize },

    /// A mapping entry or compare column names a column the table does not have
    #[error("column '{column}' not found in {side} table")]
    InvalidColumnReference { column: String, side: Side },

    /// Two mapping entries use the same source column
    #[error("duplicate mapping source column '{column}'")]
    DuplicateMappingSource { column: String },

    /// Two mapping entries use the same target column
    #[error("duplicate mapping target column '{column}'")]
    DuplicateMappingTarget { column: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
