//! sheetdiff-core: Core library for reconciling and diffing spreadsheet tables
//!
//! This library provides functionality to:
//! - Load tables from CSV and Excel files into a common typed form
//! - Reconcile two tables' headers, automatically or through a column mapping
//! - Build, edit and finalize mapping drafts across independent sessions
//! - Compare tables row by row and annotate every difference
//! - Export annotated reports as CSV, XLSX or JSON

pub mod codec;
pub mod csv;
pub mod diff;
pub mod error;
pub mod reconcile;
pub mod session;
pub mod table;
pub mod xlsx;

pub use codec::{load_table, save_report, save_table, ReportFormat, TableFormat};
pub use self::csv::{parse_csv, parse_csv_str, write_csv, write_csv_string};
pub use diff::{
    diff, DiffReport, DiffSummary, ReportMeta, DIFF_SUFFIX, HAS_DIFFERENCE, NO_DIFFERENCE,
    STATUS_COLUMN,
};
pub use error::{Error, Result, Side};
pub use reconcile::{
    finalize_mapping, reconcile, FinalizedMapping, MappingDraft, MappingEntry, MappingFile,
    MappingPair, Reconciliation,
};
pub use session::{SessionId, SessionStore};
pub use table::{CellValue, Column, Row, Table};
pub use xlsx::{export_xlsx, import_xlsx};
