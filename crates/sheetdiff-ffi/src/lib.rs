//! C FFI bindings for sheetdiff-core
//!
//! This crate provides a C-compatible API for embedding the comparison
//! engine in C/C++ applications. Tables, mapping drafts and reports are
//! exposed as opaque handles; strings returned to the caller must be
//! released with `sd_free_string`.

use sheetdiff_core::{
    diff, finalize_mapping, load_table, reconcile, DiffReport, MappingDraft, Reconciliation, Table,
};
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::path::Path;
use std::ptr;
use uuid::Uuid;

/// Opaque handle to a loaded table
pub struct SdTable {
    inner: Table,
}

/// Opaque handle to a mapping draft
pub struct SdMapping {
    inner: MappingDraft,
}

/// Opaque handle to a diff report
pub struct SdReport {
    inner: DiffReport,
}

/// Load a table from a CSV or Excel file
///
/// # Safety
/// - `path` must be a valid C string
/// - Returns null on error
/// - Caller must free the result with `sd_table_free`
#[no_mangle]
pub unsafe extern "C" fn sd_table_open(path: *const c_char) -> *mut SdTable {
    if path.is_null() {
        return ptr::null_mut();
    }

    let path = match CStr::from_ptr(path).to_str() {
        Ok(s) => s,
        Err(_) => return ptr::null_mut(),
    };

    match load_table(Path::new(path)) {
        Ok(table) => Box::into_raw(Box::new(SdTable { inner: table })),
        Err(_) => ptr::null_mut(),
    }
}

/// Free a table
///
/// # Safety
/// - `table` must be a valid pointer returned by `sd_table_open` or null
#[no_mangle]
pub unsafe extern "C" fn sd_table_free(table: *mut SdTable) {
    if !table.is_null() {
        drop(Box::from_raw(table));
    }
}

/// Get the row count of a table
///
/// # Safety
/// - `table` must be a valid pointer returned by `sd_table_open`
#[no_mangle]
pub unsafe extern "C" fn sd_table_row_count(table: *const SdTable) -> usize {
    if table.is_null() {
        return 0;
    }
    (&(*table).inner).row_count()
}

/// Get the column count of a table
///
/// # Safety
/// - `table` must be a valid pointer returned by `sd_table_open`
#[no_mangle]
pub unsafe extern "C" fn sd_table_col_count(table: *const SdTable) -> usize {
    if table.is_null() {
        return 0;
    }
    (&(*table).inner).column_count()
}

/// Get a column name by index
///
/// # Safety
/// - `table` must be a valid pointer returned by `sd_table_open`
/// - Returns null if index is out of bounds
/// - Caller must free the returned string with `sd_free_string`
#[no_mangle]
pub unsafe extern "C" fn sd_table_col_name(table: *const SdTable, index: usize) -> *mut c_char {
    if table.is_null() {
        return ptr::null_mut();
    }

    (&(*table).inner.columns)
        .get(index)
        .and_then(|c| CString::new(c.name.as_str()).ok())
        .map(|s| s.into_raw())
        .unwrap_or(ptr::null_mut())
}

/// Get a cell value as a string
///
/// # Safety
/// - `table` must be a valid pointer returned by `sd_table_open`
/// - Returns null if row or col is out of bounds
/// - Caller must free the returned string with `sd_free_string`
#[no_mangle]
pub unsafe extern "C" fn sd_table_cell(
    table: *const SdTable,
    row: usize,
    col: usize,
) -> *mut c_char {
    if table.is_null() {
        return ptr::null_mut();
    }

    (&(*table).inner.rows)
        .get(row)
        .and_then(|r| r.cells.get(col))
        .and_then(|c| CString::new(c.to_string_value()).ok())
        .map(|s| s.into_raw())
        .unwrap_or(ptr::null_mut())
}

/// Create an empty mapping draft
///
/// Caller must free the result with `sd_mapping_free`.
#[no_mangle]
pub extern "C" fn sd_mapping_new() -> *mut SdMapping {
    Box::into_raw(Box::new(SdMapping {
        inner: MappingDraft::new(),
    }))
}

/// Free a mapping draft
///
/// # Safety
/// - `mapping` must be a valid pointer returned by `sd_mapping_new` or null
#[no_mangle]
pub unsafe extern "C" fn sd_mapping_free(mapping: *mut SdMapping) {
    if !mapping.is_null() {
        drop(Box::from_raw(mapping));
    }
}

/// Add a source/target pair to a mapping draft
///
/// # Safety
/// - `mapping` must be a valid pointer returned by `sd_mapping_new`
/// - `source` and `target` must be valid C strings
/// - Returns the new entry's id, or null on error
/// - Caller must free the returned string with `sd_free_string`
#[no_mangle]
pub unsafe extern "C" fn sd_mapping_add(
    mapping: *mut SdMapping,
    source: *const c_char,
    target: *const c_char,
) -> *mut c_char {
    if mapping.is_null() || source.is_null() || target.is_null() {
        return ptr::null_mut();
    }

    let source = match CStr::from_ptr(source).to_str() {
        Ok(s) => s,
        Err(_) => return ptr::null_mut(),
    };
    let target = match CStr::from_ptr(target).to_str() {
        Ok(s) => s,
        Err(_) => return ptr::null_mut(),
    };

    let id = (&mut (*mapping).inner).add_entry(source, target);
    CString::new(id.to_string())
        .map(|s| s.into_raw())
        .unwrap_or(ptr::null_mut())
}

/// Remove an entry from a mapping draft by id
///
/// # Safety
/// - `mapping` must be a valid pointer returned by `sd_mapping_new`
/// - `id` must be a valid C string holding an id from `sd_mapping_add`
/// - Returns true if the entry existed and was removed
#[no_mangle]
pub unsafe extern "C" fn sd_mapping_remove(mapping: *mut SdMapping, id: *const c_char) -> bool {
    if mapping.is_null() || id.is_null() {
        return false;
    }

    let id = match CStr::from_ptr(id).to_str() {
        Ok(s) => s,
        Err(_) => return false,
    };

    match Uuid::parse_str(id) {
        Ok(id) => (&mut (*mapping).inner).remove_entry(id).is_some(),
        Err(_) => false,
    }
}

/// Get the number of entries in a mapping draft
///
/// # Safety
/// - `mapping` must be a valid pointer returned by `sd_mapping_new`
#[no_mangle]
pub unsafe extern "C" fn sd_mapping_len(mapping: *const SdMapping) -> usize {
    if mapping.is_null() {
        return 0;
    }
    (&(*mapping).inner).len()
}

/// Compare two tables whose headers match exactly
///
/// # Safety
/// - `left` and `right` must be valid pointers returned by `sd_table_open`
/// - Returns null if the headers differ (use `sd_compare_mapped`) or on error
/// - Caller must free the result with `sd_report_free`
#[no_mangle]
pub unsafe extern "C" fn sd_compare(left: *const SdTable, right: *const SdTable) -> *mut SdReport {
    if left.is_null() || right.is_null() {
        return ptr::null_mut();
    }

    let left = &(*left).inner;
    let right = &(*right).inner;

    let compare_columns = match reconcile(left, right) {
        Reconciliation::Auto { compare_columns } => compare_columns,
        Reconciliation::Manual => return ptr::null_mut(),
    };

    match diff(left, right, &compare_columns) {
        Ok(report) => Box::into_raw(Box::new(SdReport { inner: report })),
        Err(_) => ptr::null_mut(),
    }
}

/// Compare two tables through a column mapping
///
/// # Safety
/// - `left` and `right` must be valid pointers returned by `sd_table_open`
/// - `mapping` must be a valid pointer returned by `sd_mapping_new`
/// - Returns null on error (empty mapping, unknown columns, row count mismatch)
/// - Caller must free the result with `sd_report_free`
#[no_mangle]
pub unsafe extern "C" fn sd_compare_mapped(
    left: *const SdTable,
    right: *const SdTable,
    mapping: *const SdMapping,
) -> *mut SdReport {
    if left.is_null() || right.is_null() || mapping.is_null() {
        return ptr::null_mut();
    }

    let left = &(*left).inner;
    let right = &(*right).inner;

    let finalized = match finalize_mapping(left, right, &(*mapping).inner) {
        Ok(f) => f,
        Err(_) => return ptr::null_mut(),
    };

    match diff(left, &finalized.projected, &finalized.compare_columns) {
        Ok(report) => Box::into_raw(Box::new(SdReport { inner: report })),
        Err(_) => ptr::null_mut(),
    }
}

/// Free a diff report
///
/// # Safety
/// - `report` must be a valid pointer returned by a compare function or null
#[no_mangle]
pub unsafe extern "C" fn sd_report_free(report: *mut SdReport) {
    if !report.is_null() {
        drop(Box::from_raw(report));
    }
}

/// Get the row count of a report's table
///
/// # Safety
/// - `report` must be a valid pointer returned by a compare function
#[no_mangle]
pub unsafe extern "C" fn sd_report_row_count(report: *const SdReport) -> usize {
    if report.is_null() {
        return 0;
    }
    (&(*report).inner.table).row_count()
}

/// Get the column count of a report's table
///
/// # Safety
/// - `report` must be a valid pointer returned by a compare function
#[no_mangle]
pub unsafe extern "C" fn sd_report_col_count(report: *const SdReport) -> usize {
    if report.is_null() {
        return 0;
    }
    (&(*report).inner.table).column_count()
}

/// Get a report column name by index
///
/// # Safety
/// - `report` must be a valid pointer returned by a compare function
/// - Returns null if index is out of bounds
/// - Caller must free the returned string with `sd_free_string`
#[no_mangle]
pub unsafe extern "C" fn sd_report_col_name(report: *const SdReport, index: usize) -> *mut c_char {
    if report.is_null() {
        return ptr::null_mut();
    }

    (&(*report).inner.table.columns)
        .get(index)
        .and_then(|c| CString::new(c.name.as_str()).ok())
        .map(|s| s.into_raw())
        .unwrap_or(ptr::null_mut())
}

/// Get a report cell value as a string
///
/// # Safety
/// - `report` must be a valid pointer returned by a compare function
/// - Returns null if row or col is out of bounds
/// - Caller must free the returned string with `sd_free_string`
#[no_mangle]
pub unsafe extern "C" fn sd_report_cell(
    report: *const SdReport,
    row: usize,
    col: usize,
) -> *mut c_char {
    if report.is_null() {
        return ptr::null_mut();
    }

    (&(*report).inner.table.rows)
        .get(row)
        .and_then(|r| r.cells.get(col))
        .and_then(|c| CString::new(c.to_string_value()).ok())
        .map(|s| s.into_raw())
        .unwrap_or(ptr::null_mut())
}

/// Check whether a report row has any differing cell
///
/// # Safety
/// - `report` must be a valid pointer returned by a compare function
/// - Returns false if row is out of bounds
#[no_mangle]
pub unsafe extern "C" fn sd_report_row_has_diff(report: *const SdReport, row: usize) -> bool {
    if report.is_null() {
        return false;
    }
    (&(*report).inner.row_flags)
        .get(row)
        .copied()
        .unwrap_or(false)
}

/// Get a report's summary as a JSON string
///
/// # Safety
/// - `report` must be a valid pointer returned by a compare function
/// - Returns null on error
/// - Caller must free the returned string with `sd_free_string`
#[no_mangle]
pub unsafe extern "C" fn sd_report_summary_json(report: *const SdReport) -> *mut c_char {
    if report.is_null() {
        return ptr::null_mut();
    }

    serde_json::to_string(&(*report).inner.summary)
        .ok()
        .and_then(|json| CString::new(json).ok())
        .map(|s| s.into_raw())
        .unwrap_or(ptr::null_mut())
}

/// Free a string returned by other FFI functions
///
/// # Safety
/// - `s` must be a valid pointer returned by an sd_* function or null
#[no_mangle]
pub unsafe extern "C" fn sd_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn open_csv(dir: &std::path::Path, name: &str, content: &str) -> *mut SdTable {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        let c_path = CString::new(path.to_str().unwrap()).unwrap();
        unsafe { sd_table_open(c_path.as_ptr()) }
    }

    fn take_string(s: *mut c_char) -> String {
        assert!(!s.is_null());
        let owned = unsafe { CStr::from_ptr(s) }.to_str().unwrap().to_string();
        unsafe { sd_free_string(s) };
        owned
    }

    #[test]
    fn test_open_and_read_table() {
        let dir = tempfile::tempdir().unwrap();
        let table = open_csv(dir.path(), "t.csv", "name,age\nAlice,30\n");
        assert!(!table.is_null());

        unsafe {
            assert_eq!(sd_table_row_count(table), 1);
            assert_eq!(sd_table_col_count(table), 2);
            assert_eq!(take_string(sd_table_col_name(table, 0)), "name");
            assert_eq!(take_string(sd_table_cell(table, 0, 1)), "30");
            assert!(sd_table_cell(table, 5, 0).is_null());
            sd_table_free(table);
        }
    }

    #[test]
    fn test_auto_compare_flags_changed_row() {
        let dir = tempfile::tempdir().unwrap();
        let left = open_csv(dir.path(), "a.csv", "name,age\nAlice,30\nBob,25\n");
        let right = open_csv(dir.path(), "b.csv", "name,age\nAlice,30\nBobby,25\n");

        unsafe {
            let report = sd_compare(left, right);
            assert!(!report.is_null());
            assert_eq!(sd_report_row_count(report), 2);
            assert_eq!(sd_report_col_count(report), 5);
            assert!(!sd_report_row_has_diff(report, 0));
            assert!(sd_report_row_has_diff(report, 1));

            let summary = take_string(sd_report_summary_json(report));
            let value: serde_json::Value = serde_json::from_str(&summary).unwrap();
            assert_eq!(value["rows_with_differences"], 1);

            sd_report_free(report);
            sd_table_free(left);
            sd_table_free(right);
        }
    }

    #[test]
    fn test_mapped_compare_after_editing_draft() {
        let dir = tempfile::tempdir().unwrap();
        let left = open_csv(dir.path(), "a.csv", "name\nAlice\n");
        let right = open_csv(dir.path(), "b.csv", "full_name\nAlicia\n");

        unsafe {
            // Headers differ, so the direct compare refuses
            assert!(sd_compare(left, right).is_null());

            let mapping = sd_mapping_new();
            let source = CString::new("name").unwrap();
            let target = CString::new("full_name").unwrap();
            let bogus_src = CString::new("bogus").unwrap();
            let bogus_tgt = CString::new("nowhere").unwrap();

            let keep_id = take_string(sd_mapping_add(mapping, source.as_ptr(), target.as_ptr()));
            let drop_id =
                take_string(sd_mapping_add(mapping, bogus_src.as_ptr(), bogus_tgt.as_ptr()));
            assert_eq!(sd_mapping_len(mapping), 2);

            let drop_id_c = CString::new(drop_id).unwrap();
            assert!(sd_mapping_remove(mapping, drop_id_c.as_ptr()));
            assert!(!sd_mapping_remove(mapping, drop_id_c.as_ptr()));
            assert_eq!(sd_mapping_len(mapping), 1);
            let keep_id_c = CString::new(keep_id).unwrap();
            assert!(Uuid::parse_str(keep_id_c.to_str().unwrap()).is_ok());

            let report = sd_compare_mapped(left, right, mapping);
            assert!(!report.is_null());
            assert!(sd_report_row_has_diff(report, 0));
            let cell = take_string(sd_report_cell(report, 0, 1));
            assert_eq!(cell, "Alice --> Alicia");

            sd_report_free(report);
            sd_mapping_free(mapping);
            sd_table_free(left);
            sd_table_free(right);
        }
    }

    #[test]
    fn test_null_inputs_are_rejected() {
        unsafe {
            assert!(sd_table_open(ptr::null()).is_null());
            assert_eq!(sd_table_row_count(ptr::null()), 0);
            assert!(sd_compare(ptr::null(), ptr::null()).is_null());
            assert!(!sd_mapping_remove(ptr::null_mut(), ptr::null()));
            assert!(sd_report_summary_json(ptr::null()).is_null());
            sd_table_free(ptr::null_mut());
            sd_free_string(ptr::null_mut());
        }
    }
}
