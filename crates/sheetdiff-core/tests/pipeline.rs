use std::fs;
use std::path::Path;

use sheetdiff_core::{
    diff, finalize_mapping, load_table, reconcile, save_report, MappingDraft, MappingFile,
    Reconciliation, ReportFormat, SessionStore,
};

fn write_file(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

// -------------------------------------------------------------------------
// Automatic path: identical headers
// -------------------------------------------------------------------------

#[test]
fn csv_auto_compare_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let left_path = write_file(dir.path(), "left.csv", "name,age\nAlice,30\nBob,25\n");
    let right_path = write_file(dir.path(), "right.csv", "name,age\nAlice,30\nBobby,25\n");

    let left = load_table(&left_path).unwrap();
    let right = load_table(&right_path).unwrap();

    let compare_columns = match reconcile(&left, &right) {
        Reconciliation::Auto { compare_columns } => compare_columns,
        Reconciliation::Manual => panic!("identical headers must reconcile automatically"),
    };
    assert_eq!(compare_columns, vec!["name", "age"]);

    let report = diff(&left, &right, &compare_columns).unwrap();
    assert_eq!(report.summary.rows_with_differences, 1);

    let out_path = dir.path().join("report.csv");
    save_report(&report, &out_path, ReportFormat::Csv).unwrap();

    let written = fs::read_to_string(&out_path).unwrap();
    let mut lines = written.lines();
    assert_eq!(lines.next().unwrap(), "name,age,name_diff,age_diff,diff_status");
    assert_eq!(lines.next().unwrap(), "Alice,30,,,no_difference");
    assert_eq!(lines.next().unwrap(), "Bob,25,Bob --> Bobby,,has_difference");
}

// -------------------------------------------------------------------------
// Manual path: differing headers through a session-held draft
// -------------------------------------------------------------------------

#[test]
fn manual_mapping_session_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let left_path = write_file(
        dir.path(),
        "left.csv",
        "name,dept\nAlice,Sales\nBob,Engineering\n",
    );
    let right_path = write_file(
        dir.path(),
        "right.csv",
        "full_name,department,hired\nAlice,Sales,2020\nBob,Marketing,2021\n",
    );

    let left = load_table(&left_path).unwrap();
    let right = load_table(&right_path).unwrap();
    assert_eq!(reconcile(&left, &right), Reconciliation::Manual);

    let mut sessions = SessionStore::new();
    let session = sessions.create();
    {
        let draft = sessions.draft_mut(session).unwrap();
        draft.add_entry("name", "full_name");
        draft.add_entry("dept", "department");
    }
    let draft = sessions.end(session).unwrap();

    let finalized = finalize_mapping(&left, &right, &draft).unwrap();
    assert_eq!(finalized.compare_columns, vec!["name", "dept"]);
    assert_eq!(finalized.projected.header_names(), vec!["name", "dept"]);

    let report = diff(&left, &finalized.projected, &finalized.compare_columns).unwrap();
    assert_eq!(report.row_flags, vec![false, true]);

    let dept_diff = report.table.column_index("dept_diff").unwrap();
    assert_eq!(
        report.table.rows[1].cells[dept_diff].to_string_value(),
        "Engineering --> Marketing"
    );
}

// -------------------------------------------------------------------------
// Cross-format: CSV on one side, XLSX on the other
// -------------------------------------------------------------------------

#[test]
fn csv_versus_xlsx_with_same_data_is_clean() {
    let dir = tempfile::tempdir().unwrap();
    let left_path = write_file(dir.path(), "left.csv", "id,amount\n1,10.5\n2,20\n");

    let left = load_table(&left_path).unwrap();
    let xlsx_path = dir.path().join("right.xlsx");
    sheetdiff_core::export_xlsx(&left, &xlsx_path, "data").unwrap();
    let right = load_table(&xlsx_path).unwrap();

    let compare_columns = match reconcile(&left, &right) {
        Reconciliation::Auto { compare_columns } => compare_columns,
        Reconciliation::Manual => panic!("round-tripped headers must match"),
    };

    let report = diff(&left, &right, &compare_columns).unwrap();
    assert!(!report.has_differences(), "values must survive the round trip");
}

// -------------------------------------------------------------------------
// JSON report export
// -------------------------------------------------------------------------

#[test]
fn json_report_carries_meta_and_summary() {
    let dir = tempfile::tempdir().unwrap();
    let left_path = write_file(dir.path(), "left.csv", "v\n1\n2\n");
    let right_path = write_file(dir.path(), "right.csv", "v\n1\n3\n");

    let left = load_table(&left_path).unwrap();
    let right = load_table(&right_path).unwrap();
    let report = diff(&left, &right, &["v".to_string()]).unwrap();

    let out_path = dir.path().join("report.json");
    save_report(&report, &out_path, ReportFormat::Json).unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&out_path).unwrap()).unwrap();
    assert_eq!(
        value["meta"]["engine_version"],
        env!("CARGO_PKG_VERSION")
    );
    assert_eq!(value["summary"]["rows_compared"], 2);
    assert_eq!(value["summary"]["rows_with_differences"], 1);
    assert_eq!(value["summary"]["per_column"]["v"], 1);
    assert_eq!(value["compare_columns"][0], "v");
}

// -------------------------------------------------------------------------
// Mapping persistence
// -------------------------------------------------------------------------

#[test]
fn mapping_file_round_trip_drives_finalize() {
    let dir = tempfile::tempdir().unwrap();
    let left_path = write_file(dir.path(), "left.csv", "name\nAlice\n");
    let right_path = write_file(dir.path(), "right.csv", "full_name\nAlicia\n");

    let mut file = MappingFile::new();
    file.add_pair("name", "full_name");
    let map_path = dir.path().join("mapping.json");
    file.save(&map_path).unwrap();

    let loaded = MappingFile::load(&map_path).unwrap();
    let draft: MappingDraft = loaded.to_draft();
    assert_eq!(draft.len(), 1);

    let left = load_table(&left_path).unwrap();
    let right = load_table(&right_path).unwrap();
    let finalized = finalize_mapping(&left, &right, &draft).unwrap();
    let report = diff(&left, &finalized.projected, &finalized.compare_columns).unwrap();

    assert_eq!(report.row_flags, vec![true]);
    let name_diff = report.table.column_index("name_diff").unwrap();
    assert_eq!(
        report.table.rows[0].cells[name_diff].to_string_value(),
        "Alice --> Alicia"
    );
}
