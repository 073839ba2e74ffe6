mod common;

use common::{student_workbook, write_workbook};
use roster_notify::core::roster::{load_roster, select_zero_completion};
use roster_notify::core::{RosterRow, RosterSource};
use roster_notify::NotifyError;
use tempfile::TempDir;

const HEADERS: [&str; 3] = ["Name", "Email", "Percentage"];

#[test]
fn test_zero_percentage_students_are_selected() {
    let bytes = student_workbook(
        &HEADERS,
        &[("Alice", "a@x.com", Some(0.0)), ("Bob", "b@x.com", Some(50.0))],
    );
    let source = RosterSource::bytes("students.xlsx", bytes);

    let selected = select_zero_completion(&source).unwrap();

    assert_eq!(selected, vec![RosterRow::new("Alice", "a@x.com", Some(0.0))]);
}

#[test]
fn test_missing_percentage_column_is_a_schema_error() {
    let bytes = student_workbook(&["Name", "Email"], &[("Alice", "a@x.com", Some(0.0))]);
    let source = RosterSource::bytes("students.xlsx", bytes);

    match select_zero_completion(&source) {
        Err(NotifyError::Schema { missing }) => assert_eq!(missing, vec!["Percentage".to_string()]),
        other => panic!("expected schema error, got {:?}", other),
    }
}

#[test]
fn test_every_missing_column_is_named() {
    let bytes = student_workbook(&["Student", "Score"], &[("Alice", "a@x.com", Some(0.0))]);
    let source = RosterSource::bytes("students.xlsx", bytes);

    let err = load_roster(&source).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Missing required columns: Name, Email, Percentage"
    );
}

#[test]
fn test_selection_preserves_source_order_and_excludes_near_zero() {
    let rows = [
        ("Zed", "z@x.com", Some(0.0)),
        ("Amy", "amy@x.com", Some(0.5)),
        ("Mo", "mo@x.com", None),
        ("Kai", "kai@x.com", Some(0.0)),
        ("Lee", "lee@x.com", Some(100.0)),
        ("Ann", "ann@x.com", Some(1e-9)),
        ("Bea", "bea@x.com", Some(0.0)),
    ];
    let source = RosterSource::bytes("students.xlsx", student_workbook(&HEADERS, &rows));

    let names: Vec<String> = select_zero_completion(&source)
        .unwrap()
        .into_iter()
        .map(|row| row.name)
        .collect();

    assert_eq!(names, vec!["Zed", "Kai", "Bea"]);
}

#[test]
fn test_full_roster_keeps_every_row() {
    let rows = [
        ("Alice", "a@x.com", Some(0.0)),
        ("Bob", "b@x.com", Some(50.0)),
        ("Carol", "c@x.com", None),
    ];
    let source = RosterSource::bytes("students.xlsx", student_workbook(&HEADERS, &rows));

    let roster = load_roster(&source).unwrap();

    assert_eq!(roster.len(), 3);
    assert_eq!(roster[1], RosterRow::new("Bob", "b@x.com", Some(50.0)));
    assert_eq!(roster[2].percentage, None);
}

#[test]
fn test_filtering_is_idempotent_on_disk() {
    let dir = TempDir::new().unwrap();
    let bytes = student_workbook(
        &["Email", "Percentage", "Cohort", "Name"],
        &[("Alice", "a@x.com", Some(0.0)), ("Bob", "b@x.com", Some(20.0)), ("Cy", "c@x.com", Some(0.0))],
    );
    let path = write_workbook(dir.path(), "students.xlsx", &bytes);
    let source = RosterSource::path(&path);

    let first = select_zero_completion(&source).unwrap();
    let second = select_zero_completion(&source).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
    assert_eq!(first[1], RosterRow::new("Cy", "c@x.com", Some(0.0)));
}

#[test]
fn test_no_zero_rows_is_an_empty_selection() {
    let source = RosterSource::bytes(
        "students.xlsx",
        student_workbook(&HEADERS, &[("Bob", "b@x.com", Some(50.0))]),
    );

    assert!(select_zero_completion(&source).unwrap().is_empty());
}

#[test]
fn test_csv_file_on_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("students.csv");
    std::fs::write(&path, "Name,Email,Percentage\nAlice,a@x.com,0\nBob,b@x.com,50\n").unwrap();

    let selected = select_zero_completion(&RosterSource::path(&path)).unwrap();

    assert_eq!(selected, vec![RosterRow::new("Alice", "a@x.com", Some(0.0))]);
}

#[test]
fn test_corrupt_workbook_is_reported() {
    let source = RosterSource::bytes("students.xlsx", b"definitely not a workbook".to_vec());

    assert!(matches!(
        load_roster(&source),
        Err(NotifyError::Workbook(_))
    ));
}

#[test]
fn test_names_that_look_numeric_stay_text() {
    let rows = [
        ("Nan", "nan@x.com", Some(0.0)),
        ("007", "bond@x.com", Some(0.0)),
        ("0042", "z@x.com", Some(0.0)),
        ("Infinity", "inf@x.com", Some(0.0)),
    ];
    let source = RosterSource::bytes("students.xlsx", student_workbook(&HEADERS, &rows));

    let names: Vec<String> = select_zero_completion(&source)
        .unwrap()
        .into_iter()
        .map(|row| row.name)
        .collect();

    assert_eq!(names, vec!["Nan", "007", "0042", "Infinity"]);
}

#[test]
fn test_csv_names_that_look_numeric_stay_text() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("students.csv");
    std::fs::write(
        &path,
        "Name,Email,Percentage\nNan,nan@x.com,0\n007,bond@x.com,0\nInf,inf@x.com,12\n",
    )
    .unwrap();

    let selected = select_zero_completion(&RosterSource::path(&path)).unwrap();

    assert_eq!(
        selected,
        vec![
            RosterRow::new("Nan", "nan@x.com", Some(0.0)),
            RosterRow::new("007", "bond@x.com", Some(0.0)),
        ]
    );
}
