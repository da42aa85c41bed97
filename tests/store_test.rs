use std::fs;

use chrono::{Local, TimeZone};
use nesy::store::ProgramStore;

#[test]
fn program_file_is_named_by_timestamp() {
    let dir = tempfile::tempdir().unwrap();
    let store = ProgramStore::new(dir.path().join("prolog_programs"));
    let at = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();

    let path = store.save("solve(x) :- true.", at).unwrap();
    assert_eq!(path.file_name().unwrap(), "problem_20240309_140507.pl");
    assert_eq!(fs::read_to_string(&path).unwrap(), "solve(x) :- true.");
}

#[test]
fn same_second_saves_never_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let store = ProgramStore::new(dir.path());
    let at = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();

    let first = store.save("first.", at).unwrap();
    let second = store.save("second.", at).unwrap();
    assert_ne!(first, second);
    assert_eq!(second.file_name().unwrap(), "problem_20240309_140507_1.pl");
    assert_eq!(fs::read_to_string(&first).unwrap(), "first.");
    assert_eq!(fs::read_to_string(&second).unwrap(), "second.");
    assert_eq!(store.list(), vec![first, second]);
}
