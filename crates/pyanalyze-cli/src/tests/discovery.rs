use std::fs;

use tempfile::tempdir;

use super::*;

#[test]
fn finds_every_py_file_by_default() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.py"), "").unwrap();
    fs::create_dir(dir.path().join("pkg")).unwrap();
    fs::write(dir.path().join("pkg/b.py"), "").unwrap();
    fs::write(dir.path().join("readme.md"), "").unwrap();

    let files = collect_py_files(dir.path(), &[], &[], &[]);
    assert_eq!(files.len(), 2);
}

#[test]
fn exclude_patterns_drop_matching_files() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("tests")).unwrap();
    fs::write(dir.path().join("tests/test_a.py"), "").unwrap();
    fs::write(dir.path().join("main.py"), "").unwrap();

    let files = collect_py_files(dir.path(), &[], &["tests/**".to_string()], &[]);
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].file_name().unwrap(), "main.py");
}

#[test]
fn always_skipped_directories_are_never_descended_into() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join(".venv")).unwrap();
    fs::write(dir.path().join(".venv/lib.py"), "").unwrap();
    fs::write(dir.path().join("main.py"), "").unwrap();

    let files = collect_py_files(dir.path(), &[], &[], &[]);
    assert_eq!(files.len(), 1);
}
