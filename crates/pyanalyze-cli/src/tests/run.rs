use std::fs;
use std::path::PathBuf;

use tempfile::tempdir;

use super::*;
use crate::args::CliArgs;

fn args_for(project: PathBuf, strict: bool) -> CliArgs {
    CliArgs { files: Vec::new(), project: Some(project), config: None, strict, verbose: false }
}

#[test]
fn a_clean_project_exits_zero() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.py"), "x = 1\n").unwrap();
    let code = run(args_for(dir.path().to_path_buf(), false)).unwrap();
    assert_eq!(code, 0);
}

#[test]
fn an_undefined_name_is_only_a_warning_outside_strict_mode() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.py"), "undefined_name\n").unwrap();
    let code = run(args_for(dir.path().to_path_buf(), false)).unwrap();
    assert_eq!(code, 0);
}

#[test]
fn strict_mode_promotes_the_same_reference_to_an_error() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.py"), "undefined_name\n").unwrap();
    let code = run(args_for(dir.path().to_path_buf(), true)).unwrap();
    assert_eq!(code, 1);
}

#[test]
fn an_empty_project_directory_exits_zero() {
    let dir = tempdir().unwrap();
    let code = run(args_for(dir.path().to_path_buf(), false)).unwrap();
    assert_eq!(code, 0);
}
