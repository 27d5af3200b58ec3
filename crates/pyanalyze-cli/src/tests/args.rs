use super::*;

#[test]
fn defaults_have_no_project_override_and_no_files() {
    let args = CliArgs::parse_from(["pyanalyze"]);
    assert!(args.project.is_none());
    assert!(args.files.is_empty());
    assert!(!args.strict);
}

#[test]
fn positional_files_and_strict_flag_parse_together() {
    let args = CliArgs::parse_from(["pyanalyze", "--strict", "a.py", "b.py"]);
    assert!(args.strict);
    assert_eq!(args.files, vec![PathBuf::from("a.py"), PathBuf::from("b.py")]);
}

#[test]
fn project_and_config_flags_parse() {
    let args = CliArgs::parse_from(["pyanalyze", "-p", "proj", "--config", "proj/custom.json"]);
    assert_eq!(args.project, Some(PathBuf::from("proj")));
    assert_eq!(args.config, Some(PathBuf::from("proj/custom.json")));
}
