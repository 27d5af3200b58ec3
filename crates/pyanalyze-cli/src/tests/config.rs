use std::path::PathBuf;

use pyanalyze_common::RuleSeverity;

use super::*;

#[test]
fn a_missing_config_file_loads_as_the_default() {
    let config = ProjectConfig::load_or_default(&PathBuf::from("/nonexistent/pyanalyze.json")).unwrap();
    assert!(config.include.is_empty());
    assert!(!config.into_analyzer_options(false).strict);
}

#[test]
fn an_explicit_rule_severity_is_applied() {
    let json = r#"{"ruleSeverities": {"reportUnusedImport": "error"}}"#;
    let config: ProjectConfig = serde_json::from_str(json).unwrap();
    let options = config.into_analyzer_options(false);
    assert_eq!(options.rule_severities.severity_of("reportUnusedImport"), RuleSeverity::Error);
}

#[test]
fn a_nonempty_strict_list_turns_on_strict_mode() {
    let json = r#"{"strict": ["src/**"]}"#;
    let config: ProjectConfig = serde_json::from_str(json).unwrap();
    assert!(config.into_analyzer_options(false).strict);
}

#[test]
fn the_strict_cli_flag_forces_strict_mode_even_with_an_empty_config() {
    let config = ProjectConfig::default();
    assert!(config.into_analyzer_options(true).strict);
}

#[test]
fn an_unknown_rule_name_is_ignored_rather_than_erroring() {
    let json = r#"{"ruleSeverities": {"notARealRule": "error"}}"#;
    let config: ProjectConfig = serde_json::from_str(json).unwrap();
    // Just asserting this doesn't panic is the point; there's no public
    // way to enumerate configured overrides to assert against directly.
    let _ = config.into_analyzer_options(false);
}
