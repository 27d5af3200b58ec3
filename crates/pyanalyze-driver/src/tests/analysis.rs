use super::*;
use pyanalyze_checker::Builtins;

fn fresh() -> (Interner, TypeArena, Builtins, AnalyzerOptions) {
    let mut interner = Interner::new();
    let mut types = TypeArena::new();
    let builtins = Builtins::install(&mut types, &mut interner);
    (interner, types, builtins, AnalyzerOptions::default())
}

#[test]
fn analyzing_a_clean_file_clears_the_dirty_flag() {
    let mut file = FileAnalysis::new(PathBuf::from("a.py"), "x = 1\n".to_string());
    let (mut interner, mut types, builtins, options) = fresh();
    file.analyze(&mut interner, &mut types, &builtins, &options);
    assert!(!file.dirty);
    assert!(file.checked.as_ref().unwrap().diagnostics.is_empty());
}

#[test]
fn a_parse_error_is_recorded_without_a_panic() {
    let mut file = FileAnalysis::new(PathBuf::from("a.py"), "def (:\n".to_string());
    let (mut interner, mut types, builtins, options) = fresh();
    file.analyze(&mut interner, &mut types, &builtins, &options);
    assert!(file.parse_error.is_some());
}

#[test]
fn mutually_recursive_functions_converge_within_the_pass_bound() {
    let source = "def a(n):\n    return b(n)\n\ndef b(n):\n    return a(n) + 1\n";
    let mut file = FileAnalysis::new(PathBuf::from("a.py"), source.to_string());
    let (mut interner, mut types, builtins, options) = fresh();
    file.analyze(&mut interner, &mut types, &builtins, &options);
    assert!(file.last_pass_count < options.analysis_pass_bound(), "expected convergence before the pass bound");
}

#[test]
fn editing_a_file_invalidates_its_previous_identity_maps() {
    let mut file = FileAnalysis::new(PathBuf::from("a.py"), "class C:\n    pass\n".to_string());
    let (mut interner, mut types, builtins, options) = fresh();
    file.analyze(&mut interner, &mut types, &builtins, &options);
    assert!(!file.class_ids.is_empty());
    file.set_source("x = 1\n".to_string());
    assert!(file.class_ids.is_empty());
    assert!(file.dirty);
}
