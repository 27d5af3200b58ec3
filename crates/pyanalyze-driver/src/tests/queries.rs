use std::path::PathBuf;

use pyanalyze_checker::Builtins;
use pyanalyze_common::{AnalyzerOptions, Interner, Position};
use pyanalyze_types::TypeArena;

use super::*;
use crate::analysis::FileAnalysis;

fn analyzed(source: &str) -> (FileAnalysis, Interner, TypeArena) {
    let mut file = FileAnalysis::new(PathBuf::from("a.py"), source.to_string());
    let mut interner = Interner::new();
    let mut types = TypeArena::new();
    let builtins = Builtins::install(&mut types, &mut interner);
    let options = AnalyzerOptions::default();
    file.analyze(&mut interner, &mut types, &builtins, &options);
    (file, interner, types)
}

#[test]
fn hover_on_a_literal_renders_its_inferred_type() {
    let source = "x = 1\n";
    let (file, interner, types) = analyzed(source);
    let checked = file.checked.as_ref().unwrap();
    let result = hover(checked, &interner, &types, source, Position::new(0, 4));
    assert_eq!(result.as_deref(), Some("Literal[1]"));
}

#[test]
fn hover_past_the_end_of_the_file_finds_nothing() {
    let source = "x = 1\n";
    let (file, interner, types) = analyzed(source);
    let checked = file.checked.as_ref().unwrap();
    let result = hover(checked, &interner, &types, source, Position::new(5, 0));
    assert!(result.is_none());
}

#[test]
fn definition_of_a_use_points_back_to_its_assignment() {
    let source = "x = 1\nx\n";
    let (file, mut interner, _types) = analyzed(source);
    let checked = file.checked.as_ref().unwrap();
    let spans = definition(checked, &mut interner, source, Position::new(1, 0));
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].start, 0);
}

#[test]
fn completions_at_module_scope_include_every_declared_name() {
    let source = "x = 1\ndef f():\n    pass\n";
    let (file, interner, _types) = analyzed(source);
    let checked = file.checked.as_ref().unwrap();
    let names = completions(checked, &interner, source, Position::new(2, 4));
    assert!(names.contains(&"x".to_string()));
    assert!(names.contains(&"f".to_string()));
}
