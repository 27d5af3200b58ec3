use super::*;
use pyanalyze_ast::Parser;

fn fresh_state() -> (Interner, TypeArena) {
    (Interner::new(), TypeArena::new())
}

#[test]
fn checking_an_undefined_name_reports_it() {
    let module = Parser::new("print(undefined_name)\n").parse_module().expect("parses");
    let (mut interner, mut types) = fresh_state();
    let builtins = Builtins::install(&mut types, &mut interner);
    let options = AnalyzerOptions::default();
    let mut aggregator = InferredTypeAggregator::new();
    let mut returns = InferredTypeAggregator::new();
    let mut classes = FxHashMap::default();
    let mut functions = FxHashMap::default();
    let mut type_vars = FxHashMap::default();
    let result = check_module(
        "a.py", &module, &mut interner, &mut types, &builtins, &options, &mut aggregator, &mut returns, &mut classes,
        &mut functions, &mut type_vars,
    );
    assert!(result.diagnostics.iter().any(|d| d.code == pyanalyze_common::diagnostics::codes::NOT_DEFINED));
}

#[test]
fn checking_a_clean_module_produces_no_diagnostics() {
    let module = Parser::new("x = 1\ny = x + 1\n").parse_module().expect("parses");
    let (mut interner, mut types) = fresh_state();
    let builtins = Builtins::install(&mut types, &mut interner);
    let options = AnalyzerOptions::default();
    let mut aggregator = InferredTypeAggregator::new();
    let mut returns = InferredTypeAggregator::new();
    let mut classes = FxHashMap::default();
    let mut functions = FxHashMap::default();
    let mut type_vars = FxHashMap::default();
    let result = check_module(
        "a.py", &module, &mut interner, &mut types, &builtins, &options, &mut aggregator, &mut returns, &mut classes,
        &mut functions, &mut type_vars,
    );
    assert!(result.diagnostics.is_empty());
    assert!(result.bound.scopes.resolve(result.bound.module_scope, interner.intern("y")).is_some());
}
