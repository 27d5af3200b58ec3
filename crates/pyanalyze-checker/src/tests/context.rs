use super::*;
use pyanalyze_ast::Parser;
use pyanalyze_binder::Binder;
use pyanalyze_types::{InferredTypeAggregator, TypeArena};

fn fresh(source: &str) -> (BoundModule, Interner, TypeArena) {
    let module = Parser::new(source).parse_module().expect("source parses");
    let mut interner = Interner::new();
    let mut types = TypeArena::new();
    let _ = Builtins::install(&mut types, &mut interner);
    let bound = Binder::new(&mut interner).bind_module(&module);
    (bound, interner, types)
}

#[test]
fn unconfigured_rule_codes_always_report() {
    let (bound, mut interner, mut types) = fresh("x = 1\n");
    let builtins = Builtins::install(&mut types, &mut interner);
    let options = AnalyzerOptions::default();
    let mut aggregator = InferredTypeAggregator::new();
    let mut returns = InferredTypeAggregator::new();
    let mut classes = FxHashMap::default();
    let mut functions = FxHashMap::default();
    let mut type_vars = FxHashMap::default();
    let mut ctx = CheckerContext::new(
        "a.py", &mut interner, &mut types, &bound, &builtins, &options, &mut aggregator, &mut returns, &mut classes,
        &mut functions, &mut type_vars,
    );
    ctx.error(codes::NOT_DEFINED, Span::new(0, 1), "x is not defined");
    assert_eq!(ctx.diagnostics.len(), 1);
}

#[test]
fn rule_severity_none_suppresses_the_diagnostic() {
    let (bound, mut interner, mut types) = fresh("x = 1\n");
    let builtins = Builtins::install(&mut types, &mut interner);
    let mut options = AnalyzerOptions::default();
    options.rule_severities.set("reportOptionalMemberAccess", RuleSeverity::None);
    let mut aggregator = InferredTypeAggregator::new();
    let mut returns = InferredTypeAggregator::new();
    let mut classes = FxHashMap::default();
    let mut functions = FxHashMap::default();
    let mut type_vars = FxHashMap::default();
    let mut ctx = CheckerContext::new(
        "a.py", &mut interner, &mut types, &bound, &builtins, &options, &mut aggregator, &mut returns, &mut classes,
        &mut functions, &mut type_vars,
    );
    ctx.error(codes::OPTIONAL_ACCESS, Span::new(0, 1), "x is possibly None");
    assert!(ctx.diagnostics.is_empty());
}
