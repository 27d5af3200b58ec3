use super::*;
use crate::builtins::Builtins;
use crate::context::CheckerContext;
use pyanalyze_ast::Parser;
use pyanalyze_binder::Binder;
use pyanalyze_common::{AnalyzerOptions, Interner};
use pyanalyze_types::{InferredTypeAggregator, Type, TypeArena};
use rustc_hash::FxHashMap;

fn check(source: &str) -> (TypeArena, CheckerState) {
    let module = Parser::new(source).parse_module().expect("source parses");
    let mut interner = Interner::new();
    let mut types = TypeArena::new();
    let builtins = Builtins::install(&mut types, &mut interner);
    let bound = Binder::new(&mut interner).bind_module(&module);
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
    StatementAnalyzer::new(&mut ctx).analyze_body(&module.arena, &module.body);
    let diagnostic_codes = ctx.diagnostics.iter().map(|d| d.code).collect();
    drop(ctx);
    (types, CheckerState { diagnostic_codes })
}

struct CheckerState {
    diagnostic_codes: Vec<u32>,
}

#[test]
fn simple_function_return_type_is_inferred_from_its_return_statement() {
    let module = Parser::new("def f():\n    return 1\n").parse_module().expect("parses");
    let mut interner = Interner::new();
    let mut types = TypeArena::new();
    let builtins = Builtins::install(&mut types, &mut interner);
    let bound = Binder::new(&mut interner).bind_module(&module);
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
    StatementAnalyzer::new(&mut ctx).analyze_body(&module.arena, &module.body);
    let scope = ctx.bound.module_scope;
    let atom = ctx.interner.intern("f");
    let symbol = ctx.bound.scopes.resolve(scope, atom).expect("f is declared");
    let shape_id = *ctx.function_shapes.get(&symbol).expect("f has a shape");
    assert!(matches!(types.get(types.function_shape(shape_id).return_type), Type::Literal(pyanalyze_types::LiteralValue::Int(1))));
}

#[test]
fn function_with_no_return_statement_returns_none() {
    let module = Parser::new("def f():\n    pass\n").parse_module().expect("parses");
    let mut interner = Interner::new();
    let mut types = TypeArena::new();
    let builtins = Builtins::install(&mut types, &mut interner);
    let bound = Binder::new(&mut interner).bind_module(&module);
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
    StatementAnalyzer::new(&mut ctx).analyze_body(&module.arena, &module.body);
    let scope = ctx.bound.module_scope;
    let atom = ctx.interner.intern("f");
    let symbol = ctx.bound.scopes.resolve(scope, atom).expect("f is declared");
    let shape_id = *ctx.function_shapes.get(&symbol).expect("f has a shape");
    assert_eq!(ctx.types.function_shape(shape_id).return_type, TypeId::NONE);
}

#[test]
fn annotated_assignment_checks_the_value_against_the_declared_type() {
    let (_types, state) = check("x: int = \"oops\"\n");
    assert!(state.diagnostic_codes.contains(&pyanalyze_common::diagnostics::codes::ARGUMENT_MISMATCH));
}

#[test]
fn if_else_branches_join_narrowed_types_back_together() {
    let (_types, state) = check("x = None\nif x is not None:\n    y = 1\nelse:\n    y = 2\n");
    assert!(state.diagnostic_codes.is_empty());
}

#[test]
fn class_method_resolves_self_to_an_instance_of_the_class() {
    let module = Parser::new("class C:\n    def get(self):\n        return self\n").parse_module().expect("parses");
    let mut interner = Interner::new();
    let mut types = TypeArena::new();
    let builtins = Builtins::install(&mut types, &mut interner);
    let bound = Binder::new(&mut interner).bind_module(&module);
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
    StatementAnalyzer::new(&mut ctx).analyze_body(&module.arena, &module.body);
    let scope = ctx.bound.module_scope;
    let class_atom = ctx.interner.intern("C");
    let class_symbol = ctx.bound.scopes.resolve(scope, class_atom).expect("C is declared");
    let class_id = *ctx.class_ids.get(&class_symbol).expect("C has a class id");
    let method_atom = ctx.interner.intern("get");
    let member = pyanalyze_types::look_up_class_member(&types, class_id, method_atom, pyanalyze_types::LookupFlags::default())
        .expect("get is a member");
    assert_eq!(member.kind, pyanalyze_types::MemberKind::Method);
}
