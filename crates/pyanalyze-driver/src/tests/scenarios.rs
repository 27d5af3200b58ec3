//! End-to-end scenarios that exercise a whole small program through
//! `FileAnalysis::analyze`, rather than one checker rule in isolation:
//! narrowing through a ternary, optional-attribute access, generic
//! inference, override compatibility, overload dispatch, and convergence
//! under mutual recursion.

use std::path::PathBuf;

use pyanalyze_ast::{ExprKind, Module, Node, NodeId};
use pyanalyze_checker::Builtins;
use pyanalyze_common::{AnalyzerOptions, Interner, diagnostics::codes};
use pyanalyze_types::{TypeArena, TypeId};

use crate::analysis::FileAnalysis;

fn analyzed(source: &str) -> (FileAnalysis, TypeArena) {
    let mut file = FileAnalysis::new(PathBuf::from("a.py"), source.to_string());
    let mut interner = Interner::new();
    let mut types = TypeArena::new();
    let builtins = Builtins::install(&mut types, &mut interner);
    let options = AnalyzerOptions::default();
    file.analyze(&mut interner, &mut types, &builtins, &options);
    (file, types)
}

/// Finds every `Call` node whose callee is `name`, in source order.
fn calls_named(module: &Module, name: &str) -> Vec<NodeId> {
    let mut out = Vec::new();
    for i in 0..module.arena.len() {
        let id = NodeId(i as u32);
        let Node::Expr(expr) = module.arena.get(id) else { continue };
        let ExprKind::Call { func, .. } = &expr.kind else { continue };
        let matches = match &module.arena.expr(*func).kind {
            ExprKind::Name(n) => n == name,
            ExprKind::Attribute { attr, .. } => attr == name,
            _ => false,
        };
        if matches {
            out.push(id);
        }
    }
    out
}

fn call_args(module: &Module, call: NodeId) -> Vec<NodeId> {
    match &module.arena.expr(call).kind {
        ExprKind::Call { args, .. } => args.clone(),
        _ => panic!("{call:?} is not a call"),
    }
}

#[test]
fn isinstance_narrows_a_union_argument_through_a_ternary() {
    let source = "def f(x: int | str) -> int:\n    return x if isinstance(x, int) else len(x)\n";
    let (file, _types) = analyzed(source);
    let checked = file.checked.as_ref().unwrap();
    assert!(checked.diagnostics.is_empty(), "unexpected diagnostics: {:?}", checked.diagnostics);

    let len_call = calls_named(&checked.module, "len")[0];
    let arg = call_args(&checked.module, len_call)[0];
    assert_eq!(checked.expr_types[&arg], TypeId::STR);
}

#[test]
fn optional_attribute_access_is_flagged_but_the_call_still_resolves_its_return_type() {
    let source = "def g(x: str | None) -> int:\n    return x.find('a')\n";
    let (file, _types) = analyzed(source);
    let checked = file.checked.as_ref().unwrap();
    assert!(checked.diagnostics.iter().any(|d| d.code == codes::OPTIONAL_ACCESS), "expected an optional-access diagnostic, got {:?}", checked.diagnostics);

    let find_call = calls_named(&checked.module, "find")[0];
    assert_eq!(checked.expr_types[&find_call], TypeId::INT);
}

#[test]
fn a_generic_function_called_with_a_mismatched_element_type_is_flagged_at_the_assignment() {
    let source = "T = TypeVar('T')\n\ndef first(xs: list[T]) -> T:\n    return xs[0]\n\ny: int = first(['a'])\n";
    let (file, _types) = analyzed(source);
    let checked = file.checked.as_ref().unwrap();
    assert!(checked.diagnostics.iter().any(|d| d.code == codes::ARGUMENT_MISMATCH), "expected an argument-mismatch diagnostic, got {:?}", checked.diagnostics);
}

#[test]
fn a_narrower_override_is_flagged_incompatible() {
    let source = "class A:\n    def m(self, x: int) -> int:\n        return x\n\nclass B(A):\n    def m(self, x: str) -> int:\n        return 0\n";
    let (file, _types) = analyzed(source);
    let checked = file.checked.as_ref().unwrap();
    assert!(
        checked.diagnostics.iter().any(|d| d.code == codes::INCOMPATIBLE_OVERRIDE),
        "expected an incompatible-override diagnostic, got {:?}",
        checked.diagnostics
    );
}

#[test]
fn overload_resolution_picks_the_matching_signature_and_rejects_the_rest() {
    let source = "\
@overload
def h(x: int) -> int: ...

@overload
def h(x: str) -> str: ...

def h(x):
    return x

a = h(1)
b = h(1.0)
";
    let (file, _types) = analyzed(source);
    let checked = file.checked.as_ref().unwrap();

    let h_calls = calls_named(&checked.module, "h");
    assert_eq!(h_calls.len(), 2);
    assert_eq!(checked.expr_types[&h_calls[0]], TypeId::INT);

    assert!(
        checked.diagnostics.iter().any(|d| d.code == codes::OVERLOAD_NO_MATCH),
        "expected an overload-no-match diagnostic for the float argument, got {:?}",
        checked.diagnostics
    );
}

#[test]
fn mutually_recursive_functions_infer_int_returns() {
    let source = "def a(n):\n    return b(n)\n\ndef b(n):\n    return a(n) + 1\n";
    let (file, _types) = analyzed(source);
    assert!(file.last_pass_count < AnalyzerOptions::default().analysis_pass_bound(), "expected convergence before the pass bound");

    let checked = file.checked.as_ref().unwrap();
    let call_to_b = calls_named(&checked.module, "b")[0];
    let call_to_a = calls_named(&checked.module, "a")[0];
    assert_eq!(checked.expr_types[&call_to_b], TypeId::INT);
    assert_eq!(checked.expr_types[&call_to_a], TypeId::INT);
}
