use super::*;
use pyanalyze_ast::Parser;
use pyanalyze_common::Interner;

fn bind(source: &str) -> (BoundModule, Interner) {
    let module = Parser::new(source).parse_module().expect("source parses");
    let mut interner = Interner::new();
    let bound = Binder::new(&mut interner).bind_module(&module);
    (bound, interner)
}

#[test]
fn module_level_assignment_declares_a_variable() {
    let (bound, mut interner) = bind("x = 1\n");
    let atom = interner.intern("x");
    let symbol = bound.scopes.resolve(bound.module_scope, atom).expect("x is bound");
    assert!(bound.symbol(symbol).flags.has(SymbolFlags::VARIABLE));
}

#[test]
fn function_parameters_are_scoped_to_the_function() {
    let (bound, mut interner) = bind("def f(x):\n    return x\n");
    let f_atom = interner.intern("f");
    let f_symbol = bound.scopes.resolve(bound.module_scope, f_atom).unwrap();
    assert!(bound.symbol(f_symbol).flags.has(SymbolFlags::FUNCTION));
    assert!(bound.scopes.resolve(bound.module_scope, interner.intern("x")).is_none());
}

#[test]
fn functions_are_hoisted_for_forward_reference() {
    let (bound, mut interner) = bind("def a():\n    return b()\n\ndef b():\n    return 1\n");
    let atom = interner.intern("b");
    assert!(bound.scopes.resolve(bound.module_scope, atom).is_some());
}

#[test]
fn class_body_scope_is_not_visible_to_nested_functions() {
    let (bound, mut interner) = bind(
        "class C:\n    x = 1\n    def m(self):\n        return x\n",
    );
    let class_atom = interner.intern("C");
    let class_symbol = bound.scopes.resolve(bound.module_scope, class_atom).unwrap();
    assert!(bound.symbol(class_symbol).flags.has(SymbolFlags::CLASS));
}

#[test]
fn global_statement_redirects_assignment_to_module_scope() {
    let (bound, mut interner) = bind("x = 1\ndef f():\n    global x\n    x = 2\n");
    let atom = interner.intern("x");
    let module_symbol = bound.scopes.resolve(bound.module_scope, atom).unwrap();
    assert_eq!(bound.symbol(module_symbol).declarations.len(), 2);
}

#[test]
fn walrus_inside_comprehension_binds_in_enclosing_scope() {
    let (bound, mut interner) = bind("result = [y for x in range(3) if (y := x)]\n");
    let atom = interner.intern("y");
    assert!(bound.scopes.resolve(bound.module_scope, atom).is_some());
}

#[test]
fn comprehension_target_does_not_leak_into_enclosing_scope() {
    let (bound, mut interner) = bind("result = [x for x in range(3)]\n");
    let atom = interner.intern("x");
    assert!(bound.scopes.resolve(bound.module_scope, atom).is_none());
}

#[test]
fn import_binds_the_top_level_package_name() {
    let (bound, mut interner) = bind("import os.path\n");
    let atom = interner.intern("os");
    let symbol = bound.scopes.resolve(bound.module_scope, atom).unwrap();
    assert!(bound.symbol(symbol).flags.has(SymbolFlags::IMPORT));
}

#[test]
fn annotated_assignment_records_the_declared_annotation() {
    let (bound, mut interner) = bind("x: int = 1\n");
    let atom = interner.intern("x");
    let symbol = bound.scopes.resolve(bound.module_scope, atom).unwrap();
    assert!(bound.symbol(symbol).declared_type_annotation.is_some());
}

#[test]
fn del_marks_the_symbol_unbound() {
    let (bound, mut interner) = bind("x = 1\ndel x\n");
    let atom = interner.intern("x");
    let symbol = bound.scopes.resolve(bound.module_scope, atom).unwrap();
    assert!(bound.symbol(symbol).flags.has(SymbolFlags::UNBOUND));
}
