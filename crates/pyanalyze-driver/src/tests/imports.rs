use super::*;
use pyanalyze_ast::Parser;

#[test]
fn absolute_import_resolves_to_a_known_module_file() {
    let module = Parser::new("import pkg.util\n").parse_module().expect("parses");
    let root = PathBuf::from("/proj");
    let known = FxHashSet::from_iter([PathBuf::from("/proj/pkg/util.py")]);
    let targets = collect_import_targets(&module, &PathBuf::from("/proj/main.py"), &root, &known);
    assert!(targets.contains(&PathBuf::from("/proj/pkg/util.py")));
}

#[test]
fn from_import_of_an_unknown_module_resolves_to_nothing() {
    let module = Parser::new("from os import path\n").parse_module().expect("parses");
    let root = PathBuf::from("/proj");
    let known = FxHashSet::default();
    let targets = collect_import_targets(&module, &PathBuf::from("/proj/main.py"), &root, &known);
    assert!(targets.is_empty());
}

#[test]
fn single_dot_relative_import_resolves_within_the_same_package() {
    let module = Parser::new("from . import sibling\n").parse_module().expect("parses");
    let root = PathBuf::from("/proj");
    let known = FxHashSet::from_iter([PathBuf::from("/proj/pkg/sibling.py")]);
    let targets = collect_import_targets(&module, &PathBuf::from("/proj/pkg/main.py"), &root, &known);
    assert!(targets.contains(&PathBuf::from("/proj/pkg/sibling.py")));
}
