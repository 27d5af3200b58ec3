use super::*;
use std::path::PathBuf;

fn p(name: &str) -> PathBuf {
    PathBuf::from(name)
}

#[test]
fn a_file_with_no_cycle_reports_none() {
    let mut graph = ImportGraph::new();
    graph.set_imports(&p("a.py"), FxHashSet::from_iter([p("b.py")]));
    graph.set_imports(&p("b.py"), FxHashSet::default());
    assert!(graph.cycles_from(&p("a.py")).is_empty());
}

#[test]
fn a_direct_cycle_is_detected() {
    let mut graph = ImportGraph::new();
    graph.set_imports(&p("a.py"), FxHashSet::from_iter([p("b.py")]));
    graph.set_imports(&p("b.py"), FxHashSet::from_iter([p("a.py")]));
    let cycles = graph.cycles_from(&p("a.py"));
    assert_eq!(cycles.len(), 1);
    assert_eq!(cycles[0], vec![p("a.py"), p("b.py")]);
}

#[test]
fn reimporting_a_file_updates_dependents_of_the_old_target() {
    let mut graph = ImportGraph::new();
    graph.set_imports(&p("a.py"), FxHashSet::from_iter([p("b.py")]));
    assert_eq!(graph.dependents_of(&p("b.py")), vec![p("a.py")]);
    graph.set_imports(&p("a.py"), FxHashSet::from_iter([p("c.py")]));
    assert!(graph.dependents_of(&p("b.py")).is_empty());
    assert_eq!(graph.dependents_of(&p("c.py")), vec![p("a.py")]);
}
