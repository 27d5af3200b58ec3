use std::path::PathBuf;
use std::time::Duration;

use super::*;

#[test]
fn a_freshly_added_file_is_checked_on_the_next_pass() {
    let mut project = ProjectAnalyzer::new(PathBuf::from("/proj"), AnalyzerOptions::default());
    project.set_file(PathBuf::from("/proj/a.py"), "x = 1\n".to_string());
    let produced = project.analyze_pending(Duration::from_millis(200));
    assert!(produced.contains_key(&PathBuf::from("/proj/a.py")));
    assert!(!project.file(&PathBuf::from("/proj/a.py")).unwrap().dirty);
}

#[test]
fn editing_a_module_marks_its_importer_dirty_again() {
    let mut project = ProjectAnalyzer::new(PathBuf::from("/proj"), AnalyzerOptions::default());
    project.set_file(PathBuf::from("/proj/lib.py"), "def helper():\n    return 1\n".to_string());
    project.set_file(PathBuf::from("/proj/main.py"), "from lib import helper\nhelper()\n".to_string());
    project.analyze_pending(Duration::from_millis(200));
    assert!(!project.file(&PathBuf::from("/proj/main.py")).unwrap().dirty);

    project.set_file(PathBuf::from("/proj/lib.py"), "def helper():\n    return 1\n\ndef another():\n    pass\n".to_string());
    project.analyze_pending(Duration::from_millis(200));
    // `lib.py`'s exports changed, so `main.py` should have been pulled back
    // in even though nobody edited it directly.
    assert_eq!(project.file(&PathBuf::from("/proj/main.py")).unwrap().version, 2);
}

#[test]
fn a_direct_import_cycle_is_reported() {
    let mut project = ProjectAnalyzer::new(PathBuf::from("/proj"), AnalyzerOptions::default());
    project.set_file(PathBuf::from("/proj/a.py"), "from b import y\n".to_string());
    project.set_file(PathBuf::from("/proj/b.py"), "from a import x\n".to_string());
    project.analyze_pending(Duration::from_millis(200));
    let cycles = project.import_cycles(&PathBuf::from("/proj/a.py"));
    assert_eq!(cycles.len(), 1);
}

#[test]
fn removing_a_file_drops_it_from_the_import_graph() {
    let mut project = ProjectAnalyzer::new(PathBuf::from("/proj"), AnalyzerOptions::default());
    project.set_file(PathBuf::from("/proj/a.py"), "from b import y\n".to_string());
    project.set_file(PathBuf::from("/proj/b.py"), "y = 1\n".to_string());
    project.analyze_pending(Duration::from_millis(200));
    project.remove_file(&PathBuf::from("/proj/a.py"));
    assert!(project.file(&PathBuf::from("/proj/a.py")).is_none());
    assert!(project.import_cycles(&PathBuf::from("/proj/b.py")).is_empty());
}
