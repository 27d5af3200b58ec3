//! Resolves `import`/`from ... import ...` statements to files already
//! known to the project. There is no real site-packages/typeshed search
//! here (the import resolver is an external collaborator the driver
//! merely calls): a module specifier maps to a path under the project
//! root, or — for a relative import — under an ancestor of the importing
//! file, and only candidates already present in `known_files` resolve.

use std::path::{Path, PathBuf};

use pyanalyze_ast::{Module, StmtKind};
use rustc_hash::FxHashSet;

/// Every file `module` imports, best-effort. Unresolvable specifiers
/// (third-party packages, typeshed-only names) are silently dropped, same
/// as they would be from an import resolver that reports `isImportFound:
/// false` with no local path.
#[must_use]
pub fn collect_import_targets(
    module: &Module,
    from_file: &Path,
    project_root: &Path,
    known_files: &FxHashSet<PathBuf>,
) -> FxHashSet<PathBuf> {
    let mut targets = FxHashSet::default();
    for index in 0..module.arena.len() {
        let id = pyanalyze_ast::NodeId(index as u32);
        let pyanalyze_ast::Node::Stmt(stmt) = module.arena.get(id) else { continue };
        match &stmt.kind {
            StmtKind::Import(names) => {
                for (name, _alias) in names {
                    if let Some(path) = resolve_absolute(name, project_root, known_files) {
                        targets.insert(path);
                    }
                }
            }
            StmtKind::ImportFrom { module: name, names, level } => {
                let base = if *level > 0 { relative_base(from_file, *level) } else { Some(project_root.to_path_buf()) };
                let Some(base) = base else { continue };
                let package = name.as_deref().unwrap_or("");
                if !package.is_empty() {
                    if let Some(path) = module_candidates(&base, package).into_iter().find(|c| known_files.contains(c)) {
                        targets.insert(path);
                    }
                }
                // `from pkg import sibling` may import a submodule, not just
                // an attribute of `pkg`'s `__init__.py` — try both readings.
                let package_dir = if package.is_empty() { base.clone() } else { base.join(package.replace('.', "/")) };
                for (imported_name, _alias) in names {
                    if let Some(path) = module_candidates(&package_dir, imported_name).into_iter().find(|c| known_files.contains(c)) {
                        targets.insert(path);
                    }
                }
            }
            _ => {}
        }
    }
    targets
}

fn module_candidates(base: &Path, dotted: &str) -> Vec<PathBuf> {
    let relative: PathBuf = dotted.split('.').collect();
    let joined = base.join(relative);
    vec![joined.with_extension("py"), joined.join("__init__.py")]
}

fn resolve_absolute(dotted: &str, project_root: &Path, known_files: &FxHashSet<PathBuf>) -> Option<PathBuf> {
    module_candidates(project_root, dotted).into_iter().find(|candidate| known_files.contains(candidate))
}

/// `level` leading dots: `level == 1` means "this package" (the importing
/// file's own directory); each additional level walks one directory higher.
fn relative_base(from_file: &Path, level: u32) -> Option<PathBuf> {
    let mut base = from_file.parent()?.to_path_buf();
    for _ in 1..level {
        base = base.parent()?.to_path_buf();
    }
    Some(base)
}

#[cfg(test)]
#[path = "tests/imports.rs"]
mod tests;
