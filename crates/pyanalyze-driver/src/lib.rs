//! Ties a project's files together: the import graph, the per-file
//! fixed-point check loop, and the hover/definition/completion query
//! surface a front end calls once a file (or its dependents) has settled.
//!
//! A single module's check only ever sees that module's own symbols
//! (`pyanalyze_checker::check_module`); this crate is what makes "checking
//! a project" mean something — discovering which files a given file's
//! `import` statements reach, re-checking a file to a fixed point, and
//! propagating dirtiness to every file that imported it when its exported
//! names changed.

pub mod analysis;
pub mod graph;
pub mod imports;
pub mod queries;

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use pyanalyze_checker::Builtins;
use pyanalyze_common::{AnalyzerOptions, Diagnostic, Interner, Position, limits};
use pyanalyze_types::TypeArena;
use rustc_hash::{FxHashMap, FxHashSet};

pub use analysis::{CheckedFile, FileAnalysis};
pub use graph::ImportGraph;
pub use imports::collect_import_targets;

/// A project's files, the interner and type arena every check shares, and
/// the import graph relating them. Owns the work queue implicitly: any
/// file with `dirty == true` is due for another `analyze_pending` pass.
pub struct ProjectAnalyzer {
    pub root: PathBuf,
    pub interner: Interner,
    pub types: TypeArena,
    pub builtins: Builtins,
    pub options: AnalyzerOptions,
    files: FxHashMap<PathBuf, FileAnalysis>,
    graph: ImportGraph,
    /// Files promoted ahead of the rest of the dirty set, most recently
    /// promoted first — the place a front end puts the file the user just
    /// edited so it gets checked before everything it might have made
    /// dirty as a side effect.
    priority: Vec<PathBuf>,
}

impl ProjectAnalyzer {
    #[must_use]
    pub fn new(root: PathBuf, options: AnalyzerOptions) -> Self {
        let mut interner = Interner::new();
        let mut types = TypeArena::new();
        let builtins = Builtins::install(&mut types, &mut interner);
        Self { root, interner, types, builtins, options, files: FxHashMap::default(), graph: ImportGraph::new(), priority: Vec::new() }
    }

    #[must_use]
    pub fn file(&self, path: &Path) -> Option<&FileAnalysis> {
        self.files.get(path)
    }

    /// Registers a file or replaces its source, marking it (and anything
    /// that was depending on its previous export set) dirty, and promotes
    /// it to the front of the queue — the behavior a front end wants when
    /// the user is actively editing this file.
    pub fn set_file(&mut self, path: PathBuf, source: String) {
        match self.files.get_mut(&path) {
            Some(existing) => existing.set_source(source),
            None => {
                self.files.insert(path.clone(), FileAnalysis::new(path.clone(), source));
            }
        }
        self.priority.retain(|p| p != &path);
        self.priority.push(path);
    }

    pub fn remove_file(&mut self, path: &Path) {
        self.files.remove(path);
        self.graph.set_imports(path, FxHashSet::default());
        self.priority.retain(|p| p != path);
    }

    #[must_use]
    pub fn known_files(&self) -> FxHashSet<PathBuf> {
        self.files.keys().cloned().collect()
    }

    /// Re-checks every dirty file to a fixed point, within a time budget,
    /// re-resolving its imports and propagating dirtiness to its
    /// dependents whenever its exported names changed. Priority files (the
    /// one most recently edited) are drained first. Returns every
    /// diagnostic produced by a file this pass actually re-checked; a
    /// caller that wants the full project's diagnostics should also read
    /// `self.file(path).checked` for files left untouched because nothing
    /// made them dirty.
    pub fn analyze_pending(&mut self, budget: Duration) -> FxHashMap<PathBuf, Vec<Diagnostic>> {
        let deadline = Instant::now() + budget;
        let mut produced = FxHashMap::default();
        let known = self.known_files();

        let mut queue: Vec<PathBuf> = self.priority.drain(..).collect();
        queue.retain(|p| self.files.get(p).is_some_and(|f| f.dirty));
        for path in self.files.keys() {
            if self.files[path].dirty && !queue.contains(path) {
                queue.push(path.clone());
            }
        }

        let mut index = 0;
        while index < queue.len() {
            if Instant::now() >= deadline {
                break;
            }
            let path = queue[index].clone();
            index += 1;
            let Some(file) = self.files.get_mut(&path) else { continue };
            if !file.dirty {
                continue;
            }
            let exports_changed = file.analyze(&mut self.interner, &mut self.types, &self.builtins, &self.options);
            let diagnostics = file.checked.as_ref().map(|c| c.diagnostics.clone()).unwrap_or_default();
            produced.insert(path.clone(), diagnostics);

            if let Some(checked) = file.checked.as_ref() {
                let targets = collect_import_targets(&checked.module, &path, &self.root, &known);
                self.graph.set_imports(&path, targets);
            }

            if exports_changed {
                for dependent in self.graph.dependents_of(&path) {
                    if let Some(dep) = self.files.get_mut(&dependent) {
                        dep.dirty = true;
                        if !queue.contains(&dependent) {
                            queue.push(dependent);
                        }
                    }
                }
            }
        }
        produced
    }

    /// Import cycles reachable from `path`, capped per
    /// [`limits::MAX_RECORDED_IMPORT_CYCLES`] as `ImportGraph::cycles_from`
    /// already enforces.
    #[must_use]
    pub fn import_cycles(&self, path: &Path) -> Vec<Vec<PathBuf>> {
        self.graph.cycles_from(path)
    }

    #[must_use]
    pub fn hover(&self, path: &Path, position: Position) -> Option<String> {
        let file = self.files.get(path)?;
        let checked = file.checked.as_ref()?;
        queries::hover(checked, &self.interner, &self.types, &file.source, position)
    }

    #[must_use]
    pub fn definition(&mut self, path: &Path, position: Position) -> Vec<pyanalyze_common::Span> {
        let Some(file) = self.files.get(path) else { return Vec::new() };
        let Some(checked) = file.checked.as_ref() else { return Vec::new() };
        queries::definition(checked, &mut self.interner, &file.source, position)
    }

    #[must_use]
    pub fn completions(&self, path: &Path, position: Position) -> Vec<String> {
        let Some(file) = self.files.get(path) else { return Vec::new() };
        let Some(checked) = file.checked.as_ref() else { return Vec::new() };
        queries::completions(checked, &self.interner, &file.source, position)
    }

    /// The default per-slice time budget a front end should pass to
    /// `analyze_pending` on each idle tick.
    #[must_use]
    pub fn default_budget() -> Duration {
        Duration::from_millis(limits::DEFAULT_MAX_ANALYSIS_TIME_MS)
    }
}

#[cfg(test)]
#[path = "tests/project.rs"]
mod tests;

#[cfg(test)]
#[path = "tests/scenarios.rs"]
mod scenario_tests;
