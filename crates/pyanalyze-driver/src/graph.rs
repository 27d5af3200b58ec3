//! The file -> set-of-imported-files graph the driver needs for two things:
//! propagating dirtiness to dependents when an exported symbol table
//! changes, and detecting import cycles (recorded per file up to a cap,
//! rather than aborting resolution, since a cycle is a diagnostic, not a
//! fatal error).

use std::path::{Path, PathBuf};

use rustc_hash::{FxHashMap, FxHashSet};

use pyanalyze_common::limits::MAX_RECORDED_IMPORT_CYCLES;

#[derive(Default)]
pub struct ImportGraph {
    /// `file -> files it imports`.
    edges: FxHashMap<PathBuf, FxHashSet<PathBuf>>,
    /// `file -> files that import it`, kept in lockstep with `edges` so
    /// dirty propagation doesn't need to scan every entry.
    reverse: FxHashMap<PathBuf, FxHashSet<PathBuf>>,
}

impl ImportGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces `file`'s outgoing edges with `targets`, fixing up the
    /// reverse index for edges that were added or dropped.
    pub fn set_imports(&mut self, file: &Path, targets: FxHashSet<PathBuf>) {
        let previous = self.edges.remove(file).unwrap_or_default();
        for gone in previous.difference(&targets) {
            if let Some(importers) = self.reverse.get_mut(gone) {
                importers.remove(file);
            }
        }
        for added in &targets {
            self.reverse.entry(added.clone()).or_default().insert(file.to_path_buf());
        }
        self.edges.insert(file.to_path_buf(), targets);
    }

    #[must_use]
    pub fn dependents_of(&self, file: &Path) -> Vec<PathBuf> {
        self.reverse.get(file).map(|set| set.iter().cloned().collect()).unwrap_or_default()
    }

    #[must_use]
    pub fn imports_of(&self, file: &Path) -> Vec<PathBuf> {
        self.edges.get(file).map(|set| set.iter().cloned().collect()).unwrap_or_default()
    }

    /// Depth-first search for cycles reachable from `start`, each reported
    /// as the path of files from `start` back to the repeated entry.
    /// Recording stops at `MAX_RECORDED_IMPORT_CYCLES` per call; this is a
    /// diagnostic surface, not an exhaustive cycle enumeration.
    #[must_use]
    pub fn cycles_from(&self, start: &Path) -> Vec<Vec<PathBuf>> {
        let mut found = Vec::new();
        let mut stack = vec![start.to_path_buf()];
        self.walk(start, &mut stack, &mut found);
        found
    }

    fn walk(&self, current: &Path, stack: &mut Vec<PathBuf>, found: &mut Vec<Vec<PathBuf>>) {
        if found.len() >= MAX_RECORDED_IMPORT_CYCLES {
            return;
        }
        let Some(targets) = self.edges.get(current) else { return };
        for target in targets {
            if found.len() >= MAX_RECORDED_IMPORT_CYCLES {
                return;
            }
            if let Some(start_pos) = stack.iter().position(|f| f == target) {
                found.push(stack[start_pos..].to_vec());
                continue;
            }
            stack.push(target.clone());
            self.walk(target, stack, found);
            stack.pop();
        }
    }
}

#[cfg(test)]
#[path = "tests/graph.rs"]
mod tests;
