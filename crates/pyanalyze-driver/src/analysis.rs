//! One file's state across its lifetime in the project: its source text,
//! the identity maps that must survive across re-check passes so
//! `ClassId`/`FunctionShapeId`/`TypeVarId` stay stable, and the result of
//! its last completed check.

use std::path::PathBuf;

use pyanalyze_ast::{Module, NodeId, Parser};
use pyanalyze_binder::{BoundModule, SymbolId};
use pyanalyze_checker::Builtins;
use pyanalyze_common::{AnalyzerOptions, Diagnostic, Interner, limits};
use pyanalyze_types::{ClassId, FunctionShapeId, InferredTypeAggregator, TypeArena, TypeId, TypeVarId};
use rustc_hash::FxHashMap;

/// Outcome of binding and checking one file: diagnostics plus enough of the
/// bound module to serve hover/definition/completion queries. Held
/// separately from `FileAnalysis` so a failed parse can leave the previous
/// successful result in place instead of dropping it.
pub struct CheckedFile {
    pub bound: BoundModule,
    pub module: Module,
    pub diagnostics: Vec<Diagnostic>,
    pub expr_types: FxHashMap<NodeId, TypeId>,
}

pub struct FileAnalysis {
    pub path: PathBuf,
    pub source: String,
    pub dirty: bool,
    /// Bumped on every completed check pass; cache keys elsewhere in a
    /// real editor integration would include this to invalidate
    /// automatically on re-analysis.
    pub version: u32,
    pub last_pass_count: u32,
    pub checked: Option<CheckedFile>,
    pub parse_error: Option<String>,
    aggregator: InferredTypeAggregator<SymbolId>,
    return_types: InferredTypeAggregator<FunctionShapeId>,
    class_ids: FxHashMap<SymbolId, ClassId>,
    function_shapes: FxHashMap<SymbolId, FunctionShapeId>,
    type_var_ids: FxHashMap<SymbolId, TypeVarId>,
}

impl FileAnalysis {
    #[must_use]
    pub fn new(path: PathBuf, source: String) -> Self {
        Self {
            path,
            source,
            dirty: true,
            version: 0,
            last_pass_count: 0,
            checked: None,
            parse_error: None,
            aggregator: InferredTypeAggregator::new(),
            return_types: InferredTypeAggregator::new(),
            class_ids: FxHashMap::default(),
            function_shapes: FxHashMap::default(),
            type_var_ids: FxHashMap::default(),
        }
    }

    pub fn set_source(&mut self, source: String) {
        self.source = source;
        self.dirty = true;
        // A fresh edit invalidates identity: symbol ids from the previous
        // parse no longer correspond to anything in the new tree.
        self.aggregator = InferredTypeAggregator::new();
        self.return_types = InferredTypeAggregator::new();
        self.class_ids.clear();
        self.function_shapes.clear();
        self.type_var_ids.clear();
    }

    /// Re-parses and re-checks the file to a fixed point (`did_change ==
    /// false`) or the pass bound, whichever comes first. Returns whether
    /// the file's exported symbol set plausibly changed, so the caller can
    /// decide whether to mark dependents dirty.
    pub fn analyze(&mut self, interner: &mut Interner, types: &mut TypeArena, builtins: &Builtins, options: &AnalyzerOptions) -> bool {
        let module = match Parser::new(&self.source).parse_module() {
            Ok(module) => module,
            Err(err) => {
                self.parse_error = Some(err.to_string());
                self.dirty = false;
                return false;
            }
        };
        self.parse_error = None;

        let previous_exports = self.checked.as_ref().map(exported_names);
        let bound_pass_count = options.analysis_pass_bound().max(limits::MAX_ANALYSIS_PASSES);
        let mut pass = 0;
        let mut last_result = None;
        loop {
            pass += 1;
            let file_name = self.path.to_string_lossy().into_owned();
            let result = pyanalyze_checker::check_module(
                file_name,
                &module,
                interner,
                types,
                builtins,
                options,
                &mut self.aggregator,
                &mut self.return_types,
                &mut self.class_ids,
                &mut self.function_shapes,
                &mut self.type_var_ids,
            );
            let did_change = result.did_change;
            last_result = Some(result);
            if !did_change || pass >= bound_pass_count {
                break;
            }
        }
        self.last_pass_count = pass;
        self.version += 1;
        self.dirty = false;

        let result = last_result.expect("loop runs at least once");
        let checked = CheckedFile { bound: result.bound, module, diagnostics: result.diagnostics, expr_types: result.expr_types };
        let new_exports = exported_names(&checked);
        self.checked = Some(checked);
        previous_exports.is_none_or(|previous| previous != new_exports)
    }
}

/// The module scope's declared names, used as a cheap proxy for "this
/// file's exported symbol table changed" when deciding whether to mark
/// dependents dirty.
fn exported_names(checked: &CheckedFile) -> Vec<SymbolId> {
    let mut names: Vec<SymbolId> = checked.bound.scopes.get(checked.bound.module_scope).names.values().copied().collect();
    names.sort();
    names
}

#[cfg(test)]
#[path = "tests/analysis.rs"]
mod tests;
