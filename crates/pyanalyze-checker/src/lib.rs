//! Checks a single module: binds it, then walks its statements inferring
//! and verifying types. A single call only sees one module's symbols —
//! cross-module resolution, the fixed-point loop over `did_change`, and
//! the import graph belong to the driver, which owns the maps this crate
//! threads through `CheckerContext` so identities stay stable pass to pass.

pub mod annotation;
pub mod builtins;
pub mod context;
pub mod evaluator;
pub mod overload;
pub mod statements;

use pyanalyze_ast::{Module, NodeId};
use pyanalyze_binder::{Binder, BoundModule, SymbolId};
use pyanalyze_common::{AnalyzerOptions, Diagnostic, Interner};
use pyanalyze_types::{ClassId, FunctionShapeId, InferredTypeAggregator, TypeArena, TypeId, TypeVarId};
use rustc_hash::FxHashMap;

pub use builtins::Builtins;
pub use context::CheckerContext;
pub use evaluator::ExpressionEvaluator;
pub use statements::StatementAnalyzer;

pub struct CheckResult {
    pub bound: BoundModule,
    pub diagnostics: Vec<Diagnostic>,
    pub did_change: bool,
    pub expr_types: FxHashMap<NodeId, TypeId>,
}

/// Binds and checks one module. `aggregator`, `return_types`, `class_ids`,
/// `function_shapes`, and `type_var_ids` are expected to be owned by the
/// caller and passed in again on every subsequent pass over the same
/// module, so that class/function/type-variable identity — and therefore
/// interned-type identity — stays stable as the driver iterates towards a
/// fixed point.
#[allow(clippy::too_many_arguments)]
pub fn check_module(
    file: impl Into<String>,
    module: &Module,
    interner: &mut Interner,
    types: &mut TypeArena,
    builtins: &Builtins,
    options: &AnalyzerOptions,
    aggregator: &mut InferredTypeAggregator<SymbolId>,
    return_types: &mut InferredTypeAggregator<FunctionShapeId>,
    class_ids: &mut FxHashMap<SymbolId, ClassId>,
    function_shapes: &mut FxHashMap<SymbolId, FunctionShapeId>,
    type_var_ids: &mut FxHashMap<SymbolId, TypeVarId>,
) -> CheckResult {
    let bound = Binder::new(interner).bind_module(module);
    let mut ctx = CheckerContext::new(
        file, interner, types, &bound, builtins, options, aggregator, return_types, class_ids, function_shapes,
        type_var_ids,
    );
    StatementAnalyzer::new(&mut ctx).analyze_body(&module.arena, &module.body);
    let CheckerContext { diagnostics, did_change, expr_types, .. } = ctx;
    CheckResult { bound, diagnostics, did_change, expr_types }
}

#[cfg(test)]
#[path = "tests/lib.rs"]
mod tests;
