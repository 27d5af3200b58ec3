//! Shared mutable state the expression evaluator and statement analyzer both
//! thread through a module check: the type arena, the binder's scope/symbol
//! tables, the narrowing stack, accumulated diagnostics, and the per-node
//! expression-type cache. Simple expressions are resolved directly against
//! this state; anything needing a full evaluation (calls, attribute chains)
//! delegates back through the same context rather than carrying its own copy
//! of it.

use std::cell::Cell;

use pyanalyze_ast::NodeId;
use pyanalyze_binder::{BoundModule, ConstraintStack, SymbolId};
use pyanalyze_common::{AnalyzerOptions, Diagnostic, DiagnosticCategory, Interner, RuleSeverity, Span, diagnostics::codes};
use pyanalyze_types::{ClassId, FunctionShapeId, InferredTypeAggregator, SourceId, TypeArena, TypeId, TypeVarId};
use rustc_hash::FxHashMap;

use crate::builtins::Builtins;

/// Rule name a diagnostic code is configurable under, or `None` if it is
/// always reported (no corresponding `report*` project-config key).
#[must_use]
pub fn rule_for_code(code: u32) -> Option<&'static str> {
    match code {
        codes::OPTIONAL_ACCESS => Some("reportOptionalMemberAccess"),
        codes::UNNECESSARY_ISINSTANCE => Some("reportUnnecessaryIsInstance"),
        codes::UNUSED_IMPORT => Some("reportUnusedImport"),
        codes::UNUSED_VARIABLE => Some("reportUnusedVariable"),
        codes::UNUSED_FUNCTION => Some("reportUnusedFunction"),
        codes::UNUSED_CLASS => Some("reportUnusedClass"),
        codes::ARGUMENT_MISMATCH | codes::PARAMETER_COUNT | codes::DUPLICATE_KEYWORD | codes::OVERLOAD_NO_MATCH => {
            Some("reportArgumentType")
        }
        codes::RETURN_TYPE_MISMATCH | codes::YIELD_TYPE_MISMATCH => Some("reportReturnType"),
        codes::INCOMPATIBLE_OVERRIDE => Some("reportIncompatibleMethodOverride"),
        codes::IMPORT_CYCLE => Some("reportImportCycles"),
        _ => Some("reportGeneralTypeIssues"),
    }
}

pub struct CheckerContext<'a> {
    pub file: String,
    pub interner: &'a mut Interner,
    pub types: &'a mut TypeArena,
    pub bound: &'a BoundModule,
    pub builtins: &'a Builtins,
    pub options: &'a AnalyzerOptions,
    pub constraints: ConstraintStack,
    pub diagnostics: Vec<Diagnostic>,
    pub expr_types: FxHashMap<NodeId, TypeId>,
    pub aggregator: &'a mut InferredTypeAggregator<SymbolId>,
    pub return_types: &'a mut InferredTypeAggregator<FunctionShapeId>,
    pub class_ids: &'a mut FxHashMap<SymbolId, ClassId>,
    pub function_shapes: &'a mut FxHashMap<SymbolId, FunctionShapeId>,
    pub type_var_ids: &'a mut FxHashMap<SymbolId, TypeVarId>,
    pub did_change: bool,
    /// The enclosing `def`'s shape, pushed on entry and popped on exit, so a
    /// `return`/`yield` deep inside nested `if`/`for` blocks still knows
    /// which function's return-type aggregator to contribute to.
    function_stack: Vec<FunctionShapeId>,
    /// The enclosing class body's own type, for resolving an unannotated
    /// `self`/`cls` parameter's type inside a method.
    self_type_stack: Vec<TypeId>,
    depth: Cell<u32>,
}

impl<'a> CheckerContext<'a> {
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        file: impl Into<String>,
        interner: &'a mut Interner,
        types: &'a mut TypeArena,
        bound: &'a BoundModule,
        builtins: &'a Builtins,
        options: &'a AnalyzerOptions,
        aggregator: &'a mut InferredTypeAggregator<SymbolId>,
        return_types: &'a mut InferredTypeAggregator<FunctionShapeId>,
        class_ids: &'a mut FxHashMap<SymbolId, ClassId>,
        function_shapes: &'a mut FxHashMap<SymbolId, FunctionShapeId>,
        type_var_ids: &'a mut FxHashMap<SymbolId, TypeVarId>,
    ) -> Self {
        Self {
            file: file.into(),
            interner,
            types,
            bound,
            builtins,
            options,
            constraints: ConstraintStack::new(),
            diagnostics: Vec::new(),
            expr_types: FxHashMap::default(),
            aggregator,
            return_types,
            class_ids,
            function_shapes,
            type_var_ids,
            did_change: false,
            function_stack: Vec::new(),
            self_type_stack: Vec::new(),
            depth: Cell::new(0),
        }
    }

    pub fn push_function(&mut self, shape: FunctionShapeId) {
        self.function_stack.push(shape);
    }

    pub fn pop_function(&mut self) {
        self.function_stack.pop();
    }

    #[must_use]
    pub fn current_function(&self) -> Option<FunctionShapeId> {
        self.function_stack.last().copied()
    }

    pub fn push_self_type(&mut self, ty: TypeId) {
        self.self_type_stack.push(ty);
    }

    pub fn pop_self_type(&mut self) {
        self.self_type_stack.pop();
    }

    #[must_use]
    pub fn current_self_type(&self) -> Option<TypeId> {
        self.self_type_stack.last().copied()
    }

    /// Records one source's contribution to a function's inferred return
    /// type (from a `return` or `yield` reached while that function is on
    /// the stack).
    pub fn record_return_type(&mut self, shape: FunctionShapeId, source: NodeId, ty: TypeId) {
        let changed = self.return_types.record(self.types, shape, SourceId(source.0), ty);
        if changed {
            self.did_change = true;
        }
    }

    pub fn report(&mut self, default_category: DiagnosticCategory, code: u32, span: Span, message: impl Into<String>) {
        let category = match rule_for_code(code) {
            Some(rule) => match self.options.rule_severities.severity_of(rule) {
                RuleSeverity::None => return,
                RuleSeverity::Warning => DiagnosticCategory::Warning,
                RuleSeverity::Error => DiagnosticCategory::Error,
            },
            None => default_category,
        };
        self.diagnostics.push(Diagnostic::new(category, code, self.file.clone(), span, message));
    }

    pub fn error(&mut self, code: u32, span: Span, message: impl Into<String>) {
        self.report(DiagnosticCategory::Error, code, span, message);
    }

    pub fn warning(&mut self, code: u32, span: Span, message: impl Into<String>) {
        self.report(DiagnosticCategory::Warning, code, span, message);
    }

    /// Enters one more level of expression-evaluation recursion, returning
    /// `false` once the depth bound is exceeded so the caller can fall back
    /// to `Unknown` instead of overflowing the stack on a pathological
    /// self-referential expression.
    pub fn enter(&self) -> bool {
        let d = self.depth.get() + 1;
        self.depth.set(d);
        d <= pyanalyze_common::limits::MAX_EXPR_EVAL_DEPTH
    }

    pub fn exit(&self) {
        self.depth.set(self.depth.get().saturating_sub(1));
    }

    /// Records one source's contribution to a symbol's inferred type and
    /// marks the pass dirty if the symbol's combined type changed, which is
    /// what lets the driver detect when another pass is needed.
    pub fn record_symbol_type(&mut self, symbol: SymbolId, source: NodeId, ty: TypeId) {
        let changed = self.aggregator.record(self.types, symbol, SourceId(source.0), ty);
        if changed {
            self.did_change = true;
        }
    }

    #[must_use]
    pub fn symbol_type(&self, symbol: SymbolId) -> TypeId {
        self.aggregator.combined_type(symbol).unwrap_or(TypeId::UNKNOWN)
    }

    pub fn cache_expr_type(&mut self, node: NodeId, ty: TypeId) -> TypeId {
        self.expr_types.insert(node, ty);
        ty
    }
}

#[cfg(test)]
#[path = "tests/context.rs"]
mod tests;
