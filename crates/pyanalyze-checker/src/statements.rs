//! Walks a module's statements, building class and function shapes and
//! driving the expression evaluator for everything that carries a type:
//! assignment targets, conditions, `return`/`yield` values, loop iterables.
//! `If`/`While` branches push and pop `ConstraintStack` frames around the
//! evaluator's narrowing analysis so a symbol narrowed in a `then` branch
//! doesn't leak into the `else` branch or past the statement.

use pyanalyze_ast::{Arena, Constant, ExprKind, NodeId, Param, StmtKind};
use pyanalyze_binder::SymbolId;
use pyanalyze_common::diagnostics::codes;
use pyanalyze_types::{
    ClassData, ClassMember, FunctionShape, MemberKind, ParamInfo, TypeId, TypeVarData, Variance, combine_types,
};
use rustc_hash::FxHashMap;
use smallvec::smallvec;

use crate::annotation::AnnotationEvaluator;
use crate::context::CheckerContext;
use crate::evaluator::ExpressionEvaluator;

pub struct StatementAnalyzer<'a, 'ctx> {
    pub ctx: &'a mut CheckerContext<'ctx>,
}

impl<'a, 'ctx> StatementAnalyzer<'a, 'ctx> {
    #[must_use]
    pub fn new(ctx: &'a mut CheckerContext<'ctx>) -> Self {
        Self { ctx }
    }

    pub fn analyze_body(&mut self, arena: &Arena, body: &[NodeId]) {
        for &id in body {
            self.analyze_stmt(arena, id);
        }
    }

    fn symbol_for(&mut self, scope_node: NodeId, name: &str) -> Option<SymbolId> {
        let scope = self.ctx.bound.scope_of(scope_node).unwrap_or(self.ctx.bound.module_scope);
        let atom = self.ctx.interner.intern(name);
        self.ctx.bound.scopes.resolve(scope, atom)
    }

    fn analyze_stmt(&mut self, arena: &Arena, id: NodeId) {
        let stmt = arena.stmt(id);
        let span = stmt.span;
        match stmt.kind.clone() {
            StmtKind::FunctionDef { name, params, returns, body, decorators, .. } => {
                self.analyze_function(arena, id, &name, &params, returns, &body, &decorators);
            }
            StmtKind::ClassDef { name, bases, body, .. } => {
                self.analyze_class(arena, id, &name, &bases, &body);
            }
            StmtKind::Return(value) => {
                let ty = match value {
                    Some(v) => ExpressionEvaluator::new(self.ctx).eval(arena, v),
                    None => TypeId::NONE,
                };
                if let Some(shape) = self.ctx.current_function() {
                    self.ctx.record_return_type(shape, id, ty);
                }
            }
            StmtKind::Delete(targets) => {
                for t in targets {
                    ExpressionEvaluator::new(self.ctx).eval(arena, t);
                }
            }
            StmtKind::Assign { targets, value } => {
                if self.try_register_type_var(arena, &targets, value) {
                    return;
                }
                let ty = ExpressionEvaluator::new(self.ctx).eval(arena, value);
                for target in targets {
                    self.assign_target(arena, target, ty, id);
                }
            }
            StmtKind::AugAssign { target, value, .. } => {
                let rhs = ExpressionEvaluator::new(self.ctx).eval(arena, value);
                ExpressionEvaluator::new(self.ctx).eval(arena, target);
                self.assign_target(arena, target, rhs, id);
            }
            StmtKind::AnnAssign { target, annotation, value } => {
                let declared = AnnotationEvaluator::new(self.ctx).eval(arena, annotation);
                if let Some(v) = value {
                    let value_ty = ExpressionEvaluator::new(self.ctx).eval(arena, v);
                    if !pyanalyze_types::can_assign(self.ctx.types, value_ty, declared) {
                        self.ctx.error(
                            codes::ARGUMENT_MISMATCH,
                            arena.expr(v).span,
                            "assigned value is not compatible with the declared type",
                        );
                    }
                }
                self.assign_target(arena, target, declared, id);
            }
            StmtKind::For { target, iter, body, or_else, .. } => {
                let iter_ty = ExpressionEvaluator::new(self.ctx).eval(arena, iter);
                let element = self.iterable_element_type(iter_ty);
                self.assign_target(arena, target, element, id);
                self.analyze_body(arena, &body);
                self.analyze_body(arena, &or_else);
            }
            StmtKind::While { test, body, or_else } => {
                self.analyze_condition_then_branches(arena, test, &body, &or_else);
            }
            StmtKind::If { test, body, or_else } => {
                self.analyze_condition_then_branches(arena, test, &body, &or_else);
            }
            StmtKind::With { items, body, .. } => {
                for (ctx_expr, target) in items {
                    let ty = ExpressionEvaluator::new(self.ctx).eval(arena, ctx_expr);
                    if let Some(t) = target {
                        self.assign_target(arena, t, ty, id);
                    }
                }
                self.analyze_body(arena, &body);
            }
            StmtKind::Raise { exc, cause } => {
                if let Some(e) = exc {
                    let ty = ExpressionEvaluator::new(self.ctx).eval(arena, e);
                    self.check_raised_is_exception(ty, span);
                }
                if let Some(c) = cause {
                    ExpressionEvaluator::new(self.ctx).eval(arena, c);
                }
            }
            StmtKind::Try { body, handlers, or_else, finally } => {
                self.analyze_body(arena, &body);
                for handler in handlers {
                    let exc_ty = handler.kind.map(|k| AnnotationEvaluator::new(self.ctx).eval(arena, k));
                    if let (Some(name), Some(ty)) = (handler.name.clone(), exc_ty) {
                        if let Some(symbol) = self.symbol_for(id, &name) {
                            self.ctx.record_symbol_type(symbol, id, ty);
                        }
                    }
                    self.analyze_body(arena, &handler.body);
                }
                self.analyze_body(arena, &or_else);
                self.analyze_body(arena, &finally);
            }
            StmtKind::Assert { test, msg } => {
                ExpressionEvaluator::new(self.ctx).eval(arena, test);
                if let Some(m) = msg {
                    ExpressionEvaluator::new(self.ctx).eval(arena, m);
                }
            }
            StmtKind::Import(_) | StmtKind::ImportFrom { .. } | StmtKind::Global(_) | StmtKind::Nonlocal(_) => {
                // Name binding for these is entirely the binder's job; the
                // checker has no further type information to contribute
                // without a real module resolver.
            }
            StmtKind::Expr(e) => {
                ExpressionEvaluator::new(self.ctx).eval(arena, e);
            }
            StmtKind::Pass | StmtKind::Break | StmtKind::Continue => {}
        }
    }

    fn analyze_condition_then_branches(&mut self, arena: &Arena, test: NodeId, body: &[NodeId], or_else: &[NodeId]) {
        let (then_narrowings, else_narrowings) = ExpressionEvaluator::new(self.ctx).narrow_condition(arena, test);

        self.ctx.constraints.push_frame();
        for (symbol, ty, origin) in &then_narrowings {
            self.ctx.constraints.narrow(*symbol, *ty, *origin);
        }
        self.analyze_body(arena, body);
        let then_frame = self.ctx.constraints.snapshot_top();
        self.ctx.constraints.pop_frame();

        self.ctx.constraints.push_frame();
        for (symbol, ty, origin) in &else_narrowings {
            self.ctx.constraints.narrow(*symbol, *ty, *origin);
        }
        self.analyze_body(arena, or_else);
        let else_frame = self.ctx.constraints.snapshot_top();
        self.ctx.constraints.pop_frame();

        self.ctx.constraints.join(self.ctx.types, then_frame, else_frame);
    }

    fn assign_target(&mut self, arena: &Arena, target: NodeId, ty: TypeId, source: NodeId) {
        match &arena.expr(target).kind {
            pyanalyze_ast::ExprKind::Name(name) => {
                if let Some(symbol) = self.symbol_for(target, name) {
                    self.ctx.record_symbol_type(symbol, source, ty);
                    self.ctx.constraints.clear(symbol);
                }
            }
            pyanalyze_ast::ExprKind::Tuple(elements) | pyanalyze_ast::ExprKind::List(elements) => {
                let elements = elements.clone();
                let member_ty = self.iterable_element_type(ty);
                for e in elements {
                    self.assign_target(arena, e, member_ty, source);
                }
            }
            pyanalyze_ast::ExprKind::Attribute { value, .. } | pyanalyze_ast::ExprKind::Subscript { value, .. } => {
                ExpressionEvaluator::new(self.ctx).eval(arena, *value);
            }
            pyanalyze_ast::ExprKind::Starred(inner) => {
                self.assign_target(arena, *inner, ty, source);
            }
            _ => {}
        }
    }

    /// Recognizes `T = TypeVar('T')` and binds the target symbol to a fresh
    /// type variable instead of an ordinary value assignment, so later
    /// annotations naming `T` resolve through `type_var_ids` rather than
    /// falling through to an unresolved name. Returns false for every other
    /// assignment shape, leaving it to the normal path.
    fn try_register_type_var(&mut self, arena: &Arena, targets: &[NodeId], value: NodeId) -> bool {
        let [target] = targets else { return false };
        let ExprKind::Name(target_name) = &arena.expr(*target).kind else { return false };
        let ExprKind::Call { func, args, .. } = &arena.expr(value).kind else { return false };
        let names_typevar = match &arena.expr(*func).kind {
            ExprKind::Name(n) => n == "TypeVar",
            ExprKind::Attribute { attr, .. } => attr == "TypeVar",
            _ => false,
        };
        if !names_typevar {
            return false;
        }
        let declared_name = match args.first().map(|&a| arena.expr(a).kind.clone()) {
            Some(ExprKind::Constant(Constant::Str(s))) => s,
            _ => target_name.clone(),
        };
        let target_name = target_name.clone();
        let Some(symbol) = self.symbol_for(*target, &target_name) else { return false };

        let tv = if let Some(&existing) = self.ctx.type_var_ids.get(&symbol) {
            existing
        } else {
            let tv = self.ctx.types.alloc_type_var(TypeVarData {
                name: self.ctx.interner.intern(&declared_name),
                bound: None,
                constraints: smallvec![],
                variance: Variance::Invariant,
                default: None,
            });
            self.ctx.type_var_ids.insert(symbol, tv);
            tv
        };
        let ty = self.ctx.types.intern_type_var_ref(tv);
        self.ctx.record_symbol_type(symbol, *target, ty);
        true
    }

    fn iterable_element_type(&mut self, ty: TypeId) -> TypeId {
        match self.ctx.types.get(ty).clone() {
            pyanalyze_types::Type::Instance(class_id, args)
                if class_id == self.ctx.builtins.list_class || class_id == self.ctx.builtins.set_class =>
            {
                args.first().copied().unwrap_or(TypeId::UNKNOWN)
            }
            pyanalyze_types::Type::Instance(class_id, args) if class_id == self.ctx.builtins.dict_class => {
                args.first().copied().unwrap_or(TypeId::UNKNOWN)
            }
            pyanalyze_types::Type::Tuple(shape_id) => {
                let shape = self.ctx.types.tuple_shape(shape_id).clone();
                combine_types(self.ctx.types, &shape.elements)
            }
            pyanalyze_types::Type::Str => TypeId::STR,
            pyanalyze_types::Type::Any => TypeId::ANY,
            _ => TypeId::UNKNOWN,
        }
    }

    fn check_raised_is_exception(&mut self, ty: TypeId, span: pyanalyze_common::Span) {
        if matches!(ty, TypeId::ANY | TypeId::UNKNOWN) {
            return;
        }
        let Some(class_id) = (match self.ctx.types.get(ty) {
            pyanalyze_types::Type::Instance(c, _) | pyanalyze_types::Type::Class(c) => Some(*c),
            _ => None,
        }) else {
            return;
        };
        let base = self.ctx.builtins.base_exception_class;
        if class_id != base && !self.ctx.types.class(class_id).mro.contains(&base) {
            self.ctx.error(codes::EXCEPTION_NOT_DERIVED, span, "exceptions must derive from BaseException");
        }
    }

    fn analyze_class(&mut self, arena: &Arena, stmt_id: NodeId, name: &str, bases: &[NodeId], body: &[NodeId]) {
        let Some(symbol) = self.symbol_for(stmt_id, name) else { return };

        let base_types: Vec<TypeId> = bases.iter().map(|&b| AnnotationEvaluator::new(self.ctx).eval(arena, b)).collect();
        let base_classes: Vec<(pyanalyze_types::ClassId, Vec<TypeId>)> = base_types
            .iter()
            .filter_map(|&t| match self.ctx.types.get(t) {
                pyanalyze_types::Type::Instance(c, a) => Some((*c, a.to_vec())),
                pyanalyze_types::Type::Class(c) => Some((*c, Vec::new())),
                _ => None,
            })
            .collect();

        let class_id = *self.ctx.class_ids.entry(symbol).or_insert_with(|| {
            self.ctx.types.alloc_class(ClassData {
                name: self.ctx.interner.intern(name),
                bases: Vec::new(),
                mro: Vec::new(),
                type_params: smallvec![],
                members: FxHashMap::default(),
                is_protocol: false,
                is_final: false,
                is_abstract: false,
                span: arena.stmt(stmt_id).span,
            })
        });

        let mut mro = vec![class_id];
        for (base_id, _) in &base_classes {
            let base_mro = self.ctx.types.class(*base_id).mro.clone();
            if base_mro.is_empty() {
                mro.push(*base_id);
            } else {
                mro.extend(base_mro);
            }
        }
        mro.dedup();
        {
            let data = self.ctx.types.class_mut(class_id);
            data.bases = base_types;
            data.mro = mro;
        }

        let self_type = self.ctx.types.intern_class_instance(class_id, smallvec![]);
        self.ctx.push_self_type(self_type);
        self.analyze_body(arena, body);
        self.ctx.pop_self_type();

        self.collect_class_members(arena, class_id, body);
        self.check_method_overrides(arena, class_id, body);
    }

    /// Compares each method defined directly in this class body against
    /// the same-named method inherited from a base class. A parameter
    /// narrower than the base declares, or a return type the base's
    /// callers couldn't rely on, is reported as an incompatible override.
    fn check_method_overrides(&mut self, arena: &Arena, class_id: pyanalyze_types::ClassId, body: &[NodeId]) {
        let mro = self.ctx.types.class(class_id).mro.clone();
        for &stmt_id in body {
            let StmtKind::FunctionDef { name, .. } = &arena.stmt(stmt_id).kind else { continue };
            let Some(symbol) = self.symbol_for(stmt_id, name) else { continue };
            let Some(&shape_id) = self.ctx.function_shapes.get(&symbol) else { continue };
            let atom = self.ctx.interner.intern(name);

            let mut base_shape_id = None;
            for &owner in mro.iter().skip(1) {
                if let Some(member) = self.ctx.types.class(owner).members.get(&atom) {
                    if member.kind != MemberKind::Method {
                        break;
                    }
                    if let pyanalyze_types::Type::Callable(base_id) = self.ctx.types.get(member.type_id) {
                        base_shape_id = Some(*base_id);
                    }
                    break;
                }
            }
            let Some(base_shape_id) = base_shape_id else { continue };

            let ours = self.ctx.types.function_shape(shape_id).clone();
            let base = self.ctx.types.function_shape(base_shape_id).clone();
            let mut incompatible = false;
            for (override_param, base_param) in ours.params.iter().skip(1).zip(base.params.iter().skip(1)) {
                if !pyanalyze_types::can_assign(self.ctx.types, base_param.type_id, override_param.type_id) {
                    incompatible = true;
                }
            }
            if !pyanalyze_types::can_assign(self.ctx.types, ours.return_type, base.return_type) {
                incompatible = true;
            }
            if incompatible {
                self.ctx.error(
                    codes::INCOMPATIBLE_OVERRIDE,
                    arena.stmt(stmt_id).span,
                    format!("\"{name}\" overrides a base class method incompatibly"),
                );
            }
        }
    }

    /// Registers every `def` and annotated assignment directly in a class
    /// body as a member, after the body has already been walked once (so
    /// method shapes exist and instance-variable types have been inferred
    /// from `self.x = ...` assignments inside `__init__`).
    fn collect_class_members(&mut self, arena: &Arena, class_id: pyanalyze_types::ClassId, body: &[NodeId]) {
        for &stmt_id in body {
            match &arena.stmt(stmt_id).kind {
                StmtKind::FunctionDef { name, .. } => {
                    let Some(symbol) = self.symbol_for(stmt_id, name) else { continue };
                    let Some(&shape_id) = self.ctx.function_shapes.get(&symbol) else { continue };
                    let atom = self.ctx.interner.intern(name);
                    let type_id = self.ctx.types.alloc_callable(shape_id);
                    self.ctx.types.class_mut(class_id).members.insert(
                        atom,
                        ClassMember { type_id, kind: MemberKind::Method, declared_span: arena.stmt(stmt_id).span, is_private: name.starts_with('_') },
                    );
                }
                StmtKind::AnnAssign { target, .. } => {
                    if let pyanalyze_ast::ExprKind::Name(name) = &arena.expr(*target).kind {
                        let Some(symbol) = self.symbol_for(stmt_id, name) else { continue };
                        let type_id = self.ctx.symbol_type(symbol);
                        let atom = self.ctx.interner.intern(name);
                        self.ctx.types.class_mut(class_id).members.insert(
                            atom,
                            ClassMember { type_id, kind: MemberKind::ClassVar, declared_span: arena.stmt(stmt_id).span, is_private: name.starts_with('_') },
                        );
                    }
                }
                StmtKind::Assign { targets, .. } => {
                    for &target in targets {
                        if let pyanalyze_ast::ExprKind::Name(name) = &arena.expr(target).kind {
                            let Some(symbol) = self.symbol_for(stmt_id, name) else { continue };
                            let type_id = self.ctx.symbol_type(symbol);
                            let atom = self.ctx.interner.intern(name);
                            self.ctx.types.class_mut(class_id).members.insert(
                                atom,
                                ClassMember { type_id, kind: MemberKind::ClassVar, declared_span: arena.stmt(stmt_id).span, is_private: name.starts_with('_') },
                            );
                        }
                    }
                }
                _ => {}
            }
        }
    }

    fn analyze_function(
        &mut self,
        arena: &Arena,
        stmt_id: NodeId,
        name: &str,
        params: &[Param],
        returns: Option<NodeId>,
        body: &[NodeId],
        decorators: &[NodeId],
    ) {
        let Some(symbol) = self.symbol_for(stmt_id, name) else { return };
        let shape_id = *self.ctx.function_shapes.entry(symbol).or_insert_with(|| {
            self.ctx.types.alloc_function_shape(FunctionShape {
                name: self.ctx.interner.intern(name),
                type_params: smallvec![],
                params: Vec::new(),
                return_type: TypeId::UNKNOWN,
                is_bound: false,
                overloads: Vec::new(),
            })
        });

        // An `@overload`-decorated def only contributes a signature to the
        // symbol's overload set; its body is a stub (`...`) and the symbol's
        // own shape stays reserved for the implementation def that follows.
        let is_overload_stub = decorators.iter().any(|&d| self.is_overload_decorator(arena, d));
        let this_shape_id = if is_overload_stub {
            self.ctx.types.alloc_function_shape(FunctionShape {
                name: self.ctx.interner.intern(name),
                type_params: smallvec![],
                params: Vec::new(),
                return_type: TypeId::UNKNOWN,
                is_bound: false,
                overloads: Vec::new(),
            })
        } else {
            shape_id
        };

        let is_method = self.ctx.current_self_type().is_some() && self.ctx.current_function().is_none();
        let param_infos: Vec<ParamInfo> = params
            .iter()
            .map(|p| {
                let declared = p.annotation.map(|a| AnnotationEvaluator::new(self.ctx).eval(arena, a));
                let type_id = declared.unwrap_or(TypeId::UNKNOWN);
                ParamInfo {
                    name: self.ctx.interner.intern(&p.name),
                    type_id,
                    kind: map_param_kind(p.kind),
                    has_default: p.default.is_some(),
                }
            })
            .collect();
        self.ctx.types.function_shape_mut(this_shape_id).params = param_infos.clone();

        let explicit_return = returns.map(|r| AnnotationEvaluator::new(self.ctx).eval(arena, r));

        if is_overload_stub {
            self.ctx.types.function_shape_mut(this_shape_id).return_type = explicit_return.unwrap_or(TypeId::NONE);
            self.register_overload(shape_id, this_shape_id);
            return;
        }

        // Every parameter's declared (or implicit `self`/`cls`) type has to
        // be recorded against its body-scope symbol before the body is
        // walked, or every reference to it inside the function would see
        // `Unknown` instead of the annotation.
        if let Some(&first_stmt) = body.first() {
            for (i, param) in params.iter().enumerate() {
                let Some(symbol) = self.symbol_for(first_stmt, &param.name) else { continue };
                let type_id = if i == 0 && is_method && (param.name == "self" || param.name == "cls") && param.annotation.is_none()
                {
                    self.ctx.current_self_type().unwrap_or(TypeId::OBJECT)
                } else {
                    param_infos[i].type_id
                };
                self.ctx.record_symbol_type(symbol, stmt_id, type_id);
            }
        }

        self.ctx.push_function(shape_id);
        self.analyze_body(arena, body);
        self.ctx.pop_function();

        let return_type = explicit_return
            .or_else(|| self.ctx.return_types.combined_type(shape_id))
            .unwrap_or(TypeId::NONE);
        self.ctx.types.function_shape_mut(shape_id).return_type = return_type;
    }

    fn is_overload_decorator(&self, arena: &Arena, id: NodeId) -> bool {
        match &arena.expr(id).kind {
            pyanalyze_ast::ExprKind::Name(name) => name == "overload",
            pyanalyze_ast::ExprKind::Attribute { attr, .. } => attr == "overload",
            _ => false,
        }
    }

    /// Appends `candidate` to `shape_id`'s overload list unless a
    /// structurally identical signature is already there — re-checking the
    /// same source after a prior pass shouldn't grow the list forever.
    fn register_overload(&mut self, shape_id: pyanalyze_types::FunctionShapeId, candidate: pyanalyze_types::FunctionShapeId) {
        let candidate_shape = self.ctx.types.function_shape(candidate).clone();
        let already_present = self
            .ctx
            .types
            .function_shape(shape_id)
            .overloads
            .iter()
            .any(|&existing| signatures_match(self.ctx.types.function_shape(existing), &candidate_shape));
        if !already_present {
            self.ctx.types.function_shape_mut(shape_id).overloads.push(candidate);
        }
    }
}

fn signatures_match(a: &FunctionShape, b: &FunctionShape) -> bool {
    a.return_type == b.return_type
        && a.params.len() == b.params.len()
        && a.params.iter().zip(&b.params).all(|(x, y)| x.type_id == y.type_id && x.kind == y.kind)
}

fn map_param_kind(kind: pyanalyze_ast::ParamKind) -> pyanalyze_types::ParamKind {
    match kind {
        pyanalyze_ast::ParamKind::Positional => pyanalyze_types::ParamKind::Positional,
        pyanalyze_ast::ParamKind::KeywordOnly => pyanalyze_types::ParamKind::KeywordOnly,
        pyanalyze_ast::ParamKind::VarArgs => pyanalyze_types::ParamKind::VarArgs,
        pyanalyze_ast::ParamKind::VarKeyword => pyanalyze_types::ParamKind::VarKeyword,
    }
}

#[cfg(test)]
#[path = "tests/statements.rs"]
mod tests;
