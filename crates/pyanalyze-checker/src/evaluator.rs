//! Evaluates an ordinary (non-annotation) expression into a `TypeId`:
//! literals, operators, calls, attribute and subscript access, and the
//! handful of comprehension/lambda forms that introduce their own scope.
//! Where the shape a member lookup or call needs isn't known (`Any`,
//! `Unknown`, a forward reference that hasn't resolved yet) this evaluator
//! degrades to passing that placeholder through rather than reporting a
//! diagnostic against it.

use pyanalyze_ast::{Arena, BinOp, CmpOp, Constant, ExprKind, NodeId, UnaryOp};
use pyanalyze_binder::{NarrowingOrigin, ScopeId, SymbolFlags, SymbolId};
use pyanalyze_common::{Span, diagnostics::codes};
use pyanalyze_types::{
    LiteralValue, LookupFlags, Type, TypeId, bind_function_to_class_or_object, combine_types, look_up_class_member,
    specialize, substitution_for_class_args,
};
use smallvec::smallvec;

use crate::annotation::AnnotationEvaluator;
use crate::context::CheckerContext;
use crate::overload::{Argument, Keyword, match_call, select_overload};

pub struct ExpressionEvaluator<'a, 'ctx> {
    pub ctx: &'a mut CheckerContext<'ctx>,
}

impl<'a, 'ctx> ExpressionEvaluator<'a, 'ctx> {
    #[must_use]
    pub fn new(ctx: &'a mut CheckerContext<'ctx>) -> Self {
        Self { ctx }
    }

    pub fn eval(&mut self, arena: &Arena, id: NodeId) -> TypeId {
        if !self.ctx.enter() {
            return TypeId::UNKNOWN;
        }
        let ty = self.eval_inner(arena, id);
        self.ctx.exit();
        self.ctx.cache_expr_type(id, ty)
    }

    fn scope_of(&self, id: NodeId) -> ScopeId {
        self.ctx.bound.scope_of(id).unwrap_or(self.ctx.bound.module_scope)
    }

    fn span_of(&self, arena: &Arena, id: NodeId) -> Span {
        arena.expr(id).span
    }

    fn eval_inner(&mut self, arena: &Arena, id: NodeId) -> TypeId {
        let span = self.span_of(arena, id);
        match arena.expr(id).kind.clone() {
            ExprKind::Constant(c) => self.eval_constant(&c),
            ExprKind::Name(name) => self.eval_name(&name, id, span),
            ExprKind::NamedExpr { target, value } => {
                let ty = self.eval(arena, value);
                self.bind_name(&target, id, ty);
                ty
            }
            ExprKind::BoolOp { values, .. } => {
                let members: Vec<TypeId> = values.iter().map(|&v| self.eval(arena, v)).collect();
                combine_types(self.ctx.types, &members)
            }
            ExprKind::BinOp { left, op, right } => {
                let l = self.eval(arena, left);
                let r = self.eval(arena, right);
                self.binop_result(op, l, r)
            }
            ExprKind::UnaryOp { op, operand } => {
                let ty = self.eval(arena, operand);
                match op {
                    UnaryOp::Not => TypeId::BOOL,
                    _ => self.widen_literal(ty),
                }
            }
            ExprKind::Lambda { params, body } => self.eval_lambda(arena, &params, body),
            ExprKind::IfExp { test, body, or_else } => {
                let (then_narrowings, else_narrowings) = self.narrow_condition(arena, test);

                self.ctx.constraints.push_frame();
                for (symbol, ty, origin) in &then_narrowings {
                    self.ctx.constraints.narrow(*symbol, *ty, *origin);
                }
                let then_ty = self.eval(arena, body);
                let then_frame = self.ctx.constraints.snapshot_top();
                self.ctx.constraints.pop_frame();

                self.ctx.constraints.push_frame();
                for (symbol, ty, origin) in &else_narrowings {
                    self.ctx.constraints.narrow(*symbol, *ty, *origin);
                }
                let else_ty = self.eval(arena, or_else);
                let else_frame = self.ctx.constraints.snapshot_top();
                self.ctx.constraints.pop_frame();

                self.ctx.constraints.join(self.ctx.types, then_frame, else_frame);
                combine_types(self.ctx.types, &[then_ty, else_ty])
            }
            ExprKind::Dict { keys, values } => self.eval_dict(arena, &keys, &values),
            ExprKind::Set(elements) => {
                let elem = self.combine_elements(arena, &elements);
                self.ctx.types.intern_class_instance(self.ctx.builtins.set_class, smallvec![elem])
            }
            ExprKind::List(elements) => {
                let elem = self.combine_elements(arena, &elements);
                self.ctx.types.intern_class_instance(self.ctx.builtins.list_class, smallvec![elem])
            }
            ExprKind::Tuple(elements) => {
                let members: Vec<TypeId> = elements.iter().map(|&e| self.eval(arena, e)).collect();
                self.ctx.types.intern_tuple(members, false)
            }
            ExprKind::Compare { left, ops, comparators } => {
                self.eval(arena, left);
                for &c in &comparators {
                    self.eval(arena, c);
                }
                let _ = ops;
                TypeId::BOOL
            }
            ExprKind::Call { func, args, keywords } => self.eval_call(arena, func, &args, &keywords, span),
            ExprKind::Attribute { value, attr } => {
                let base = self.eval(arena, value);
                self.member_type_of(base, &attr, span)
            }
            ExprKind::Subscript { value, index } => self.eval_subscript(arena, value, index),
            ExprKind::Starred(inner) => self.eval(arena, inner),
            ExprKind::Await(inner) => self.eval(arena, inner),
            ExprKind::Yield(value) => self.eval_yield(arena, value, id),
            ExprKind::YieldFrom(inner) => {
                let ty = self.eval(arena, inner);
                self.eval_yield_value(ty, id);
                TypeId::UNKNOWN
            }
            ExprKind::ListComp { element, generators } => {
                let elem = self.eval_comprehension_element(arena, element, &generators);
                self.ctx.types.intern_class_instance(self.ctx.builtins.list_class, smallvec![elem])
            }
            ExprKind::SetComp { element, generators } => {
                let elem = self.eval_comprehension_element(arena, element, &generators);
                self.ctx.types.intern_class_instance(self.ctx.builtins.set_class, smallvec![elem])
            }
            ExprKind::GeneratorExp { element, generators } => {
                self.eval_comprehension_element(arena, element, &generators)
            }
            ExprKind::DictComp { key, value, generators } => {
                for g in &generators {
                    self.eval(arena, g.iter);
                    for &cond in &g.ifs {
                        self.eval(arena, cond);
                    }
                }
                let k = self.eval(arena, key);
                let v = self.eval(arena, value);
                self.ctx.types.intern_class_instance(self.ctx.builtins.dict_class, smallvec![k, v])
            }
            ExprKind::Ellipsis => TypeId::ANY,
        }
    }

    fn eval_constant(&mut self, c: &Constant) -> TypeId {
        match c {
            Constant::None => TypeId::NONE,
            Constant::Bool(b) => self.ctx.types.intern_literal(LiteralValue::Bool(*b)),
            Constant::Int(n) => self.ctx.types.intern_literal(LiteralValue::Int(*n)),
            Constant::Float(_) => TypeId::FLOAT,
            Constant::Str(s) => self.ctx.types.intern_literal(LiteralValue::Str(s.clone())),
            Constant::Bytes(b) => self.ctx.types.intern_literal(LiteralValue::Bytes(b.clone())),
        }
    }

    fn widen_literal(&self, ty: TypeId) -> TypeId {
        match self.ctx.types.get(ty) {
            Type::Literal(LiteralValue::Int(_)) => TypeId::INT,
            Type::Literal(LiteralValue::Bool(_)) => TypeId::BOOL,
            Type::Literal(LiteralValue::Str(_)) => TypeId::STR,
            Type::Literal(LiteralValue::Bytes(_)) => TypeId::BYTES,
            _ => ty,
        }
    }

    fn eval_name(&mut self, name: &str, id: NodeId, span: Span) -> TypeId {
        let scope = self.scope_of(id);
        let atom = self.ctx.interner.intern(name);
        let Some(symbol) = self.ctx.bound.scopes.resolve(scope, atom) else {
            if name == "self" || name == "cls" {
                if let Some(ty) = self.ctx.current_self_type() {
                    return ty;
                }
            }
            if name == "len" {
                return self.ctx.types.alloc_callable(self.ctx.builtins.len_shape);
            }
            if name == "isinstance" {
                return self.ctx.types.alloc_callable(self.ctx.builtins.isinstance_shape);
            }
            self.ctx.error(codes::NOT_DEFINED, span, format!("\"{name}\" is not defined"));
            return TypeId::UNKNOWN;
        };
        if let Some(ty) = self.ctx.constraints.current_type(symbol) {
            return ty;
        }
        if let Some(ty) = self.ctx.aggregator.combined_type(symbol) {
            return ty;
        }
        // A `def`/`class` symbol's own name is never fed through the
        // variable aggregator (its "value" is the shape built while
        // analyzing the statement, not something assigned to it), so fall
        // back to the persistent identity maps before giving up to
        // `Unknown`.
        let flags = self.ctx.bound.symbol(symbol).flags;
        if flags.has(SymbolFlags::FUNCTION) {
            if let Some(&shape_id) = self.ctx.function_shapes.get(&symbol) {
                return self.ctx.types.alloc_callable(shape_id);
            }
        }
        if flags.has(SymbolFlags::CLASS) {
            if let Some(&class_id) = self.ctx.class_ids.get(&symbol) {
                return self.ctx.types.intern_class_object(class_id);
            }
        }
        TypeId::UNKNOWN
    }

    fn bind_name(&mut self, name: &str, source: NodeId, ty: TypeId) {
        let scope = self.scope_of(source);
        let atom = self.ctx.interner.intern(name);
        if let Some(symbol) = self.ctx.bound.scopes.resolve(scope, atom) {
            self.ctx.record_symbol_type(symbol, source, ty);
        }
    }

    fn binop_result(&mut self, op: BinOp, left: TypeId, right: TypeId) -> TypeId {
        if left == TypeId::ANY || right == TypeId::ANY {
            return TypeId::ANY;
        }
        if left == TypeId::UNKNOWN || right == TypeId::UNKNOWN {
            return TypeId::UNKNOWN;
        }
        let left = self.widen_literal(left);
        let right = self.widen_literal(right);
        if matches!(op, BinOp::Add) && left == TypeId::STR && right == TypeId::STR {
            return TypeId::STR;
        }
        numeric_rank(left)
            .zip(numeric_rank(right))
            .map(|(a, b)| if a >= b { left } else { right })
            .unwrap_or(TypeId::UNKNOWN)
    }

    fn combine_elements(&mut self, arena: &Arena, elements: &[NodeId]) -> TypeId {
        let members: Vec<TypeId> = elements.iter().map(|&e| self.eval(arena, e)).collect();
        combine_types(self.ctx.types, &members)
    }

    fn eval_dict(&mut self, arena: &Arena, keys: &[Option<NodeId>], values: &[NodeId]) -> TypeId {
        let key_types: Vec<TypeId> = keys.iter().filter_map(|k| k.map(|id| self.eval(arena, id))).collect();
        let value_types: Vec<TypeId> = values.iter().map(|&v| self.eval(arena, v)).collect();
        let key = combine_types(self.ctx.types, &key_types);
        let value = combine_types(self.ctx.types, &value_types);
        self.ctx.types.intern_class_instance(self.ctx.builtins.dict_class, smallvec![key, value])
    }

    fn eval_lambda(&mut self, arena: &Arena, params: &[pyanalyze_ast::Param], body: NodeId) -> TypeId {
        let return_type = self.eval(arena, body);
        let param_infos = params
            .iter()
            .map(|p| pyanalyze_types::ParamInfo {
                name: self.ctx.interner.intern(&p.name),
                type_id: TypeId::UNKNOWN,
                kind: map_param_kind(p.kind),
                has_default: p.default.is_some(),
            })
            .collect();
        let shape_id = self.ctx.types.alloc_function_shape(pyanalyze_types::FunctionShape {
            name: pyanalyze_common::Atom::PLACEHOLDER,
            type_params: smallvec![],
            params: param_infos,
            return_type,
            is_bound: false,
            overloads: Vec::new(),
        });
        self.ctx.types.alloc_callable(shape_id)
    }

    fn eval_comprehension_element(
        &mut self,
        arena: &Arena,
        element: NodeId,
        generators: &[pyanalyze_ast::Comprehension],
    ) -> TypeId {
        for g in generators {
            self.eval(arena, g.iter);
            for &cond in &g.ifs {
                self.eval(arena, cond);
            }
        }
        self.eval(arena, element)
    }

    fn eval_yield(&mut self, arena: &Arena, value: Option<NodeId>, id: NodeId) -> TypeId {
        let ty = match value {
            Some(v) => self.eval(arena, v),
            None => TypeId::NONE,
        };
        self.eval_yield_value(ty, id);
        TypeId::UNKNOWN
    }

    fn eval_yield_value(&mut self, ty: TypeId, id: NodeId) {
        if let Some(shape) = self.ctx.current_function() {
            self.ctx.record_return_type(shape, id, ty);
        }
    }

    fn eval_call(&mut self, arena: &Arena, func: NodeId, args: &[NodeId], keywords: &[(Option<String>, NodeId)], span: Span) -> TypeId {
        let callee = self.eval(arena, func);
        let arguments: Vec<Argument> =
            args.iter().map(|&a| Argument { type_id: self.eval(arena, a), span: self.span_of(arena, a) }).collect();
        let kwargs: Vec<Keyword> = keywords
            .iter()
            .map(|(name, v)| Keyword {
                name: name.as_ref().map(|n| self.ctx.interner.intern(n)),
                type_id: self.eval(arena, *v),
                span: self.span_of(arena, *v),
            })
            .collect();
        self.call_type(callee, &arguments, &kwargs, span)
    }

    fn call_type(&mut self, callee: TypeId, args: &[Argument], keywords: &[Keyword], span: Span) -> TypeId {
        match self.ctx.types.get(callee).clone() {
            Type::Any => TypeId::ANY,
            Type::Unknown => TypeId::UNKNOWN,
            Type::Class(class_id) => {
                let instance = self.ctx.types.intern_class_instance(class_id, smallvec![]);
                let init = self.ctx.interner.intern("__init__");
                if let Some(result) = look_up_class_member(self.ctx.types, class_id, init, LookupFlags::default()) {
                    if let Type::Callable(shape_id) = self.ctx.types.get(result.type_id) {
                        let bound = bind_function_to_class_or_object(self.ctx.types, *shape_id, instance);
                        if let Type::Callable(bound_id) = self.ctx.types.get(bound) {
                            let shape = self.ctx.types.function_shape(*bound_id).clone();
                            let (_ret, errors) = match_call(self.ctx.types, self.ctx.interner, &shape, args, keywords, span);
                            self.report_arg_errors(errors);
                        }
                    }
                }
                instance
            }
            Type::Callable(shape_id) => {
                let shape = self.ctx.types.function_shape(shape_id).clone();
                if shape.overloads.is_empty() {
                    let (ret, errors) = match_call(self.ctx.types, self.ctx.interner, &shape, args, keywords, span);
                    self.report_arg_errors(errors);
                    ret
                } else {
                    let candidates: Vec<_> =
                        shape.overloads.iter().map(|&id| self.ctx.types.function_shape(id).clone()).collect();
                    let (ret, errors) =
                        select_overload(self.ctx.types, self.ctx.interner, &candidates, args, keywords, span);
                    self.report_arg_errors(errors);
                    ret
                }
            }
            Type::Union(members) => {
                let results: Vec<TypeId> = members.iter().map(|&m| self.call_type(m, args, keywords, span)).collect();
                combine_types(self.ctx.types, &results)
            }
            Type::Instance(class_id, _) => {
                let call = self.ctx.interner.intern("__call__");
                if let Some(result) = look_up_class_member(self.ctx.types, class_id, call, LookupFlags::default()) {
                    return self.call_type(result.type_id, args, keywords, span);
                }
                self.ctx.error(codes::NOT_CALLABLE, span, "value is not callable");
                TypeId::UNKNOWN
            }
            _ => {
                self.ctx.error(codes::NOT_CALLABLE, span, "value is not callable");
                TypeId::UNKNOWN
            }
        }
    }

    fn report_arg_errors(&mut self, errors: Vec<crate::overload::ArgError>) {
        for e in errors {
            self.ctx.error(e.code, e.span, e.message);
        }
    }

    /// Attribute access, including the optional-narrowing special case: a
    /// `None | T` base reports `OPTIONAL_ACCESS` once but still evaluates
    /// the member against `T` so the rest of the expression keeps a useful
    /// type instead of collapsing to `Unknown`.
    fn member_type_of(&mut self, base: TypeId, attr: &str, span: Span) -> TypeId {
        if base == TypeId::ANY {
            return TypeId::ANY;
        }
        if base == TypeId::UNKNOWN {
            return TypeId::UNKNOWN;
        }
        let base = self.widen_literal(base);
        let members = pyanalyze_types::union_members(self.ctx.types, base);
        if members.len() > 1 {
            let has_none = members.contains(&TypeId::NONE);
            let rest: Vec<TypeId> = members.iter().copied().filter(|&m| m != TypeId::NONE).collect();
            if has_none {
                self.ctx.error(codes::OPTIONAL_ACCESS, span, format!("\"{attr}\" is possibly accessed on None"));
            }
            let results: Vec<TypeId> = rest.into_iter().map(|m| self.member_of_single(m, attr, span)).collect();
            return combine_types(self.ctx.types, &results);
        }
        self.member_of_single(base, attr, span)
    }

    fn member_of_single(&mut self, base: TypeId, attr: &str, span: Span) -> TypeId {
        let atom = self.ctx.interner.intern(attr);
        match self.ctx.types.get(base).clone() {
            Type::Instance(class_id, args) => {
                let Some(result) = look_up_class_member(self.ctx.types, class_id, atom, LookupFlags::default()) else {
                    self.ctx.error(codes::UNKNOWN_MEMBER, span, format!("\"{attr}\" is not a known attribute"));
                    return TypeId::UNKNOWN;
                };
                let substitution = substitution_for_class_args(self.ctx.types, class_id, &args);
                let specialized = specialize(self.ctx.types, result.type_id, &substitution);
                if result.kind == pyanalyze_types::MemberKind::Method {
                    if let Type::Callable(shape_id) = self.ctx.types.get(specialized) {
                        return bind_function_to_class_or_object(self.ctx.types, *shape_id, base);
                    }
                }
                specialized
            }
            Type::Class(class_id) => {
                let flags = LookupFlags::SKIP_INSTANCE_VARIABLES;
                match look_up_class_member(self.ctx.types, class_id, atom, flags) {
                    Some(result) => result.type_id,
                    None => {
                        self.ctx.error(codes::UNKNOWN_MEMBER, span, format!("\"{attr}\" is not a known attribute"));
                        TypeId::UNKNOWN
                    }
                }
            }
            ty => {
                if let Some(class_id) = self.ctx.builtins.class_for_primitive(&ty) {
                    let instance = self.ctx.types.intern_class_instance(class_id, smallvec![]);
                    return self.member_of_single(instance, attr, span);
                }
                self.ctx.error(codes::UNKNOWN_MEMBER, span, format!("\"{attr}\" is not a known attribute"));
                TypeId::UNKNOWN
            }
        }
    }

    fn eval_subscript(&mut self, arena: &Arena, value: NodeId, index: NodeId) -> TypeId {
        let base = self.eval(arena, value);
        let base = self.widen_literal(base);
        self.eval(arena, index);
        match self.ctx.types.get(base).clone() {
            Type::Instance(class_id, args) if class_id == self.ctx.builtins.list_class => {
                args.first().copied().unwrap_or(TypeId::UNKNOWN)
            }
            Type::Instance(class_id, args) if class_id == self.ctx.builtins.set_class => {
                args.first().copied().unwrap_or(TypeId::UNKNOWN)
            }
            Type::Instance(class_id, args) if class_id == self.ctx.builtins.dict_class => {
                args.get(1).copied().unwrap_or(TypeId::UNKNOWN)
            }
            Type::Tuple(shape_id) => {
                let shape = self.ctx.types.tuple_shape(shape_id).clone();
                combine_types(self.ctx.types, &shape.elements)
            }
            Type::Str => TypeId::STR,
            Type::Any => TypeId::ANY,
            _ => TypeId::UNKNOWN,
        }
    }

    /// Recognizes the narrowing-relevant shapes of a condition expression
    /// (`isinstance(x, T)`, `x is None`, `x is not None`, a bare truthy
    /// name) and returns the `(symbol, type, origin)` to apply in the
    /// then-branch and in the else-branch respectively. Anything else
    /// narrows nothing in either branch.
    pub fn narrow_condition(
        &mut self,
        arena: &Arena,
        cond: NodeId,
    ) -> (Vec<(SymbolId, TypeId, NarrowingOrigin)>, Vec<(SymbolId, TypeId, NarrowingOrigin)>) {
        match &arena.expr(cond).kind {
            ExprKind::Call { func, args, keywords } if keywords.is_empty() && args.len() == 2 => {
                if let ExprKind::Name(name) = &arena.expr(*func).kind {
                    if name == "isinstance" {
                        if let ExprKind::Name(target) = &arena.expr(args[0]).kind {
                            let scope = self.scope_of(cond);
                            let atom = self.ctx.interner.intern(target);
                            if let Some(symbol) = self.ctx.bound.scopes.resolve(scope, atom) {
                                // `isinstance`'s second argument names a class
                                // (or tuple of classes), the same grammar a
                                // type annotation uses, not a runtime value.
                                let narrowed_ty = AnnotationEvaluator::new(self.ctx).eval(arena, args[1]);
                                let current = self.ctx.symbol_type(symbol);
                                let remaining = pyanalyze_types::subtract_type(self.ctx.types, current, narrowed_ty);
                                return (
                                    vec![(symbol, narrowed_ty, NarrowingOrigin::IsInstanceTrue)],
                                    vec![(symbol, remaining, NarrowingOrigin::IsInstanceFalse)],
                                );
                            }
                        }
                    }
                }
                (Vec::new(), Vec::new())
            }
            ExprKind::Compare { left, ops, comparators } if ops.len() == 1 && is_none_constant(arena, comparators[0]) => {
                if let ExprKind::Name(name) = &arena.expr(*left).kind {
                    let scope = self.scope_of(cond);
                    let atom = self.ctx.interner.intern(name);
                    if let Some(symbol) = self.ctx.bound.scopes.resolve(scope, atom) {
                        let current = self.ctx.symbol_type(symbol);
                        let not_none = pyanalyze_types::subtract_type(self.ctx.types, current, TypeId::NONE);
                        return match ops[0] {
                            CmpOp::Is | CmpOp::Eq => (
                                vec![(symbol, TypeId::NONE, NarrowingOrigin::IsNone)],
                                vec![(symbol, not_none, NarrowingOrigin::IsNotNone)],
                            ),
                            CmpOp::IsNot | CmpOp::NotEq => (
                                vec![(symbol, not_none, NarrowingOrigin::IsNotNone)],
                                vec![(symbol, TypeId::NONE, NarrowingOrigin::IsNone)],
                            ),
                            _ => (Vec::new(), Vec::new()),
                        };
                    }
                }
                (Vec::new(), Vec::new())
            }
            ExprKind::Name(name) => {
                let scope = self.scope_of(cond);
                let atom = self.ctx.interner.intern(name);
                if let Some(symbol) = self.ctx.bound.scopes.resolve(scope, atom) {
                    let current = self.ctx.symbol_type(symbol);
                    let not_none = pyanalyze_types::subtract_type(self.ctx.types, current, TypeId::NONE);
                    return (
                        vec![(symbol, not_none, NarrowingOrigin::Truthy)],
                        vec![(symbol, current, NarrowingOrigin::Falsy)],
                    );
                }
                (Vec::new(), Vec::new())
            }
            _ => (Vec::new(), Vec::new()),
        }
    }

}

fn is_none_constant(arena: &Arena, id: NodeId) -> bool {
    matches!(&arena.expr(id).kind, ExprKind::Constant(Constant::None))
}

fn numeric_rank(ty: TypeId) -> Option<u8> {
    match ty {
        TypeId::BOOL => Some(0),
        TypeId::INT => Some(1),
        TypeId::FLOAT => Some(2),
        _ => None,
    }
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
#[path = "tests/evaluator.rs"]
mod tests;
