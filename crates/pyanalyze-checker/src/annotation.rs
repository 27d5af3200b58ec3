//! Evaluates a type-annotation expression into a `TypeId`. This is a
//! distinct grammar from ordinary expression evaluation: a bare `Name` in
//! annotation position refers to the *class object* it names rather than an
//! instance of it, and a handful of subscripted builtins (`Optional`,
//! `Union`, `Callable`, `List`, `Dict`, ...) are special syntax rather than
//! ordinary generic instantiation.

use pyanalyze_ast::{Arena, BinOp, Constant, ExprKind, NodeId};
use pyanalyze_types::{TypeId, combine_types};
use smallvec::smallvec;

use crate::context::CheckerContext;

pub struct AnnotationEvaluator<'a, 'ctx> {
    pub ctx: &'a mut CheckerContext<'ctx>,
}

impl<'a, 'ctx> AnnotationEvaluator<'a, 'ctx> {
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

    fn scope_of(&self, id: NodeId) -> pyanalyze_binder::ScopeId {
        self.ctx.bound.scope_of(id).unwrap_or(self.ctx.bound.module_scope)
    }

    fn eval_inner(&mut self, arena: &Arena, id: NodeId) -> TypeId {
        let expr = arena.expr(id);
        match &expr.kind {
            ExprKind::Constant(Constant::None) => TypeId::NONE,
            ExprKind::Constant(Constant::Str(s)) => {
                // A forward-reference string: left unresolved, the driver
                // re-checks once the named symbol exists.
                let atom = self.ctx.interner.intern(s);
                self.ctx.types.intern_unresolved(atom)
            }
            ExprKind::Ellipsis => TypeId::ANY,
            ExprKind::Name(name) => {
                let scope = self.scope_of(id);
                self.resolve_name(name, scope)
            }
            ExprKind::Attribute { attr, .. } => {
                let scope = self.scope_of(id);
                self.resolve_name(attr, scope)
            }
            ExprKind::Subscript { value, index } => self.eval_subscript(arena, *value, *index),
            ExprKind::BinOp { left, op: BinOp::BitOr, right } => {
                let l = self.eval(arena, *left);
                let r = self.eval(arena, *right);
                combine_types(self.ctx.types, &[l, r])
            }
            ExprKind::Tuple(elements) => {
                let members: Vec<TypeId> = elements.iter().map(|&e| self.eval(arena, e)).collect();
                self.ctx.types.intern_tuple(members, false)
            }
            _ => TypeId::UNKNOWN,
        }
    }

    fn resolve_name(&mut self, name: &str, scope: pyanalyze_binder::ScopeId) -> TypeId {
        match name {
            "int" => return TypeId::INT,
            "float" => return TypeId::FLOAT,
            "str" => return TypeId::STR,
            "bool" => return TypeId::BOOL,
            "bytes" => return TypeId::BYTES,
            "object" => return TypeId::OBJECT,
            "None" => return TypeId::NONE,
            "Any" => return TypeId::ANY,
            "Optional" | "Union" | "Callable" | "Type" | "ClassVar" | "List" | "Set" | "FrozenSet" | "Deque"
            | "Dict" | "DefaultDict" | "ChainMap" | "Protocol" | "Tuple" | "Generic" | "list" | "dict" | "set" => {
                // These are only meaningful subscripted; used bare they name
                // an unparameterized container and fall through to the
                // general symbol-resolution path below.
            }
            _ => {}
        }
        let atom = self.ctx.interner.intern(name);
        if let Some(symbol) = self.ctx.bound.scopes.resolve(scope, atom) {
            if let Some(&class_id) = self.ctx.class_ids.get(&symbol) {
                return self.ctx.types.intern_class_instance(class_id, smallvec![]);
            }
            if let Some(&tv) = self.ctx.type_var_ids.get(&symbol) {
                return self.ctx.types.intern_type_var_ref(tv);
            }
        }
        self.ctx.types.intern_unresolved(atom)
    }

    fn eval_subscript(&mut self, arena: &Arena, value: NodeId, index: NodeId) -> TypeId {
        let head = annotation_head_name(arena, value);
        match head.as_deref() {
            Some("Optional") => {
                let inner = self.eval(arena, index);
                combine_types(self.ctx.types, &[inner, TypeId::NONE])
            }
            Some("Union") => {
                let members = self.subscript_args(arena, index);
                combine_types(self.ctx.types, &members)
            }
            Some("List" | "list" | "Set" | "set" | "FrozenSet" | "Deque") => {
                let inner = self.eval(arena, index);
                self.ctx.types.intern_class_instance(self.ctx.builtins.list_class, smallvec![inner])
            }
            Some("Dict" | "dict" | "DefaultDict" | "ChainMap") => {
                let args = self.subscript_args(arena, index);
                let key = args.first().copied().unwrap_or(TypeId::UNKNOWN);
                let value = args.get(1).copied().unwrap_or(TypeId::UNKNOWN);
                self.ctx.types.intern_class_instance(self.ctx.builtins.dict_class, smallvec![key, value])
            }
            Some("Tuple" | "tuple") => {
                let args = self.subscript_args(arena, index);
                self.ctx.types.intern_tuple(args, false)
            }
            Some("Type" | "ClassVar" | "Generic" | "Protocol") => self.eval(arena, index),
            Some("Callable") => self.eval_callable(),
            _ => {
                // Unknown subscripted generic: evaluate the base so a
                // user-defined `Generic[T]` class still resolves to an
                // instance of itself, dropping the type arguments.
                self.eval(arena, value)
            }
        }
    }

    fn eval_callable(&mut self) -> TypeId {
        // `Callable[[ArgTypes...], ReturnType]`: the checker only needs
        // assignability against a declared return type, so this collapses
        // to `Any` rather than modeling a full synthetic `FunctionShape`.
        TypeId::ANY
    }

    fn subscript_args(&mut self, arena: &Arena, index: NodeId) -> Vec<TypeId> {
        match &arena.expr(index).kind {
            ExprKind::Tuple(elements) => elements.iter().map(|&e| self.eval(arena, e)).collect(),
            _ => vec![self.eval(arena, index)],
        }
    }
}

/// Reads the bare/qualified name naming a subscripted annotation's head
/// (`Optional` in `Optional[int]`, `List` in `typing.List[int]`) without
/// evaluating it as a type, since these names are syntax, not values.
fn annotation_head_name(arena: &Arena, id: NodeId) -> Option<String> {
    match &arena.expr(id).kind {
        ExprKind::Name(name) => Some(name.clone()),
        ExprKind::Attribute { attr, .. } => Some(attr.clone()),
        _ => None,
    }
}

#[cfg(test)]
#[path = "tests/annotation.rs"]
mod tests;
