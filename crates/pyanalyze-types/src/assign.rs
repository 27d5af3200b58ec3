//! `can_assign`: the assignability relation everything else (argument
//! matching, return-type checks, narrowing) is built on. A free function
//! over `&TypeArena`, not an inherent method, so it can be called during
//! type construction before any checker state exists yet.

use crate::combine::union_members;
use crate::ids::{ClassId, TypeId, TypeVarId};
use crate::member_lookup::{LookupFlags, look_up_class_member};
use crate::types::{MemberKind, Type, TypeArena};
use pyanalyze_common::limits::MAX_ASSIGNABILITY_DEPTH;
use rustc_hash::{FxHashMap, FxHashSet};

/// Bindings discovered for the target's free type variables while checking
/// assignability of a generic signature against a concrete call. Populated
/// in place so callers (argument matching) can read back what was inferred.
pub type TypeVarMap = FxHashMap<TypeVarId, TypeId>;

struct AssignCtx<'a> {
    arena: &'a TypeArena,
    var_map: Option<&'a mut TypeVarMap>,
    visited: FxHashSet<(TypeId, TypeId)>,
    depth_limit: u32,
}

#[must_use]
pub fn can_assign(arena: &TypeArena, source: TypeId, target: TypeId) -> bool {
    can_assign_with_bindings(arena, source, target, None)
}

#[must_use]
pub fn can_assign_with_bindings(
    arena: &TypeArena,
    source: TypeId,
    target: TypeId,
    var_map: Option<&mut TypeVarMap>,
) -> bool {
    let mut ctx = AssignCtx { arena, var_map, visited: FxHashSet::default(), depth_limit: MAX_ASSIGNABILITY_DEPTH };
    assign_inner(&mut ctx, source, target, 0)
}

fn assign_inner(ctx: &mut AssignCtx<'_>, source: TypeId, target: TypeId, depth: u32) -> bool {
    if depth > ctx.depth_limit {
        // Recursion-depth bound hit on a presumably-infinite type graph;
        // treat as assignable rather than false-positive-erroring the user
        // on a type we gave up analyzing precisely.
        return true;
    }
    if source == target {
        return true;
    }
    if !ctx.visited.insert((source, target)) {
        // We've already started checking this exact pair further up the
        // call stack: the type is (co-)recursive and this path doesn't add
        // new information either way.
        return true;
    }

    let result = assign_uncached(ctx, source, target, depth);
    ctx.visited.remove(&(source, target));
    result
}

fn assign_uncached(ctx: &mut AssignCtx<'_>, source: TypeId, target: TypeId, depth: u32) -> bool {
    if target == TypeId::ANY || source == TypeId::ANY {
        return true;
    }
    if target == TypeId::UNKNOWN || source == TypeId::UNKNOWN {
        return true;
    }
    if source == TypeId::NEVER {
        return true;
    }
    if target == TypeId::NEVER {
        return false;
    }
    if target == TypeId::OBJECT {
        return true;
    }

    // Assigning *into* a union: succeeds if source fits any branch.
    if matches!(ctx.arena.get(target), Type::Union(_)) {
        let members = union_members(ctx.arena, target);
        return members.iter().any(|&m| assign_inner(ctx, source, m, depth + 1));
    }

    // Assigning *from* a union: every branch must fit the target.
    if matches!(ctx.arena.get(source), Type::Union(_)) {
        let members = union_members(ctx.arena, source);
        return members.iter().all(|&m| assign_inner(ctx, m, target, depth + 1));
    }

    if let Type::TypeVarRef(id) = *ctx.arena.get(target) {
        return bind_type_var(ctx, id, source);
    }

    match (ctx.arena.get(source).clone(), ctx.arena.get(target).clone()) {
        (Type::Bool, Type::Int) => true,
        (Type::Literal(crate::types::LiteralValue::Bool(_)), Type::Bool) => true,
        (Type::Literal(crate::types::LiteralValue::Bool(_)), Type::Int) => true,
        (Type::Literal(crate::types::LiteralValue::Int(_)), Type::Int) => true,
        (Type::Literal(crate::types::LiteralValue::Str(_)), Type::Str) => true,
        (Type::Literal(crate::types::LiteralValue::Bytes(_)), Type::Bytes) => true,
        (Type::Instance(sc, sargs), Type::Instance(tc, targs)) => {
            assign_instance(ctx, sc, &sargs, tc, &targs, depth)
        }
        (Type::Class(sc), Type::Class(tc)) => is_subclass(ctx.arena, sc, tc),
        (Type::Tuple(s_shape), Type::Tuple(t_shape)) => {
            let s = ctx.arena.tuple_shape(s_shape).clone();
            let t = ctx.arena.tuple_shape(t_shape).clone();
            assign_tuple(ctx, &s, &t, depth)
        }
        (Type::Callable(s_shape), Type::Callable(t_shape)) => {
            assign_callable(ctx, s_shape, t_shape, depth)
        }
        (Type::TypeVarRef(id), _) => {
            let bound = ctx.var_map.as_ref().and_then(|m| m.get(&id).copied());
            match bound {
                Some(resolved) => assign_inner(ctx, resolved, target, depth + 1),
                None => {
                    let data = ctx.arena.type_var(id);
                    match data.bound {
                        Some(bound_id) => assign_inner(ctx, bound_id, target, depth + 1),
                        None => true,
                    }
                }
            }
        }
        (s, t) => primitive_eq(&s, &t),
    }
}

fn primitive_eq(a: &Type, b: &Type) -> bool {
    matches!(
        (a, b),
        (Type::None, Type::None)
            | (Type::Bool, Type::Bool)
            | (Type::Int, Type::Int)
            | (Type::Float, Type::Float)
            | (Type::Str, Type::Str)
            | (Type::Bytes, Type::Bytes)
            | (Type::Object, Type::Object)
    ) || matches!((a, b), (Type::Int, Type::Float))
}

fn bind_type_var(ctx: &mut AssignCtx<'_>, id: TypeVarId, source: TypeId) -> bool {
    let constraints = ctx.arena.type_var(id).constraints.clone();
    if !constraints.is_empty() && !constraints.iter().any(|c| *c == source) {
        return false;
    }
    if let Some(bound) = ctx.arena.type_var(id).bound {
        if !can_assign(ctx.arena, source, bound) {
            return false;
        }
    }
    if let Some(map) = ctx.var_map.as_deref_mut() {
        map.entry(id).or_insert(source);
    }
    true
}

fn is_subclass(arena: &TypeArena, source: ClassId, target: ClassId) -> bool {
    if source == target {
        return true;
    }
    arena.class(source).mro.contains(&target)
}

fn assign_instance(
    ctx: &mut AssignCtx<'_>,
    source_class: ClassId,
    source_args: &[TypeId],
    target_class: ClassId,
    target_args: &[TypeId],
    depth: u32,
) -> bool {
    if ctx.arena.class(target_class).is_protocol {
        return satisfies_protocol(ctx, source_class, target_class, depth);
    }
    if !is_subclass(ctx.arena, source_class, target_class) {
        return false;
    }
    if target_args.is_empty() {
        return true;
    }
    if source_args.len() != target_args.len() {
        // Mismatched arity after substitution means the source wasn't
        // actually specialized for this base; be conservative and accept,
        // mirroring how partially-resolved generics are treated elsewhere.
        return true;
    }
    let type_params = ctx.arena.class(target_class).type_params.clone();
    source_args.iter().zip(target_args.iter()).enumerate().all(|(i, (&s, &t))| {
        let variance = type_params.get(i).map(|tv| ctx.arena.type_var(*tv).variance).unwrap_or(crate::types::Variance::Invariant);
        match variance {
            crate::types::Variance::Covariant => assign_inner(ctx, s, t, depth + 1),
            crate::types::Variance::Contravariant => assign_inner(ctx, t, s, depth + 1),
            crate::types::Variance::Invariant => assign_inner(ctx, s, t, depth + 1) && assign_inner(ctx, t, s, depth + 1),
        }
    })
}

fn satisfies_protocol(ctx: &mut AssignCtx<'_>, source_class: ClassId, protocol: ClassId, depth: u32) -> bool {
    let members: Vec<_> = ctx.arena.class(protocol).members.iter().map(|(k, v)| (*k, v.type_id, v.kind)).collect();
    members.iter().all(|(name, expected_type, kind)| {
        match look_up_class_member(ctx.arena, source_class, *name, LookupFlags::default()) {
            Some(found) => {
                if *kind == MemberKind::Method {
                    assign_inner(ctx, found.type_id, *expected_type, depth + 1)
                } else {
                    assign_inner(ctx, found.type_id, *expected_type, depth + 1)
                        && assign_inner(ctx, *expected_type, found.type_id, depth + 1)
                }
            }
            None => false,
        }
    })
}

fn assign_tuple(
    ctx: &mut AssignCtx<'_>,
    source: &crate::types::TupleShape,
    target: &crate::types::TupleShape,
    depth: u32,
) -> bool {
    if target.open {
        let Some(&target_elem) = target.elements.first() else { return true };
        return source.elements.iter().all(|&e| assign_inner(ctx, e, target_elem, depth + 1));
    }
    if source.open {
        return false;
    }
    if source.elements.len() != target.elements.len() {
        return false;
    }
    source
        .elements
        .iter()
        .zip(target.elements.iter())
        .all(|(&s, &t)| assign_inner(ctx, s, t, depth + 1))
}

fn assign_callable(
    ctx: &mut AssignCtx<'_>,
    source_shape: crate::ids::FunctionShapeId,
    target_shape: crate::ids::FunctionShapeId,
    depth: u32,
) -> bool {
    let source = ctx.arena.function_shape(source_shape).clone();
    let target = ctx.arena.function_shape(target_shape).clone();

    if !assign_inner(ctx, source.return_type, target.return_type, depth + 1) {
        return false;
    }

    // Parameters are contravariant: the source (being assigned into the
    // target's slot) must accept everything the target's callers could
    // pass, i.e. target's param types must be assignable to source's.
    let positional_source: Vec<_> = source.params.iter().filter(|p| p.kind == crate::types::ParamKind::Positional).collect();
    let positional_target: Vec<_> = target.params.iter().filter(|p| p.kind == crate::types::ParamKind::Positional).collect();
    if positional_source.len() > positional_target.len() {
        return false;
    }
    positional_source
        .iter()
        .zip(positional_target.iter())
        .all(|(s, t)| assign_inner(ctx, t.type_id, s.type_id, depth + 1))
}

#[cfg(test)]
#[path = "tests/assign.rs"]
mod tests;
