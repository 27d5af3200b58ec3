//! `combine_types`: folds a set of types into their union, normalized so the
//! same input set (in any order, with any amount of pre-existing nesting)
//! always produces the same `TypeId`. This is the operation the inferred-type
//! aggregator leans on to stay order-independent.

use crate::ids::TypeId;
use crate::types::{Type, TypeArena};
use smallvec::SmallVec;

#[must_use]
pub fn combine_types(arena: &mut TypeArena, members: &[TypeId]) -> TypeId {
    let mut flat: SmallVec<[TypeId; 4]> = SmallVec::new();
    flatten_into(arena, members, &mut flat);

    if flat.iter().any(|id| *id == TypeId::ANY) {
        return TypeId::ANY;
    }

    flat.retain(|id| *id != TypeId::NEVER);

    if flat.is_empty() {
        return TypeId::NEVER;
    }

    dedup_unordered(&mut flat);

    if flat.len() == 1 {
        return flat[0];
    }

    flat.sort_unstable_by_key(|id| id.0);
    arena.intern_union(flat)
}

fn flatten_into(arena: &TypeArena, members: &[TypeId], out: &mut SmallVec<[TypeId; 4]>) {
    for &id in members {
        match arena.get(id) {
            Type::Union(inner) => {
                let inner = inner.clone();
                flatten_into(arena, &inner, out);
            }
            _ => out.push(id),
        }
    }
}

fn dedup_unordered(ids: &mut SmallVec<[TypeId; 4]>) {
    let mut seen: SmallVec<[TypeId; 4]> = SmallVec::new();
    ids.retain(|id| {
        if seen.contains(id) {
            false
        } else {
            seen.push(*id);
            true
        }
    });
}

/// Splits a type into its union members, or a single-element slice if it
/// isn't a union. Used throughout the checker so callers never need to
/// special-case "is this a union" before iterating.
#[must_use]
pub fn union_members(arena: &TypeArena, id: TypeId) -> SmallVec<[TypeId; 4]> {
    match arena.get(id) {
        Type::Union(members) => members.clone(),
        _ => smallvec::smallvec![id],
    }
}

/// Removes `to_remove` from a union's members (spec's narrowing primitive
/// for `if x is not None`-style negative tests), re-combining the result.
#[must_use]
pub fn subtract_type(arena: &mut TypeArena, from: TypeId, to_remove: TypeId) -> TypeId {
    let members = union_members(arena, from);
    let remaining: Vec<TypeId> = members.into_iter().filter(|m| *m != to_remove).collect();
    combine_types(arena, &remaining)
}

#[cfg(test)]
#[path = "tests/combine.rs"]
mod tests;
