//! `specialize`: substitutes type variables throughout a type, the
//! operation that turns a generic class's or function's declared shape
//! (`list[T]`, `def first(xs: list[T]) -> T`) into the concrete shape at a
//! particular use site once `T` has been solved for.

use crate::assign::TypeVarMap;
use crate::combine::combine_types;
use crate::ids::TypeId;
use crate::types::{FunctionShape, ParamInfo, Type, TupleShape, TypeArena};
use smallvec::SmallVec;

#[must_use]
pub fn specialize(arena: &mut TypeArena, type_id: TypeId, substitution: &TypeVarMap) -> TypeId {
    if substitution.is_empty() {
        return type_id;
    }
    match arena.get(type_id).clone() {
        Type::TypeVarRef(id) => substitution.get(&id).copied().unwrap_or(type_id),
        Type::Instance(class_id, args) => {
            let new_args: SmallVec<[TypeId; 2]> =
                args.iter().map(|&a| specialize(arena, a, substitution)).collect();
            if new_args == args {
                type_id
            } else {
                arena.intern_class_instance(class_id, new_args)
            }
        }
        Type::Union(members) => {
            let specialized: Vec<TypeId> = members.iter().map(|&m| specialize(arena, m, substitution)).collect();
            combine_types(arena, &specialized)
        }
        Type::Tuple(shape_id) => {
            let TupleShape { elements, open } = arena.tuple_shape(shape_id).clone();
            let new_elements: Vec<TypeId> = elements.iter().map(|&e| specialize(arena, e, substitution)).collect();
            if new_elements == elements {
                type_id
            } else {
                arena.intern_tuple(new_elements, open)
            }
        }
        Type::Callable(shape_id) => {
            let shape = arena.function_shape(shape_id).clone();
            let new_shape = specialize_function_shape(arena, &shape, substitution);
            let new_shape_id = arena.alloc_function_shape(new_shape);
            arena.alloc_callable(new_shape_id)
        }
        _ => type_id,
    }
}

fn specialize_function_shape(arena: &mut TypeArena, shape: &FunctionShape, substitution: &TypeVarMap) -> FunctionShape {
    let params: Vec<ParamInfo> = shape
        .params
        .iter()
        .map(|p| ParamInfo {
            name: p.name,
            type_id: specialize(arena, p.type_id, substitution),
            kind: p.kind,
            has_default: p.has_default,
        })
        .collect();
    let return_type = specialize(arena, shape.return_type, substitution);
    FunctionShape {
        name: shape.name,
        type_params: shape.type_params.clone(),
        params,
        return_type,
        is_bound: shape.is_bound,
        overloads: shape.overloads.clone(),
    }
}

/// Builds a substitution mapping a class's declared type parameters to the
/// type arguments supplied at an instantiation site, positionally.
#[must_use]
pub fn substitution_for_class_args(
    arena: &TypeArena,
    class_id: crate::ids::ClassId,
    args: &[TypeId],
) -> TypeVarMap {
    let type_params = &arena.class(class_id).type_params;
    type_params.iter().zip(args.iter()).map(|(&tv, &arg)| (tv, arg)).collect()
}

#[cfg(test)]
#[path = "tests/specialize.rs"]
mod tests;
