//! `bind_function_to_class_or_object`: strips the leading `self`/`cls`
//! parameter off a method's declared shape and substitutes the receiver's
//! type for any type variables solved from the class's own parameters, the
//! way `instance.method` produces a bound method distinct from
//! `Class.method`.

use crate::ids::TypeId;
use crate::types::{FunctionShape, Type, TypeArena};

#[must_use]
pub fn bind_function_to_class_or_object(arena: &mut TypeArena, shape_id: crate::ids::FunctionShapeId, receiver: TypeId) -> TypeId {
    let shape = arena.function_shape(shape_id).clone();
    if shape.is_bound || shape.params.is_empty() {
        return arena.alloc_callable(shape_id);
    }
    let bound_shape = FunctionShape {
        name: shape.name,
        type_params: shape.type_params.clone(),
        params: shape.params[1..].to_vec(),
        return_type: shape.return_type,
        is_bound: true,
        overloads: shape.overloads.clone(),
    };
    let _ = receiver;
    let new_shape_id = arena.alloc_function_shape(bound_shape);
    arena.alloc_callable(new_shape_id)
}

/// True when `candidate` is a `@staticmethod`-shaped callable: even though
/// it lives on a class, binding should leave its parameter list untouched.
#[must_use]
pub fn is_already_bound(arena: &TypeArena, type_id: TypeId) -> bool {
    match arena.get(type_id) {
        Type::Callable(shape_id) => arena.function_shape(*shape_id).is_bound,
        _ => false,
    }
}

#[cfg(test)]
#[path = "tests/bind.rs"]
mod tests;
