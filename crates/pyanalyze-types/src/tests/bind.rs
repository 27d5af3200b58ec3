use super::*;
use crate::types::{FunctionShape, ParamInfo, ParamKind, Type, TypeArena};

#[test]
fn binding_strips_the_leading_self_parameter() {
    let mut arena = TypeArena::new();
    let mut interner = pyanalyze_common::Interner::new();
    let self_name = interner.intern("self");
    let x_name = interner.intern("x");
    let method_name = interner.intern("bark");

    let shape_id = arena.alloc_function_shape(FunctionShape {
        name: method_name,
        type_params: Default::default(),
        params: vec![
            ParamInfo { name: self_name, type_id: TypeId::OBJECT, kind: ParamKind::Positional, has_default: false },
            ParamInfo { name: x_name, type_id: TypeId::INT, kind: ParamKind::Positional, has_default: false },
        ],
        return_type: TypeId::NONE,
        is_bound: false,
        overloads: Vec::new(),
    });

    let bound = bind_function_to_class_or_object(&mut arena, shape_id, TypeId::OBJECT);
    match arena.get(bound) {
        Type::Callable(bound_shape_id) => {
            let shape = arena.function_shape(*bound_shape_id);
            assert_eq!(shape.params.len(), 1);
            assert_eq!(shape.params[0].name, x_name);
            assert!(shape.is_bound);
        }
        other => panic!("expected Callable, got {other:?}"),
    }
}

#[test]
fn already_bound_shape_is_untouched() {
    let mut arena = TypeArena::new();
    let mut interner = pyanalyze_common::Interner::new();
    let name = interner.intern("helper");
    let shape_id = arena.alloc_function_shape(FunctionShape {
        name,
        type_params: Default::default(),
        params: Vec::new(),
        return_type: TypeId::NONE,
        is_bound: true,
        overloads: Vec::new(),
    });
    let bound = bind_function_to_class_or_object(&mut arena, shape_id, TypeId::OBJECT);
    assert!(is_already_bound(&arena, bound));
}
