use super::*;
use crate::ids::TypeId;
use pyanalyze_common::Interner;

#[test]
fn primitives_render_as_their_annotation_spelling() {
    let arena = TypeArena::new();
    let interner = Interner::new();
    assert_eq!(as_string(&arena, &interner, TypeId::INT), "int");
    assert_eq!(as_string(&arena, &interner, TypeId::NONE), "None");
    assert_eq!(as_string(&arena, &interner, TypeId::ANY), "Any");
}

#[test]
fn union_renders_each_member_joined_by_pipe() {
    let mut arena = TypeArena::new();
    let interner = Interner::new();
    let union = crate::combine::combine_types(&mut arena, &[TypeId::INT, TypeId::NONE]);
    assert_eq!(as_string(&arena, &interner, union), "int | None");
}

#[test]
fn generic_instance_renders_its_type_arguments() {
    let mut arena = TypeArena::new();
    let mut interner = Interner::new();
    let name = interner.intern("list");
    let class_id = arena.alloc_class(crate::types::ClassData {
        name,
        bases: Vec::new(),
        mro: Vec::new(),
        type_params: smallvec::smallvec![],
        members: rustc_hash::FxHashMap::default(),
        is_protocol: false,
        is_final: false,
        is_abstract: false,
        span: pyanalyze_common::Span::dummy(),
    });
    let instance = arena.intern_class_instance(class_id, smallvec::smallvec![TypeId::STR]);
    assert_eq!(as_string(&arena, &interner, instance), "list[str]");
}

#[test]
fn int_literal_renders_as_a_literal_annotation() {
    let mut arena = TypeArena::new();
    let interner = Interner::new();
    let lit = arena.intern_literal(crate::types::LiteralValue::Int(1));
    assert_eq!(as_string(&arena, &interner, lit), "Literal[1]");
}
