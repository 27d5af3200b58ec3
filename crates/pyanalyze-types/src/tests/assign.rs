use super::*;
use crate::combine::combine_types;
use crate::types::{ClassData, LiteralValue, TypeArena};
use pyanalyze_common::Span;

fn empty_class(arena: &mut TypeArena, name: &str, bases: Vec<TypeId>) -> ClassId {
    let mut interner = pyanalyze_common::Interner::new();
    let name = interner.intern(name);
    let id = arena.alloc_class(ClassData {
        name,
        bases,
        mro: Vec::new(),
        type_params: Default::default(),
        members: Default::default(),
        is_protocol: false,
        is_final: false,
        is_abstract: false,
        span: Span::dummy(),
    });
    arena.class_mut(id).mro = vec![id];
    id
}

#[test]
fn identical_types_are_assignable() {
    let arena = TypeArena::new();
    assert!(can_assign(&arena, TypeId::INT, TypeId::INT));
}

#[test]
fn anything_is_assignable_to_any() {
    let arena = TypeArena::new();
    assert!(can_assign(&arena, TypeId::INT, TypeId::ANY));
    assert!(can_assign(&arena, TypeId::ANY, TypeId::INT));
}

#[test]
fn never_is_assignable_to_everything() {
    let arena = TypeArena::new();
    assert!(can_assign(&arena, TypeId::NEVER, TypeId::STR));
}

#[test]
fn bool_is_assignable_to_int() {
    let arena = TypeArena::new();
    assert!(can_assign(&arena, TypeId::BOOL, TypeId::INT));
    assert!(!can_assign(&arena, TypeId::INT, TypeId::BOOL));
}

#[test]
fn int_is_assignable_to_optional_int() {
    let mut arena = TypeArena::new();
    let optional_int = combine_types(&mut arena, &[TypeId::INT, TypeId::NONE]);
    assert!(can_assign(&arena, TypeId::INT, optional_int));
    assert!(!can_assign(&arena, optional_int, TypeId::INT));
}

#[test]
fn union_source_requires_every_branch_assignable() {
    let mut arena = TypeArena::new();
    let int_or_str = combine_types(&mut arena, &[TypeId::INT, TypeId::STR]);
    let int_or_str_or_none = combine_types(&mut arena, &[TypeId::INT, TypeId::STR, TypeId::NONE]);
    assert!(can_assign(&arena, int_or_str, int_or_str_or_none));
    assert!(!can_assign(&arena, int_or_str_or_none, int_or_str));
}

#[test]
fn subclass_is_assignable_to_base_class() {
    let mut arena = TypeArena::new();
    let animal = empty_class(&mut arena, "Animal", vec![]);
    let dog = empty_class(&mut arena, "Dog", vec![]);
    arena.class_mut(dog).mro = vec![dog, animal];
    let dog_instance = arena.intern_class_instance(dog, Default::default());
    let animal_instance = arena.intern_class_instance(animal, Default::default());
    assert!(can_assign(&arena, dog_instance, animal_instance));
    assert!(!can_assign(&arena, animal_instance, dog_instance));
}

#[test]
fn literal_is_assignable_to_its_widened_type() {
    let mut arena = TypeArena::new();
    let lit = arena.intern_literal(LiteralValue::Str("ok".into()));
    assert!(can_assign(&arena, lit, TypeId::STR));
}

#[test]
fn recursive_class_does_not_infinite_loop() {
    let mut arena = TypeArena::new();
    let node = empty_class(&mut arena, "Node", vec![]);
    let self_ref = arena.intern_class_instance(node, Default::default());
    assert!(can_assign(&arena, self_ref, self_ref));
}
