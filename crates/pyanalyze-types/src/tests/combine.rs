use super::*;
use crate::types::TypeArena;

#[test]
fn combining_a_single_type_returns_it_unchanged() {
    let mut arena = TypeArena::new();
    assert_eq!(combine_types(&mut arena, &[TypeId::INT]), TypeId::INT);
}

#[test]
fn never_is_the_identity_element() {
    let mut arena = TypeArena::new();
    let combined = combine_types(&mut arena, &[TypeId::NEVER, TypeId::INT, TypeId::NEVER]);
    assert_eq!(combined, TypeId::INT);
}

#[test]
fn any_absorbs_everything() {
    let mut arena = TypeArena::new();
    let combined = combine_types(&mut arena, &[TypeId::INT, TypeId::ANY, TypeId::STR]);
    assert_eq!(combined, TypeId::ANY);
}

#[test]
fn combination_is_order_independent() {
    let mut arena = TypeArena::new();
    let a = combine_types(&mut arena, &[TypeId::INT, TypeId::STR, TypeId::NONE]);
    let b = combine_types(&mut arena, &[TypeId::NONE, TypeId::STR, TypeId::INT]);
    assert_eq!(a, b);
}

#[test]
fn nested_unions_flatten() {
    let mut arena = TypeArena::new();
    let inner = combine_types(&mut arena, &[TypeId::INT, TypeId::STR]);
    let outer = combine_types(&mut arena, &[inner, TypeId::NONE]);
    let direct = combine_types(&mut arena, &[TypeId::INT, TypeId::STR, TypeId::NONE]);
    assert_eq!(outer, direct);
}

#[test]
fn combination_is_idempotent() {
    let mut arena = TypeArena::new();
    let once = combine_types(&mut arena, &[TypeId::INT, TypeId::STR]);
    let twice = combine_types(&mut arena, &[once, once]);
    assert_eq!(once, twice);
}

#[test]
fn subtract_removes_member_from_union() {
    let mut arena = TypeArena::new();
    let optional_int = combine_types(&mut arena, &[TypeId::INT, TypeId::NONE]);
    let narrowed = subtract_type(&mut arena, optional_int, TypeId::NONE);
    assert_eq!(narrowed, TypeId::INT);
}
