use super::*;
use pyanalyze_types::TypeArena;

#[test]
fn narrowing_applies_in_the_pushed_frame() {
    let mut stack = ConstraintStack::new();
    let symbol = SymbolId(0);
    assert_eq!(stack.current_type(symbol), None);
    stack.push_frame();
    stack.narrow(symbol, TypeId::INT, NarrowingOrigin::IsInstanceTrue);
    assert_eq!(stack.current_type(symbol), Some(TypeId::INT));
}

#[test]
fn popping_a_frame_discards_its_narrowing() {
    let mut stack = ConstraintStack::new();
    let symbol = SymbolId(0);
    stack.push_frame();
    stack.narrow(symbol, TypeId::INT, NarrowingOrigin::Truthy);
    stack.pop_frame();
    assert_eq!(stack.current_type(symbol), None);
}

#[test]
fn inner_frame_shadows_outer_frame() {
    let mut stack = ConstraintStack::new();
    let symbol = SymbolId(0);
    stack.narrow(symbol, TypeId::INT, NarrowingOrigin::Assignment);
    stack.push_frame();
    stack.narrow(symbol, TypeId::STR, NarrowingOrigin::IsInstanceTrue);
    assert_eq!(stack.current_type(symbol), Some(TypeId::STR));
    stack.pop_frame();
    assert_eq!(stack.current_type(symbol), Some(TypeId::INT));
}

#[test]
fn join_unions_the_two_branches() {
    let mut arena = TypeArena::new();
    let mut stack = ConstraintStack::new();
    let symbol = SymbolId(0);

    stack.push_frame();
    stack.narrow(symbol, TypeId::INT, NarrowingOrigin::IsInstanceTrue);
    let then_frame = stack.snapshot_top();
    stack.pop_frame();

    stack.push_frame();
    stack.narrow(symbol, TypeId::STR, NarrowingOrigin::IsInstanceFalse);
    let else_frame = stack.snapshot_top();
    stack.pop_frame();

    stack.join(&mut arena, then_frame, else_frame);
    let joined = stack.current_type(symbol).unwrap();
    assert!(pyanalyze_types::can_assign(&arena, TypeId::INT, joined));
    assert!(pyanalyze_types::can_assign(&arena, TypeId::STR, joined));
}

#[test]
fn join_keeps_the_single_branch_that_narrowed() {
    let mut arena = TypeArena::new();
    let mut stack = ConstraintStack::new();
    let symbol = SymbolId(0);

    stack.push_frame();
    stack.narrow(symbol, TypeId::INT, NarrowingOrigin::IsInstanceTrue);
    let then_frame = stack.snapshot_top();
    stack.pop_frame();

    let else_frame = FxHashMap::default();
    stack.join(&mut arena, then_frame, else_frame);
    assert_eq!(stack.current_type(symbol), Some(TypeId::INT));
}

#[test]
fn clear_removes_narrowing_from_the_current_frame() {
    let mut stack = ConstraintStack::new();
    let symbol = SymbolId(0);
    stack.narrow(symbol, TypeId::INT, NarrowingOrigin::Assignment);
    stack.clear(symbol);
    assert_eq!(stack.current_type(symbol), None);
}
