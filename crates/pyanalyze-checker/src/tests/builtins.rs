use super::*;

#[test]
fn str_find_is_a_bound_method_returning_int() {
    let mut arena = TypeArena::new();
    let mut interner = Interner::new();
    let builtins = Builtins::install(&mut arena, &mut interner);
    let find = interner.intern("find");
    let result = pyanalyze_types::look_up_class_member(&arena, builtins.str_class, find, pyanalyze_types::LookupFlags::default());
    assert!(result.is_some());
}

#[test]
fn exception_derives_from_base_exception() {
    let mut arena = TypeArena::new();
    let mut interner = Interner::new();
    let builtins = Builtins::install(&mut arena, &mut interner);
    assert!(arena.class(builtins.exception_class).mro.contains(&builtins.base_exception_class));
}
