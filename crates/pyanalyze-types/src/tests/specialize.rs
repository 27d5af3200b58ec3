use super::*;
use crate::types::{ClassData, TypeArena, TypeVarData, Variance};
use pyanalyze_common::Span;

#[test]
fn specializing_with_empty_substitution_is_a_no_op() {
    let mut arena = TypeArena::new();
    let map = TypeVarMap::default();
    assert_eq!(specialize(&mut arena, TypeId::INT, &map), TypeId::INT);
}

#[test]
fn substitutes_a_bare_type_var() {
    let mut arena = TypeArena::new();
    let mut interner = pyanalyze_common::Interner::new();
    let t_name = interner.intern("T");
    let tv = arena.alloc_type_var(TypeVarData { name: t_name, bound: None, constraints: Default::default(), variance: Variance::Invariant, default: None });
    let t_ref = arena.intern_type_var_ref(tv);

    let mut map = TypeVarMap::default();
    map.insert(tv, TypeId::STR);

    assert_eq!(specialize(&mut arena, t_ref, &map), TypeId::STR);
}

#[test]
fn substitutes_type_var_inside_generic_instance() {
    let mut arena = TypeArena::new();
    let mut interner = pyanalyze_common::Interner::new();
    let list_name = interner.intern("list");
    let t_name = interner.intern("T");
    let tv = arena.alloc_type_var(TypeVarData { name: t_name, bound: None, constraints: Default::default(), variance: Variance::Covariant, default: None });
    let list_class = arena.alloc_class(ClassData {
        name: list_name,
        bases: Vec::new(),
        mro: Vec::new(),
        type_params: smallvec::smallvec![tv],
        members: Default::default(),
        is_protocol: false,
        is_final: false,
        is_abstract: false,
        span: Span::dummy(),
    });
    arena.class_mut(list_class).mro = vec![list_class];

    let t_ref = arena.intern_type_var_ref(tv);
    let generic_list = arena.intern_class_instance(list_class, smallvec::smallvec![t_ref]);

    let substitution = substitution_for_class_args(&arena, list_class, &[TypeId::INT]);
    let specialized = specialize(&mut arena, generic_list, &substitution);

    match arena.get(specialized) {
        crate::types::Type::Instance(class_id, args) => {
            assert_eq!(*class_id, list_class);
            assert_eq!(args[0], TypeId::INT);
        }
        other => panic!("expected Instance, got {other:?}"),
    }
}
