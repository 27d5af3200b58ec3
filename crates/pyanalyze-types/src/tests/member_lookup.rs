use super::*;
use crate::types::{ClassData, ClassMember, MemberKind, TypeArena};
use pyanalyze_common::Span;

fn make_class(arena: &mut TypeArena, name: &str, interner: &mut pyanalyze_common::Interner) -> ClassId {
    let name_atom = interner.intern(name);
    arena.alloc_class(ClassData {
        name: name_atom,
        bases: Vec::new(),
        mro: Vec::new(),
        type_params: Default::default(),
        members: Default::default(),
        is_protocol: false,
        is_final: false,
        is_abstract: false,
        span: Span::dummy(),
    })
}

#[test]
fn finds_member_declared_directly_on_class() {
    let mut arena = TypeArena::new();
    let mut interner = pyanalyze_common::Interner::new();
    let dog = make_class(&mut arena, "Dog", &mut interner);
    let bark = interner.intern("bark");
    arena.class_mut(dog).members.insert(
        bark,
        ClassMember { type_id: TypeId::NONE, kind: MemberKind::Method, declared_span: Span::dummy(), is_private: false },
    );
    arena.class_mut(dog).mro = vec![dog];

    let found = look_up_class_member(&arena, dog, bark, LookupFlags::default());
    assert!(found.is_some());
    assert_eq!(found.unwrap().owner, dog);
}

#[test]
fn finds_inherited_member_via_mro() {
    let mut arena = TypeArena::new();
    let mut interner = pyanalyze_common::Interner::new();
    let animal = make_class(&mut arena, "Animal", &mut interner);
    let dog = make_class(&mut arena, "Dog", &mut interner);
    let eat = interner.intern("eat");
    arena.class_mut(animal).members.insert(
        eat,
        ClassMember { type_id: TypeId::NONE, kind: MemberKind::Method, declared_span: Span::dummy(), is_private: false },
    );
    arena.class_mut(dog).mro = vec![dog, animal];

    let found = look_up_class_member(&arena, dog, eat, LookupFlags::default());
    assert_eq!(found.unwrap().owner, animal);
}

#[test]
fn missing_member_returns_none() {
    let mut arena = TypeArena::new();
    let mut interner = pyanalyze_common::Interner::new();
    let dog = make_class(&mut arena, "Dog", &mut interner);
    arena.class_mut(dog).mro = vec![dog];
    let missing = interner.intern("fly");
    assert!(look_up_class_member(&arena, dog, missing, LookupFlags::default()).is_none());
}

#[test]
fn super_lookup_skips_the_starting_class() {
    let mut arena = TypeArena::new();
    let mut interner = pyanalyze_common::Interner::new();
    let animal = make_class(&mut arena, "Animal", &mut interner);
    let dog = make_class(&mut arena, "Dog", &mut interner);
    let speak = interner.intern("speak");
    arena.class_mut(animal).members.insert(
        speak,
        ClassMember { type_id: TypeId::NONE, kind: MemberKind::Method, declared_span: Span::dummy(), is_private: false },
    );
    arena.class_mut(dog).members.insert(
        speak,
        ClassMember { type_id: TypeId::INT, kind: MemberKind::Method, declared_span: Span::dummy(), is_private: false },
    );
    arena.class_mut(dog).mro = vec![dog, animal];

    let found = look_up_member_via_super(&arena, dog, speak, LookupFlags::default());
    assert_eq!(found.unwrap().owner, animal);
}
