//! The small slice of the standard library the checker needs to exist
//! without reading typeshed stubs: `object`, the exception hierarchy root,
//! and the handful of container/string members the testable scenarios
//! exercise (`str.find`, generic `list`/`dict`/`set`). Everything else
//! resolves through the normal class/function machinery once a module
//! defines it.

use pyanalyze_common::{Atom, Interner, Span};
use pyanalyze_types::{
    ClassData, ClassId, ClassMember, FunctionShape, MemberKind, ParamInfo, ParamKind, TypeArena,
    TypeId, TypeVarData, TypeVarId, Variance,
};
use rustc_hash::FxHashMap;
use smallvec::smallvec;

pub struct Builtins {
    pub object_class: ClassId,
    pub base_exception_class: ClassId,
    pub exception_class: ClassId,
    pub str_class: ClassId,
    pub list_class: ClassId,
    pub list_type_param: TypeVarId,
    pub dict_class: ClassId,
    pub dict_key_param: TypeVarId,
    pub dict_value_param: TypeVarId,
    pub set_class: ClassId,
    pub set_type_param: TypeVarId,
    /// `len(x) -> int`, accepting anything since this project doesn't
    /// model a `Sized` protocol.
    pub len_shape: pyanalyze_types::FunctionShapeId,
    /// `isinstance(x, class_or_tuple) -> bool`, used both as a plain call
    /// and (via `narrow_condition`'s own pattern match) as the narrowing
    /// form the statement analyzer recognizes directly.
    pub isinstance_shape: pyanalyze_types::FunctionShapeId,
}

fn alloc_class(
    arena: &mut TypeArena,
    interner: &mut Interner,
    name: &str,
    bases: &[ClassId],
    type_params: smallvec::SmallVec<[TypeVarId; 2]>,
) -> ClassId {
    let atom = interner.intern(name);
    let base_types = bases.iter().map(|&b| arena.intern_class_instance(b, smallvec![])).collect();
    let id = arena.alloc_class(ClassData {
        name: atom,
        bases: base_types,
        mro: Vec::new(),
        type_params,
        members: FxHashMap::default(),
        is_protocol: false,
        is_final: false,
        is_abstract: false,
        span: Span::dummy(),
    });
    let mut mro = vec![id];
    for &base in bases {
        mro.extend(arena.class(base).mro.iter().copied());
    }
    mro.dedup();
    arena.class_mut(id).mro = mro;
    id
}

fn insert_method(
    arena: &mut TypeArena,
    owner: ClassId,
    name: Atom,
    params: Vec<ParamInfo>,
    return_type: TypeId,
) {
    let shape_id = arena.alloc_function_shape(FunctionShape {
        name,
        type_params: smallvec![],
        params,
        return_type,
        is_bound: false,
        overloads: Vec::new(),
    });
    let type_id = arena.alloc_callable(shape_id);
    arena.class_mut(owner).members.insert(
        name,
        ClassMember { type_id, kind: MemberKind::Method, declared_span: Span::dummy(), is_private: false },
    );
}

fn positional(name: Atom, type_id: TypeId) -> ParamInfo {
    ParamInfo { name, type_id, kind: ParamKind::Positional, has_default: false }
}

impl Builtins {
    #[must_use]
    pub fn install(arena: &mut TypeArena, interner: &mut Interner) -> Self {
        let object_class = alloc_class(arena, interner, "object", &[], smallvec![]);
        let base_exception_class = alloc_class(arena, interner, "BaseException", &[object_class], smallvec![]);
        let exception_class = alloc_class(arena, interner, "Exception", &[base_exception_class], smallvec![]);

        let str_class = alloc_class(arena, interner, "str", &[object_class], smallvec![]);
        let self_name = interner.intern("self");
        let str_instance = arena.intern_class_instance(str_class, smallvec![]);
        let find_sub = interner.intern("sub");
        let find_name = interner.intern("find");
        insert_method(
            arena,
            str_class,
            find_name,
            vec![positional(self_name, str_instance), positional(find_sub, TypeId::STR)],
            TypeId::INT,
        );
        let upper_name = interner.intern("upper");
        insert_method(arena, str_class, upper_name, vec![positional(self_name, str_instance)], TypeId::STR);
        let startswith_name = interner.intern("startswith");
        let prefix_name = interner.intern("prefix");
        insert_method(
            arena,
            str_class,
            startswith_name,
            vec![positional(self_name, str_instance), positional(prefix_name, TypeId::STR)],
            TypeId::BOOL,
        );

        let list_tv = arena.alloc_type_var(TypeVarData {
            name: interner.intern("_T"),
            bound: None,
            constraints: smallvec![],
            variance: Variance::Invariant,
            default: None,
        });
        let list_class = alloc_class(arena, interner, "list", &[object_class], smallvec![list_tv]);

        let dict_k = arena.alloc_type_var(TypeVarData {
            name: interner.intern("_K"),
            bound: None,
            constraints: smallvec![],
            variance: Variance::Invariant,
            default: None,
        });
        let dict_v = arena.alloc_type_var(TypeVarData {
            name: interner.intern("_V"),
            bound: None,
            constraints: smallvec![],
            variance: Variance::Invariant,
            default: None,
        });
        let dict_class = alloc_class(arena, interner, "dict", &[object_class], smallvec![dict_k, dict_v]);

        let set_tv = arena.alloc_type_var(TypeVarData {
            name: interner.intern("_S"),
            bound: None,
            constraints: smallvec![],
            variance: Variance::Invariant,
            default: None,
        });
        let set_class = alloc_class(arena, interner, "set", &[object_class], smallvec![set_tv]);

        let len_arg = interner.intern("obj");
        let len_shape = arena.alloc_function_shape(FunctionShape {
            name: interner.intern("len"),
            type_params: smallvec![],
            params: vec![positional(len_arg, TypeId::ANY)],
            return_type: TypeId::INT,
            is_bound: false,
            overloads: Vec::new(),
        });

        let isinstance_obj = interner.intern("obj");
        let isinstance_class_or_tuple = interner.intern("class_or_tuple");
        let isinstance_shape = arena.alloc_function_shape(FunctionShape {
            name: interner.intern("isinstance"),
            type_params: smallvec![],
            params: vec![positional(isinstance_obj, TypeId::ANY), positional(isinstance_class_or_tuple, TypeId::ANY)],
            return_type: TypeId::BOOL,
            is_bound: false,
            overloads: Vec::new(),
        });

        Self {
            object_class,
            base_exception_class,
            exception_class,
            str_class,
            list_class,
            list_type_param: list_tv,
            dict_class,
            dict_key_param: dict_k,
            dict_value_param: dict_v,
            set_class,
            set_type_param: set_tv,
            len_shape,
            isinstance_shape,
        }
    }

    /// Maps a primitive type tag to the builtin class that carries its
    /// methods, for attribute lookups on values that aren't `Instance`s.
    #[must_use]
    pub fn class_for_primitive(&self, ty: &pyanalyze_types::Type) -> Option<ClassId> {
        match ty {
            pyanalyze_types::Type::Str => Some(self.str_class),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "tests/builtins.rs"]
mod tests;
