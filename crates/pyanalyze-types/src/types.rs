//! The type universe: the `Type` enum plus the out-of-line shape tables for
//! variants whose payload is too large to store inline in the arena's
//! `Vec<Type>` (classes, function signatures, type variables, tuples).

use crate::ids::{ClassId, FunctionShapeId, TupleShapeId, TypeId, TypeVarId};
use pyanalyze_common::{Atom, Span};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

#[derive(Clone, Debug, PartialEq)]
pub enum LiteralValue {
    Int(i64),
    Bool(bool),
    Str(String),
    Bytes(Vec<u8>),
}

#[derive(Clone, Debug)]
pub enum Type {
    /// `Unknown` — the gradual-typing bottom-of-knowledge marker. Unlike
    /// `Any`, assignability to/from `Unknown` is still checked where the
    /// other side is concrete; it exists so inference failures don't widen
    /// into silently-accepts-everything `Any`.
    Unknown,
    /// The explicit escape hatch: assignable to and from everything.
    Any,
    /// The empty type: no value has this type. The identity element for
    /// union combination and the return type of a function that never
    /// returns.
    Never,
    None,
    Module(Atom),
    Bool,
    Int,
    Float,
    Str,
    Bytes,
    Object,
    /// `Type[C]` — the class object itself, not an instance of it.
    Class(ClassId),
    /// An instance of a (possibly generic) class, with type arguments
    /// already substituted in slot order matching `ClassData::type_params`.
    Instance(ClassId, SmallVec<[TypeId; 2]>),
    Union(SmallVec<[TypeId; 4]>),
    Tuple(TupleShapeId),
    Callable(FunctionShapeId),
    TypeVarRef(TypeVarId),
    Literal(LiteralValue),
    /// A forward reference to a symbol not yet resolved at the point this
    /// type was created; the driver resolves these to a concrete type once
    /// the binder has processed the target symbol.
    Unresolved(Atom),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Variance {
    Invariant,
    Covariant,
    Contravariant,
}

#[derive(Clone, Debug)]
pub struct TypeVarData {
    pub name: Atom,
    pub bound: Option<TypeId>,
    pub constraints: SmallVec<[TypeId; 2]>,
    pub variance: Variance,
    pub default: Option<TypeId>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamKind {
    Positional,
    KeywordOnly,
    VarArgs,
    VarKeyword,
}

#[derive(Clone, Debug)]
pub struct ParamInfo {
    pub name: Atom,
    pub type_id: TypeId,
    pub kind: ParamKind,
    pub has_default: bool,
}

#[derive(Clone, Debug)]
pub struct FunctionShape {
    pub name: Atom,
    pub type_params: SmallVec<[TypeVarId; 1]>,
    pub params: Vec<ParamInfo>,
    pub return_type: TypeId,
    /// Set once `bind_function_to_class_or_object` has stripped the
    /// leading `self`/`cls` parameter; a shape with this set is a bound
    /// method and its `params` no longer includes the receiver.
    pub is_bound: bool,
    /// Additional signatures for an `@overload`-decorated function, each
    /// itself a full `FunctionShape` evaluated in declaration order.
    pub overloads: Vec<FunctionShapeId>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemberKind {
    Method,
    ClassVar,
    InstanceVar,
    Property,
}

#[derive(Clone, Debug)]
pub struct ClassMember {
    pub type_id: TypeId,
    pub kind: MemberKind,
    pub declared_span: Span,
    pub is_private: bool,
}

#[derive(Clone, Debug)]
pub struct ClassData {
    pub name: Atom,
    pub bases: Vec<TypeId>,
    /// Linearized method-resolution order, most-derived first, `self`
    /// included at index 0. Computed once all bases are known.
    pub mro: Vec<ClassId>,
    pub type_params: SmallVec<[TypeVarId; 2]>,
    pub members: FxHashMap<Atom, ClassMember>,
    pub is_protocol: bool,
    pub is_final: bool,
    pub is_abstract: bool,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub struct TupleShape {
    pub elements: Vec<TypeId>,
    /// A tuple ending in `*Ts`/homogeneous-rest is "open": `tuple[int, ...]`
    /// has one element and `open = true`.
    pub open: bool,
}

/// A structural key used to deduplicate structurally-identical types so
/// `combine_types`/`specialize` return the same `TypeId` for the same
/// shape, keeping pointer-equality checks in `can_assign`'s memoization
/// cheap and sound.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum InternKey {
    Instance(ClassId, SmallVec<[TypeId; 2]>),
    Union(SmallVec<[TypeId; 4]>),
    Tuple(Vec<TypeId>, bool),
    Literal(LiteralValueKey),
    TypeVarRef(TypeVarId),
    Module(Atom),
    Unresolved(Atom),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum LiteralValueKey {
    Int(i64),
    Bool(bool),
    Str(String),
    Bytes(Vec<u8>),
}

impl From<&LiteralValue> for LiteralValueKey {
    fn from(v: &LiteralValue) -> Self {
        match v {
            LiteralValue::Int(n) => LiteralValueKey::Int(*n),
            LiteralValue::Bool(b) => LiteralValueKey::Bool(*b),
            LiteralValue::Str(s) => LiteralValueKey::Str(s.clone()),
            LiteralValue::Bytes(b) => LiteralValueKey::Bytes(b.clone()),
        }
    }
}

pub struct TypeArena {
    types: Vec<Type>,
    classes: Vec<ClassData>,
    functions: Vec<FunctionShape>,
    type_vars: Vec<TypeVarData>,
    tuples: Vec<TupleShape>,
    intern: FxHashMap<InternKey, TypeId>,
}

impl Default for TypeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeArena {
    #[must_use]
    pub fn new() -> Self {
        let types = vec![
            Type::Unknown,
            Type::Any,
            Type::Never,
            Type::None,
            Type::Unknown, // ERROR: treated like Unknown for propagation but reported once at origin.
            Type::Module(Atom::PLACEHOLDER),
            Type::Bool,
            Type::Int,
            Type::Float,
            Type::Str,
            Type::Bytes,
            Type::Object,
        ];
        debug_assert_eq!(types.len(), TypeId::RESERVED_COUNT as usize);
        Self { types, classes: Vec::new(), functions: Vec::new(), type_vars: Vec::new(), tuples: Vec::new(), intern: FxHashMap::default() }
    }

    fn push(&mut self, ty: Type) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(ty);
        id
    }

    fn intern_or_push(&mut self, key: InternKey, build: impl FnOnce() -> Type) -> TypeId {
        if let Some(id) = self.intern.get(&key) {
            return *id;
        }
        let id = self.push(build());
        self.intern.insert(key, id);
        id
    }

    #[must_use]
    pub fn get(&self, id: TypeId) -> &Type {
        &self.types[id.0 as usize]
    }

    pub fn alloc_class(&mut self, data: ClassData) -> ClassId {
        let id = ClassId(self.classes.len() as u32);
        self.classes.push(data);
        id
    }

    #[must_use]
    pub fn class(&self, id: ClassId) -> &ClassData {
        &self.classes[id.0 as usize]
    }

    pub fn class_mut(&mut self, id: ClassId) -> &mut ClassData {
        &mut self.classes[id.0 as usize]
    }

    pub fn alloc_function_shape(&mut self, shape: FunctionShape) -> FunctionShapeId {
        let id = FunctionShapeId(self.functions.len() as u32);
        self.functions.push(shape);
        id
    }

    #[must_use]
    pub fn function_shape(&self, id: FunctionShapeId) -> &FunctionShape {
        &self.functions[id.0 as usize]
    }

    pub fn function_shape_mut(&mut self, id: FunctionShapeId) -> &mut FunctionShape {
        &mut self.functions[id.0 as usize]
    }

    pub fn alloc_type_var(&mut self, data: TypeVarData) -> TypeVarId {
        let id = TypeVarId(self.type_vars.len() as u32);
        self.type_vars.push(data);
        id
    }

    #[must_use]
    pub fn type_var(&self, id: TypeVarId) -> &TypeVarData {
        &self.type_vars[id.0 as usize]
    }

    #[must_use]
    pub fn tuple_shape(&self, id: TupleShapeId) -> &TupleShape {
        &self.tuples[id.0 as usize]
    }

    pub fn intern_class_instance(&mut self, class_id: ClassId, args: SmallVec<[TypeId; 2]>) -> TypeId {
        let key = InternKey::Instance(class_id, args.clone());
        self.intern_or_push(key, || Type::Instance(class_id, args))
    }

    pub fn intern_class_object(&mut self, class_id: ClassId) -> TypeId {
        // `Type[C]` objects are rare enough per class that a direct linear
        // scan would be fine too, but we keep the same intern table for
        // uniformity.
        let key = InternKey::Instance(class_id, smallvec::smallvec![TypeId::ERROR]);
        if let Some(id) = self.intern.get(&key) {
            return *id;
        }
        let id = self.push(Type::Class(class_id));
        self.intern.insert(key, id);
        id
    }

    /// Interns a tuple shape and returns the `Type::Tuple` referring to it.
    pub fn intern_tuple(&mut self, elements: Vec<TypeId>, open: bool) -> TypeId {
        let key = InternKey::Tuple(elements.clone(), open);
        if let Some(id) = self.intern.get(&key) {
            return *id;
        }
        let shape_id = TupleShapeId(self.tuples.len() as u32);
        self.tuples.push(TupleShape { elements, open });
        let id = self.push(Type::Tuple(shape_id));
        self.intern.insert(key, id);
        id
    }

    pub fn intern_literal(&mut self, value: LiteralValue) -> TypeId {
        let key = InternKey::Literal((&value).into());
        self.intern_or_push(key, || Type::Literal(value))
    }

    pub fn intern_type_var_ref(&mut self, id: TypeVarId) -> TypeId {
        let key = InternKey::TypeVarRef(id);
        self.intern_or_push(key, || Type::TypeVarRef(id))
    }

    pub fn intern_module(&mut self, name: Atom) -> TypeId {
        let key = InternKey::Module(name);
        self.intern_or_push(key, || Type::Module(name))
    }

    pub fn intern_unresolved(&mut self, name: Atom) -> TypeId {
        let key = InternKey::Unresolved(name);
        self.intern_or_push(key, || Type::Unresolved(name))
    }

    /// Allocates a `Callable` type from an already-allocated shape. Function
    /// shapes are not deduplicated — each `def` site gets its own shape even
    /// if two functions happen to share a signature, so that per-site
    /// overload metadata stays distinguishable.
    pub fn alloc_callable(&mut self, shape_id: FunctionShapeId) -> TypeId {
        self.push(Type::Callable(shape_id))
    }

    /// Interns a normalized union. Callers should run `combine_types` first;
    /// this just allocates (or reuses) the arena slot for an
    /// already-normalized member list.
    pub(crate) fn intern_union(&mut self, members: SmallVec<[TypeId; 4]>) -> TypeId {
        if members.len() == 1 {
            return members[0];
        }
        let key = InternKey::Union(members.clone());
        self.intern_or_push(key, || Type::Union(members))
    }

    #[must_use]
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }
}
