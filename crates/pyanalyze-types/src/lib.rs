//! The type universe and type algebra.
//!
//! Every type produced by the binder or checker lives in a `TypeArena` and
//! is addressed by a `TypeId`, so cyclic type graphs (a class referencing
//! itself in a method signature, a recursive type alias) never need shared
//! ownership at the Rust level. The algebra on top — `combine_types`,
//! `can_assign`, `specialize`, `look_up_class_member`,
//! `bind_function_to_class_or_object` — is a set of free functions over the
//! arena rather than methods, so they compose freely with whatever state
//! the caller (binder, checker, driver) happens to be threading through.

pub mod aggregator;
pub mod assign;
pub mod bind;
pub mod combine;
pub mod ids;
pub mod member_lookup;
pub mod render;
pub mod specialize;
pub mod types;

pub use aggregator::{InferredTypeAggregator, SourceId};
pub use assign::{TypeVarMap, can_assign, can_assign_with_bindings};
pub use bind::bind_function_to_class_or_object;
pub use combine::{combine_types, subtract_type, union_members};
pub use ids::{ClassId, FunctionShapeId, TupleShapeId, TypeId, TypeVarId};
pub use member_lookup::{LookupFlags, MemberLookupResult, look_up_class_member};
pub use render::as_string;
pub use specialize::{specialize, substitution_for_class_args};
pub use types::{
    ClassData, ClassMember, FunctionShape, LiteralValue, MemberKind, ParamInfo, ParamKind, Type,
    TypeArena, TypeVarData, Variance,
};
