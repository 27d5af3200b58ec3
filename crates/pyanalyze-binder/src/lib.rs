//! Scope and symbol construction, plus the flow-sensitive narrowing
//! constraint stack the checker pushes and pops around conditionals.
//!
//! A single forward pass over a parsed module (`Binder::bind_module`)
//! builds a `ScopeTree` and a flat symbol table; the checker consumes that
//! structure together with a `ConstraintStack` to resolve names and their
//! narrowed types as it walks the same tree a second time.

pub mod binder;
pub mod narrowing;
pub mod scopes;
pub mod symbols;

pub use binder::{Binder, BoundModule};
pub use narrowing::{ConstraintStack, Narrowing, NarrowingOrigin};
pub use scopes::{Scope, ScopeId, ScopeKind, ScopeTree};
pub use symbols::{Symbol, SymbolFlags, SymbolId};
