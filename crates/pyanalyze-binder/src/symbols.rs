//! Symbols: one per binding site (a `def`, a `class`, an assignment target,
//! an import, a parameter). Distinct from `Type` — a symbol's type is
//! whatever the inferred-type aggregator currently combines its
//! contributions into, looked up separately.

use pyanalyze_ast::NodeId;
use pyanalyze_common::{Atom, Span};
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub u32);

/// Bitflags describing what kind of binding produced a symbol, mirroring
/// the small manual flag wrappers used for file/scope feature tracking
/// elsewhere in the codebase rather than reaching for a macro over a
/// handful of independent bits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SymbolFlags(u16);

impl SymbolFlags {
    pub const NONE: Self = Self(0);
    pub const FUNCTION: Self = Self(1 << 0);
    pub const CLASS: Self = Self(1 << 1);
    pub const VARIABLE: Self = Self(1 << 2);
    pub const PARAMETER: Self = Self(1 << 3);
    pub const IMPORT: Self = Self(1 << 4);
    pub const MODULE: Self = Self(1 << 5);
    pub const GLOBAL_DECLARED: Self = Self(1 << 6);
    pub const NONLOCAL_DECLARED: Self = Self(1 << 7);
    /// Set after a `del name` rebinds the symbol's current value to
    /// `Unbound`; cleared again on the next assignment that reaches it.
    pub const UNBOUND: Self = Self(1 << 8);

    #[inline]
    #[must_use]
    pub const fn has(self, flag: Self) -> bool {
        (self.0 & flag.0) != 0
    }

    #[inline]
    pub const fn set(&mut self, flag: Self) {
        self.0 |= flag.0;
    }

    #[inline]
    pub const fn clear(&mut self, flag: Self) {
        self.0 &= !flag.0;
    }

    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

#[derive(Clone, Debug)]
pub struct Symbol {
    pub name: Atom,
    pub flags: SymbolFlags,
    /// Every node id that binds this symbol (assignment targets, the `def`
    /// or `class` header, parameter declarations). Kept so hover/go-to-def
    /// queries can list all declaration sites, not just the first.
    pub declarations: SmallVec<[NodeId; 1]>,
    /// An explicit annotation (`x: int = ...`), if one was given. When
    /// present this is the declared type and the aggregator's inferred
    /// type is only checked against it, never combined into it.
    pub declared_type_annotation: Option<NodeId>,
    pub span: Span,
}

impl Symbol {
    #[must_use]
    pub fn new(name: Atom, flags: SymbolFlags, span: Span) -> Self {
        Self { name, flags, declarations: SmallVec::new(), declared_type_annotation: None, span }
    }
}
