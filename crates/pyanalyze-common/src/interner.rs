//! String interning for identifier deduplication.
//!
//! Every symbol name, class name, and attribute name flowing through the
//! analyzer is interned once into an `Atom`. Atoms are `Copy` and compare by
//! integer, so hot paths (name resolution, member lookup) never touch the
//! underlying `str`.

use rustc_hash::FxHashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Atom(u32);

impl Atom {
    /// A sentinel atom for internal types that carry a name slot but are
    /// never resolved back to text (e.g. the reserved `MODULE` type id).
    pub const PLACEHOLDER: Atom = Atom(u32::MAX);
}

#[derive(Debug, Default)]
pub struct Interner {
    strings: Vec<Box<str>>,
    lookup: FxHashMap<Box<str>, Atom>,
}

impl Interner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, s: &str) -> Atom {
        if let Some(&atom) = self.lookup.get(s) {
            return atom;
        }
        let atom = Atom(u32::try_from(self.strings.len()).expect("interner overflow"));
        let boxed: Box<str> = s.into();
        self.strings.push(boxed.clone());
        self.lookup.insert(boxed, atom);
        atom
    }

    #[must_use]
    pub fn resolve(&self, atom: Atom) -> &str {
        &self.strings[atom.0 as usize]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_same_string_returns_same_atom() {
        let mut interner = Interner::new();
        let a = interner.intern("self");
        let b = interner.intern("self");
        assert_eq!(a, b);
    }

    #[test]
    fn distinct_strings_get_distinct_atoms() {
        let mut interner = Interner::new();
        let a = interner.intern("self");
        let b = interner.intern("cls");
        assert_ne!(a, b);
        assert_eq!(interner.resolve(a), "self");
        assert_eq!(interner.resolve(b), "cls");
    }
}
