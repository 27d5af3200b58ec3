//! The inferred-type aggregator: for a symbol assigned to from more than one
//! place (`x = 1` in one branch, `x = "a"` in another), each assignment
//! contributes its own inferred type keyed by a stable source id, and the
//! symbol's combined type is `combine_types` over all current contributions.
//! Recomputing from the per-source map (instead of folding incrementally)
//! keeps the combined type independent of the order sources are visited in,
//! which the iterative module-analysis driver depends on for convergence.

use crate::combine::combine_types;
use crate::ids::TypeId;
use crate::types::TypeArena;
use rustc_hash::FxHashMap;
use std::hash::Hash;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(pub u32);

#[derive(Default)]
pub struct InferredTypeAggregator<K: Eq + Hash + Copy> {
    contributions: FxHashMap<K, FxHashMap<SourceId, TypeId>>,
    combined: FxHashMap<K, TypeId>,
}

impl<K: Eq + Hash + Copy> InferredTypeAggregator<K> {
    #[must_use]
    pub fn new() -> Self {
        Self { contributions: FxHashMap::default(), combined: FxHashMap::default() }
    }

    /// Records (or overwrites) one source's contribution to `key`'s type and
    /// recomputes the combined type. Returns `true` if the combined type
    /// changed, so the driver can mark dependents dirty only when needed.
    pub fn record(&mut self, arena: &mut TypeArena, key: K, source: SourceId, ty: TypeId) -> bool {
        let entry = self.contributions.entry(key).or_default();
        if entry.get(&source) == Some(&ty) {
            return false;
        }
        entry.insert(source, ty);
        self.recombine(arena, key)
    }

    /// Drops a source's contribution, e.g. when a branch is proven
    /// unreachable on a later pass and its assignment no longer applies.
    pub fn remove_source(&mut self, arena: &mut TypeArena, key: K, source: SourceId) -> bool {
        let Some(entry) = self.contributions.get_mut(&key) else { return false };
        if entry.remove(&source).is_none() {
            return false;
        }
        self.recombine(arena, key)
    }

    fn recombine(&mut self, arena: &mut TypeArena, key: K) -> bool {
        let members: Vec<TypeId> = self.contributions.get(&key).map(|m| m.values().copied().collect()).unwrap_or_default();
        let combined = combine_types(arena, &members);
        let changed = self.combined.get(&key) != Some(&combined);
        self.combined.insert(key, combined);
        changed
    }

    #[must_use]
    pub fn combined_type(&self, key: K) -> Option<TypeId> {
        self.combined.get(&key).copied()
    }

    #[must_use]
    pub fn contribution_count(&self, key: K) -> usize {
        self.contributions.get(&key).map_or(0, FxHashMap::len)
    }
}

#[cfg(test)]
#[path = "tests/aggregator.rs"]
mod tests;
