//! The type constraint engine: a stack of narrowing frames the checker
//! pushes and pops around conditional branches. Each frame records the
//! narrowed type a symbol is known to have for the remainder of the branch
//! the frame was pushed for (`isinstance` checks, `is None`/`is not None`,
//! truthy tests, and the short-circuit narrowing `and`/`or` provide).

use crate::symbols::SymbolId;
use pyanalyze_types::TypeId;
use rustc_hash::FxHashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NarrowingOrigin {
    IsInstanceTrue,
    IsInstanceFalse,
    IsNone,
    IsNotNone,
    Truthy,
    Falsy,
    Equality,
    Assignment,
}

#[derive(Clone, Copy, Debug)]
pub struct Narrowing {
    pub type_id: TypeId,
    pub origin: NarrowingOrigin,
}

#[derive(Default)]
pub struct ConstraintStack {
    frames: Vec<FxHashMap<SymbolId, Narrowing>>,
}

impl ConstraintStack {
    #[must_use]
    pub fn new() -> Self {
        Self { frames: vec![FxHashMap::default()] }
    }

    /// Pushes a fresh frame, e.g. entering the `then` branch of an `if`.
    pub fn push_frame(&mut self) {
        self.frames.push(FxHashMap::default());
    }

    /// Pops the most recent frame, e.g. leaving an `if`'s `then` branch to
    /// evaluate its `else`. Narrowing applied inside the popped frame no
    /// longer applies once this returns.
    pub fn pop_frame(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    /// Applies a narrowing in the current (topmost) frame.
    pub fn narrow(&mut self, symbol: SymbolId, type_id: TypeId, origin: NarrowingOrigin) {
        self.frames.last_mut().expect("constraint stack is never empty").insert(symbol, Narrowing { type_id, origin });
    }

    /// Removes any narrowing of `symbol` from the current frame, restoring
    /// whatever the aggregator's combined type says (used once an
    /// assignment inside the branch supersedes the narrowing).
    pub fn clear(&mut self, symbol: SymbolId) {
        self.frames.last_mut().expect("constraint stack is never empty").remove(&symbol);
    }

    /// Looks up the narrowest currently-active type for `symbol`, walking
    /// from the innermost frame outward, or `None` if nothing narrows it
    /// (the caller should fall back to the aggregator's combined type).
    #[must_use]
    pub fn current_type(&self, symbol: SymbolId) -> Option<TypeId> {
        self.frames.iter().rev().find_map(|frame| frame.get(&symbol)).map(|n| n.type_id)
    }

    /// Merges two sibling branches' narrowing back into the parent frame as
    /// a union — the state after `if`/`else` is "whatever was true in
    /// either branch" (spec's join-point semantics for control flow).
    pub fn join(&mut self, arena: &mut pyanalyze_types::TypeArena, then_frame: FxHashMap<SymbolId, Narrowing>, else_frame: FxHashMap<SymbolId, Narrowing>) {
        let mut symbols: Vec<SymbolId> = then_frame.keys().chain(else_frame.keys()).copied().collect();
        symbols.sort_by_key(|s| s.0);
        symbols.dedup();
        let parent = self.frames.last_mut().expect("constraint stack is never empty");
        for symbol in symbols {
            let then_ty = then_frame.get(&symbol).map(|n| n.type_id);
            let else_ty = else_frame.get(&symbol).map(|n| n.type_id);
            let joined = match (then_ty, else_ty) {
                (Some(a), Some(b)) => pyanalyze_types::combine_types(arena, &[a, b]),
                (Some(a), None) | (None, Some(a)) => a,
                (None, None) => continue,
            };
            parent.insert(symbol, Narrowing { type_id: joined, origin: NarrowingOrigin::Assignment });
        }
    }

    /// Snapshots the current frame's contents, e.g. before diverging into
    /// an `if`'s two branches so each can be replayed from the same base.
    #[must_use]
    pub fn snapshot_top(&self) -> FxHashMap<SymbolId, Narrowing> {
        self.frames.last().expect("constraint stack is never empty").clone()
    }
}

#[cfg(test)]
#[path = "tests/narrowing.rs"]
mod tests;
