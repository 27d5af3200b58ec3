//! Hover, go-to-definition, and completion: the three position-based
//! queries a query surface needs, all built on the same ingredients a
//! checked file already has lying around — the cached per-expression
//! types, the bound scope tree, and the symbol table's declaration sites.
//! None of this mutates anything; each query is a read against the result
//! of the file's last completed [`crate::analysis::FileAnalysis::analyze`]
//! call.

use pyanalyze_ast::{Arena, Node, NodeId};
use pyanalyze_binder::SymbolId;
use pyanalyze_common::{Interner, LineMap, Position, Span};
use pyanalyze_types::TypeArena;

use crate::analysis::CheckedFile;

/// The smallest expression node whose span contains `offset`, if any.
/// `Arena` has no spatial index, so this is a linear scan; a file under
/// active edit is small enough that this is still well under the
/// interactive latency budget.
#[must_use]
fn expr_at_offset(arena: &Arena, offset: u32) -> Option<NodeId> {
    let mut best: Option<(NodeId, u32)> = None;
    for index in 0..arena.len() {
        let id = NodeId(index as u32);
        let Node::Expr(expr) = arena.get(id) else { continue };
        if !expr.span.contains(offset) && !(expr.span.is_empty() && expr.span.start == offset) {
            continue;
        }
        let len = expr.span.len();
        if best.is_none_or(|(_, best_len)| len < best_len) {
            best = Some((id, len));
        }
    }
    best.map(|(id, _)| id)
}

/// The type-as-string for whatever expression sits at `position`, or
/// `None` if nothing resolves there (whitespace, a keyword, a position
/// past the end of the file).
#[must_use]
pub fn hover(checked: &CheckedFile, interner: &Interner, types: &TypeArena, source: &str, position: Position) -> Option<String> {
    let line_map = LineMap::build(source);
    let offset = line_map.position_to_offset(position);
    let node = expr_at_offset(&checked.module.arena, offset)?;
    let ty = checked.expr_types.get(&node)?;
    Some(pyanalyze_types::as_string(types, interner, *ty))
}

/// The source spans of every declaration site for the symbol named at
/// `position`, empty if the position isn't a name or the name didn't
/// resolve to a symbol.
#[must_use]
pub fn definition(checked: &CheckedFile, interner: &mut Interner, source: &str, position: Position) -> Vec<Span> {
    let line_map = LineMap::build(source);
    let offset = line_map.position_to_offset(position);
    let Some(node) = expr_at_offset(&checked.module.arena, offset) else { return Vec::new() };
    let pyanalyze_ast::ExprKind::Name(name) = &checked.module.arena.expr(node).kind else { return Vec::new() };
    let scope = checked.bound.scope_of(node).unwrap_or(checked.bound.module_scope);
    let atom = interner.intern(name);
    let Some(symbol) = checked.bound.scopes.resolve(scope, atom) else { return Vec::new() };
    checked.bound.symbol(symbol).declarations.iter().map(|&decl| span_of(&checked.module.arena, decl)).collect()
}

fn span_of(arena: &Arena, id: NodeId) -> Span {
    match arena.get(id) {
        Node::Stmt(stmt) => stmt.span,
        Node::Expr(expr) => expr.span,
    }
}

/// Every name visible at `position`: the names declared in its innermost
/// scope plus every enclosing scope a lookup from there would see,
/// mirroring `ScopeTree::resolve`'s walk (skipping class scopes once
/// outside the class body itself).
#[must_use]
pub fn completions(checked: &CheckedFile, interner: &Interner, source: &str, position: Position) -> Vec<String> {
    let line_map = LineMap::build(source);
    let offset = line_map.position_to_offset(position);
    let scope = expr_at_offset(&checked.module.arena, offset)
        .and_then(|node| checked.bound.scope_of(node))
        .unwrap_or(checked.bound.module_scope);

    let mut names: Vec<SymbolId> = Vec::new();
    let mut current = Some(scope);
    let mut first = true;
    while let Some(id) = current {
        let s = checked.bound.scopes.get(id);
        if first || s.kind.is_visible_to_nested_scopes() {
            names.extend(s.names.values().copied());
        }
        first = false;
        current = s.parent;
    }

    let mut seen = rustc_hash::FxHashSet::default();
    let mut result = Vec::new();
    for symbol in names {
        let name = interner.resolve(checked.bound.symbol(symbol).name).to_string();
        if seen.insert(name.clone()) {
            result.push(name);
        }
    }
    result.sort();
    result
}

#[cfg(test)]
#[path = "tests/queries.rs"]
mod tests;
