//! Scopes: a tree mirroring the nesting of modules, classes, and functions.
//! Name resolution walks from the innermost scope outward, skipping class
//! scopes except when resolving the name directly inside the class body
//! (a comprehension or nested function in a class does not see the class's
//! own attributes unqualified, matching Python's actual scoping rule).

use crate::symbols::SymbolId;
use pyanalyze_ast::NodeId;
use pyanalyze_common::Atom;
use rustc_hash::FxHashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScopeKind {
    Module,
    Class,
    Function,
    Lambda,
    Comprehension,
}

impl ScopeKind {
    /// Whether a name lookup starting in a child scope should consider this
    /// scope's bindings at all. Class scopes are skipped when resolving
    /// from a nested function or comprehension.
    #[must_use]
    pub const fn is_visible_to_nested_scopes(self) -> bool {
        !matches!(self, ScopeKind::Class)
    }
}

#[derive(Clone, Debug)]
pub struct Scope {
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    pub node: NodeId,
    pub names: FxHashMap<Atom, SymbolId>,
}

impl Scope {
    #[must_use]
    pub fn new(kind: ScopeKind, parent: Option<ScopeId>, node: NodeId) -> Self {
        Self { kind, parent, node, names: FxHashMap::default() }
    }
}

#[derive(Default)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
}

impl ScopeTree {
    #[must_use]
    pub fn new() -> Self {
        Self { scopes: Vec::new() }
    }

    pub fn alloc(&mut self, scope: Scope) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(scope);
        id
    }

    #[must_use]
    pub fn get(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0 as usize]
    }

    pub fn get_mut(&mut self, id: ScopeId) -> &mut Scope {
        &mut self.scopes[id.0 as usize]
    }

    pub fn declare(&mut self, scope: ScopeId, name: Atom, symbol: SymbolId) {
        self.scopes[scope.0 as usize].names.insert(name, symbol);
    }

    /// Walks from `scope` outward (through function/module scopes, skipping
    /// intervening class scopes) looking for `name`.
    #[must_use]
    pub fn resolve(&self, scope: ScopeId, name: Atom) -> Option<SymbolId> {
        let mut current = Some(scope);
        let mut first = true;
        while let Some(id) = current {
            let s = self.get(id);
            if first || s.kind.is_visible_to_nested_scopes() {
                if let Some(&symbol) = s.names.get(&name) {
                    return Some(symbol);
                }
            }
            first = false;
            current = s.parent;
        }
        None
    }

    /// Resolves starting at the nearest enclosing module scope, for
    /// `global` declarations.
    #[must_use]
    pub fn resolve_global(&self, scope: ScopeId, name: Atom) -> Option<SymbolId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let s = self.get(id);
            if s.kind == ScopeKind::Module {
                return s.names.get(&name).copied();
            }
            current = s.parent;
        }
        None
    }

    /// Resolves starting one scope up from `scope`, for `nonlocal`
    /// declarations (which must find a binding in an enclosing function
    /// scope, never the module scope).
    #[must_use]
    pub fn resolve_nonlocal(&self, scope: ScopeId, name: Atom) -> Option<SymbolId> {
        let mut current = self.get(scope).parent;
        while let Some(id) = current {
            let s = self.get(id);
            if s.kind == ScopeKind::Function {
                if let Some(&symbol) = s.names.get(&name) {
                    return Some(symbol);
                }
            }
            if s.kind == ScopeKind::Module {
                break;
            }
            current = s.parent;
        }
        None
    }
}
