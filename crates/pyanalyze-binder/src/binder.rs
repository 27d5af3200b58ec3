//! Walks a parsed module and builds its scope tree and symbol table.
//!
//! Binding is a single top-down pass: it creates one scope per module,
//! class, function, lambda, and comprehension, and records a symbol at
//! every binding site it finds inside that scope (assignment targets,
//! `def`/`class` headers, parameters, imports, `for`/`with`/`except`
//! targets). `global`/`nonlocal` statements redirect where a later
//! assignment in the same scope is recorded, so they have to be collected
//! before the rest of the scope's statements are bound.

use pyanalyze_ast::{Arena, Comprehension, Constant, ExprKind, Module, NodeId, Param, ParamKind as AstParamKind, StmtKind};
use pyanalyze_common::{Atom, Interner, Span};

use crate::scopes::{Scope, ScopeId, ScopeKind, ScopeTree};
use crate::symbols::{Symbol, SymbolFlags, SymbolId};

pub struct BoundModule {
    pub scopes: ScopeTree,
    pub symbols: Vec<Symbol>,
    pub module_scope: ScopeId,
    /// The scope each expression/statement node was bound within, indexed
    /// by `NodeId`, so the checker can resolve names in a second pass
    /// without re-walking the tree.
    pub node_scopes: Vec<Option<ScopeId>>,
}

impl BoundModule {
    #[must_use]
    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.0 as usize]
    }

    #[must_use]
    pub fn scope_of(&self, node: NodeId) -> Option<ScopeId> {
        self.node_scopes.get(node.0 as usize).copied().flatten()
    }
}

pub struct Binder<'a> {
    interner: &'a mut Interner,
    scopes: ScopeTree,
    symbols: Vec<Symbol>,
    node_scopes: Vec<Option<ScopeId>>,
    /// Names a `global`/`nonlocal` statement has redirected for the rest of
    /// the current function scope, keyed by scope.
    global_overrides: Vec<(ScopeId, Atom)>,
    nonlocal_overrides: Vec<(ScopeId, Atom)>,
}

impl<'a> Binder<'a> {
    #[must_use]
    pub fn new(interner: &'a mut Interner) -> Self {
        Self {
            interner,
            scopes: ScopeTree::new(),
            symbols: Vec::new(),
            node_scopes: Vec::new(),
            global_overrides: Vec::new(),
            nonlocal_overrides: Vec::new(),
        }
    }

    pub fn bind_module(mut self, module: &Module) -> BoundModule {
        self.node_scopes.resize(module.arena.len(), None);
        let module_scope = self.scopes.alloc(Scope::new(ScopeKind::Module, None, NodeId::DUMMY));
        self.hoist_block(&module.arena, &module.body, module_scope);
        for &stmt in &module.body {
            self.bind_stmt(&module.arena, stmt, module_scope);
        }
        BoundModule { scopes: self.scopes, symbols: self.symbols, module_scope, node_scopes: self.node_scopes }
    }

    fn alloc_symbol(&mut self, name: Atom, flags: SymbolFlags, span: Span) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(Symbol::new(name, flags, span));
        id
    }

    fn mark_node_scope(&mut self, node: NodeId, scope: ScopeId) {
        if node != NodeId::DUMMY {
            self.node_scopes[node.0 as usize] = Some(scope);
        }
    }

    fn declare_in_scope(&mut self, scope: ScopeId, name: Atom, flags: SymbolFlags, span: Span, decl: NodeId) -> SymbolId {
        if let Some(existing) = self.scopes.get(scope).names.get(&name).copied() {
            let symbol = &mut self.symbols[existing.0 as usize];
            symbol.flags = symbol.flags.union(flags);
            symbol.declarations.push(decl);
            return existing;
        }
        let id = self.alloc_symbol(name, flags, span);
        self.symbols[id.0 as usize].declarations.push(decl);
        self.scopes.declare(scope, name, id);
        id
    }

    /// Declares a name, honoring any `global`/`nonlocal` redirection for
    /// this scope: if the name was declared `global`/`nonlocal` before this
    /// binding site, the symbol is recorded in the outer scope instead.
    fn declare(&mut self, scope: ScopeId, name: Atom, flags: SymbolFlags, span: Span, decl: NodeId) -> SymbolId {
        if self.global_overrides.iter().any(|(s, n)| *s == scope && *n == name) {
            if let Some(existing) = self.scopes.resolve_global(scope, name) {
                let symbol = &mut self.symbols[existing.0 as usize];
                symbol.flags = symbol.flags.union(flags);
                symbol.declarations.push(decl);
                return existing;
            }
            let module = self.nearest_module_scope(scope);
            return self.declare_in_scope(module, name, flags, span, decl);
        }
        if self.nonlocal_overrides.iter().any(|(s, n)| *s == scope && *n == name) {
            if let Some(existing) = self.scopes.resolve_nonlocal(scope, name) {
                let symbol = &mut self.symbols[existing.0 as usize];
                symbol.flags = symbol.flags.union(flags);
                symbol.declarations.push(decl);
                return existing;
            }
        }
        self.declare_in_scope(scope, name, flags, span, decl)
    }

    fn nearest_module_scope(&self, scope: ScopeId) -> ScopeId {
        let mut current = scope;
        loop {
            if self.scopes.get(current).kind == ScopeKind::Module {
                return current;
            }
            match self.scopes.get(current).parent {
                Some(parent) => current = parent,
                None => return current,
            }
        }
    }

    /// Pre-declares every name a block binds via `def`/`class`/`import`
    /// statements so forward references within the same scope resolve
    /// (mirrors Python's own hoisting of function/class names at module
    /// and function scope, though unlike `var` there is no hoisting of
    /// assignment targets — those are only visible after their statement).
    fn hoist_block(&mut self, arena: &Arena, body: &[NodeId], scope: ScopeId) {
        for &id in body {
            let stmt = arena.stmt(id);
            match &stmt.kind {
                StmtKind::FunctionDef { name, .. } => {
                    let atom = self.interner.intern(name);
                    self.declare(scope, atom, SymbolFlags::FUNCTION, stmt.span, id);
                }
                StmtKind::ClassDef { name, .. } => {
                    let atom = self.interner.intern(name);
                    self.declare(scope, atom, SymbolFlags::CLASS, stmt.span, id);
                }
                StmtKind::Global(names) => {
                    for name in names {
                        let atom = self.interner.intern(name);
                        self.global_overrides.push((scope, atom));
                    }
                }
                StmtKind::Nonlocal(names) => {
                    for name in names {
                        let atom = self.interner.intern(name);
                        self.nonlocal_overrides.push((scope, atom));
                    }
                }
                _ => {}
            }
        }
    }

    fn bind_stmt(&mut self, arena: &Arena, id: NodeId, scope: ScopeId) {
        self.mark_node_scope(id, scope);
        let stmt = arena.stmt(id);
        let span = stmt.span;
        match &stmt.kind {
            StmtKind::FunctionDef { name, params, returns, body, decorators, is_async: _ } => {
                for &dec in decorators {
                    self.bind_expr(arena, dec, scope);
                }
                if let Some(ret) = returns {
                    self.bind_expr(arena, *ret, scope);
                }
                for param in params {
                    if let Some(default) = param.default {
                        self.bind_expr(arena, default, scope);
                    }
                    if let Some(annotation) = param.annotation {
                        self.bind_expr(arena, annotation, scope);
                    }
                }
                let atom = self.interner.intern(name);
                self.declare(scope, atom, SymbolFlags::FUNCTION, span, id);
                let fn_scope = self.scopes.alloc(Scope::new(ScopeKind::Function, Some(scope), id));
                self.bind_params(params, fn_scope, id);
                self.hoist_block(arena, body, fn_scope);
                for &inner in body {
                    self.bind_stmt(arena, inner, fn_scope);
                }
            }
            StmtKind::ClassDef { name, bases, keywords, body, decorators } => {
                for &dec in decorators {
                    self.bind_expr(arena, dec, scope);
                }
                for &base in bases {
                    self.bind_expr(arena, base, scope);
                }
                for (_, value) in keywords {
                    self.bind_expr(arena, *value, scope);
                }
                let atom = self.interner.intern(name);
                self.declare(scope, atom, SymbolFlags::CLASS, span, id);
                let class_scope = self.scopes.alloc(Scope::new(ScopeKind::Class, Some(scope), id));
                self.hoist_block(arena, body, class_scope);
                for &inner in body {
                    self.bind_stmt(arena, inner, class_scope);
                }
            }
            StmtKind::Return(value) => {
                if let Some(v) = value {
                    self.bind_expr(arena, *v, scope);
                }
            }
            StmtKind::Delete(targets) => {
                for &target in targets {
                    self.bind_expr(arena, target, scope);
                    if let ExprKind::Name(name) = &arena.expr(target).kind {
                        let atom = self.interner.intern(name);
                        if let Some(symbol) = self.scopes.resolve(scope, atom) {
                            self.symbols[symbol.0 as usize].flags.set(SymbolFlags::UNBOUND);
                        }
                    }
                }
            }
            StmtKind::Assign { targets, value } => {
                self.bind_expr(arena, *value, scope);
                for &target in targets {
                    self.bind_target(arena, target, scope, id);
                }
            }
            StmtKind::AugAssign { target, op: _, value } => {
                self.bind_expr(arena, *value, scope);
                self.bind_target(arena, *target, scope, id);
            }
            StmtKind::AnnAssign { target, annotation, value } => {
                self.bind_expr(arena, *annotation, scope);
                if let Some(v) = value {
                    self.bind_expr(arena, *v, scope);
                }
                self.bind_target(arena, *target, scope, id);
                if let ExprKind::Name(name) = &arena.expr(*target).kind {
                    let atom = self.interner.intern(name);
                    if let Some(symbol) = self.scopes.resolve(scope, atom) {
                        self.symbols[symbol.0 as usize].declared_type_annotation = Some(*annotation);
                    }
                }
            }
            StmtKind::For { target, iter, body, or_else, is_async: _ } => {
                self.bind_expr(arena, *iter, scope);
                self.bind_target(arena, *target, scope, id);
                self.hoist_block(arena, body, scope);
                for &inner in body {
                    self.bind_stmt(arena, inner, scope);
                }
                for &inner in or_else {
                    self.bind_stmt(arena, inner, scope);
                }
            }
            StmtKind::While { test, body, or_else } => {
                self.bind_expr(arena, *test, scope);
                for &inner in body {
                    self.bind_stmt(arena, inner, scope);
                }
                for &inner in or_else {
                    self.bind_stmt(arena, inner, scope);
                }
            }
            StmtKind::If { test, body, or_else } => {
                self.bind_expr(arena, *test, scope);
                for &inner in body {
                    self.bind_stmt(arena, inner, scope);
                }
                for &inner in or_else {
                    self.bind_stmt(arena, inner, scope);
                }
            }
            StmtKind::With { items, body, is_async: _ } => {
                for (context, optional_vars) in items {
                    self.bind_expr(arena, *context, scope);
                    if let Some(target) = optional_vars {
                        self.bind_target(arena, *target, scope, id);
                    }
                }
                for &inner in body {
                    self.bind_stmt(arena, inner, scope);
                }
            }
            StmtKind::Raise { exc, cause } => {
                if let Some(e) = exc {
                    self.bind_expr(arena, *e, scope);
                }
                if let Some(c) = cause {
                    self.bind_expr(arena, *c, scope);
                }
            }
            StmtKind::Try { body, handlers, or_else, finally } => {
                for &inner in body {
                    self.bind_stmt(arena, inner, scope);
                }
                for handler in handlers {
                    if let Some(kind) = handler.kind {
                        self.bind_expr(arena, kind, scope);
                    }
                    if let Some(name) = &handler.name {
                        let atom = self.interner.intern(name);
                        self.declare(scope, atom, SymbolFlags::VARIABLE, handler.span, id);
                    }
                    for &inner in &handler.body {
                        self.bind_stmt(arena, inner, scope);
                    }
                }
                for &inner in or_else {
                    self.bind_stmt(arena, inner, scope);
                }
                for &inner in finally {
                    self.bind_stmt(arena, inner, scope);
                }
            }
            StmtKind::Assert { test, msg } => {
                self.bind_expr(arena, *test, scope);
                if let Some(m) = msg {
                    self.bind_expr(arena, *m, scope);
                }
            }
            StmtKind::Import(names) => {
                for (module_name, alias) in names {
                    let bound_name = alias.clone().unwrap_or_else(|| {
                        module_name.split('.').next().unwrap_or(module_name.as_str()).to_string()
                    });
                    let atom = self.interner.intern(&bound_name);
                    self.declare(scope, atom, SymbolFlags::IMPORT, span, id);
                }
            }
            StmtKind::ImportFrom { module: _, names, level: _ } => {
                for (imported, alias) in names {
                    let bound_name = alias.clone().unwrap_or_else(|| imported.clone());
                    let atom = self.interner.intern(&bound_name);
                    self.declare(scope, atom, SymbolFlags::IMPORT, span, id);
                }
            }
            StmtKind::Global(_) | StmtKind::Nonlocal(_) => {}
            StmtKind::Expr(value) => {
                self.bind_expr(arena, *value, scope);
            }
            StmtKind::Pass | StmtKind::Break | StmtKind::Continue => {}
        }
    }

    fn bind_params(&mut self, params: &[Param], scope: ScopeId, decl: NodeId) {
        for param in params {
            if matches!(param.kind, AstParamKind::VarArgs | AstParamKind::VarKeyword) && param.name.is_empty() {
                continue;
            }
            let atom = self.interner.intern(&param.name);
            self.declare_in_scope(scope, atom, SymbolFlags::PARAMETER, param.span, decl);
        }
    }

    /// Binds an assignment-like target expression, declaring any bare names
    /// it contains and recursing through tuple/list/starred destructuring.
    fn bind_target(&mut self, arena: &Arena, id: NodeId, scope: ScopeId, decl: NodeId) {
        self.mark_node_scope(id, scope);
        let expr = arena.expr(id);
        let span = expr.span;
        match &expr.kind {
            ExprKind::Name(name) => {
                let atom = self.interner.intern(name);
                self.declare(scope, atom, SymbolFlags::VARIABLE, span, decl);
            }
            ExprKind::Tuple(elements) | ExprKind::List(elements) => {
                for &element in elements {
                    self.bind_target(arena, element, scope, decl);
                }
            }
            ExprKind::Starred(inner) => {
                self.bind_target(arena, *inner, scope, decl);
            }
            ExprKind::Attribute { value, .. } => {
                self.bind_expr(arena, *value, scope);
            }
            ExprKind::Subscript { value, index } => {
                self.bind_expr(arena, *value, scope);
                self.bind_expr(arena, *index, scope);
            }
            _ => self.bind_expr(arena, id, scope),
        }
    }

    fn bind_expr(&mut self, arena: &Arena, id: NodeId, scope: ScopeId) {
        self.mark_node_scope(id, scope);
        let expr = arena.expr(id);
        let span = expr.span;
        match &expr.kind {
            ExprKind::Name(_) | ExprKind::Constant(Constant::None) | ExprKind::Ellipsis => {}
            ExprKind::NamedExpr { target, value } => {
                self.bind_expr(arena, *value, scope);
                // A walrus target binds in the nearest enclosing function or
                // module scope, skipping past comprehension scopes (PEP 572),
                // since a comprehension's own scope disappears once it ends.
                let binding_scope = self.nearest_non_comprehension_scope(scope);
                let atom = self.interner.intern(target);
                self.declare(binding_scope, atom, SymbolFlags::VARIABLE, span, id);
            }
            ExprKind::BoolOp { values, .. } => {
                for &value in values {
                    self.bind_expr(arena, value, scope);
                }
            }
            ExprKind::BinOp { left, right, .. } => {
                self.bind_expr(arena, *left, scope);
                self.bind_expr(arena, *right, scope);
            }
            ExprKind::UnaryOp { operand, .. } => {
                self.bind_expr(arena, *operand, scope);
            }
            ExprKind::Lambda { params, body } => {
                for param in params {
                    if let Some(default) = param.default {
                        self.bind_expr(arena, default, scope);
                    }
                }
                let lambda_scope = self.scopes.alloc(Scope::new(ScopeKind::Lambda, Some(scope), id));
                self.bind_params(params, lambda_scope, id);
                self.bind_expr(arena, *body, lambda_scope);
            }
            ExprKind::IfExp { test, body, or_else } => {
                self.bind_expr(arena, *test, scope);
                self.bind_expr(arena, *body, scope);
                self.bind_expr(arena, *or_else, scope);
            }
            ExprKind::Dict { keys, values } => {
                for key in keys.iter().flatten() {
                    self.bind_expr(arena, *key, scope);
                }
                for &value in values {
                    self.bind_expr(arena, value, scope);
                }
            }
            ExprKind::Set(elements) | ExprKind::List(elements) | ExprKind::Tuple(elements) => {
                for &element in elements {
                    self.bind_expr(arena, element, scope);
                }
            }
            ExprKind::Compare { left, comparators, .. } => {
                self.bind_expr(arena, *left, scope);
                for &comparator in comparators {
                    self.bind_expr(arena, comparator, scope);
                }
            }
            ExprKind::Call { func, args, keywords } => {
                self.bind_expr(arena, *func, scope);
                for &arg in args {
                    self.bind_expr(arena, arg, scope);
                }
                for (_, value) in keywords {
                    self.bind_expr(arena, *value, scope);
                }
            }
            ExprKind::Attribute { value, .. } => {
                self.bind_expr(arena, *value, scope);
            }
            ExprKind::Subscript { value, index } => {
                self.bind_expr(arena, *value, scope);
                self.bind_expr(arena, *index, scope);
            }
            ExprKind::Starred(inner) | ExprKind::Await(inner) | ExprKind::YieldFrom(inner) => {
                self.bind_expr(arena, *inner, scope);
            }
            ExprKind::Yield(value) => {
                if let Some(v) = value {
                    self.bind_expr(arena, *v, scope);
                }
            }
            ExprKind::ListComp { element, generators }
            | ExprKind::SetComp { element, generators } => {
                self.bind_comprehension(arena, &[*element], generators, scope, id);
            }
            ExprKind::GeneratorExp { element, generators } => {
                self.bind_comprehension(arena, &[*element], generators, scope, id);
            }
            ExprKind::DictComp { key, value, generators } => {
                self.bind_comprehension(arena, &[*key, *value], generators, scope, id);
            }
            ExprKind::Constant(_) => {}
        }
    }

    /// Binds a comprehension's own scope: the first generator's iterable is
    /// evaluated in the enclosing scope, everything else (targets, `if`
    /// clauses, subsequent iterables, the element expression(s)) is bound
    /// inside the comprehension's own scope, matching Python 3's
    /// comprehensions-have-their-own-scope semantics.
    fn bind_comprehension(&mut self, arena: &Arena, elements: &[NodeId], generators: &[Comprehension], scope: ScopeId, owner: NodeId) {
        let comp_scope = self.scopes.alloc(Scope::new(ScopeKind::Comprehension, Some(scope), owner));
        for (index, generator) in generators.iter().enumerate() {
            let iter_scope = if index == 0 { scope } else { comp_scope };
            self.bind_expr(arena, generator.iter, iter_scope);
            self.bind_target(arena, generator.target, comp_scope, owner);
            for &condition in &generator.ifs {
                self.bind_expr(arena, condition, comp_scope);
            }
        }
        for &element in elements {
            self.bind_expr(arena, element, comp_scope);
        }
    }

    fn nearest_non_comprehension_scope(&self, scope: ScopeId) -> ScopeId {
        let mut current = scope;
        loop {
            if self.scopes.get(current).kind != ScopeKind::Comprehension {
                return current;
            }
            match self.scopes.get(current).parent {
                Some(parent) => current = parent,
                None => return current,
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/binder.rs"]
mod tests;
