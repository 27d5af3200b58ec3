//! Recursive-descent statement parser with a Pratt-style expression parser
//! for binary operators. Grounded on the general "parser holds a token
//! cursor plus a growable arena" shape observed in the checker's consumers
//! of a parse tree; the grammar itself follows the reference grammar for the
//! constructs (including the walrus/starred/chained-comparison/assert
//! forms).

use crate::ast::{
    Arena, BinOp, BoolOp, CmpOp, Comprehension, Constant, Expr, ExprKind, ExceptHandler, Module,
    NodeId, Param, ParamKind, Stmt, StmtKind, UnaryOp,
};
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};
use pyanalyze_common::Span;
use smallvec::smallvec;
use std::fmt;

#[derive(Debug, Clone)]
pub struct ParseError {
    pub message: String,
    pub span: Span,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.message, self.span)
    }
}

impl std::error::Error for ParseError {}

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    arena: Arena,
}

type PResult<T> = Result<T, ParseError>;

impl Parser {
    #[must_use]
    pub fn new(source: &str) -> Self {
        let tokens = Lexer::new(source).tokenize();
        Self { tokens, pos: 0, arena: Arena::new() }
    }

    pub fn parse_module(mut self) -> PResult<Module> {
        let mut body = Vec::new();
        self.skip_newlines();
        while !self.at(TokenKind::Eof) {
            body.push(self.parse_statement(NodeId::DUMMY)?);
            self.skip_newlines();
        }
        Ok(Module { arena: self.arena, body })
    }

    // --- token cursor -----------------------------------------------

    fn peek(&self) -> &TokenKind {
        &self.tokens[self.pos].kind
    }

    fn peek_span(&self) -> Span {
        self.tokens[self.pos].span
    }

    fn at(&self, kind: TokenKind) -> bool {
        *self.peek() == kind
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn expect(&mut self, kind: TokenKind) -> PResult<Token> {
        if *self.peek() == kind {
            Ok(self.advance())
        } else {
            Err(ParseError {
                message: format!("expected {kind:?}, found {:?}", self.peek()),
                span: self.peek_span(),
            })
        }
    }

    fn expect_name(&mut self) -> PResult<String> {
        match self.peek().clone() {
            TokenKind::Name(n) => {
                self.advance();
                Ok(n)
            }
            other => Err(ParseError {
                message: format!("expected identifier, found {other:?}"),
                span: self.peek_span(),
            }),
        }
    }

    fn skip_newlines(&mut self) {
        while matches!(self.peek(), TokenKind::Newline) {
            self.advance();
        }
    }

    // --- statements ---------------------------------------------------

    fn parse_block(&mut self, parent: NodeId) -> PResult<Vec<NodeId>> {
        self.expect(TokenKind::Colon)?;
        if self.at(TokenKind::Newline) {
            self.skip_newlines();
            self.expect(TokenKind::Indent)?;
            let mut stmts = Vec::new();
            while !self.at(TokenKind::Dedent) && !self.at(TokenKind::Eof) {
                stmts.push(self.parse_statement(parent)?);
                self.skip_newlines();
            }
            if self.at(TokenKind::Dedent) {
                self.advance();
            }
            Ok(stmts)
        } else {
            // Single-line suite: `if x: return y`
            let stmt = self.parse_simple_statement(parent)?;
            Ok(vec![stmt])
        }
    }

    fn parse_statement(&mut self, parent: NodeId) -> PResult<NodeId> {
        match self.peek() {
            TokenKind::Def => self.parse_function_def(parent, false, Vec::new()),
            TokenKind::Async => self.parse_async_statement(parent),
            TokenKind::Class => self.parse_class_def(parent, Vec::new()),
            TokenKind::At => self.parse_decorated(parent),
            TokenKind::If => self.parse_if(parent),
            TokenKind::While => self.parse_while(parent),
            TokenKind::For => self.parse_for(parent, false),
            TokenKind::With => self.parse_with(parent, false),
            TokenKind::Try => self.parse_try(parent),
            _ => self.parse_simple_statement(parent),
        }
    }

    fn parse_decorated(&mut self, parent: NodeId) -> PResult<NodeId> {
        let mut decorators = Vec::new();
        while self.at(TokenKind::At) {
            self.advance();
            decorators.push(self.parse_expr(parent)?);
            self.skip_newlines();
        }
        match self.peek() {
            TokenKind::Def => self.parse_function_def(parent, false, decorators),
            TokenKind::Async => {
                self.advance();
                self.expect(TokenKind::Def)?;
                self.parse_function_def(parent, true, decorators)
            }
            TokenKind::Class => self.parse_class_def(parent, decorators),
            _ => Err(ParseError {
                message: "expected def or class after decorator".into(),
                span: self.peek_span(),
            }),
        }
    }

    fn parse_async_statement(&mut self, parent: NodeId) -> PResult<NodeId> {
        self.advance();
        match self.peek() {
            TokenKind::Def => self.parse_function_def(parent, true, Vec::new()),
            TokenKind::For => self.parse_for(parent, true),
            TokenKind::With => self.parse_with(parent, true),
            other => Err(ParseError {
                message: format!("unexpected token after async: {other:?}"),
                span: self.peek_span(),
            }),
        }
    }

    fn parse_function_def(
        &mut self,
        parent: NodeId,
        is_async: bool,
        decorators: Vec<NodeId>,
    ) -> PResult<NodeId> {
        let start = self.peek_span();
        self.expect(TokenKind::Def)?;
        let name = self.expect_name()?;
        self.expect(TokenKind::LParen)?;
        let params = self.parse_params()?;
        self.expect(TokenKind::RParen)?;
        let returns = if self.at(TokenKind::Arrow) {
            self.advance();
            Some(self.parse_expr(parent)?)
        } else {
            None
        };
        let placeholder = self.arena.alloc_stmt(
            Stmt { span: start, kind: StmtKind::Pass },
            parent,
        );
        let body = self.parse_block(placeholder)?;
        let end = self.peek_span();
        let kind = StmtKind::FunctionDef { name, params, returns, body, decorators, is_async };
        *self.stmt_mut(placeholder) = Stmt { span: start.merge(end), kind };
        Ok(placeholder)
    }

    fn stmt_mut(&mut self, id: NodeId) -> &mut Stmt {
        match self.arena_node_mut(id) {
            crate::ast::Node::Stmt(s) => s,
            crate::ast::Node::Expr(_) => unreachable!(),
        }
    }

    fn arena_node_mut(&mut self, id: NodeId) -> &mut crate::ast::Node {
        self.arena.node_mut(id)
    }

    fn parse_params(&mut self) -> PResult<Vec<Param>> {
        let mut params = Vec::new();
        let mut seen_star = false;
        while !self.at(TokenKind::RParen) {
            let start = self.peek_span();
            if self.at(TokenKind::Star) {
                self.advance();
                if self.at(TokenKind::Comma) || self.at(TokenKind::RParen) {
                    seen_star = true;
                } else {
                    let name = self.expect_name()?;
                    let annotation = self.parse_optional_annotation()?;
                    params.push(Param { name, annotation, default: None, kind: ParamKind::VarArgs, span: start });
                    seen_star = true;
                }
            } else if self.at(TokenKind::DoubleStar) {
                self.advance();
                let name = self.expect_name()?;
                let annotation = self.parse_optional_annotation()?;
                params.push(Param { name, annotation, default: None, kind: ParamKind::VarKeyword, span: start });
            } else {
                let name = self.expect_name()?;
                let annotation = self.parse_optional_annotation()?;
                let default = if self.at(TokenKind::Assign) {
                    self.advance();
                    Some(self.parse_expr(NodeId::DUMMY)?)
                } else {
                    None
                };
                let kind = if seen_star { ParamKind::KeywordOnly } else { ParamKind::Positional };
                params.push(Param { name, annotation, default, kind, span: start });
            }
            if self.at(TokenKind::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        Ok(params)
    }

    fn parse_optional_annotation(&mut self) -> PResult<Option<NodeId>> {
        if self.at(TokenKind::Colon) {
            self.advance();
            Ok(Some(self.parse_expr(NodeId::DUMMY)?))
        } else {
            Ok(None)
        }
    }

    fn parse_class_def(&mut self, parent: NodeId, decorators: Vec<NodeId>) -> PResult<NodeId> {
        let start = self.peek_span();
        self.expect(TokenKind::Class)?;
        let name = self.expect_name()?;
        let mut bases = Vec::new();
        let mut keywords = Vec::new();
        if self.at(TokenKind::LParen) {
            self.advance();
            while !self.at(TokenKind::RParen) {
                if let TokenKind::Name(n) = self.peek().clone() {
                    if self.tokens.get(self.pos + 1).map(|t| &t.kind) == Some(&TokenKind::Assign) {
                        self.advance();
                        self.advance();
                        let value = self.parse_expr(parent)?;
                        keywords.push((n, value));
                        if self.at(TokenKind::Comma) {
                            self.advance();
                        }
                        continue;
                    }
                }
                bases.push(self.parse_expr(parent)?);
                if self.at(TokenKind::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
            self.expect(TokenKind::RParen)?;
        }
        let placeholder = self.arena.alloc_stmt(Stmt { span: start, kind: StmtKind::Pass }, parent);
        let body = self.parse_block(placeholder)?;
        let end = self.peek_span();
        let kind = StmtKind::ClassDef { name, bases, keywords, body, decorators };
        *self.stmt_mut(placeholder) = Stmt { span: start.merge(end), kind };
        Ok(placeholder)
    }

    fn parse_if(&mut self, parent: NodeId) -> PResult<NodeId> {
        let start = self.peek_span();
        self.expect(TokenKind::If)?;
        let test = self.parse_expr(parent)?;
        let placeholder = self.arena.alloc_stmt(Stmt { span: start, kind: StmtKind::Pass }, parent);
        let body = self.parse_block(placeholder)?;
        let or_else = if self.at(TokenKind::Elif) {
            vec![self.parse_if_as_elif(placeholder)?]
        } else if self.at(TokenKind::Else) {
            self.advance();
            self.parse_block(placeholder)?
        } else {
            Vec::new()
        };
        let end = self.peek_span();
        *self.stmt_mut(placeholder) =
            Stmt { span: start.merge(end), kind: StmtKind::If { test, body, or_else } };
        Ok(placeholder)
    }

    fn parse_if_as_elif(&mut self, parent: NodeId) -> PResult<NodeId> {
        let start = self.peek_span();
        self.expect(TokenKind::Elif)?;
        let test = self.parse_expr(parent)?;
        let placeholder = self.arena.alloc_stmt(Stmt { span: start, kind: StmtKind::Pass }, parent);
        let body = self.parse_block(placeholder)?;
        let or_else = if self.at(TokenKind::Elif) {
            vec![self.parse_if_as_elif(placeholder)?]
        } else if self.at(TokenKind::Else) {
            self.advance();
            self.parse_block(placeholder)?
        } else {
            Vec::new()
        };
        let end = self.peek_span();
        *self.stmt_mut(placeholder) =
            Stmt { span: start.merge(end), kind: StmtKind::If { test, body, or_else } };
        Ok(placeholder)
    }

    fn parse_while(&mut self, parent: NodeId) -> PResult<NodeId> {
        let start = self.peek_span();
        self.expect(TokenKind::While)?;
        let test = self.parse_expr(parent)?;
        let placeholder = self.arena.alloc_stmt(Stmt { span: start, kind: StmtKind::Pass }, parent);
        let body = self.parse_block(placeholder)?;
        let or_else = if self.at(TokenKind::Else) {
            self.advance();
            self.parse_block(placeholder)?
        } else {
            Vec::new()
        };
        let end = self.peek_span();
        *self.stmt_mut(placeholder) =
            Stmt { span: start.merge(end), kind: StmtKind::While { test, body, or_else } };
        Ok(placeholder)
    }

    fn parse_for(&mut self, parent: NodeId, is_async: bool) -> PResult<NodeId> {
        let start = self.peek_span();
        self.expect(TokenKind::For)?;
        let target = self.parse_target_list(parent)?;
        self.expect(TokenKind::In)?;
        let iter = self.parse_expr(parent)?;
        let placeholder = self.arena.alloc_stmt(Stmt { span: start, kind: StmtKind::Pass }, parent);
        let body = self.parse_block(placeholder)?;
        let or_else = if self.at(TokenKind::Else) {
            self.advance();
            self.parse_block(placeholder)?
        } else {
            Vec::new()
        };
        let end = self.peek_span();
        *self.stmt_mut(placeholder) = Stmt {
            span: start.merge(end),
            kind: StmtKind::For { target, iter, body, or_else, is_async },
        };
        Ok(placeholder)
    }

    fn parse_with(&mut self, parent: NodeId, is_async: bool) -> PResult<NodeId> {
        let start = self.peek_span();
        self.expect(TokenKind::With)?;
        let mut items = Vec::new();
        loop {
            let ctx = self.parse_expr(parent)?;
            let alias = if self.at(TokenKind::As) {
                self.advance();
                Some(self.parse_target(parent)?)
            } else {
                None
            };
            items.push((ctx, alias));
            if self.at(TokenKind::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        let placeholder = self.arena.alloc_stmt(Stmt { span: start, kind: StmtKind::Pass }, parent);
        let body = self.parse_block(placeholder)?;
        let end = self.peek_span();
        *self.stmt_mut(placeholder) =
            Stmt { span: start.merge(end), kind: StmtKind::With { items, body, is_async } };
        Ok(placeholder)
    }

    fn parse_try(&mut self, parent: NodeId) -> PResult<NodeId> {
        let start = self.peek_span();
        self.expect(TokenKind::Try)?;
        let placeholder = self.arena.alloc_stmt(Stmt { span: start, kind: StmtKind::Pass }, parent);
        let body = self.parse_block(placeholder)?;
        let mut handlers = Vec::new();
        while self.at(TokenKind::Except) {
            let hstart = self.peek_span();
            self.advance();
            let kind = if self.at(TokenKind::Colon) {
                None
            } else {
                Some(self.parse_expr(placeholder)?)
            };
            let name = if self.at(TokenKind::As) {
                self.advance();
                Some(self.expect_name()?)
            } else {
                None
            };
            let hbody = self.parse_block(placeholder)?;
            handlers.push(ExceptHandler { kind, name, body: hbody, span: hstart });
        }
        let or_else = if self.at(TokenKind::Else) {
            self.advance();
            self.parse_block(placeholder)?
        } else {
            Vec::new()
        };
        let finally = if self.at(TokenKind::Finally) {
            self.advance();
            self.parse_block(placeholder)?
        } else {
            Vec::new()
        };
        let end = self.peek_span();
        *self.stmt_mut(placeholder) = Stmt {
            span: start.merge(end),
            kind: StmtKind::Try { body, handlers, or_else, finally },
        };
        Ok(placeholder)
    }

    fn parse_simple_statement(&mut self, parent: NodeId) -> PResult<NodeId> {
        let stmt = self.parse_one_simple_statement(parent)?;
        while self.at(TokenKind::Newline) || self.at(TokenKind::Eof) {
            break;
        }
        Ok(stmt)
    }

    fn parse_one_simple_statement(&mut self, parent: NodeId) -> PResult<NodeId> {
        let start = self.peek_span();
        let kind = match self.peek().clone() {
            TokenKind::Pass => {
                self.advance();
                StmtKind::Pass
            }
            TokenKind::Break => {
                self.advance();
                StmtKind::Break
            }
            TokenKind::Continue => {
                self.advance();
                StmtKind::Continue
            }
            TokenKind::Return => {
                self.advance();
                let value = if self.at(TokenKind::Newline) || self.at(TokenKind::Eof) {
                    None
                } else {
                    Some(self.parse_expr(parent)?)
                };
                StmtKind::Return(value)
            }
            TokenKind::Del => {
                self.advance();
                let mut targets = vec![self.parse_expr(parent)?];
                while self.at(TokenKind::Comma) {
                    self.advance();
                    targets.push(self.parse_expr(parent)?);
                }
                StmtKind::Delete(targets)
            }
            TokenKind::Assert => {
                self.advance();
                let test = self.parse_expr(parent)?;
                let msg = if self.at(TokenKind::Comma) {
                    self.advance();
                    Some(self.parse_expr(parent)?)
                } else {
                    None
                };
                StmtKind::Assert { test, msg }
            }
            TokenKind::Global => {
                self.advance();
                StmtKind::Global(self.parse_name_list()?)
            }
            TokenKind::Nonlocal => {
                self.advance();
                StmtKind::Nonlocal(self.parse_name_list()?)
            }
            TokenKind::Import => {
                self.advance();
                StmtKind::Import(self.parse_import_names()?)
            }
            TokenKind::From => {
                self.advance();
                let mut level = 0u32;
                while self.at(TokenKind::Dot) {
                    level += 1;
                    self.advance();
                }
                let module = if self.at(TokenKind::Import) {
                    None
                } else {
                    Some(self.parse_dotted_name()?)
                };
                self.expect(TokenKind::Import)?;
                let names = if self.at(TokenKind::Star) {
                    self.advance();
                    vec![("*".to_string(), None)]
                } else {
                    self.parse_import_names()?
                };
                StmtKind::ImportFrom { module, names, level }
            }
            TokenKind::Raise => {
                self.advance();
                let exc = if self.at(TokenKind::Newline) || self.at(TokenKind::Eof) {
                    None
                } else {
                    Some(self.parse_expr(parent)?)
                };
                let cause = if self.at(TokenKind::From) {
                    self.advance();
                    Some(self.parse_expr(parent)?)
                } else {
                    None
                };
                StmtKind::Raise { exc, cause }
            }
            _ => return self.parse_expr_statement(parent),
        };
        Ok(self.arena.alloc_stmt(Stmt { span: start.merge(self.peek_span()), kind }, parent))
    }

    fn parse_name_list(&mut self) -> PResult<Vec<String>> {
        let mut names = vec![self.expect_name()?];
        while self.at(TokenKind::Comma) {
            self.advance();
            names.push(self.expect_name()?);
        }
        Ok(names)
    }

    fn parse_dotted_name(&mut self) -> PResult<String> {
        let mut name = self.expect_name()?;
        while self.at(TokenKind::Dot) {
            self.advance();
            name.push('.');
            name.push_str(&self.expect_name()?);
        }
        Ok(name)
    }

    fn parse_import_names(&mut self) -> PResult<Vec<(String, Option<String>)>> {
        let mut names = Vec::new();
        loop {
            let name = self.parse_dotted_name()?;
            let alias = if self.at(TokenKind::As) {
                self.advance();
                Some(self.expect_name()?)
            } else {
                None
            };
            names.push((name, alias));
            if self.at(TokenKind::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        Ok(names)
    }

    fn parse_expr_statement(&mut self, parent: NodeId) -> PResult<NodeId> {
        let start = self.peek_span();
        let first = self.parse_target_list(parent)?;

        if self.at(TokenKind::Colon) {
            self.advance();
            let annotation = self.parse_expr(parent)?;
            let value = if self.at(TokenKind::Assign) {
                self.advance();
                Some(self.parse_expr(parent)?)
            } else {
                None
            };
            let kind = StmtKind::AnnAssign { target: first, annotation, value };
            return Ok(self.arena.alloc_stmt(Stmt { span: start.merge(self.peek_span()), kind }, parent));
        }

        if let Some(op) = self.peek_aug_assign_op() {
            self.advance();
            let value = self.parse_expr(parent)?;
            let kind = StmtKind::AugAssign { target: first, op, value };
            return Ok(self.arena.alloc_stmt(Stmt { span: start.merge(self.peek_span()), kind }, parent));
        }

        if self.at(TokenKind::Assign) {
            let mut pieces = vec![first];
            while self.at(TokenKind::Assign) {
                self.advance();
                pieces.push(self.parse_target_list(parent)?);
            }
            let value = pieces.pop().unwrap();
            let kind = StmtKind::Assign { targets: pieces, value };
            return Ok(self.arena.alloc_stmt(Stmt { span: start.merge(self.peek_span()), kind }, parent));
        }

        let kind = StmtKind::Expr(first);
        Ok(self.arena.alloc_stmt(Stmt { span: start.merge(self.peek_span()), kind }, parent))
    }

    fn peek_aug_assign_op(&self) -> Option<BinOp> {
        match self.peek() {
            TokenKind::PlusEq => Some(BinOp::Add),
            TokenKind::MinusEq => Some(BinOp::Sub),
            TokenKind::StarEq => Some(BinOp::Mul),
            TokenKind::SlashEq => Some(BinOp::Div),
            _ => None,
        }
    }

    fn parse_target_list(&mut self, parent: NodeId) -> PResult<NodeId> {
        let first = self.parse_target(parent)?;
        if self.at(TokenKind::Comma) {
            let start = self.arena.expr(first).span;
            let mut items = vec![first];
            while self.at(TokenKind::Comma) {
                self.advance();
                if self.at(TokenKind::Assign) || self.at(TokenKind::Newline) || self.at(TokenKind::Colon) {
                    break;
                }
                items.push(self.parse_target(parent)?);
            }
            return Ok(self.arena.alloc_expr(
                Expr { span: start.merge(self.peek_span()), kind: ExprKind::Tuple(items) },
                parent,
            ));
        }
        Ok(first)
    }

    fn parse_target(&mut self, parent: NodeId) -> PResult<NodeId> {
        if self.at(TokenKind::Star) {
            let start = self.peek_span();
            self.advance();
            let inner = self.parse_target(parent)?;
            return Ok(self.arena.alloc_expr(
                Expr { span: start.merge(self.peek_span()), kind: ExprKind::Starred(inner) },
                parent,
            ));
        }
        self.parse_or_test(parent)
    }

    // --- expressions (Pratt parser) ------------------------------------

    fn parse_expr(&mut self, parent: NodeId) -> PResult<NodeId> {
        if self.at(TokenKind::Lambda) {
            return self.parse_lambda(parent);
        }
        let start = self.peek_span();
        let test = self.parse_ternary(parent)?;
        if let TokenKind::Name(n) = self.peek().clone() {
            let _ = n;
        }
        if self.at(TokenKind::Walrus) {
            // Only legal when `test` is a bare name, but we don't enforce
            // that here; the checker reports malformed targets.
            self.advance();
            if let ExprKind::Name(name) = self.arena.expr(test).kind.clone() {
                let value = self.parse_expr(parent)?;
                return Ok(self.arena.alloc_expr(
                    Expr { span: start.merge(self.peek_span()), kind: ExprKind::NamedExpr { target: name, value } },
                    parent,
                ));
            }
        }
        Ok(test)
    }

    fn parse_lambda(&mut self, parent: NodeId) -> PResult<NodeId> {
        let start = self.peek_span();
        self.expect(TokenKind::Lambda)?;
        let mut params = Vec::new();
        let mut seen_star = false;
        while !self.at(TokenKind::Colon) {
            let pstart = self.peek_span();
            if self.at(TokenKind::Star) {
                self.advance();
                seen_star = true;
                continue;
            }
            let name = self.expect_name()?;
            let default = if self.at(TokenKind::Assign) {
                self.advance();
                Some(self.parse_expr(parent)?)
            } else {
                None
            };
            let kind = if seen_star { ParamKind::KeywordOnly } else { ParamKind::Positional };
            params.push(Param { name, annotation: None, default, kind, span: pstart });
            if self.at(TokenKind::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        self.expect(TokenKind::Colon)?;
        let body = self.parse_expr(parent)?;
        Ok(self.arena.alloc_expr(
            Expr { span: start.merge(self.peek_span()), kind: ExprKind::Lambda { params, body } },
            parent,
        ))
    }

    fn parse_ternary(&mut self, parent: NodeId) -> PResult<NodeId> {
        let start = self.peek_span();
        let body = self.parse_or_test(parent)?;
        if self.at(TokenKind::If) {
            self.advance();
            let test = self.parse_or_test(parent)?;
            self.expect(TokenKind::Else)?;
            let or_else = self.parse_expr(parent)?;
            return Ok(self.arena.alloc_expr(
                Expr { span: start.merge(self.peek_span()), kind: ExprKind::IfExp { test, body, or_else } },
                parent,
            ));
        }
        Ok(body)
    }

    fn parse_or_test(&mut self, parent: NodeId) -> PResult<NodeId> {
        let start = self.peek_span();
        let mut left = self.parse_and_test(parent)?;
        if self.at(TokenKind::Or) {
            let mut values = vec![left];
            while self.at(TokenKind::Or) {
                self.advance();
                values.push(self.parse_and_test(parent)?);
            }
            left = self.arena.alloc_expr(
                Expr { span: start.merge(self.peek_span()), kind: ExprKind::BoolOp { op: BoolOp::Or, values } },
                parent,
            );
        }
        Ok(left)
    }

    fn parse_and_test(&mut self, parent: NodeId) -> PResult<NodeId> {
        let start = self.peek_span();
        let mut left = self.parse_not_test(parent)?;
        if self.at(TokenKind::And) {
            let mut values = vec![left];
            while self.at(TokenKind::And) {
                self.advance();
                values.push(self.parse_not_test(parent)?);
            }
            left = self.arena.alloc_expr(
                Expr { span: start.merge(self.peek_span()), kind: ExprKind::BoolOp { op: BoolOp::And, values } },
                parent,
            );
        }
        Ok(left)
    }

    fn parse_not_test(&mut self, parent: NodeId) -> PResult<NodeId> {
        if self.at(TokenKind::Not) {
            let start = self.peek_span();
            self.advance();
            let operand = self.parse_not_test(parent)?;
            return Ok(self.arena.alloc_expr(
                Expr { span: start.merge(self.peek_span()), kind: ExprKind::UnaryOp { op: UnaryOp::Not, operand } },
                parent,
            ));
        }
        self.parse_comparison(parent)
    }

    fn parse_comparison(&mut self, parent: NodeId) -> PResult<NodeId> {
        let start = self.peek_span();
        let left = self.parse_bitor(parent)?;
        let mut ops = smallvec![];
        let mut comparators = smallvec![];
        while let Some(op) = self.peek_cmp_op() {
            let op = self.advance_cmp_op(op);
            ops.push(op);
            comparators.push(self.parse_bitor(parent)?);
        }
        if ops.is_empty() {
            return Ok(left);
        }
        Ok(self.arena.alloc_expr(
            Expr { span: start.merge(self.peek_span()), kind: ExprKind::Compare { left, ops, comparators } },
            parent,
        ))
    }

    fn peek_cmp_op(&self) -> Option<CmpOp> {
        match self.peek() {
            TokenKind::Eq => Some(CmpOp::Eq),
            TokenKind::Ne => Some(CmpOp::NotEq),
            TokenKind::Lt => Some(CmpOp::Lt),
            TokenKind::Le => Some(CmpOp::LtE),
            TokenKind::Gt => Some(CmpOp::Gt),
            TokenKind::Ge => Some(CmpOp::GtE),
            TokenKind::Is => Some(CmpOp::Is),
            TokenKind::In => Some(CmpOp::In),
            TokenKind::Not => {
                if self.tokens.get(self.pos + 1).map(|t| &t.kind) == Some(&TokenKind::In) {
                    Some(CmpOp::NotIn)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    fn advance_cmp_op(&mut self, op: CmpOp) -> CmpOp {
        self.advance();
        if op == CmpOp::NotIn {
            self.advance();
            return CmpOp::NotIn;
        }
        if op == CmpOp::Is && self.at(TokenKind::Not) {
            self.advance();
            return CmpOp::IsNot;
        }
        op
    }

    fn parse_bitor(&mut self, parent: NodeId) -> PResult<NodeId> {
        self.parse_binop_level(parent, &[(TokenKind::Pipe, BinOp::BitOr)], Self::parse_bitxor)
    }

    fn parse_bitxor(&mut self, parent: NodeId) -> PResult<NodeId> {
        self.parse_binop_level(parent, &[(TokenKind::Caret, BinOp::BitXor)], Self::parse_bitand)
    }

    fn parse_bitand(&mut self, parent: NodeId) -> PResult<NodeId> {
        self.parse_binop_level(parent, &[(TokenKind::Amp, BinOp::BitAnd)], Self::parse_shift)
    }

    fn parse_shift(&mut self, parent: NodeId) -> PResult<NodeId> {
        self.parse_binop_level(
            parent,
            &[(TokenKind::LShift, BinOp::LShift), (TokenKind::RShift, BinOp::RShift)],
            Self::parse_arith,
        )
    }

    fn parse_arith(&mut self, parent: NodeId) -> PResult<NodeId> {
        self.parse_binop_level(
            parent,
            &[(TokenKind::Plus, BinOp::Add), (TokenKind::Minus, BinOp::Sub)],
            Self::parse_term,
        )
    }

    fn parse_term(&mut self, parent: NodeId) -> PResult<NodeId> {
        self.parse_binop_level(
            parent,
            &[
                (TokenKind::Star, BinOp::Mul),
                (TokenKind::Slash, BinOp::Div),
                (TokenKind::DoubleSlash, BinOp::FloorDiv),
                (TokenKind::Percent, BinOp::Mod),
                (TokenKind::At, BinOp::MatMul),
            ],
            Self::parse_factor,
        )
    }

    fn parse_binop_level(
        &mut self,
        parent: NodeId,
        ops: &[(TokenKind, BinOp)],
        mut next: impl FnMut(&mut Self, NodeId) -> PResult<NodeId>,
    ) -> PResult<NodeId> {
        let start = self.peek_span();
        let mut left = next(self, parent)?;
        loop {
            let matched = ops.iter().find(|(tok, _)| self.peek() == tok);
            let Some((_, op)) = matched else { break };
            let op = *op;
            self.advance();
            let right = next(self, parent)?;
            left = self.arena.alloc_expr(
                Expr { span: start.merge(self.peek_span()), kind: ExprKind::BinOp { left, op, right } },
                parent,
            );
        }
        Ok(left)
    }

    fn parse_factor(&mut self, parent: NodeId) -> PResult<NodeId> {
        let start = self.peek_span();
        let op = match self.peek() {
            TokenKind::Plus => Some(UnaryOp::UAdd),
            TokenKind::Minus => Some(UnaryOp::USub),
            TokenKind::Tilde => Some(UnaryOp::Invert),
            _ => None,
        };
        if let Some(op) = op {
            self.advance();
            let operand = self.parse_factor(parent)?;
            return Ok(self.arena.alloc_expr(
                Expr { span: start.merge(self.peek_span()), kind: ExprKind::UnaryOp { op, operand } },
                parent,
            ));
        }
        self.parse_power(parent)
    }

    fn parse_power(&mut self, parent: NodeId) -> PResult<NodeId> {
        let start = self.peek_span();
        let base = self.parse_unary_await(parent)?;
        if self.at(TokenKind::DoubleStar) {
            self.advance();
            let exponent = self.parse_factor(parent)?;
            return Ok(self.arena.alloc_expr(
                Expr {
                    span: start.merge(self.peek_span()),
                    kind: ExprKind::BinOp { left: base, op: BinOp::Pow, right: exponent },
                },
                parent,
            ));
        }
        Ok(base)
    }

    fn parse_unary_await(&mut self, parent: NodeId) -> PResult<NodeId> {
        if self.at(TokenKind::Await) {
            let start = self.peek_span();
            self.advance();
            let inner = self.parse_unary_await(parent)?;
            return Ok(self.arena.alloc_expr(
                Expr { span: start.merge(self.peek_span()), kind: ExprKind::Await(inner) },
                parent,
            ));
        }
        self.parse_postfix(parent)
    }

    fn parse_postfix(&mut self, parent: NodeId) -> PResult<NodeId> {
        let start = self.peek_span();
        let mut expr = self.parse_atom(parent)?;
        loop {
            match self.peek() {
                TokenKind::Dot => {
                    self.advance();
                    let attr = self.expect_name()?;
                    expr = self.arena.alloc_expr(
                        Expr { span: start.merge(self.peek_span()), kind: ExprKind::Attribute { value: expr, attr } },
                        parent,
                    );
                }
                TokenKind::LParen => {
                    self.advance();
                    let (args, keywords) = self.parse_call_args(parent)?;
                    self.expect(TokenKind::RParen)?;
                    expr = self.arena.alloc_expr(
                        Expr {
                            span: start.merge(self.peek_span()),
                            kind: ExprKind::Call { func: expr, args, keywords },
                        },
                        parent,
                    );
                }
                TokenKind::LBracket => {
                    self.advance();
                    let index = self.parse_subscript_index(parent)?;
                    self.expect(TokenKind::RBracket)?;
                    expr = self.arena.alloc_expr(
                        Expr {
                            span: start.merge(self.peek_span()),
                            kind: ExprKind::Subscript { value: expr, index },
                        },
                        parent,
                    );
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn parse_subscript_index(&mut self, parent: NodeId) -> PResult<NodeId> {
        let start = self.peek_span();
        let first = self.parse_expr(parent)?;
        if self.at(TokenKind::Comma) {
            let mut items = vec![first];
            while self.at(TokenKind::Comma) {
                self.advance();
                if self.at(TokenKind::RBracket) {
                    break;
                }
                items.push(self.parse_expr(parent)?);
            }
            return Ok(self.arena.alloc_expr(
                Expr { span: start.merge(self.peek_span()), kind: ExprKind::Tuple(items) },
                parent,
            ));
        }
        Ok(first)
    }

    fn parse_call_args(&mut self, parent: NodeId) -> PResult<(Vec<NodeId>, Vec<(Option<String>, NodeId)>)> {
        let mut args = Vec::new();
        let mut keywords = Vec::new();
        while !self.at(TokenKind::RParen) {
            if self.at(TokenKind::DoubleStar) {
                self.advance();
                let value = self.parse_expr(parent)?;
                keywords.push((None, value));
            } else if self.at(TokenKind::Star) {
                let start = self.peek_span();
                self.advance();
                let inner = self.parse_expr(parent)?;
                let starred = self.arena.alloc_expr(
                    Expr { span: start.merge(self.peek_span()), kind: ExprKind::Starred(inner) },
                    parent,
                );
                args.push(starred);
            } else if let TokenKind::Name(n) = self.peek().clone() {
                if self.tokens.get(self.pos + 1).map(|t| &t.kind) == Some(&TokenKind::Assign) {
                    self.advance();
                    self.advance();
                    let value = self.parse_expr(parent)?;
                    keywords.push((Some(n), value));
                } else {
                    args.push(self.parse_expr(parent)?);
                }
            } else {
                args.push(self.parse_expr(parent)?);
            }
            if self.at(TokenKind::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        Ok((args, keywords))
    }

    fn parse_atom(&mut self, parent: NodeId) -> PResult<NodeId> {
        let start = self.peek_span();
        let kind = match self.peek().clone() {
            TokenKind::Name(n) => {
                self.advance();
                ExprKind::Name(n)
            }
            TokenKind::Int(v) => {
                self.advance();
                ExprKind::Constant(Constant::Int(v))
            }
            TokenKind::Float(v) => {
                self.advance();
                ExprKind::Constant(Constant::Float(v))
            }
            TokenKind::Str(s) => {
                self.advance();
                ExprKind::Constant(Constant::Str(s))
            }
            TokenKind::True => {
                self.advance();
                ExprKind::Constant(Constant::Bool(true))
            }
            TokenKind::False => {
                self.advance();
                ExprKind::Constant(Constant::Bool(false))
            }
            TokenKind::None => {
                self.advance();
                ExprKind::Constant(Constant::None)
            }
            TokenKind::Ellipsis => {
                self.advance();
                ExprKind::Ellipsis
            }
            TokenKind::Yield => {
                self.advance();
                if self.at(TokenKind::From) {
                    self.advance();
                    let value = self.parse_expr(parent)?;
                    ExprKind::YieldFrom(value)
                } else if self.at(TokenKind::Newline) || self.at(TokenKind::RParen) {
                    ExprKind::Yield(None)
                } else {
                    ExprKind::Yield(Some(self.parse_expr(parent)?))
                }
            }
            TokenKind::LParen => {
                self.advance();
                if self.at(TokenKind::RParen) {
                    self.advance();
                    ExprKind::Tuple(Vec::new())
                } else {
                    let first = self.parse_expr(parent)?;
                    if self.is_comprehension_ahead() {
                        let generators = self.parse_comprehensions(parent)?;
                        self.expect(TokenKind::RParen)?;
                        ExprKind::GeneratorExp { element: first, generators }
                    } else if self.at(TokenKind::Comma) {
                        let mut items = vec![first];
                        while self.at(TokenKind::Comma) {
                            self.advance();
                            if self.at(TokenKind::RParen) {
                                break;
                            }
                            items.push(self.parse_expr(parent)?);
                        }
                        self.expect(TokenKind::RParen)?;
                        ExprKind::Tuple(items)
                    } else {
                        self.expect(TokenKind::RParen)?;
                        return Ok(first);
                    }
                }
            }
            TokenKind::LBracket => {
                self.advance();
                if self.at(TokenKind::RBracket) {
                    self.advance();
                    ExprKind::List(Vec::new())
                } else {
                    let first = self.parse_expr(parent)?;
                    if self.is_comprehension_ahead() {
                        let generators = self.parse_comprehensions(parent)?;
                        self.expect(TokenKind::RBracket)?;
                        ExprKind::ListComp { element: first, generators }
                    } else {
                        let mut items = vec![first];
                        while self.at(TokenKind::Comma) {
                            self.advance();
                            if self.at(TokenKind::RBracket) {
                                break;
                            }
                            items.push(self.parse_expr(parent)?);
                        }
                        self.expect(TokenKind::RBracket)?;
                        ExprKind::List(items)
                    }
                }
            }
            TokenKind::LBrace => {
                self.advance();
                if self.at(TokenKind::RBrace) {
                    self.advance();
                    ExprKind::Dict { keys: Vec::new(), values: Vec::new() }
                } else {
                    self.parse_brace_body(parent)?
                }
            }
            TokenKind::Star => {
                self.advance();
                let inner = self.parse_or_test(parent)?;
                ExprKind::Starred(inner)
            }
            other => {
                return Err(ParseError {
                    message: format!("unexpected token in expression: {other:?}"),
                    span: start,
                })
            }
        };
        Ok(self.arena.alloc_expr(Expr { span: start.merge(self.peek_span()), kind }, parent))
    }

    fn parse_brace_body(&mut self, parent: NodeId) -> PResult<ExprKind> {
        if self.at(TokenKind::DoubleStar) {
            self.advance();
            let value = self.parse_or_test(parent)?;
            let mut keys = vec![None];
            let mut values = vec![value];
            while self.at(TokenKind::Comma) {
                self.advance();
                if self.at(TokenKind::RBrace) {
                    break;
                }
                self.parse_dict_entry(parent, &mut keys, &mut values)?;
            }
            self.expect(TokenKind::RBrace)?;
            return Ok(ExprKind::Dict { keys, values });
        }
        let first = self.parse_or_test(parent)?;
        if self.at(TokenKind::Colon) {
            self.advance();
            let value = self.parse_expr(parent)?;
            if self.is_comprehension_ahead() {
                let generators = self.parse_comprehensions(parent)?;
                self.expect(TokenKind::RBrace)?;
                return Ok(ExprKind::DictComp { key: first, value, generators });
            }
            let mut keys = vec![Some(first)];
            let mut values = vec![value];
            while self.at(TokenKind::Comma) {
                self.advance();
                if self.at(TokenKind::RBrace) {
                    break;
                }
                self.parse_dict_entry(parent, &mut keys, &mut values)?;
            }
            self.expect(TokenKind::RBrace)?;
            return Ok(ExprKind::Dict { keys, values });
        }
        if self.is_comprehension_ahead() {
            let generators = self.parse_comprehensions(parent)?;
            self.expect(TokenKind::RBrace)?;
            return Ok(ExprKind::SetComp { element: first, generators });
        }
        let mut items = vec![first];
        while self.at(TokenKind::Comma) {
            self.advance();
            if self.at(TokenKind::RBrace) {
                break;
            }
            items.push(self.parse_or_test(parent)?);
        }
        self.expect(TokenKind::RBrace)?;
        Ok(ExprKind::Set(items))
    }

    fn parse_dict_entry(
        &mut self,
        parent: NodeId,
        keys: &mut Vec<Option<NodeId>>,
        values: &mut Vec<NodeId>,
    ) -> PResult<()> {
        if self.at(TokenKind::DoubleStar) {
            self.advance();
            keys.push(None);
            values.push(self.parse_or_test(parent)?);
            return Ok(());
        }
        let key = self.parse_or_test(parent)?;
        self.expect(TokenKind::Colon)?;
        let value = self.parse_expr(parent)?;
        keys.push(Some(key));
        values.push(value);
        Ok(())
    }

    fn is_comprehension_ahead(&self) -> bool {
        self.at(TokenKind::For) || (self.at(TokenKind::Async) && self.tokens.get(self.pos + 1).map(|t| &t.kind) == Some(&TokenKind::For))
    }

    fn parse_comprehensions(&mut self, parent: NodeId) -> PResult<Vec<Comprehension>> {
        let mut generators = Vec::new();
        while self.at(TokenKind::For) || self.at(TokenKind::Async) {
            let is_async = if self.at(TokenKind::Async) {
                self.advance();
                true
            } else {
                false
            };
            self.expect(TokenKind::For)?;
            let target = self.parse_target_list(parent)?;
            self.expect(TokenKind::In)?;
            let iter = self.parse_or_test(parent)?;
            let mut ifs = Vec::new();
            while self.at(TokenKind::If) {
                self.advance();
                ifs.push(self.parse_or_test(parent)?);
            }
            generators.push(Comprehension { target, iter, ifs, is_async });
        }
        Ok(generators)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Constant, ExprKind, StmtKind};

    fn parse(source: &str) -> Module {
        Parser::new(source).parse_module().expect("parse should succeed")
    }

    #[test]
    fn parses_function_def_with_annotations() {
        let module = parse("def add(x: int, y: int = 1) -> int:\n    return x + y\n");
        assert_eq!(module.body.len(), 1);
        match &module.arena.stmt(module.body[0]).kind {
            StmtKind::FunctionDef { name, params, returns, body, .. } => {
                assert_eq!(name, "add");
                assert_eq!(params.len(), 2);
                assert!(returns.is_some());
                assert_eq!(body.len(), 1);
            }
            other => panic!("expected FunctionDef, got {other:?}"),
        }
    }

    #[test]
    fn parses_class_with_bases() {
        let module = parse("class Dog(Animal):\n    def bark(self) -> None:\n        pass\n");
        match &module.arena.stmt(module.body[0]).kind {
            StmtKind::ClassDef { name, bases, body, .. } => {
                assert_eq!(name, "Dog");
                assert_eq!(bases.len(), 1);
                assert_eq!(body.len(), 1);
            }
            other => panic!("expected ClassDef, got {other:?}"),
        }
    }

    #[test]
    fn parses_if_elif_else_chain() {
        let module = parse("if a:\n    pass\nelif b:\n    pass\nelse:\n    pass\n");
        match &module.arena.stmt(module.body[0]).kind {
            StmtKind::If { or_else, .. } => {
                assert_eq!(or_else.len(), 1);
            }
            other => panic!("expected If, got {other:?}"),
        }
    }

    #[test]
    fn parses_walrus_in_if_test() {
        let module = parse("if (n := compute()) > 0:\n    pass\n");
        match &module.arena.stmt(module.body[0]).kind {
            StmtKind::If { test, .. } => match &module.arena.expr(*test).kind {
                ExprKind::Compare { left, .. } => match &module.arena.expr(*left).kind {
                    ExprKind::NamedExpr { target, .. } => assert_eq!(target, "n"),
                    other => panic!("expected NamedExpr, got {other:?}"),
                },
                other => panic!("expected Compare, got {other:?}"),
            },
            other => panic!("expected If, got {other:?}"),
        }
    }

    #[test]
    fn parses_chained_comparison() {
        let module = parse("x = a < b < c\n");
        match &module.arena.stmt(module.body[0]).kind {
            StmtKind::Assign { value, .. } => match &module.arena.expr(*value).kind {
                ExprKind::Compare { ops, comparators, .. } => {
                    assert_eq!(ops.len(), 2);
                    assert_eq!(comparators.len(), 2);
                }
                other => panic!("expected Compare, got {other:?}"),
            },
            other => panic!("expected Assign, got {other:?}"),
        }
    }

    #[test]
    fn parses_list_comprehension() {
        let module = parse("xs = [i for i in range(10) if i % 2 == 0]\n");
        match &module.arena.stmt(module.body[0]).kind {
            StmtKind::Assign { value, .. } => match &module.arena.expr(*value).kind {
                ExprKind::ListComp { generators, .. } => {
                    assert_eq!(generators.len(), 1);
                    assert_eq!(generators[0].ifs.len(), 1);
                }
                other => panic!("expected ListComp, got {other:?}"),
            },
            other => panic!("expected Assign, got {other:?}"),
        }
    }

    #[test]
    fn parses_call_with_keyword_and_starred_args() {
        let module = parse("f(*args, key=1, **kwargs)\n");
        match &module.arena.stmt(module.body[0]).kind {
            StmtKind::Expr(id) => match &module.arena.expr(*id).kind {
                ExprKind::Call { args, keywords, .. } => {
                    assert_eq!(args.len(), 1);
                    assert_eq!(keywords.len(), 2);
                }
                other => panic!("expected Call, got {other:?}"),
            },
            other => panic!("expected Expr, got {other:?}"),
        }
    }

    #[test]
    fn parses_chained_assignment() {
        let module = parse("a = b = 1\n");
        match &module.arena.stmt(module.body[0]).kind {
            StmtKind::Assign { targets, .. } => assert_eq!(targets.len(), 2),
            other => panic!("expected Assign, got {other:?}"),
        }
    }

    #[test]
    fn parses_star_only_keyword_marker() {
        let module = parse("def f(a, *, b):\n    pass\n");
        match &module.arena.stmt(module.body[0]).kind {
            StmtKind::FunctionDef { params, .. } => {
                assert_eq!(params.len(), 2);
                assert_eq!(params[1].kind, crate::ast::ParamKind::KeywordOnly);
            }
            other => panic!("expected FunctionDef, got {other:?}"),
        }
    }

    #[test]
    fn int_constant_parses() {
        let module = parse("x = 42\n");
        match &module.arena.stmt(module.body[0]).kind {
            StmtKind::Assign { value, .. } => match &module.arena.expr(*value).kind {
                ExprKind::Constant(Constant::Int(n)) => assert_eq!(*n, 42),
                other => panic!("expected Int constant, got {other:?}"),
            },
            other => panic!("expected Assign, got {other:?}"),
        }
    }
}
