//! The parse-tree boundary the rest of the analyzer consumes.
//!
//! The binder and checker only need a stable node-id'd tree with parent
//! links; they don't care how it was produced. This crate ships a small
//! hand-written lexer and recursive-descent parser, enough to drive the
//! analyzer's own tests, without aiming for full grammar coverage of every
//! corner of the language.

pub mod token;
pub mod lexer;
pub mod ast;
pub mod parser;

pub use ast::{
    Arena, BinOp, BoolOp, CmpOp, Comprehension, Constant, ExceptHandler, Expr, ExprKind, Module,
    Node, NodeId, Param, ParamKind, Stmt, StmtKind, UnaryOp,
};
pub use parser::{ParseError, Parser};
