//! Common types and utilities for the pyanalyze type analyzer.
//!
//! This crate provides foundational pieces shared by every other crate in
//! the workspace:
//! - String interning (`Atom`, `Interner`)
//! - Source spans and line/column positions (`Span`, `Position`, `LineMap`)
//! - The diagnostic model (`Diagnostic`, `DiagnosticCategory`, rule codes)
//! - Centralized recursion/iteration limits
//! - Language-version and severity-configuration primitives

pub mod interner;
pub use interner::{Atom, Interner};

pub mod span;
pub use span::{Span, Spanned};

pub mod position;
pub use position::{LineMap, Location, Position, Range};

pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory};

pub mod limits;

pub mod options;
pub use options::{AnalyzerOptions, LanguageVersion, RuleSeverity};
