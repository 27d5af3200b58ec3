//! Centralized recursion depths and iteration bounds.
//!
//! Centralizing these avoids duplicate constants with inconsistent values
//! scattered across the solver and driver, and documents the rationale for
//! each bound.

/// Recursion depth bound for `can_assign`, at least 20 deep; exceeding it
/// returns `true` (conservative accept) rather than panicking, to
/// guarantee termination on self-referential types such as
/// `class Node(Generic[T]): children: List["Node[T]"]`.
pub const MAX_ASSIGNABILITY_DEPTH: u32 = 24;

/// Recursion depth bound for the expression evaluator.
pub const MAX_EXPR_EVAL_DEPTH: u32 = 64;

/// Upper bound on per-file analysis passes before the driver gives up on
/// convergence and reports the last change reason.
pub const MAX_ANALYSIS_PASSES: u32 = 25;

/// Cap on recorded import cycles per file.
pub const MAX_RECORDED_IMPORT_CYCLES: usize = 4;

/// Default per-slice time budget for the module analysis driver, in
/// milliseconds.
pub const DEFAULT_MAX_ANALYSIS_TIME_MS: u64 = 100;

/// User-interaction recency threshold below which the driver backs off
/// further.
pub const INTERACTIVE_BACKOFF_THRESHOLD_MS: u64 = 1000;
