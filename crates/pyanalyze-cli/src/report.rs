//! Renders diagnostics to the terminal: one line per diagnostic,
//! `path:line:col - category code: message`, colored by category. Exit
//! code selection (0/1/2) lives here too since it's a pure function of
//! what got reported.

use std::path::Path;

use colored::Colorize;
use pyanalyze_common::{Diagnostic, DiagnosticCategory, LineMap};

#[must_use]
pub fn print_diagnostics(path: &Path, source: &str, diagnostics: &[Diagnostic]) -> bool {
    let line_map = LineMap::build(source);
    let mut saw_error = false;
    for diagnostic in diagnostics {
        let position = line_map.offset_to_position(diagnostic.span.start);
        let (label, rendered) = match diagnostic.category {
            DiagnosticCategory::Error => {
                saw_error = true;
                ("error", "error".red().bold())
            }
            DiagnosticCategory::Warning => ("warning", "warning".yellow().bold()),
            DiagnosticCategory::Information => ("information", "information".blue().bold()),
            DiagnosticCategory::UnusedCode => ("hint", "hint".dimmed()),
        };
        let _ = label;
        println!(
            "{}:{}:{} - {rendered} {}: {}",
            path.display(),
            position.line + 1,
            position.character + 1,
            format!("({})", diagnostic.code).dimmed(),
            diagnostic.message,
        );
    }
    saw_error
}

/// Process exit code for a whole run that completed without a fatal
/// error (a fatal error — config parse failure, unreadable source file —
/// is reported as exit code 2 directly from `main`, since it means the
/// run never produced diagnostics to report in the first place).
#[must_use]
pub fn exit_code(saw_error: bool) -> u8 {
    u8::from(saw_error)
}

#[cfg(test)]
#[path = "tests/report.rs"]
mod tests;
