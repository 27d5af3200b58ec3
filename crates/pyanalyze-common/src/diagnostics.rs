//! The diagnostic model: categories, stable rule codes, message templates,
//! and the suggested-edit payload a diagnostic may carry.

pub mod codes;

use crate::span::Span;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DiagnosticCategory {
    Error,
    Warning,
    Information,
    UnusedCode,
}

/// A single suggested edit a diagnostic may carry. Only one kind exists today: wrapping a parameter's type node
/// in `Optional[...]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SuggestedAction {
    AddOptionalForParam { type_node_offset: u32 },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiagnosticRelatedInformation {
    pub file: String,
    pub span: Span,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    /// Stable numeric rule code, see `codes`.
    pub code: u32,
    pub file: String,
    pub span: Span,
    pub message: String,
    pub related_information: Vec<DiagnosticRelatedInformation>,
    pub suggested_action: Option<SuggestedAction>,
}

impl Diagnostic {
    #[must_use]
    pub fn new(
        category: DiagnosticCategory,
        code: u32,
        file: impl Into<String>,
        span: Span,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            code,
            file: file.into(),
            span,
            message: message.into(),
            related_information: Vec::new(),
            suggested_action: None,
        }
    }

    #[must_use]
    pub fn error(file: impl Into<String>, span: Span, code: u32, message: impl Into<String>) -> Self {
        Self::new(DiagnosticCategory::Error, code, file, span, message)
    }

    #[must_use]
    pub fn warning(file: impl Into<String>, span: Span, code: u32, message: impl Into<String>) -> Self {
        Self::new(DiagnosticCategory::Warning, code, file, span, message)
    }

    #[must_use]
    pub fn with_related(mut self, file: impl Into<String>, span: Span, message: impl Into<String>) -> Self {
        self.related_information.push(DiagnosticRelatedInformation {
            file: file.into(),
            span,
            message: message.into(),
        });
        self
    }

    #[must_use]
    pub fn with_suggested_action(mut self, action: SuggestedAction) -> Self {
        self.suggested_action = Some(action);
        self
    }
}

/// Substitute `{0}`, `{1}`, ... placeholders in a message template.
#[must_use]
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_message_substitutes_positional_args() {
        let msg = format_message("Cannot assign {0} to {1}", &["str", "int"]);
        assert_eq!(msg, "Cannot assign str to int");
    }

    #[test]
    fn diagnostic_builder_accumulates_related_information() {
        let d = Diagnostic::error("a.py", Span::new(0, 1), codes::NOT_DEFINED, "x is not defined")
            .with_related("a.py", Span::new(10, 12), "previous use here");
        assert_eq!(d.related_information.len(), 1);
        assert_eq!(d.code, codes::NOT_DEFINED);
    }
}
