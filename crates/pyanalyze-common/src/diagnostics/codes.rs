//! Stable numeric codes for every diagnostic kind in the error-handling
//! design. Grouped in the `E1xxx` namespace, mirroring the
//! teacher's `diagnostic_codes` table.

pub const NOT_DEFINED: u32 = 1001;
pub const UNKNOWN_MEMBER: u32 = 1002;
pub const NOT_CALLABLE: u32 = 1003;
pub const ARGUMENT_MISMATCH: u32 = 1004;
pub const PARAMETER_COUNT: u32 = 1005;
pub const DUPLICATE_KEYWORD: u32 = 1006;
pub const OVERLOAD_NO_MATCH: u32 = 1007;
pub const RETURN_TYPE_MISMATCH: u32 = 1008;
pub const YIELD_TYPE_MISMATCH: u32 = 1009;
pub const EXCEPTION_NOT_DERIVED: u32 = 1010;
pub const BASE_CLASS_INVALID: u32 = 1011;
pub const INCOMPATIBLE_OVERRIDE: u32 = 1012;
pub const OPTIONAL_ACCESS: u32 = 1013;
pub const UNNECESSARY_ISINSTANCE: u32 = 1014;
pub const UNUSED_IMPORT: u32 = 1015;
pub const UNUSED_VARIABLE: u32 = 1016;
pub const UNUSED_FUNCTION: u32 = 1017;
pub const UNUSED_CLASS: u32 = 1018;
pub const IMPORT_CYCLE: u32 = 1019;
pub const CIRCULAR_BASE: u32 = 1020;

/// A (code, default-message-template) pair, parallel to pyright's
/// `DIAGNOSTIC_MESSAGES` table.
pub struct DiagnosticMessage {
    pub code: u32,
    pub template: &'static str,
}

pub const DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = &[
    DiagnosticMessage { code: NOT_DEFINED, template: "\"{0}\" is not defined" },
    DiagnosticMessage { code: UNKNOWN_MEMBER, template: "\"{0}\" has no attribute \"{1}\"" },
    DiagnosticMessage { code: NOT_CALLABLE, template: "\"{0}\" is not callable" },
    DiagnosticMessage { code: ARGUMENT_MISMATCH, template: "Argument of type \"{0}\" cannot be assigned to parameter of type \"{1}\"" },
    DiagnosticMessage { code: PARAMETER_COUNT, template: "Expected {0} positional arguments" },
    DiagnosticMessage { code: DUPLICATE_KEYWORD, template: "Keyword argument \"{0}\" already assigned" },
    DiagnosticMessage { code: OVERLOAD_NO_MATCH, template: "No overload matches this call" },
    DiagnosticMessage { code: RETURN_TYPE_MISMATCH, template: "Expression of type \"{0}\" is incompatible with return type \"{1}\"" },
    DiagnosticMessage { code: YIELD_TYPE_MISMATCH, template: "Expression of type \"{0}\" is incompatible with yield type \"{1}\"" },
    DiagnosticMessage { code: EXCEPTION_NOT_DERIVED, template: "\"{0}\" does not derive from BaseException" },
    DiagnosticMessage { code: BASE_CLASS_INVALID, template: "Base class expression \"{0}\" is not a class" },
    DiagnosticMessage { code: INCOMPATIBLE_OVERRIDE, template: "Method \"{0}\" overrides a base class method incompatibly" },
    DiagnosticMessage { code: OPTIONAL_ACCESS, template: "\"{0}\" is possibly None" },
    DiagnosticMessage { code: UNNECESSARY_ISINSTANCE, template: "Unnecessary isinstance check, type is always {0}" },
    DiagnosticMessage { code: UNUSED_IMPORT, template: "Import \"{0}\" is not accessed" },
    DiagnosticMessage { code: UNUSED_VARIABLE, template: "Variable \"{0}\" is not accessed" },
    DiagnosticMessage { code: UNUSED_FUNCTION, template: "Function \"{0}\" is not accessed" },
    DiagnosticMessage { code: UNUSED_CLASS, template: "Class \"{0}\" is not accessed" },
    DiagnosticMessage { code: IMPORT_CYCLE, template: "Cyclic import detected: {0}" },
    DiagnosticMessage { code: CIRCULAR_BASE, template: "Class \"{0}\" derives from itself transitively" },
];

#[must_use]
pub fn template_for(code: u32) -> Option<&'static str> {
    DIAGNOSTIC_MESSAGES.iter().find(|m| m.code == code).map(|m| m.template)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_code_has_a_message_template() {
        assert_eq!(template_for(NOT_DEFINED), Some("\"{0}\" is not defined"));
        assert!(template_for(999).is_none());
    }
}
