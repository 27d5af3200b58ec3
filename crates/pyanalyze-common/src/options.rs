//! Analyzer configuration primitives: language version, per-rule severity,
//! and the aggregate `AnalyzerOptions` consumed by the checker and driver.
//!
//! Mirrors pyright's split of `CheckerOptions` into `this layer's common crate` so that
//! both the type layer and the checker layer can reference it without a
//! circular crate dependency.

use rustc_hash::FxHashMap;

/// The language version targeted during analysis. Controls which standard
/// library constructs are assumed available.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LanguageVersion {
    V3_8 = 8,
    V3_9 = 9,
    V3_10 = 10,
    V3_11 = 11,
    #[default]
    V3_12 = 12,
    V3_13 = 13,
}

impl LanguageVersion {
    /// Structural pattern matching (`match` on types) requires 3.10+.
    #[must_use]
    pub const fn supports_structural_pattern_matching(self) -> bool {
        (self as u8) >= (Self::V3_10 as u8)
    }

    /// `X | Y` union syntax in annotations without `from __future__ import
    /// annotations` requires 3.10+.
    #[must_use]
    pub const fn supports_pep604_union_syntax(self) -> bool {
        (self as u8) >= (Self::V3_10 as u8)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RuleSeverity {
    None,
    #[default]
    Warning,
    Error,
}

/// Per-rule severity configuration for ≈ 20 rule names").
#[derive(Clone, Debug)]
pub struct RuleSeverities {
    defaults: RuleSeverity,
    overrides: FxHashMap<&'static str, RuleSeverity>,
}

impl Default for RuleSeverities {
    fn default() -> Self {
        Self {
            defaults: RuleSeverity::Warning,
            overrides: FxHashMap::default(),
        }
    }
}

impl RuleSeverities {
    #[must_use]
    pub fn severity_of(&self, rule: &str) -> RuleSeverity {
        self.overrides.get(rule).copied().unwrap_or(self.defaults)
    }

    pub fn set(&mut self, rule: &'static str, severity: RuleSeverity) {
        self.overrides.insert(rule, severity);
    }

    /// Apply `strict` mode: every known rule not explicitly overridden is
    /// promoted to `Error`.
    pub fn apply_strict(&mut self) {
        for rule in KNOWN_RULES {
            self.overrides.entry(rule).or_insert(RuleSeverity::Error);
        }
    }
}

/// The ~20 configurable rule names surfaced in the project config.
pub const KNOWN_RULES: &[&str] = &[
    "reportOptionalMemberAccess",
    "reportUnnecessaryIsInstance",
    "reportUnusedImport",
    "reportUnusedVariable",
    "reportUnusedFunction",
    "reportUnusedClass",
    "reportGeneralTypeIssues",
    "reportArgumentType",
    "reportReturnType",
    "reportIncompatibleMethodOverride",
    "reportMissingTypeArgument",
    "reportPrivateUsage",
    "reportImportCycles",
    "reportTypeshedErrors",
    "reportSelfClsParameterName",
    "reportCallInDefaultInitializer",
    "reportUnnecessaryComparison",
    "reportUnnecessaryContains",
    "reportOverlappingOverload",
    "reportAbstractUsage",
];

/// Aggregate analyzer options threaded through the checker and driver.
#[derive(Clone, Debug, Default)]
pub struct AnalyzerOptions {
    pub strict: bool,
    pub language_version: LanguageVersion,
    pub rule_severities: RuleSeverities,
    /// Bound for `can_assign` recursion (overridable for tests).
    pub max_assignability_depth: Option<u32>,
    /// Bound for the driver's per-file pass count (overridable for tests).
    pub max_analysis_passes: Option<u32>,
}

impl AnalyzerOptions {
    #[must_use]
    pub fn apply_strict_defaults(mut self) -> Self {
        if self.strict {
            self.rule_severities.apply_strict();
        }
        self
    }

    #[must_use]
    pub fn assignability_depth(&self) -> u32 {
        self.max_assignability_depth.unwrap_or(crate::limits::MAX_ASSIGNABILITY_DEPTH)
    }

    #[must_use]
    pub fn analysis_pass_bound(&self) -> u32 {
        self.max_analysis_passes.unwrap_or(crate::limits::MAX_ANALYSIS_PASSES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_mode_promotes_unset_rules_to_error() {
        let opts = AnalyzerOptions { strict: true, ..Default::default() }.apply_strict_defaults();
        assert_eq!(opts.rule_severities.severity_of("reportOptionalMemberAccess"), RuleSeverity::Error);
    }

    #[test]
    fn explicit_override_wins_over_strict() {
        let mut opts = AnalyzerOptions { strict: true, ..Default::default() };
        opts.rule_severities.set("reportUnusedImport", RuleSeverity::None);
        let opts = opts.apply_strict_defaults();
        assert_eq!(opts.rule_severities.severity_of("reportUnusedImport"), RuleSeverity::None);
    }
}
