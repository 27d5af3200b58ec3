//! The JSON project config: `include`/`exclude`/`ignore` globs, the
//! per-rule severity table, and the handful of import-resolution-root
//! settings (`venvPath`, `typeshedPath`, `executionEnvironments`, ...)
//! that exist so a config file written for this analyzer reads the same
//! recognized keys whether or not this binary wires every one of them
//! into real behavior yet — venv/typeshed resolution is the external
//! import-resolver's concern, not this crate's.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use pyanalyze_common::options::{KNOWN_RULES, RuleSeverities};
use pyanalyze_common::{AnalyzerOptions, LanguageVersion, RuleSeverity};
use serde::Deserialize;

pub const DEFAULT_CONFIG_NAME: &str = "pyanalyze.json";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExecutionEnvironment {
    pub root: PathBuf,
    pub python_version: Option<String>,
    pub venv: Option<String>,
    pub extra_paths: Vec<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectConfig {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub ignore: Vec<String>,
    pub venv_path: Option<PathBuf>,
    pub venv: Option<String>,
    pub python_path: Option<PathBuf>,
    pub python_version: Option<String>,
    pub typeshed_path: Option<PathBuf>,
    pub typings_path: Option<PathBuf>,
    /// Non-empty means the project analyzes in strict mode; this
    /// implementation does not yet scope strictness to the individual
    /// path globs pyright's `strict[]` allows.
    pub strict: Vec<String>,
    pub rule_severities: BTreeMap<String, String>,
    pub report_import_cycles: Option<String>,
    pub report_typeshed_errors: Option<String>,
    pub report_unused_import: Option<String>,
    pub execution_environments: Vec<ExecutionEnvironment>,
}

impl ProjectConfig {
    /// Finds `<project>/pyanalyze.json`, the config's default location,
    /// without requiring it to exist.
    #[must_use]
    pub fn default_path(project_root: &Path) -> PathBuf {
        project_root.join(DEFAULT_CONFIG_NAME)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).with_context(|| format!("reading config at {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config at {}", path.display()))
    }

    /// Loads the config at `path` if it exists, or an empty default
    /// (every setting at its built-in default) if it doesn't — a missing
    /// config file is not an error, only an explicitly-named one that
    /// fails to parse is.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.is_file() { Self::load(path) } else { Ok(Self::default()) }
    }

    #[must_use]
    pub fn into_analyzer_options(self, force_strict: bool) -> AnalyzerOptions {
        let mut rule_severities = RuleSeverities::default();
        for (rule, value) in &self.rule_severities {
            if let (Some(name), Some(severity)) = (static_rule_name(rule), parse_severity(value)) {
                rule_severities.set(name, severity);
            }
        }
        for (rule, value) in [
            ("reportImportCycles", &self.report_import_cycles),
            ("reportTypeshedErrors", &self.report_typeshed_errors),
            ("reportUnusedImport", &self.report_unused_import),
        ] {
            if let Some(value) = value {
                if let (Some(name), Some(severity)) = (static_rule_name(rule), parse_severity(value)) {
                    rule_severities.set(name, severity);
                }
            }
        }
        let strict = force_strict || !self.strict.is_empty();
        let language_version = self.python_version.as_deref().and_then(parse_language_version).unwrap_or_default();
        AnalyzerOptions { strict, language_version, rule_severities, max_assignability_depth: None, max_analysis_passes: None }
            .apply_strict_defaults()
    }
}

fn static_rule_name(name: &str) -> Option<&'static str> {
    KNOWN_RULES.iter().copied().find(|&known| known == name)
}

fn parse_severity(value: &str) -> Option<RuleSeverity> {
    match value {
        "none" => Some(RuleSeverity::None),
        "warning" => Some(RuleSeverity::Warning),
        "error" => Some(RuleSeverity::Error),
        _ => None,
    }
}

fn parse_language_version(value: &str) -> Option<LanguageVersion> {
    match value.trim_start_matches("3.") {
        "8" => Some(LanguageVersion::V3_8),
        "9" => Some(LanguageVersion::V3_9),
        "10" => Some(LanguageVersion::V3_10),
        "11" => Some(LanguageVersion::V3_11),
        "12" => Some(LanguageVersion::V3_12),
        "13" => Some(LanguageVersion::V3_13),
        _ => None,
    }
}

#[cfg(test)]
#[path = "tests/config.rs"]
mod tests;
