//! Ties `args`, `config`, `discovery`, and `pyanalyze_driver::ProjectAnalyzer`
//! together into the one thing the binary does: load every discovered
//! file into the project, drive it to a fixed point, print diagnostics,
//! and return the process exit code: 0 = no errors, 1 = errors found,
//! 2 = fatal.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use colored::Colorize;
use pyanalyze_common::RuleSeverity;
use pyanalyze_driver::ProjectAnalyzer;

use crate::args::CliArgs;
use crate::config::ProjectConfig;
use crate::{discovery, report};

/// Re-checking stops once a full sweep leaves nothing dirty; this bounds
/// how many sweeps batch mode will drive before giving up, well above any
/// real project's cross-file settling time.
const MAX_SWEEPS: u32 = 64;

pub fn run(args: CliArgs) -> Result<u8> {
    let root = match &args.project {
        Some(path) => path.clone(),
        None => std::env::current_dir().context("reading the current directory")?,
    };

    let config_path = args.config.clone().unwrap_or_else(|| ProjectConfig::default_path(&root));
    let config = ProjectConfig::load_or_default(&config_path)?;
    let include = config.include.clone();
    let exclude = config.exclude.clone();
    let ignore = config.ignore.clone();
    let options = config.into_analyzer_options(args.strict);
    let cycle_severity = options.rule_severities.severity_of("reportImportCycles");

    let files: Vec<PathBuf> = if args.files.is_empty() {
        discovery::collect_py_files(&root, &include, &exclude, &ignore)
    } else {
        args.files.clone()
    };

    if files.is_empty() {
        println!("No Python files found under {}", root.display());
        return Ok(0);
    }

    let mut project = ProjectAnalyzer::new(root.clone(), options);
    for path in &files {
        let source = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        project.set_file(path.clone(), source);
    }

    for _ in 0..MAX_SWEEPS {
        let produced = project.analyze_pending(Duration::from_secs(5));
        if produced.is_empty() {
            break;
        }
    }

    let mut saw_error = false;
    for path in &files {
        let Some(file) = project.file(path) else { continue };
        let Some(checked) = file.checked.as_ref() else { continue };
        if report::print_diagnostics(path, &file.source, &checked.diagnostics) {
            saw_error = true;
        }
        if let Some(parse_error) = &file.parse_error {
            saw_error = true;
            println!("{}: {parse_error}", path.display().to_string().red());
        }

        let cycles = project.import_cycles(path);
        if !cycles.is_empty() && cycle_severity != RuleSeverity::None {
            if cycle_severity == RuleSeverity::Error {
                saw_error = true;
            }
            for cycle in cycles {
                let chain = cycle.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(" -> ");
                println!("{}: import cycle: {chain} -> {}", path.display(), path.display());
            }
        }
    }

    Ok(report::exit_code(saw_error))
}

#[cfg(test)]
#[path = "tests/run.rs"]
mod tests;
