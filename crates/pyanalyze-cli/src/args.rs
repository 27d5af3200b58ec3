use std::path::PathBuf;

use clap::Parser;

/// Command-line arguments for the `pyanalyze` binary.
#[derive(Parser, Debug)]
#[command(name = "pyanalyze", version, about = "Static type analyzer for a gradually-typed Python-like language")]
pub struct CliArgs {
    /// Specific files to analyze. When empty, the project directory is
    /// walked for every `.py` file the config's include/exclude allow.
    pub files: Vec<PathBuf>,

    /// Project root directory. Defaults to the current directory.
    #[arg(short = 'p', long = "project")]
    pub project: Option<PathBuf>,

    /// Path to an explicit JSON config file, overriding the project's
    /// default `pyanalyze.json`.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Treat every rule not explicitly downgraded in the config as an
    /// error, regardless of the config's `strict` list.
    #[arg(long)]
    pub strict: bool,

    /// Enable verbose tracing output (`RUST_LOG` is honored too).
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

#[cfg(test)]
#[path = "tests/args.rs"]
mod tests;
