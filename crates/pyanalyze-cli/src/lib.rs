//! The `pyanalyze` binary's command-line surface: argument parsing, the
//! JSON project config, project-tree file discovery, diagnostic
//! rendering, and the orchestration that drives them all through
//! `pyanalyze_driver::ProjectAnalyzer`.

pub mod args;
pub mod config;
pub mod discovery;
pub mod report;
pub mod run;

pub use args::CliArgs;
pub use run::run;
