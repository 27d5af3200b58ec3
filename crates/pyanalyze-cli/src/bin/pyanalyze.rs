use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use pyanalyze_cli::CliArgs;

fn main() -> ExitCode {
    let args = CliArgs::parse();
    let default_filter = if args.verbose { "pyanalyze=debug" } else { "pyanalyze=warn" };
    tracing_subscriber::fmt().with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.to_string())).init();

    match pyanalyze_cli::run(args) {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            eprintln!("{}: {err:#}", "error".red().bold());
            ExitCode::from(2)
        }
    }
}
