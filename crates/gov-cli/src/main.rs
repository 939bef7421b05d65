//! Governance engine CLI
//!
//! Scores a project against its validation schema, keeps version strings
//! in sync, audits repository metadata and reports compliance.

mod cli;
mod commands;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use error::{Result, exit};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let code = match execute_command(cli.command) {
        Ok(true) => exit::SUCCESS,
        Ok(false) => exit::FAILED,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            e.exit_code()
        }
    };
    std::process::exit(code);
}

/// Log to stderr so `--json` output stays clean; `GOV_LOG` overrides the level.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env("GOV_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .try_init();
    tracing::debug!("Verbose mode enabled");
}

fn execute_command(cmd: Commands) -> Result<bool> {
    match cmd {
        Commands::Validate { target, fail_under } => commands::run_validate(&target, fail_under),
        Commands::Sync { target, dry_run } => commands::run_sync(&target, dry_run),
        Commands::Audit { target } => commands::run_audit(&target),
        Commands::Govern { target } => commands::run_govern(&target),
    }
}
