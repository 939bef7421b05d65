//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Governance engine - score, synchronize and audit a project
#[derive(Parser, Debug)]
#[command(name = "gov")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Project selection shared by every command
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Project directory
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Config file to use instead of <PATH>/.governance/config.json
    #[arg(short, long, env = "GOV_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output as JSON for scripting
    #[arg(long)]
    pub json: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Score the project against the validation schema
    ///
    /// Examples:
    ///   gov validate                  # Validate the current directory
    ///   gov validate ../app --json    # Machine-readable result
    ///   gov validate --fail-under 80  # Exit 1 below a score of 80
    Validate {
        #[command(flatten)]
        target: Target,

        /// Exit with status 1 when the score is below SCORE
        #[arg(long, value_name = "SCORE")]
        fail_under: Option<f64>,
    },

    /// Bring configured version strings in line with the canonical version
    Sync {
        #[command(flatten)]
        target: Target,

        /// Preview changes without applying them
        #[arg(long)]
        dry_run: bool,
    },

    /// Validate and check repository metadata
    Audit {
        #[command(flatten)]
        target: Target,
    },

    /// Decide overall compliance under the project constitution
    Govern {
        #[command(flatten)]
        target: Target,
    },
}
