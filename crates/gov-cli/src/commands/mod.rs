//! Command implementations
//!
//! Each command returns whether the project passed, so `main` can map the
//! outcome onto an exit status.

mod audit;
mod govern;
mod sync;
mod validate;

pub use audit::run_audit;
pub use govern::run_govern;
pub use sync::run_sync;
pub use validate::run_validate;

use colored::Colorize;
use gov_core::{Issue, Severity, ToolDescriptor};
use gov_tools::{Dispatcher, Report};
use serde::Serialize;

use crate::cli::Target;
use crate::error::{CliError, Result};

/// Build a dispatcher for the selected project.
fn dispatcher(target: &Target) -> Result<Dispatcher> {
    if !target.path.is_dir() {
        return Err(CliError::user(format!(
            "Project directory {} does not exist",
            target.path.display()
        )));
    }
    let mut dispatcher = Dispatcher::new(&target.path);
    if let Some(config) = &target.config {
        dispatcher = dispatcher.with_config_path(config);
    }
    Ok(dispatcher)
}

fn print_json<T: Serialize>(report: &Report<T>) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

/// Tools and fallback warnings common to every report.
fn print_header<T>(report: &Report<T>) {
    for tool in &report.tools {
        print_tool(tool);
    }
    for warning in &report.warnings {
        println!("  [{}] {}", "warn".yellow(), warning);
    }
}

fn print_tool(tool: &ToolDescriptor) {
    println!("{} {}", "=>".blue().bold(), tool);
}

fn print_issues(issues: &[Issue]) {
    if issues.is_empty() {
        return;
    }
    println!();
    println!("{} {} issue(s):", "=>".blue().bold(), issues.len());
    for issue in issues {
        let prefix = match issue.severity {
            Severity::Info => "info".cyan(),
            Severity::Warning => "warn".yellow(),
            Severity::Error => "error".red(),
        };
        match &issue.location {
            Some(location) => println!(
                "  [{}] {}: {} ({})",
                prefix,
                issue.category.bold(),
                issue.message,
                location
            ),
            None => println!("  [{}] {}: {}", prefix, issue.category.bold(), issue.message),
        }
    }
}

fn verdict(passed: bool, message: &str) {
    if passed {
        println!("{} {}", "OK".green().bold(), message);
    } else {
        println!("{} {}", "FAIL".red().bold(), message);
    }
}
