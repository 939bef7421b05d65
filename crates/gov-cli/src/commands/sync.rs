//! `gov sync`

use colored::Colorize;

use super::{dispatcher, print_header, print_json};
use crate::cli::Target;
use crate::error::Result;

/// Preview or apply version synchronization; never fails the exit status.
pub fn run_sync(target: &Target, dry_run: bool) -> Result<bool> {
    let dispatcher = dispatcher(target)?;
    let report = if dry_run {
        dispatcher.preview_sync()?
    } else {
        dispatcher.apply_sync()?
    };
    let result = &report.result;

    if target.json {
        print_json(&report)?;
        return Ok(true);
    }

    print_header(&report);
    for warning in &result.warnings {
        println!("  [{}] {}", "warn".yellow(), warning);
    }
    if let Some(canonical) = &result.canonical {
        println!("Canonical version {} from {}", canonical.bold(), result.source);
    }

    if result.changes.is_empty() {
        println!("{} All targets are in sync.", "OK".green().bold());
        return Ok(true);
    }

    let action = if result.applied { "Updated" } else { "Would update" };
    println!(
        "{} {} {} occurrence(s):",
        "=>".blue().bold(),
        action,
        result.changes.len()
    );
    for change in &result.changes {
        println!(
            "  {}:{}  {} -> {}",
            change.path,
            change.line,
            change.before.red(),
            change.after.green()
        );
    }

    Ok(true)
}
