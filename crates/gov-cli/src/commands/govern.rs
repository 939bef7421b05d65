//! `gov govern`

use colored::Colorize;

use super::{dispatcher, print_header, print_json, verdict};
use crate::cli::Target;
use crate::error::Result;

pub fn run_govern(target: &Target) -> Result<bool> {
    let report = dispatcher(target)?.govern()?;
    let status = &report.result;

    if target.json {
        print_json(&report)?;
        return Ok(status.compliant);
    }

    print_header(&report);
    println!();
    println!(
        "Constitution: {} ({}, sha256 {})",
        status.constitution.title.bold(),
        status.constitution.path.as_deref().unwrap_or("embedded"),
        &status.constitution.fingerprint[..12.min(status.constitution.fingerprint.len())]
    );
    println!(
        "Score: {} (grade {}), minimum {:.2}",
        format!("{:.2}", status.score).bold(),
        status.grade.to_string().bold(),
        status.minimum_score
    );
    for reason in &status.blocking {
        println!("  [{}] {}", "blocking".red(), reason);
    }

    println!();
    verdict(
        status.compliant,
        if status.compliant {
            "project is compliant"
        } else {
            "project is not compliant"
        },
    );
    Ok(status.compliant)
}
