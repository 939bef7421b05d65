//! `gov audit`

use colored::Colorize;

use super::{dispatcher, print_header, print_issues, print_json, verdict};
use crate::cli::Target;
use crate::error::Result;

pub fn run_audit(target: &Target) -> Result<bool> {
    let report = dispatcher(target)?.audit()?;
    let result = &report.result;

    if target.json {
        print_json(&report)?;
        return Ok(result.passed);
    }

    print_header(&report);
    println!();
    println!(
        "Score: {} (grade {})",
        format!("{:.2}", result.score).bold(),
        result.grade.to_string().bold()
    );
    for finding in &result.findings {
        let mark = if finding.passed {
            "pass".green()
        } else {
            "fail".red()
        };
        println!("  [{}] {}: {}", mark, finding.check, finding.message);
    }
    print_issues(&result.issues);

    println!();
    verdict(result.passed, "audit");
    Ok(result.passed)
}
