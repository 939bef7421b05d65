//! `gov validate`

use colored::Colorize;

use super::{dispatcher, print_header, print_issues, print_json, verdict};
use crate::cli::Target;
use crate::error::Result;

/// Run validation; fails only when `fail_under` is set and not reached.
pub fn run_validate(target: &Target, fail_under: Option<f64>) -> Result<bool> {
    let report = dispatcher(target)?.validate()?;
    let result = &report.result;
    let passed = fail_under.is_none_or(|minimum| result.score >= minimum);

    if target.json {
        print_json(&report)?;
        return Ok(passed);
    }

    print_header(&report);
    println!();
    println!(
        "Score: {} (grade {}) against schema '{}'",
        format!("{:.2}", result.score).bold(),
        result.grade.to_string().bold(),
        result.schema
    );
    for category in &result.categories {
        println!(
            "  {:<16} {:>6.2} / {:<5} {:>5.1}%",
            category.id, category.score, category.weight, category.percent
        );
    }

    print_issues(&result.issues);

    if !result.recommendations.is_empty() {
        println!();
        println!("{} Recommendations:", "=>".blue().bold());
        for recommendation in &result.recommendations {
            println!("  - {}", recommendation.message);
        }
    }

    if let Some(minimum) = fail_under {
        println!();
        verdict(
            passed,
            &format!("score {:.2} against required {:.2}", result.score, minimum),
        );
    }

    Ok(passed)
}
