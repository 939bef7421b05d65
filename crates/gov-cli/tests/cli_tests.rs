//! Integration tests for the gov CLI binary.
//!
//! These tests exercise the compiled binary using assert_cmd.

use assert_cmd::Command;
use gov_test_utils::TestProject;
use predicates::prelude::*;
use serde_json::json;

fn gov_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("gov"));
    cmd.env_remove("GOV_CONFIG")
        .env_remove("GOV_LOG")
        .env("NO_COLOR", "1");
    cmd
}

/// A compliant project whose changelog never goes stale.
fn evergreen_project() -> TestProject {
    let project = TestProject::compliant();
    project.write_config(&json!({ "audit": { "freshness_days": 100000 } }));
    project
}

// ============================================================================
// Help
// ============================================================================

#[test]
fn test_help_lists_commands() {
    gov_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("govern"));
}

#[test]
fn test_missing_command_is_usage_error() {
    gov_cmd().assert().failure().code(2);
}

// ============================================================================
// validate
// ============================================================================

#[test]
fn test_validate_compliant_project() {
    let project = TestProject::compliant();
    gov_cmd()
        .arg("validate")
        .arg(project.root())
        .assert()
        .success()
        .stdout(predicate::str::contains("grade A"));
}

#[test]
fn test_validate_fail_under() {
    let project = TestProject::new();
    gov_cmd()
        .args(["validate", "--fail-under", "50"])
        .arg(project.root())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("FAIL"));
}

#[test]
fn test_validate_low_score_without_threshold_succeeds() {
    let project = TestProject::new();
    gov_cmd()
        .arg("validate")
        .arg(project.root())
        .assert()
        .success()
        .stdout(predicate::str::contains("Recommendations"));
}

#[test]
fn test_validate_json_output() {
    let project = TestProject::compliant();
    let output = gov_cmd()
        .args(["validate", "--json"])
        .arg(project.root())
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["result"]["grade"], "A");
    assert_eq!(report["tools"][0]["role"], "validator");
    assert_eq!(report["tools"][0]["source"], "default");
}

#[test]
fn test_validate_missing_directory() {
    let project = TestProject::new();
    gov_cmd()
        .arg("validate")
        .arg(project.path("nowhere"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_validate_missing_capability_exit_code() {
    let project = TestProject::compliant();
    project.write_json(
        "tools/validator.json",
        &json!({
            "name": "incomplete",
            "version": "0.1.0",
            "role": "validator",
            "entry": ["tools/validate.sh"],
            "operations": ["audit"]
        }),
    );
    project.write_config(&json!({ "tools": { "validator": "tools/validator.json" } }));

    gov_cmd()
        .arg("validate")
        .arg(project.root())
        .assert()
        .code(3)
        .stderr(predicate::str::contains("validate"));
}

#[test]
fn test_config_flag_selects_alternate_file() {
    let project = TestProject::compliant();
    project.write_json("alt.json", &json!({ "standards": { "minimum_score": 100.5 } }));

    gov_cmd()
        .arg("govern")
        .arg(project.root())
        .arg("--config")
        .arg(project.path("alt.json"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("below the minimum"));
}

// ============================================================================
// sync
// ============================================================================

#[test]
fn test_sync_dry_run_leaves_files() {
    let project = TestProject::compliant();
    project.write("README.md", "Install v0.9.0 today.\n");
    project.write_config(&json!({
        "sync": {
            "canonical": { "path": "Cargo.toml" },
            "targets": [ { "path": "README.md" } ]
        }
    }));

    gov_cmd()
        .args(["sync", "--dry-run"])
        .arg(project.root())
        .assert()
        .success()
        .stdout(predicate::str::contains("Would update"));
    project.assert_file_contains("README.md", "v0.9.0");

    gov_cmd()
        .arg("sync")
        .arg(project.root())
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated"));
    project.assert_file_contains("README.md", "v1.0.0");
}

#[test]
fn test_sync_escaping_target_exit_code() {
    let project = TestProject::compliant();
    project.write_config(&json!({
        "sync": {
            "canonical": { "path": "Cargo.toml" },
            "targets": [ { "path": "../outside.md" } ]
        }
    }));

    gov_cmd()
        .arg("sync")
        .arg(project.root())
        .assert()
        .code(4);
}

// ============================================================================
// audit and govern
// ============================================================================

#[test]
fn test_audit_passes_for_fresh_project() {
    let project = evergreen_project();
    gov_cmd()
        .arg("audit")
        .arg(project.root())
        .assert()
        .success()
        .stdout(predicate::str::contains("changelog-freshness"));
}

#[test]
fn test_audit_fails_without_readme() {
    let project = evergreen_project();
    project.remove("README.md");
    gov_cmd()
        .arg("audit")
        .arg(project.root())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("required-file:README.md"));
}

#[test]
fn test_govern_compliant_project() {
    let project = evergreen_project();
    gov_cmd()
        .arg("govern")
        .arg(project.root())
        .assert()
        .success()
        .stdout(predicate::str::contains("project is compliant"));
}

#[test]
fn test_govern_empty_project_is_not_compliant() {
    let project = TestProject::new();
    gov_cmd()
        .args(["govern", "--json"])
        .arg(project.root())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("\"compliant\": false"));
}
