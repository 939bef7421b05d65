//! Cross-crate governance scenarios
//!
//! Each test drives the dispatcher against a real project tree on disk and
//! checks one observable property of a full run.

use std::thread;

use chrono::NaiveDate;
use gov_core::{Grade, Severity, ToolSource};
use gov_meta::ConfigLoader;
use gov_test_utils::TestProject;
use gov_test_utils::project::FIXTURE_RELEASE_DATE;
use gov_tools::{Dispatcher, Error, ErrorKind};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::json;

fn release_day() -> NaiveDate {
    NaiveDate::parse_from_str(FIXTURE_RELEASE_DATE, "%Y-%m-%d").unwrap()
}

fn default_schema_json() -> serde_json::Value {
    serde_json::to_value(gov_meta::schema::default_schema().unwrap()).unwrap()
}

// =============================================================================
// Configuration fallbacks
// =============================================================================

#[test]
fn no_config_file_validates_with_embedded_defaults() {
    let project = TestProject::compliant();
    assert!(ConfigLoader::load(project.root()).is_none());

    let report = Dispatcher::new(project.root()).validate().unwrap();
    assert!(report.warnings.is_empty());
    assert_eq!(report.result.schema, "default");
    assert_eq!(report.result.score, 100.0);
}

#[test]
fn malformed_schema_file_degrades_to_default() {
    let project = TestProject::compliant();
    project.write(".governance/schema.json", "categories: [");
    project.write_config(&json!({ "schema": ".governance/schema.json" }));

    let report = Dispatcher::new(project.root()).validate().unwrap();
    assert_eq!(report.result.schema, "default");
    assert_eq!(report.warnings.len(), 1);
}

#[test]
fn schema_missing_required_category_degrades_to_default() {
    let project = TestProject::compliant();
    let mut schema = default_schema_json();
    schema["name"] = json!("no-safety");
    let categories = schema["categories"].as_array_mut().unwrap();
    categories.retain(|c| c["id"] != "safety");
    project.write_json(".governance/schema.json", &schema);
    project.write_config(&json!({ "schema": ".governance/schema.json" }));

    let report = Dispatcher::new(project.root()).validate().unwrap();
    assert_eq!(report.result.schema, "default");
    assert!(report.warnings.iter().any(|w| w.contains("safety")), "{:?}", report.warnings);
}

#[test]
fn schema_weights_summing_to_95_degrade_to_default() {
    let project = TestProject::compliant();
    let mut schema = default_schema_json();
    schema["name"] = json!("light");
    let weight = schema["categories"][0]["weight"].as_f64().unwrap();
    schema["categories"][0]["weight"] = json!(weight - 5.0);
    project.write_json(".governance/schema.json", &schema);
    project.write_config(&json!({ "schema": ".governance/schema.json" }));

    let report = Dispatcher::new(project.root()).validate().unwrap();
    assert_eq!(report.result.schema, "default");
    assert_eq!(report.result.grade, Grade::A);
    assert!(report.warnings[0].contains("95"));
}

#[test]
fn valid_custom_schema_replaces_default() {
    let project = TestProject::compliant();
    let mut schema = default_schema_json();
    schema["name"] = json!("house-rules");
    project.write_json("rules/schema.json", &schema);
    project.write_config(&json!({ "schema": "rules/schema.json" }));

    let report = Dispatcher::new(project.root()).validate().unwrap();
    assert!(report.warnings.is_empty(), "{:?}", report.warnings);
    assert_eq!(report.result.schema, "house-rules");
}

// =============================================================================
// Validation
// =============================================================================

#[test]
fn validation_is_deterministic() {
    let project = TestProject::compliant();
    project.remove("SECURITY.md");
    project.write("src/config.rs", "let api_key = \"abcd1234efgh5678\";\n");
    let dispatcher = Dispatcher::new(project.root());

    let first = dispatcher.validate().unwrap().result;
    let second = dispatcher.validate().unwrap().result;
    assert_eq!(first, second);
    assert!(first.score < 100.0);
}

#[test]
fn issues_carry_their_category_and_severity() {
    let project = TestProject::new();
    let result = Dispatcher::new(project.root()).validate().unwrap().result;

    assert_eq!(result.grade, Grade::F);
    assert!(result.issues.iter().any(|i| i.severity == Severity::Error));
    for issue in &result.issues {
        assert!(
            result.categories.iter().any(|c| c.id == issue.category),
            "issue in unknown category: {issue:?}"
        );
    }
}

#[test]
fn concurrent_runs_on_separate_projects_do_not_interfere() {
    let compliant = TestProject::compliant();
    let empty = TestProject::new();
    let roots = [compliant.root().to_path_buf(), empty.root().to_path_buf()];

    let grades: Vec<Grade> = thread::scope(|scope| {
        let handles: Vec<_> = roots
            .iter()
            .map(|root| scope.spawn(move || Dispatcher::new(root).validate().unwrap().result.grade))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert_eq!(grades, vec![Grade::A, Grade::F]);
}

// =============================================================================
// Synchronization
// =============================================================================

fn sync_project(canonical: &str, target: &str) -> TestProject {
    let project = TestProject::compliant();
    project.write(
        "Cargo.toml",
        &format!("[package]\nname = \"fixture\"\nversion = \"{canonical}\"\n"),
    );
    project.write("docs/install.md", target);
    project.write_config(&json!({
        "sync": {
            "canonical": { "path": "Cargo.toml" },
            "targets": [ { "path": "docs/install.md" } ]
        }
    }));
    project
}

#[test]
fn single_mismatch_is_previewed_applied_and_settled() {
    let original = "# Install\n\nPin v1.1.0 in your manifest.\nThen run it.\n";
    let project = sync_project("1.2.0", original);
    let dispatcher = Dispatcher::new(project.root());

    let preview = dispatcher.preview_sync().unwrap().result;
    assert_eq!(preview.canonical.as_deref(), Some("1.2.0"));
    assert_eq!(preview.changes.len(), 1);
    assert_eq!(preview.changes[0].before, "1.1.0");
    assert_eq!(preview.changes[0].after, "1.2.0");
    assert_eq!(project.read("docs/install.md"), original);

    let applied = dispatcher.apply_sync().unwrap().result;
    assert!(applied.applied);
    assert_eq!(
        project.read("docs/install.md"),
        original.replace("1.1.0", "1.2.0")
    );

    assert!(dispatcher.preview_sync().unwrap().result.changes.is_empty());
}

#[test]
fn absolute_target_outside_root_is_rejected_before_any_write() {
    let outside = tempfile::tempdir().unwrap();
    let victim = outside.path().join("victim.md");
    std::fs::write(&victim, "v0.0.1\n").unwrap();

    let project = sync_project("1.2.0", "v1.1.0\n");
    project.write_config(&json!({
        "sync": {
            "canonical": { "path": "Cargo.toml" },
            "targets": [
                { "path": "docs/install.md" },
                { "path": victim.to_string_lossy() }
            ]
        }
    }));

    let err = Dispatcher::new(project.root()).apply_sync().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PathBoundary);
    assert_eq!(std::fs::read_to_string(&victim).unwrap(), "v0.0.1\n");
    assert_eq!(project.read("docs/install.md"), "v1.1.0\n");
}

// =============================================================================
// Tool resolution
// =============================================================================

#[test]
fn validator_lacking_validate_operation_is_a_load_error() {
    let project = TestProject::compliant();
    project.write("tools/lint.sh", "#!/bin/sh\n");
    project.write_json(
        "tools/lint.json",
        &json!({
            "name": "lint",
            "version": "1.0.0",
            "role": "validator",
            "entry": ["tools/lint.sh"],
            "operations": ["preview", "apply"]
        }),
    );
    project.write_config(&json!({ "tools": { "validator": "tools/lint.json" } }));

    match Dispatcher::new(project.root()).validate() {
        Err(Error::MissingCapability { capability, .. }) => assert_eq!(capability, "validate"),
        other => panic!("expected a missing capability, got {other:?}"),
    }
}

#[test]
fn manifest_with_wrong_role_is_a_load_error() {
    let project = TestProject::compliant();
    project.write_json(
        "tools/auditor.json",
        &json!({
            "name": "misfiled",
            "version": "1.0.0",
            "role": "governor",
            "entry": ["tools/audit.sh"],
            "operations": ["govern"]
        }),
    );
    project.write_config(&json!({ "tools": { "auditor": "tools/auditor.json" } }));

    let err = Dispatcher::new(project.root()).audit().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ToolLoad);
}

#[test]
fn unconfigured_roles_resolve_to_defaults() {
    let project = TestProject::compliant();
    let report = Dispatcher::new(project.root())
        .with_today(release_day())
        .govern()
        .unwrap();
    assert!(report.tools.iter().all(|t| t.source == ToolSource::Default));
}

// =============================================================================
// Governance
// =============================================================================

#[test]
fn stale_changelog_blocks_compliance() {
    let project = TestProject::compliant();
    let late = release_day() + chrono::Days::new(3650);
    let status = Dispatcher::new(project.root()).with_today(late).govern().unwrap().result;

    assert!(!status.compliant);
    assert!(status.blocking.iter().any(|b| b.contains("changelog-freshness")));
}

#[test]
fn custom_constitution_is_reported() {
    let project = TestProject::compliant();
    project.write("GOVERNANCE.md", "# House Constitution\n\nBe kind.\n");
    project.write_config(&json!({ "constitution": "GOVERNANCE.md" }));

    let report = Dispatcher::new(project.root())
        .with_today(release_day())
        .govern()
        .unwrap();
    assert!(report.warnings.is_empty(), "{:?}", report.warnings);
    assert_eq!(report.result.constitution.title, "House Constitution");
    assert!(report.result.compliant);
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn config_loading_never_panics(content in ".{0,200}") {
        let project = TestProject::new();
        project.write(".governance/config.json", &content);
        let (config, warnings) = ConfigLoader::load_from(project.root(), None).into_parts();
        if config.is_none() {
            prop_assert!(!warnings.is_empty());
        }
    }
}
