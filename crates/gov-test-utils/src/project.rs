//! [`TestProject`] builder for governance test scenarios.

use std::fs;
use std::path::{Component, Path, PathBuf};

use tempfile::TempDir;

/// Date written into the compliant fixture's changelog.
pub const FIXTURE_RELEASE_DATE: &str = "2024-05-01";

/// Version written into the compliant fixture's manifest.
pub const FIXTURE_VERSION: &str = "1.0.0";

/// A temporary project directory with helpers for setup and assertion.
///
/// # Example
///
/// ```rust,no_run
/// use gov_test_utils::TestProject;
///
/// let project = TestProject::compliant();
/// project.write(".env", "TOKEN=abc");
/// project.assert_file_exists("README.md");
/// ```
pub struct TestProject {
    temp_dir: TempDir,
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

impl TestProject {
    /// Create an empty project directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// A project that satisfies every check in the default schema.
    ///
    /// Its changelog is dated [`FIXTURE_RELEASE_DATE`] and its manifest
    /// declares [`FIXTURE_VERSION`].
    pub fn compliant() -> Self {
        let project = Self::new();
        let readme: String = std::iter::once("# Fixture\n".to_string())
            .chain((1..=24).map(|i| format!("Line {i} of the fixture README.\n")))
            .collect();
        project.write("README.md", &readme);
        project.write(
            "CHANGELOG.md",
            &format!(
                "# Changelog\n\n## [{FIXTURE_VERSION}] - {FIXTURE_RELEASE_DATE}\n\n- Initial release\n"
            ),
        );
        project.write("LICENSE", "MIT License\n");
        project.write("docs/guide.md", "# Guide\n");
        project.write(".gitignore", "/target\n");
        project.write("SECURITY.md", "# Security\n");
        project.write("tests/smoke.rs", "#[test]\nfn smoke() {}\n");
        project.write(
            "Cargo.toml",
            &format!("[package]\nname = \"fixture\"\nversion = \"{FIXTURE_VERSION}\"\n"),
        );
        project.write(".editorconfig", "root = true\n");
        project.write(".github/workflows/ci.yml", "name: ci\n");
        project.write("CONTRIBUTING.md", "# Contributing\n");
        project.write("CODEOWNERS", "* @fixture\n");
        project.write(".github/pull_request_template.md", "## Summary\n");
        project
    }

    /// Return the project root.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// The project root spelled relative to the current directory.
    ///
    /// Climbs to the filesystem root with `..` and descends again, so the
    /// result is only meaningful on a single-root filesystem.
    pub fn relative_root(&self) -> PathBuf {
        let cwd = std::env::current_dir().unwrap();
        let normal = |c: &Component<'_>| matches!(c, Component::Normal(_));
        let mut relative: PathBuf = cwd
            .components()
            .filter(normal)
            .map(|_| Component::ParentDir)
            .collect();
        relative.extend(self.root().components().filter(normal));
        relative
    }

    /// Absolute path of a project-relative file.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    /// Write `content` to `relative`, creating parent directories.
    pub fn write(&self, relative: &str, content: &str) {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap_or_else(|e| {
                panic!("TestProject::write: failed to create {}: {e}", parent.display())
            });
        }
        fs::write(&path, content).unwrap_or_else(|e| {
            panic!("TestProject::write: failed to write {}: {e}", path.display())
        });
    }

    /// Write `value` as pretty JSON to `relative`.
    pub fn write_json(&self, relative: &str, value: &serde_json::Value) {
        self.write(relative, &serde_json::to_string_pretty(value).unwrap());
    }

    /// Write the conventional `.governance/config.json`.
    pub fn write_config(&self, config: &serde_json::Value) {
        self.write_json(".governance/config.json", config);
    }

    /// Read a project-relative file.
    pub fn read(&self, relative: &str) -> String {
        let path = self.path(relative);
        fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("TestProject::read: failed to read {}: {e}", path.display()))
    }

    /// Delete a project-relative file.
    pub fn remove(&self, relative: &str) {
        fs::remove_file(self.path(relative)).unwrap();
    }

    /// Assert that `relative` exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, relative: &str) {
        let full_path = self.path(relative);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that the file at `relative` contains `content`.
    ///
    /// # Panics
    /// Panics if the file cannot be read or does not contain `content`.
    pub fn assert_file_contains(&self, relative: &str, content: &str) {
        let file_content = self.read(relative);
        assert!(
            file_content.contains(content),
            "File {} does not contain expected content.\nExpected: {}\nActual: {}",
            relative,
            content,
            file_content
        );
    }
}
