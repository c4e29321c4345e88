//! Common test utilities for rulekit integration tests

use assert_cmd::Command;
use std::path::PathBuf;
use tempfile::TempDir;

/// A sandbox with a project directory, a home directory and a config directory
#[allow(dead_code)]
pub struct TestWorkspace {
    /// Temporary directory holding everything below
    pub temp: TempDir,
    /// Project root, used as the working directory
    pub path: PathBuf,
    /// Fake home directory for global installs
    pub home: PathBuf,
    /// rulekit configuration directory
    pub config_dir: PathBuf,
}

#[allow(dead_code)]
impl TestWorkspace {
    /// Create a new test workspace
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().join("project");
        let home = temp.path().join("home");
        let config_dir = temp.path().join("config");
        for dir in [&path, &home, &config_dir] {
            std::fs::create_dir_all(dir).expect("Failed to create directory");
        }
        Self {
            temp,
            path,
            home,
            config_dir,
        }
    }

    /// Create a bundle directory outside the project with the given files
    pub fn create_bundle(&self, name: &str, files: &[(&str, &str)]) -> PathBuf {
        let bundle_path = self.temp.path().join("bundles").join(name);
        for (path, content) in files {
            let file_path = bundle_path.join(path);
            std::fs::create_dir_all(file_path.parent().unwrap())
                .expect("Failed to create bundle directory");
            std::fs::write(&file_path, content).expect("Failed to write bundle file");
        }
        bundle_path
    }

    /// Write a JSON bundle manifest outside the project
    pub fn create_manifest(&self, name: &str, json: &str) -> PathBuf {
        let path = self.temp.path().join(format!("{name}.json"));
        std::fs::write(&path, json).expect("Failed to write manifest");
        path
    }

    /// Write config.yaml
    pub fn write_settings(&self, yaml: &str) {
        std::fs::write(self.config_dir.join("config.yaml"), yaml)
            .expect("Failed to write settings");
    }

    /// Write a file in the project
    pub fn write_file(&self, path: &str, content: &str) {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    /// Read a file from the project
    pub fn read_file(&self, path: &str) -> String {
        std::fs::read_to_string(self.path.join(path)).expect("Failed to read file")
    }

    /// Check if a file exists in the project
    pub fn file_exists(&self, path: &str) -> bool {
        self.path.join(path).exists()
    }

    /// rulekit command isolated to this workspace
    #[allow(deprecated)]
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("rulekit").unwrap();
        cmd.current_dir(&self.path)
            .env("HOME", &self.home)
            .env("RULEKIT_CONFIG_DIR", &self.config_dir)
            .env_remove("RULEKIT_WORKSPACE")
            .env_remove("RUST_LOG");
        cmd
    }
}

/// A small bundle with two config files and one root file
#[allow(dead_code)]
pub const REVIEW_FILES: &[(&str, &str)] = &[
    ("config/agent.md", "# Reviewer\n\nBe thorough.\n"),
    ("config/rules/style.md", "Prefer small functions.\n"),
    ("README.md", "Review preset.\n"),
];
