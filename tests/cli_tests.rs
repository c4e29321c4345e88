//! CLI integration tests using the REAL rulekit binary

mod common;

use common::TestWorkspace;
use predicates::prelude::*;

#[test]
fn test_help_output() {
    TestWorkspace::new()
        .cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("install"))
        .stdout(predicate::str::contains("platforms"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn test_install_help_lists_conflict_flags() {
    TestWorkspace::new()
        .cmd()
        .args(["install", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--force"))
        .stdout(predicate::str::contains("--skip-conflicts"))
        .stdout(predicate::str::contains("--backup"))
        .stdout(predicate::str::contains("--dry-run"))
        .stdout(predicate::str::contains("--atomic"));
}

#[test]
fn test_version_output() {
    TestWorkspace::new()
        .cmd()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("rulekit"))
        .stdout(predicate::str::contains("Build info"))
        .stdout(predicate::str::contains("config-prefix/v1"));
}

#[test]
fn test_platforms_lists_builtin_table() {
    TestWorkspace::new()
        .cmd()
        .arg("platforms")
        .assert()
        .success()
        .stdout(predicate::str::contains("claude"))
        .stdout(predicate::str::contains("~/.claude"))
        .stdout(predicate::str::contains("copilot"))
        .stdout(predicate::str::contains(".github"));
}

#[test]
fn test_platforms_includes_overrides() {
    let workspace = TestWorkspace::new();
    std::fs::write(
        workspace.config_dir.join("platforms.jsonc"),
        r#"[
            // In-house agent
            {"id": "acme", "name": "Acme Agent", "directory": ".acme"}
        ]"#,
    )
    .unwrap();

    workspace
        .cmd()
        .arg("platforms")
        .assert()
        .success()
        .stdout(predicate::str::contains("acme"))
        .stdout(predicate::str::contains("Acme Agent"));
}

#[test]
fn test_completions_bash() {
    TestWorkspace::new()
        .cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("rulekit"));
}

#[test]
fn test_completions_unknown_shell() {
    TestWorkspace::new()
        .cmd()
        .args(["completions", "tcsh"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown shell: tcsh"));
}

#[test]
fn test_missing_bundle() {
    TestWorkspace::new()
        .cmd()
        .args(["install", "does-not-exist", "-p", "claude"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Bundle not found"));
}

#[test]
fn test_unknown_platform() {
    let workspace = TestWorkspace::new();
    let bundle = workspace.create_bundle("review", common::REVIEW_FILES);

    workspace
        .cmd()
        .arg("install")
        .arg(&bundle)
        .args(["-p", "emacs"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Platform not supported: emacs"));
}

#[test]
fn test_no_platform_selected() {
    let workspace = TestWorkspace::new();
    let bundle = workspace.create_bundle("review", common::REVIEW_FILES);

    workspace
        .cmd()
        .arg("install")
        .arg(&bundle)
        .assert()
        .failure()
        .stderr(predicate::str::contains("No platform selected"));
}

#[test]
fn test_global_and_target_are_exclusive() {
    TestWorkspace::new()
        .cmd()
        .args(["install", "b", "--global", "--target", "out"])
        .assert()
        .failure();
}

#[test]
fn test_debug_logs_go_to_stderr() {
    let workspace = TestWorkspace::new();
    let bundle = workspace.create_bundle("review", common::REVIEW_FILES);

    workspace
        .cmd()
        .arg("install")
        .arg(&bundle)
        .args(["-p", "claude", "--debug"])
        .assert()
        .success()
        .stderr(predicate::str::contains("selected platform claude"))
        .stdout(predicate::str::contains("selected platform").not());
}
