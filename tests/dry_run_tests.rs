//! Tests for --dry-run

mod common;

use common::{REVIEW_FILES, TestWorkspace};
use predicates::prelude::*;

#[test]
fn test_dry_run_writes_nothing() {
    let workspace = TestWorkspace::new();
    let bundle = workspace.create_bundle("review", REVIEW_FILES);

    workspace
        .cmd()
        .arg("install")
        .arg(&bundle)
        .args(["-p", "claude", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[DRY RUN] Would install review"))
        .stdout(predicate::str::contains("[DRY RUN]   created     .claude/agent.md"))
        .stdout(predicate::str::contains("[DRY RUN] Would install 3 file(s)"));

    assert!(!workspace.file_exists(".claude"));
    assert!(!workspace.file_exists("README.md"));
}

#[test]
fn test_dry_run_reports_conflicts_and_fails() {
    let workspace = TestWorkspace::new();
    workspace.write_file(".claude/agent.md", "# Mine\n");
    let bundle = workspace.create_bundle("review", REVIEW_FILES);

    workspace
        .cmd()
        .arg("install")
        .arg(&bundle)
        .args(["-p", "claude", "--dry-run"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("conflict    .claude/agent.md"))
        .stdout(predicate::str::contains("-# Mine"))
        .stderr(predicate::str::contains("1 file(s) conflict"));

    assert_eq!(workspace.read_file(".claude/agent.md"), "# Mine\n");
    assert!(!workspace.file_exists("README.md"));
}

#[test]
fn test_dry_run_with_force_and_backup_touches_nothing() {
    let workspace = TestWorkspace::new();
    workspace.write_file(".claude/agent.md", "# Mine\n");
    let bundle = workspace.create_bundle("review", REVIEW_FILES);

    workspace
        .cmd()
        .arg("install")
        .arg(&bundle)
        .args(["-p", "claude", "--dry-run", "--force", "--backup"])
        .assert()
        .success()
        .stdout(predicate::str::contains("overwritten .claude/agent.md"))
        .stdout(predicate::str::contains("backup:").not());

    assert_eq!(workspace.read_file(".claude/agent.md"), "# Mine\n");
    assert!(!workspace.file_exists(".claude/agent.md.bak"));
}
