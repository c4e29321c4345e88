//! Tests for transaction support

use super::*;
use tempfile::TempDir;

#[test]
fn test_transaction_commit_keeps_changes() {
    let temp = TempDir::new().unwrap();
    let test_file = temp.path().join("test.txt");

    let mut transaction = Transaction::new(true);
    fs::write(&test_file, "test content").unwrap();
    transaction.track_file_created(&test_file);
    transaction.commit();

    assert!(test_file.exists());
}

#[test]
fn test_transaction_rollback_created_files() {
    let temp = TempDir::new().unwrap();
    let test_file = temp.path().join("test.txt");

    {
        let mut transaction = Transaction::new(true);
        fs::write(&test_file, "test content").unwrap();
        transaction.track_file_created(&test_file);
        // Don't commit - should rollback on drop
    }

    assert!(!test_file.exists());
}

#[test]
fn test_transaction_restores_modified_files() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("agent.md");
    fs::write(&path, "original").unwrap();

    {
        let mut transaction = Transaction::new(true);
        transaction.track_file_modified(&path).unwrap();
        fs::write(&path, "changed").unwrap();
    }

    assert_eq!(fs::read_to_string(&path).unwrap(), "original");
}

#[test]
fn test_first_snapshot_wins() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("agent.md");
    fs::write(&path, "original").unwrap();

    let mut transaction = Transaction::new(true);
    transaction.track_file_modified(&path).unwrap();
    fs::write(&path, "first write").unwrap();
    transaction.track_file_modified(&path).unwrap();
    fs::write(&path, "second write").unwrap();

    assert_eq!(transaction.rollback(), 0);
    assert_eq!(fs::read_to_string(&path).unwrap(), "original");
}

#[test]
fn test_created_file_is_not_snapshotted() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("agent.md");

    let mut transaction = Transaction::new(true);
    fs::write(&path, "created").unwrap();
    transaction.track_file_created(&path);
    transaction.track_file_modified(&path).unwrap();
    assert!(transaction.modified_files.is_empty());

    transaction.rollback();
    assert!(!path.exists());
}

#[test]
fn test_transaction_removes_created_dirs_deepest_first() {
    let temp = TempDir::new().unwrap();
    let outer = temp.path().join("a");
    let inner = outer.join("b");
    let file = inner.join("c.md");

    {
        let mut transaction = Transaction::new(true);
        fs::create_dir_all(&inner).unwrap();
        transaction.track_dirs_created(vec![outer.clone(), inner.clone()]);
        fs::write(&file, "x").unwrap();
        transaction.track_file_created(&file);
    }

    assert!(!outer.exists());
}

#[test]
fn test_transaction_keeps_non_empty_dirs() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("shared");

    {
        let mut transaction = Transaction::new(true);
        fs::create_dir(&dir).unwrap();
        transaction.track_dirs_created(vec![dir.clone()]);
        // Written by someone else, not tracked
        fs::write(dir.join("user.md"), "keep").unwrap();
    }

    assert!(dir.join("user.md").exists());
}

#[test]
fn test_disabled_transaction_never_rolls_back() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("test.txt");

    {
        let mut transaction = Transaction::new(false);
        fs::write(&path, "content").unwrap();
        transaction.track_file_created(&path);
        assert_eq!(transaction.rollback(), 0);
    }

    assert!(path.exists());
}

#[test]
fn test_rollback_runs_once() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("agent.md");
    fs::write(&path, "original").unwrap();

    let mut transaction = Transaction::new(true);
    transaction.track_file_modified(&path).unwrap();
    fs::write(&path, "changed").unwrap();
    transaction.rollback();

    fs::write(&path, "written after rollback").unwrap();
    drop(transaction);
    assert_eq!(fs::read_to_string(&path).unwrap(), "written after rollback");
}

#[test]
fn test_snapshot_of_missing_file_fails() {
    let temp = TempDir::new().unwrap();
    let mut transaction = Transaction::new(true);
    let err = transaction
        .track_file_modified(&temp.path().join("missing.md"))
        .unwrap_err();
    assert!(matches!(err, RulekitError::FileReadFailed { .. }));
}
