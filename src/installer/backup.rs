//! Backups of files about to be overwritten
//!
//! A backup is a sibling copy named `<file name>.bak`. An existing backup is
//! replaced, so only the content from just before the latest overwrite is
//! kept.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use super::InstallOptions;
use super::file_ops;
use crate::error::{Result, RulekitError};

/// Suffix appended to the original file name
pub const BACKUP_SUFFIX: &str = ".bak";

/// A backup made before an overwrite
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupRecord {
    /// The file that was overwritten
    pub original: PathBuf,

    /// Where its previous content was saved
    pub backup: PathBuf,
}

/// Backup location for `destination`: `agent.md` becomes `agent.md.bak`
pub fn backup_path(destination: &Path) -> PathBuf {
    let mut name = destination
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(OsString::new);
    name.push(BACKUP_SUFFIX);
    destination.with_file_name(name)
}

/// Back up `destination` if the options ask for it.
///
/// Call right before a forced overwrite. Returns `None` without touching the
/// filesystem when backups are off or this is a dry run. Any failure is
/// returned as `BackupFailed`, and the caller must not overwrite.
pub fn maybe_backup(
    destination: &Path,
    relative_path: &str,
    options: &InstallOptions,
) -> Result<Option<BackupRecord>> {
    if !options.backup || options.dry_run {
        return Ok(None);
    }

    let backup = backup_path(destination);
    let failed = |reason: String| RulekitError::BackupFailed {
        path: relative_path.to_string(),
        reason,
    };

    let content = std::fs::read(destination).map_err(|e| failed(e.to_string()))?;
    file_ops::write_atomic(&backup, &content).map_err(|e| failed(e.to_string()))?;

    tracing::info!("Backed up {} to {}", relative_path, backup.display());

    Ok(Some(BackupRecord {
        original: destination.to_path_buf(),
        backup,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn options(backup: bool, dry_run: bool) -> InstallOptions {
        InstallOptions {
            force: true,
            backup,
            dry_run,
            ..Default::default()
        }
    }

    #[test]
    fn test_backup_path_appends_suffix() {
        assert_eq!(
            backup_path(Path::new("/w/.claude/agent.md")),
            PathBuf::from("/w/.claude/agent.md.bak")
        );
        assert_eq!(
            backup_path(Path::new("/w/Makefile")),
            PathBuf::from("/w/Makefile.bak")
        );
    }

    #[test]
    fn test_backup_copies_current_content() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("agent.md");
        std::fs::write(&path, "old").unwrap();

        let record = maybe_backup(&path, "agent.md", &options(true, false))
            .unwrap()
            .unwrap();

        assert_eq!(record.original, path);
        assert_eq!(record.backup, temp.path().join("agent.md.bak"));
        assert_eq!(std::fs::read_to_string(&record.backup).unwrap(), "old");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "old");
    }

    #[test]
    fn test_existing_backup_is_replaced() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("agent.md");
        std::fs::write(&path, "newer").unwrap();
        std::fs::write(temp.path().join("agent.md.bak"), "stale").unwrap();

        maybe_backup(&path, "agent.md", &options(true, false)).unwrap();

        assert_eq!(
            std::fs::read_to_string(temp.path().join("agent.md.bak")).unwrap(),
            "newer"
        );
    }

    #[test]
    fn test_disabled_backup_does_nothing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("agent.md");
        std::fs::write(&path, "old").unwrap();

        assert_eq!(maybe_backup(&path, "agent.md", &options(false, false)).unwrap(), None);
        assert!(!temp.path().join("agent.md.bak").exists());
    }

    #[test]
    fn test_dry_run_backup_does_nothing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("agent.md");
        std::fs::write(&path, "old").unwrap();

        assert_eq!(maybe_backup(&path, "agent.md", &options(true, true)).unwrap(), None);
        assert!(!temp.path().join("agent.md.bak").exists());
    }

    #[test]
    fn test_unreadable_original_is_backup_failure() {
        let temp = TempDir::new().unwrap();
        let err = maybe_backup(
            &temp.path().join("missing.md"),
            "missing.md",
            &options(true, false),
        )
        .unwrap_err();
        assert!(matches!(err, RulekitError::BackupFailed { .. }));
    }
}
