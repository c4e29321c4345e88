//! Transaction support for atomic installs
//!
//! Records every filesystem change an install makes so that the whole install
//! can be undone. Rollback removes created files, restores the original bytes
//! of overwritten files and removes directories the install created once they
//! are empty again.
//!
//! ## Usage
//!
//! ```ignore
//! let mut transaction = Transaction::new(options.atomic);
//!
//! // Before overwriting:
//! transaction.track_file_modified(&path)?;
//! // After creating:
//! transaction.track_file_created(&path);
//!
//! // On success:
//! transaction.commit();
//!
//! // On error (automatic via Drop if not committed):
//! // rollback happens automatically
//! ```
//!
//! A disabled transaction records nothing and never rolls back; plain
//! installs keep whatever was written before a failure.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, RulekitError};
use crate::installer::file_ops;

/// Original content of a file the install is about to overwrite
#[derive(Debug, Clone)]
struct FileSnapshot {
    path: PathBuf,
    content: Vec<u8>,
}

/// A transaction covering one install
#[derive(Debug)]
pub struct Transaction {
    /// Files created during this transaction
    created_files: HashSet<PathBuf>,

    /// Files modified during this transaction (with original content)
    modified_files: Vec<FileSnapshot>,

    /// Directories created during this transaction
    created_dirs: HashSet<PathBuf>,

    /// Whether the transaction has been committed or rolled back
    finished: bool,

    /// Whether changes are recorded and rolled back at all
    enabled: bool,
}

impl Transaction {
    /// Create a transaction; `enabled` is false for non-atomic installs
    pub fn new(enabled: bool) -> Self {
        Self {
            created_files: HashSet::new(),
            modified_files: Vec::new(),
            created_dirs: HashSet::new(),
            finished: false,
            enabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Track a file that was created during this transaction
    pub fn track_file_created(&mut self, path: impl Into<PathBuf>) {
        if self.enabled {
            self.created_files.insert(path.into());
        }
    }

    /// Track directories created during this transaction
    pub fn track_dirs_created(&mut self, dirs: impl IntoIterator<Item = PathBuf>) {
        if self.enabled {
            self.created_dirs.extend(dirs);
        }
    }

    /// Snapshot a file before it is overwritten.
    ///
    /// Only the first snapshot of a path is kept, and files this transaction
    /// created are not snapshotted since rollback removes them anyway.
    pub fn track_file_modified(&mut self, path: &Path) -> Result<()> {
        if !self.enabled
            || self.created_files.contains(path)
            || self.modified_files.iter().any(|s| s.path == path)
        {
            return Ok(());
        }

        let content = fs::read(path).map_err(|e| RulekitError::FileReadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        self.modified_files.push(FileSnapshot {
            path: path.to_path_buf(),
            content,
        });
        Ok(())
    }

    /// Commit the transaction (prevent rollback)
    pub fn commit(mut self) {
        self.finished = true;
    }

    /// Undo every tracked change.
    ///
    /// Rollback is best effort: individual failures are logged and the rest
    /// of the changes are still undone. Returns the number of failures.
    pub fn rollback(&mut self) -> usize {
        if self.finished || !self.enabled {
            return 0;
        }
        self.finished = true;

        let mut failures = 0;

        // Remove created files
        for path in &self.created_files {
            match fs::remove_file(path) {
                Err(e) if e.kind() != std::io::ErrorKind::NotFound => {
                    tracing::warn!("Failed to remove {}: {}", path.display(), e);
                    failures += 1;
                }
                _ => {}
            }
        }

        // Restore modified files
        for snapshot in &self.modified_files {
            if let Err(e) = file_ops::write_atomic(&snapshot.path, &snapshot.content) {
                tracing::warn!("Failed to restore {}: {}", snapshot.path.display(), e);
                failures += 1;
            }
        }

        // Remove created directories, deepest first, only if empty
        let mut dirs: Vec<_> = self.created_dirs.iter().collect();
        dirs.sort_by_key(|b| std::cmp::Reverse(b.components().count()));
        for path in dirs {
            let is_empty = fs::read_dir(path)
                .map(|mut d| d.next().is_none())
                .unwrap_or(false);
            if is_empty {
                let _ = fs::remove_dir(path);
            }
        }

        tracing::debug!(
            created = self.created_files.len(),
            restored = self.modified_files.len(),
            failures,
            "transaction rolled back"
        );
        failures
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        if !self.finished && self.enabled {
            let failures = self.rollback();
            if failures > 0 {
                tracing::warn!("Rollback left {} change(s) in place", failures);
            }
        }
    }
}

#[cfg(test)]
mod tests;
