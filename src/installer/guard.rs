//! Symlink-aware containment checks for destinations
//!
//! The path translator proves containment lexically. A symlinked directory
//! inside the root can still point elsewhere, so before any I/O each
//! destination is resolved against the real filesystem: the longest existing
//! ancestor is normalized (following symlinks) and the remaining components
//! are appended back, e.g. `/var -> /private/var` on macOS.

use std::path::{Path, PathBuf};

use normpath::PathExt;

use crate::error::{Result, RulekitError};

/// Containment guard for one install root
#[derive(Debug, Clone)]
pub struct PathGuard {
    root: PathBuf,
    resolved_root: PathBuf,
}

impl PathGuard {
    /// Create a guard for `root`, which need not exist yet
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            resolved_root: resolve(root),
        }
    }

    /// Fail with `PathSafetyViolation` when `path` really lives outside the root
    pub fn check(&self, path: &Path) -> Result<()> {
        let resolved = resolve(path);
        if resolved.starts_with(&self.resolved_root) {
            Ok(())
        } else {
            tracing::warn!(
                "{} resolves to {}, outside {}",
                path.display(),
                resolved.display(),
                self.resolved_root.display()
            );
            Err(RulekitError::PathSafetyViolation {
                path: path.display().to_string(),
                root: self.root.display().to_string(),
            })
        }
    }
}

/// Normalize a path, resolving symlinks in its longest existing ancestor
fn resolve(path: &Path) -> PathBuf {
    if let Ok(norm) = path.normalize() {
        return norm.into_path_buf();
    }

    let mut current = path;
    let mut components = Vec::new();

    // Walk up the tree until we find an existing path
    while current.symlink_metadata().is_err() {
        match (current.file_name(), current.parent()) {
            (Some(name), Some(parent)) => {
                components.push(name);
                current = parent;
            }
            _ => return path.to_path_buf(),
        }
    }

    let base = current
        .normalize()
        .map(|norm| norm.into_path_buf())
        .unwrap_or_else(|_| current.to_path_buf());

    components
        .iter()
        .rev()
        .fold(base, |path, component| path.join(component))
}
