//! Basic file operations for bundle installation
//!
//! This module handles low-level file operations:
//! - Directory creation (ensure_parent_dir), reporting which directories were new
//! - Reading existing destinations, with "not found" as a normal outcome
//! - Per-file atomic writes (temp file in the same directory, then rename)

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{Result, RulekitError};

fn file_read_error(path: &Path, e: std::io::Error) -> RulekitError {
    RulekitError::FileReadFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    }
}

fn file_write_error(path: &Path, e: std::io::Error) -> RulekitError {
    RulekitError::FileWriteFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    }
}

/// Ensure parent directory exists for a path.
///
/// Returns the directories that did not exist before, outermost first.
pub fn ensure_parent_dir(path: &Path) -> Result<Vec<PathBuf>> {
    let Some(parent) = path.parent() else {
        return Ok(Vec::new());
    };

    let mut missing = Vec::new();
    let mut current = Some(parent);
    while let Some(dir) = current {
        if dir.as_os_str().is_empty() || dir.exists() {
            break;
        }
        missing.push(dir.to_path_buf());
        current = dir.parent();
    }

    if missing.is_empty() {
        return Ok(missing);
    }

    fs::create_dir_all(parent).map_err(|e| file_write_error(parent, e))?;
    missing.reverse();
    Ok(missing)
}

/// Read a destination file; `Ok(None)` when it does not exist.
///
/// Every other failure (permissions, path is a directory, ...) is an error.
pub fn read_existing(path: &Path) -> Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(file_read_error(path, e)),
    }
}

/// Write content to a path atomically.
///
/// The content goes to a temporary file next to the destination which then
/// replaces it, so readers never observe a half-written file. An existing
/// file keeps its permissions. A symlink at the destination is replaced, not
/// followed.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let permissions = match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_file() => Some(meta.permissions()),
        _ => default_permissions(),
    };

    let mut temp = tempfile::Builder::new()
        .prefix(".rulekit-")
        .suffix(".tmp")
        .tempfile_in(parent)
        .map_err(|e| file_write_error(path, e))?;

    temp.write_all(content)
        .and_then(|_| temp.as_file().sync_all())
        .map_err(|e| file_write_error(path, e))?;

    if let Some(permissions) = permissions {
        temp.as_file()
            .set_permissions(permissions)
            .map_err(|e| file_write_error(path, e))?;
    }

    temp.persist(path)
        .map_err(|e| file_write_error(path, e.error))?;

    Ok(())
}

#[cfg(unix)]
fn default_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<fs::Permissions> {
    None
}
