//! Bundle path translation
//!
//! Maps a bundle-relative file path to its absolute destination for an
//! install target. Translation is pure: it never touches the filesystem.
//!
//! Mapping rule (`config-prefix/v1`):
//! - `config/<rest>` goes to `<root>/<rest>` for global installs and to
//!   `<root>/<platform dir>/<rest>` for project and custom installs.
//! - Any other path is a root file: installed as-is for project and custom
//!   installs, skipped for global installs.

use std::path::PathBuf;

use super::target::{InstallMode, InstallTarget};
use crate::error::{Result, RulekitError};

/// Identifier of the mapping rule implemented here
pub const MAPPING_RULE: &str = "config-prefix/v1";

/// Reserved namespace for platform configuration files
pub const CONFIG_NAMESPACE: &str = "config";

/// Why a bundle file is not installed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Root files have no place in a platform's global directory
    GlobalRootFile,
    /// The destination differs and conflicts were set to be skipped
    ConflictSkipped,
}

/// Result of translating one bundle path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Install at this absolute path
    Install(PathBuf),
    /// Do not install; reported as skipped
    Skip(SkipReason),
}

/// Translate a bundle path into its destination under `target.root`
pub fn destination(bundle_path: &str, target: &InstallTarget) -> Result<Destination> {
    let unsafe_path = || RulekitError::PathSafetyViolation {
        path: bundle_path.to_string(),
        root: target.root.display().to_string(),
    };

    if bundle_path.ends_with('/') {
        return Err(malformed(bundle_path, "does not name a file"));
    }

    let segments = normalize(bundle_path).ok_or_else(unsafe_path)?;
    if segments.is_empty() {
        return Err(malformed(bundle_path, "resolves to an empty path"));
    }

    let is_config = segments.len() > 1 && segments[0] == CONFIG_NAMESPACE;

    let relative: Vec<&str> = if is_config {
        let rest = &segments[1..];
        match target.mode {
            InstallMode::Global => rest.to_vec(),
            InstallMode::Project | InstallMode::Custom => {
                let platform = normalize(&target.platform_dir).ok_or_else(unsafe_path)?;
                platform.into_iter().chain(rest.iter().copied()).collect()
            }
        }
    } else {
        match target.mode {
            InstallMode::Global => return Ok(Destination::Skip(SkipReason::GlobalRootFile)),
            InstallMode::Project | InstallMode::Custom => segments,
        }
    };

    if relative.is_empty() {
        return Err(malformed(bundle_path, "resolves to an empty path"));
    }

    let path = relative
        .iter()
        .fold(target.root.clone(), |path, segment| path.join(segment));

    if !path.starts_with(&target.root) || path == target.root {
        return Err(unsafe_path());
    }

    Ok(Destination::Install(path))
}

fn malformed(bundle_path: &str, problem: &str) -> RulekitError {
    RulekitError::MalformedBundle {
        message: format!("path '{bundle_path}' {problem}"),
    }
}

/// Lexically normalize a forward-slash relative path.
///
/// Returns `None` when the path is absolute, carries a drive prefix, or
/// climbs above its starting point.
fn normalize(path: &str) -> Option<Vec<&str>> {
    if path.starts_with('/') || path.starts_with('\\') || has_drive_prefix(path) {
        return None;
    }

    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            s if s.contains('\\') => return None,
            s => segments.push(s),
        }
    }

    Some(segments)
}

fn has_drive_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}
