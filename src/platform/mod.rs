//! Platform definitions
//!
//! This module handles:
//! - Platform definitions (project directory, optional global directory)
//! - Platform registration and lookup (via PlatformRegistry)
//! - Loading user overrides from platforms.jsonc (via PlatformLoader)
//!
//! Each platform is pure data. Adding a platform means adding a table entry,
//! never a new branch in the path translator.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, RulekitError};

pub mod loader;
pub mod registry;

pub use registry::PlatformRegistry;

/// A supported AI agent platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    /// Platform identifier (e.g., "claude", "cursor", "codex")
    pub id: String,

    /// Display name for the platform
    pub name: String,

    /// Project-relative directory holding platform configuration (e.g., ".claude")
    pub directory: String,

    /// Global configuration directory; `~/` is expanded to the home directory.
    /// Absent for platforms that have no global mode.
    #[serde(default, rename = "global", skip_serializing_if = "Option::is_none")]
    pub global_directory: Option<String>,
}

impl Platform {
    /// Create a new platform without a global directory
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        directory: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            directory: directory.into(),
            global_directory: None,
        }
    }

    /// Set the global configuration directory
    pub fn with_global(mut self, directory: impl Into<String>) -> Self {
        self.global_directory = Some(directory.into());
        self
    }

    /// Get the platform directory inside a project root
    pub fn directory_path(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.directory)
    }

    /// Resolve the global directory against the given home directory.
    ///
    /// Fails with `GlobalModeUnsupported` when the platform has no global directory.
    pub fn global_path(&self, home: Option<&Path>) -> Result<PathBuf> {
        let raw = self
            .global_directory
            .as_deref()
            .ok_or_else(|| RulekitError::GlobalModeUnsupported {
                platform: self.id.clone(),
            })?;
        expand_home(raw, home)
    }
}

/// Expand a leading `~` or `~/` against `home`
pub fn expand_home(raw: &str, home: Option<&Path>) -> Result<PathBuf> {
    let rest = if raw == "~" {
        Some("")
    } else {
        raw.strip_prefix("~/")
    };

    match rest {
        Some(rest) => {
            let home = home.ok_or(RulekitError::HomeDirUnavailable)?;
            Ok(if rest.is_empty() {
                home.to_path_buf()
            } else {
                home.join(rest)
            })
        }
        None => Ok(PathBuf::from(raw)),
    }
}

/// Get default platform definitions
pub fn default_platforms() -> Vec<Platform> {
    registry::default_platforms()
}
