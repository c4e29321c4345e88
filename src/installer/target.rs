//! Install targets
//!
//! An install target fixes, for one invocation, the absolute root directory
//! every destination must stay inside, the install mode and the platform's
//! canonical project subdirectory.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{Result, RulekitError};
use crate::platform::Platform;

/// Where a bundle is installed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallMode {
    /// Into the current project; config files go under the platform directory
    Project,
    /// Into the platform's global directory; config files go directly at its root
    Global,
    /// Into an explicit directory, laid out like a project
    Custom,
}

impl fmt::Display for InstallMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstallMode::Project => write!(f, "project"),
            InstallMode::Global => write!(f, "global"),
            InstallMode::Custom => write!(f, "custom"),
        }
    }
}

/// Resolved destination root for one install
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallTarget {
    /// Absolute root directory; nothing is written outside of it
    pub root: PathBuf,

    /// Install mode
    pub mode: InstallMode,

    /// Platform identifier
    pub platform_id: String,

    /// Platform's project subdirectory (e.g., ".claude")
    pub platform_dir: String,
}

impl InstallTarget {
    /// Target the platform directory inside a project root
    pub fn project(project_root: &Path, platform: &Platform) -> Result<Self> {
        Self::build(project_root, InstallMode::Project, platform)
    }

    /// Target the platform's global directory.
    ///
    /// Fails with `GlobalModeUnsupported` when the platform has none.
    pub fn global(platform: &Platform, home: Option<&Path>) -> Result<Self> {
        let root = platform.global_path(home)?;
        Self::build(&root, InstallMode::Global, platform)
    }

    /// Target an explicit directory
    pub fn custom(root: &Path, platform: &Platform) -> Result<Self> {
        Self::build(root, InstallMode::Custom, platform)
    }

    fn build(root: &Path, mode: InstallMode, platform: &Platform) -> Result<Self> {
        let root = std::path::absolute(root).map_err(|e| RulekitError::IoError {
            message: format!("cannot resolve {}: {}", root.display(), e),
        })?;

        Ok(Self {
            root,
            mode,
            platform_id: platform.id.clone(),
            platform_dir: platform.directory.clone(),
        })
    }

    /// Path relative to the root for display, falling back to the full path
    pub fn display_path(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .map(|rel| rel.to_string_lossy().replace('\\', "/"))
            .unwrap_or_else(|_| path.display().to_string())
    }
}
