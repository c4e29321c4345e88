//! User settings (config.yaml) data structures
//!
//! Settings only supply defaults; command-line flags always take precedence.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RulekitError};

/// File name of the settings file inside the configuration directory
pub const SETTINGS_FILE: &str = "config.yaml";

/// User settings (config.yaml)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Platform used when neither `--platform` nor the bundle names one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_platform: Option<String>,

    /// Write `<file>.bak` before forced overwrites
    pub backup: bool,

    /// Leave conflicting files untouched instead of failing
    pub skip_conflicts: bool,

    /// Roll back the run's writes when it ends blocked or fails
    pub atomic: bool,
}

impl Settings {
    /// Parse settings from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let settings: Self = serde_yaml::from_str(yaml)?;
        Ok(settings)
    }

    /// Serialize settings to a YAML string
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Load settings from `<config_dir>/config.yaml`; a missing file yields defaults
    pub fn load(config_dir: Option<&Path>) -> Result<Self> {
        let Some(dir) = config_dir else {
            return Ok(Self::default());
        };

        let path = dir.join(SETTINGS_FILE);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("no settings file at {}", path.display());
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(RulekitError::ConfigReadFailed {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                });
            }
        };

        Self::from_yaml(&content).map_err(|e| RulekitError::ConfigParseFailed {
            path: path.display().to_string(),
            reason: match e {
                RulekitError::ConfigParseFailed { reason, .. } => reason,
                other => other.to_string(),
            },
        })
    }
}
