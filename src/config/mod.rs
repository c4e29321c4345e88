//! Configuration file handling for rulekit
//!
//! This module contains:
//! - `config.yaml` - User settings (defaults for install options)
//! - Resolution of the configuration directory, which also holds `platforms.jsonc`

use std::path::PathBuf;

pub mod settings;

pub use settings::Settings;

/// Environment variable overriding the configuration directory
pub const CONFIG_DIR_ENV: &str = "RULEKIT_CONFIG_DIR";

/// Resolve the configuration directory.
///
/// `RULEKIT_CONFIG_DIR` wins; otherwise `<platform config dir>/rulekit`.
/// Returns `None` when neither is available, in which case built-in defaults apply.
pub fn config_dir() -> Option<PathBuf> {
    match std::env::var_os(CONFIG_DIR_ENV) {
        Some(dir) if !dir.is_empty() => Some(PathBuf::from(dir)),
        _ => dirs::config_dir().map(|dir| dir.join("rulekit")),
    }
}
