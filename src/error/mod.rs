//! Error types and handling for rulekit
//!
//! Uses `thiserror` for error definitions and `miette` for diagnostic codes and help text.
//!
//! Errors fall into a few groups:
//! - Bundle errors: malformed bundles and checksum mismatches
//! - Path safety: destinations that resolve outside the install root
//! - Platform errors: unknown platforms, missing global directories
//! - Configuration errors: settings and platform override files
//! - File system errors: anything other than "not found" is fatal
//! - Install errors: blocking conflicts reported as one aggregate error

use miette::Diagnostic;
use thiserror::Error;

/// Number of conflicting paths listed in a blocking-conflict error before truncating.
pub const CONFLICT_PREVIEW_LIMIT: usize = 10;

/// Main error type for rulekit operations
#[derive(Error, Diagnostic, Debug)]
pub enum RulekitError {
    // Bundle errors
    #[error("Malformed bundle: {message}")]
    #[diagnostic(
        code(rulekit::bundle::malformed),
        help("The bundle is invalid and cannot be installed; fetch it again or contact its author")
    )]
    MalformedBundle { message: String },

    #[error("Checksum mismatch for '{path}': expected {expected}, got {actual}")]
    #[diagnostic(
        code(rulekit::bundle::checksum_mismatch),
        help("The bundle contents were modified after they were published")
    )]
    ChecksumMismatch {
        path: String,
        expected: String,
        actual: String,
    },

    #[error("Bundle not found: {path}")]
    #[diagnostic(code(rulekit::bundle::not_found))]
    BundleNotFound { path: String },

    // Path safety
    #[error("Refusing to write '{path}': it resolves outside of {root}")]
    #[diagnostic(
        code(rulekit::path::outside_root),
        help("Bundle paths must stay inside the install root; this bundle cannot be installed")
    )]
    PathSafetyViolation { path: String, root: String },

    // Platform errors
    #[error("Platform not supported: {platform}")]
    #[diagnostic(
        code(rulekit::platform::not_supported),
        help("Run 'rulekit platforms' to see the supported platforms")
    )]
    PlatformNotSupported { platform: String },

    #[error("Platform '{platform}' has no global configuration directory")]
    #[diagnostic(
        code(rulekit::platform::no_global_mode),
        help("Install into the project instead, or pass --target <DIR>")
    )]
    GlobalModeUnsupported { platform: String },

    #[error("Bundle targets platform '{bundle}' but '{requested}' was requested")]
    #[diagnostic(code(rulekit::platform::mismatch))]
    PlatformMismatch { bundle: String, requested: String },

    #[error("No platform selected")]
    #[diagnostic(
        code(rulekit::platform::none_selected),
        help("Pass --platform <ID> or set 'default_platform' in config.yaml")
    )]
    NoPlatformSelected,

    // Configuration errors
    #[error("Failed to read configuration file: {path}")]
    #[diagnostic(code(rulekit::config::read_failed))]
    ConfigReadFailed { path: String, reason: String },

    #[error("Failed to parse configuration file: {path}: {reason}")]
    #[diagnostic(code(rulekit::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("Could not determine the home directory")]
    #[diagnostic(
        code(rulekit::config::no_home),
        help("Set HOME, or install with --target <DIR>")
    )]
    HomeDirUnavailable,

    // File system errors
    #[error("Failed to read file: {path}: {reason}")]
    #[diagnostic(code(rulekit::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}: {reason}")]
    #[diagnostic(code(rulekit::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("Failed to back up {path}: {reason}")]
    #[diagnostic(
        code(rulekit::fs::backup_failed),
        help("The original file was left untouched")
    )]
    BackupFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(rulekit::fs::io_error))]
    IoError { message: String },

    // Install errors
    #[error("{count} file(s) conflict with local changes:\n{preview}")]
    #[diagnostic(
        code(rulekit::install::conflicts),
        help(
            "Re-run with --force to overwrite them (add --backup to keep copies), \
             or with --skip-conflicts to leave them untouched"
        )
    )]
    BlockingConflicts { count: usize, preview: String },

    // CLI errors
    #[error("Unknown shell: {shell}")]
    #[diagnostic(
        code(rulekit::cli::unknown_shell),
        help("Supported shells: bash, elvish, fish, powershell, zsh")
    )]
    UnknownShell { shell: String },
}

impl RulekitError {
    /// Build the aggregate conflict error from the destinations that blocked an install
    pub fn blocking_conflicts<S: AsRef<str>>(paths: &[S]) -> Self {
        let mut lines: Vec<String> = paths
            .iter()
            .take(CONFLICT_PREVIEW_LIMIT)
            .map(|p| format!("  {}", p.as_ref()))
            .collect();
        if paths.len() > CONFLICT_PREVIEW_LIMIT {
            lines.push(format!(
                "  ... and {} more",
                paths.len() - CONFLICT_PREVIEW_LIMIT
            ));
        }
        RulekitError::BlockingConflicts {
            count: paths.len(),
            preview: lines.join("\n"),
        }
    }
}

impl From<std::io::Error> for RulekitError {
    fn from(err: std::io::Error) -> Self {
        RulekitError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for RulekitError {
    fn from(err: serde_yaml::Error) -> Self {
        RulekitError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for RulekitError {
    fn from(err: serde_json::Error) -> Self {
        RulekitError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, RulekitError>;
