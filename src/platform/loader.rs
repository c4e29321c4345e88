//! Platform table loading
//!
//! Built-in platforms can be overridden or extended with a `platforms.jsonc`
//! file in the rulekit configuration directory. Entries replace built-ins with
//! the same id; unknown ids are appended.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::{Platform, default_platforms};
use crate::error::{Result, RulekitError};

/// File name of the platform override file
pub const PLATFORMS_FILE: &str = "platforms.jsonc";

/// Either a bare array of platforms or an object with a `platforms` key
#[derive(Deserialize)]
#[serde(untagged)]
enum PlatformsFile {
    List(Vec<Platform>),
    Wrapped { platforms: Vec<Platform> },
}

/// Platform configuration loader
pub struct PlatformLoader {
    /// Directory searched for platforms.jsonc
    config_dir: Option<PathBuf>,
}

impl PlatformLoader {
    /// Create a loader reading overrides from `config_dir`
    pub fn new(config_dir: Option<PathBuf>) -> Self {
        Self { config_dir }
    }

    /// Load the built-in platforms merged with overrides, if any
    pub fn load(&self) -> Result<Vec<Platform>> {
        let platforms = default_platforms();

        let Some(dir) = self.config_dir.as_deref() else {
            return Ok(platforms);
        };

        match Self::load_file(&dir.join(PLATFORMS_FILE))? {
            Some(overrides) => {
                tracing::debug!(
                    count = overrides.len(),
                    "applying platform overrides from {}",
                    dir.display()
                );
                Ok(Self::merge_platforms(platforms, overrides))
            }
            None => Ok(platforms),
        }
    }

    fn load_file(path: &Path) -> Result<Option<Vec<Platform>>> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(RulekitError::ConfigReadFailed {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                });
            }
        };

        let json = strip_jsonc_comments(&content);
        Self::parse_platforms_json(&json, &path.display().to_string()).map(Some)
    }

    /// Merge two platform lists; later entries override earlier ones with matching IDs
    fn merge_platforms(base: Vec<Platform>, overrides: Vec<Platform>) -> Vec<Platform> {
        let mut merged = base;

        for platform in overrides {
            if let Some(pos) = merged.iter().position(|p| p.id == platform.id) {
                merged[pos] = platform;
            } else {
                merged.push(platform);
            }
        }

        merged
    }

    /// Parse platforms JSON, supporting both array format and object with "platforms" key
    fn parse_platforms_json(json: &str, path: &str) -> Result<Vec<Platform>> {
        let parsed: PlatformsFile =
            serde_json::from_str(json).map_err(|e| RulekitError::ConfigParseFailed {
                path: path.to_string(),
                reason: e.to_string(),
            })?;

        let platforms = match parsed {
            PlatformsFile::List(platforms) => platforms,
            PlatformsFile::Wrapped { platforms } => platforms,
        };

        for platform in &platforms {
            if platform.id.trim().is_empty() || platform.directory.trim().is_empty() {
                return Err(RulekitError::ConfigParseFailed {
                    path: path.to_string(),
                    reason: "every platform needs a non-empty 'id' and 'directory'".to_string(),
                });
            }
        }

        Ok(platforms)
    }
}

/// Strip `//` and `/* */` comments outside of string literals
pub fn strip_jsonc_comments(content: &str) -> String {
    let mut result = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            result.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        result.push(escaped);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match (c, chars.peek()) {
            ('"', _) => {
                in_string = true;
                result.push(c);
            }
            ('/', Some('/')) => {
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        result.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for skipped in chars.by_ref() {
                    if prev == '*' && skipped == '/' {
                        break;
                    }
                    prev = skipped;
                }
            }
            _ => result.push(c),
        }
    }

    result
}
