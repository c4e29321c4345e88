//! Platform registry for managing platform definitions
//!
//! This module provides:
//! - Platform registration and lookup (with aliases)
//! - The built-in platform table

use std::collections::HashMap;

use super::Platform;
use crate::error::{Result, RulekitError};

/// Registry of all supported platforms
pub struct PlatformRegistry {
    platforms: Vec<Platform>,
    by_id: HashMap<String, usize>,
}

impl PlatformRegistry {
    /// Create a new registry with the given platforms
    pub fn new(platforms: Vec<Platform>) -> Self {
        let by_id: HashMap<String, usize> = platforms
            .iter()
            .enumerate()
            .map(|(idx, p)| (p.id.clone(), idx))
            .collect();

        Self { platforms, by_id }
    }

    /// Get a platform by its ID
    pub fn get_by_id(&self, id: &str) -> Option<&Platform> {
        let id = id.trim().to_lowercase();
        if let Some(&idx) = self.by_id.get(&id) {
            return self.platforms.get(idx);
        }

        // Handle aliases
        let alias_id = match id.as_str() {
            "cursor-ai" => "cursor",
            "claude-code" => "claude",
            "github-copilot" => "copilot",
            _ => return None,
        };

        self.by_id
            .get(alias_id)
            .and_then(|&idx| self.platforms.get(idx))
    }

    /// Get a platform by ID, failing with `PlatformNotSupported`
    pub fn resolve(&self, id: &str) -> Result<&Platform> {
        self.get_by_id(id)
            .ok_or_else(|| RulekitError::PlatformNotSupported {
                platform: id.to_string(),
            })
    }

    /// Get all platforms in the registry
    pub fn all(&self) -> &[Platform] {
        &self.platforms
    }
}

impl Default for PlatformRegistry {
    fn default() -> Self {
        Self::new(default_platforms())
    }
}

/// Get default platform definitions
///
/// Platforms without a global directory only support project and custom installs.
pub fn default_platforms() -> Vec<Platform> {
    vec![
        Platform::new("claude", "Claude Code", ".claude").with_global("~/.claude"),
        Platform::new("codex", "OpenAI Codex CLI", ".codex").with_global("~/.codex"),
        Platform::new("copilot", "GitHub Copilot", ".github"),
        Platform::new("cursor", "Cursor", ".cursor").with_global("~/.cursor"),
        Platform::new("gemini", "Gemini CLI", ".gemini").with_global("~/.gemini"),
        Platform::new("junie", "JetBrains Junie", ".junie"),
        Platform::new("kiro", "Kiro", ".kiro").with_global("~/.kiro"),
        Platform::new("opencode", "OpenCode", ".opencode").with_global("~/.config/opencode"),
        Platform::new("roo", "Roo Code", ".roo").with_global("~/.roo"),
        Platform::new("windsurf", "Windsurf", ".windsurf").with_global("~/.codeium/windsurf"),
    ]
}
