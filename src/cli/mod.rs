//! CLI definitions using clap derive API
//!
//! This module is organized into submodules for each command's argument types:
//! - install: Install command arguments
//! - completions: Completions command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod completions;
pub mod install;

pub use completions::CompletionsArgs;
pub use install::InstallArgs;

/// rulekit - preset and rule installer for AI coding agents
#[derive(Parser, Debug)]
#[command(
    name = "rulekit",
    author,
    version,
    color = clap::ColorChoice::Auto,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Install preset and rule bundles into AI coding agent configuration directories",
    long_about = "rulekit installs a bundle of agent presets and rules into a project, into a \
                  platform's global configuration directory, or into any directory you choose. \
                  Local edits are never overwritten silently: differing files are reported as \
                  conflicts until you decide to force, back up or skip them.",
    after_help = "Examples:\n   \
                  rulekit install ./review-bundle -p claude        # Install into this project\n   \
                  rulekit install bundle.json --global             # Install into ~/.claude etc.\n   \
                  rulekit install ./review-bundle --dry-run        # Show what would change\n   \
                  rulekit install ./review-bundle -f --backup      # Overwrite, keeping .bak copies\n   \
                  rulekit platforms                                # List supported platforms\n"
)]
pub struct Cli {
    /// Project directory (defaults to current directory)
    #[arg(long, short = 'w', global = true, env = "RULEKIT_WORKSPACE")]
    pub workspace: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Print debug logs to stderr
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install a bundle
    Install(InstallArgs),

    /// List supported platforms
    Platforms,

    /// Show version information
    #[command(hide = true)]
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing_platforms() {
        let cli = Cli::try_parse_from(["rulekit", "platforms"]).unwrap();
        assert!(matches!(cli.command, Commands::Platforms));
    }

    #[test]
    fn test_cli_parsing_version() {
        let cli = Cli::try_parse_from(["rulekit", "version"]).unwrap();
        assert!(matches!(cli.command, Commands::Version));
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["rulekit", "platforms", "-v", "--debug", "-w", "/tmp/project"])
                .unwrap();
        assert!(cli.verbose);
        assert!(cli.debug);
        assert_eq!(cli.workspace, Some(PathBuf::from("/tmp/project")));
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["rulekit"]).is_err());
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
