use clap::Parser;
use std::path::PathBuf;

/// Arguments for the install command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                   Install into the current project:\n    rulekit install ./review-bundle -p claude\n\n\
                   Install a bundle manifest globally:\n    rulekit install review.json --global\n\n\
                   Install into another directory:\n    rulekit install ./review-bundle -p cursor --target ./out\n\n\
                   Overwrite local edits, keeping backups:\n    rulekit install ./review-bundle --force --backup\n\n\
                   Leave local edits alone:\n    rulekit install ./review-bundle --skip-conflicts")]
pub struct InstallArgs {
    /// Bundle directory or JSON bundle manifest
    pub bundle: PathBuf,

    /// Platform to install for (e.g., claude, cursor)
    #[arg(long, short = 'p', value_name = "PLATFORM")]
    pub platform: Option<String>,

    /// Install into the platform's global configuration directory
    #[arg(long, conflicts_with = "target")]
    pub global: bool,

    /// Install into DIR, laid out like a project
    #[arg(long, value_name = "DIR")]
    pub target: Option<PathBuf>,

    /// Overwrite files that differ from the bundle
    #[arg(long, short = 'f')]
    pub force: bool,

    /// Show what would be installed without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Leave files that differ from the bundle untouched (--force wins)
    #[arg(long)]
    pub skip_conflicts: bool,

    /// Keep a .bak copy of every overwritten file
    #[arg(long, overrides_with = "no_backup")]
    pub backup: bool,

    /// Do not keep .bak copies, even if config.yaml enables them
    #[arg(long, overrides_with = "backup")]
    pub no_backup: bool,

    /// Undo every change if the install ends blocked or fails
    #[arg(long)]
    pub atomic: bool,

    /// Do not show a progress bar
    #[arg(long)]
    pub no_progress: bool,
}

impl InstallArgs {
    /// Backup preference given on the command line, if any
    pub fn backup_override(&self) -> Option<bool> {
        match (self.backup, self.no_backup) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}
