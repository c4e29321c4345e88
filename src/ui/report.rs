//! Install report rendering
//!
//! Turns an [`InstallReport`] into the lines printed on stdout: one status
//! line per bundle file, diffs where they matter, backup notes and a summary.
//! Rendering never changes what the report says; it only decides what to
//! show.

use console::Style;

use crate::installer::backup::BACKUP_SUFFIX;
use crate::installer::{FileOutcome, FileStatus, InstallReport, InstallTarget, SkipReason};

const DRY_RUN_PREFIX: &str = "[DRY RUN] ";

/// Styles for report output; plain when color is off
struct Palette {
    added: Style,
    removed: Style,
    hunk: Style,
    bold: Style,
    created: Style,
    overwritten: Style,
    conflict: Style,
    muted: Style,
}

impl Palette {
    fn new(colored: bool) -> Self {
        let style = || Style::new().force_styling(colored);
        Self {
            added: style().green(),
            removed: style().red(),
            hunk: style().cyan(),
            bold: style().bold(),
            created: style().green(),
            overwritten: style().yellow(),
            conflict: style().red().bold(),
            muted: style().dim(),
        }
    }

    fn status(&self, status: FileStatus) -> &Style {
        match status {
            FileStatus::Created => &self.created,
            FileStatus::Overwritten => &self.overwritten,
            FileStatus::Conflict => &self.conflict,
            FileStatus::Unchanged | FileStatus::Skipped => &self.muted,
        }
    }
}

/// Line announcing what is about to be installed where
pub fn render_header(slug: &str, target: &InstallTarget, dry_run: bool) -> String {
    let verb = if dry_run {
        format!("{}Would install", DRY_RUN_PREFIX)
    } else {
        "Installing".to_string()
    };
    format!(
        "{} {} for {} ({}) into {}",
        verb,
        slug,
        target.platform_id,
        target.mode,
        target.root.display()
    )
}

/// Render the full report.
///
/// Blocking conflicts always show their diff. With `verbose`, diffs of
/// overwritten files and skipped conflicts are shown too.
pub fn render(report: &InstallReport, verbose: bool, colored: bool) -> String {
    let palette = Palette::new(colored);
    let prefix = if report.dry_run { DRY_RUN_PREFIX } else { "" };
    let mut out = String::new();

    for outcome in &report.outcomes {
        out.push_str(&render_outcome(outcome, prefix, &palette));
        out.push('\n');

        if outcome.backup.is_some() {
            out.push_str(&format!(
                "{}    backup: {}{}\n",
                prefix, outcome.label, BACKUP_SUFFIX
            ));
        }

        let show_diff = match outcome.status {
            FileStatus::Conflict => true,
            FileStatus::Overwritten | FileStatus::Skipped => verbose,
            FileStatus::Created | FileStatus::Unchanged => false,
        };
        if let (true, Some(diff)) = (show_diff, outcome.diff.as_deref()) {
            out.push_str(&colorize_diff(diff, &palette));
        }
    }

    out.push('\n');
    out.push_str(&render_summary(report, &palette));
    out.push('\n');
    out
}

fn render_outcome(outcome: &FileOutcome, prefix: &str, palette: &Palette) -> String {
    let status = format!("{:<11}", outcome.status.as_str());
    let reason = match outcome.skip_reason {
        Some(SkipReason::GlobalRootFile) => " (root file, not installed globally)",
        Some(SkipReason::ConflictSkipped) => " (differs, left untouched)",
        None => "",
    };
    format!(
        "{}  {} {}{}",
        prefix,
        palette.status(outcome.status).apply_to(status),
        outcome.label,
        reason
    )
}

fn render_summary(report: &InstallReport, palette: &Palette) -> String {
    let counts = [
        FileStatus::Created,
        FileStatus::Overwritten,
        FileStatus::Unchanged,
        FileStatus::Skipped,
        FileStatus::Conflict,
    ]
    .iter()
    .map(|&status| format!("{} {}", report.count(status), status))
    .collect::<Vec<_>>()
    .join(", ");

    let mut summary = if report.dry_run {
        format!(
            "{}Would install {} file(s): {}",
            DRY_RUN_PREFIX,
            report.outcomes.len(),
            counts
        )
    } else {
        format!("Processed {} file(s): {}", report.outcomes.len(), counts)
    };

    let backups = report.backups().count();
    if backups > 0 {
        summary.push_str(&format!("\nBacked up {} file(s) with {}", backups, BACKUP_SUFFIX));
    }
    if report.rolled_back {
        summary.push('\n');
        summary.push_str(
            &palette
                .bold
                .apply_to("All changes from this install were rolled back")
                .to_string(),
        );
    }
    summary
}

/// Color diff lines: additions green, removals red, hunk headers cyan
fn colorize_diff(diff: &str, palette: &Palette) -> String {
    let mut out = String::with_capacity(diff.len());
    for line in diff.lines() {
        let styled = if line.starts_with("+++ b/") || line.starts_with("--- a/") {
            palette.bold.apply_to(line).to_string()
        } else if line.starts_with('+') {
            palette.added.apply_to(line).to_string()
        } else if line.starts_with('-') {
            palette.removed.apply_to(line).to_string()
        } else if line.starts_with("@@") {
            palette.hunk.apply_to(line).to_string()
        } else {
            line.to_string()
        };
        out.push_str("      ");
        out.push_str(&styled);
        out.push('\n');
    }
    out
}

/// Print the rendered report on stdout
pub fn print(report: &InstallReport, verbose: bool) {
    print!("{}", render(report, verbose, console::colors_enabled()));
}
