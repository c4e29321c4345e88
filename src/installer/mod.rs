//! Bundle installation
//!
//! This module handles:
//! - Translating bundle paths to destinations for an install target
//! - Classifying each destination against the incoming bytes
//! - Resolving conflicts according to the install options (force, skip, backup)
//! - Writing files atomically and reporting one outcome per bundle file
//!
//! An install runs in two phases. Planning translates and checks every path
//! without touching the filesystem, so an unsafe or colliding bundle fails
//! before anything is written. The file loop then handles each bundle file in
//! order.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

pub mod backup;
pub mod classify;
pub mod diff;
pub mod file_ops;
pub mod guard;
pub mod paths;
pub mod target;

pub use backup::BackupRecord;
pub use classify::Classification;
pub use paths::{Destination, SkipReason};
pub use target::{InstallMode, InstallTarget};

use crate::bundle::{Bundle, BundleFile};
use crate::error::{Result, RulekitError};
use crate::transaction::Transaction;
use crate::ui::{ProgressReporter, SilentProgressReporter};
use guard::PathGuard;

/// Flags controlling one install
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstallOptions {
    /// Overwrite conflicting files
    pub force: bool,

    /// Classify everything but write nothing
    pub dry_run: bool,

    /// Leave conflicting files untouched instead of blocking
    pub skip_conflicts: bool,

    /// Keep a `.bak` copy of every overwritten file
    pub backup: bool,

    /// Undo the whole install when it ends blocked or fails
    pub atomic: bool,
}

/// Final status of one bundle file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileStatus {
    Created,
    Overwritten,
    Unchanged,
    Conflict,
    Skipped,
}

impl FileStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileStatus::Created => "created",
            FileStatus::Overwritten => "overwritten",
            FileStatus::Unchanged => "unchanged",
            FileStatus::Conflict => "conflict",
            FileStatus::Skipped => "skipped",
        }
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happened to one bundle file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    /// Path inside the bundle
    pub bundle_path: String,

    /// Absolute destination; `None` when the file has no destination in this mode
    pub destination: Option<PathBuf>,

    /// Destination relative to the install root, or the bundle path when there is none
    pub label: String,

    pub status: FileStatus,

    pub skip_reason: Option<SkipReason>,

    /// Preview of the change for conflicts, overwrites and skipped conflicts
    pub diff: Option<String>,

    pub backup: Option<BackupRecord>,
}

/// Result of one install, outcomes in bundle order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    pub outcomes: Vec<FileOutcome>,

    /// At least one file ended as an unresolved conflict
    pub had_blocking_conflicts: bool,

    /// The install's writes were undone (atomic mode only)
    pub rolled_back: bool,

    pub dry_run: bool,
}

impl InstallReport {
    /// Number of outcomes with the given status
    pub fn count(&self, status: FileStatus) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }

    /// Outcomes that block the install
    pub fn blocking_conflicts(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes
            .iter()
            .filter(|o| o.status == FileStatus::Conflict)
    }

    /// Backups written during the install
    pub fn backups(&self) -> impl Iterator<Item = &BackupRecord> {
        self.outcomes.iter().filter_map(|o| o.backup.as_ref())
    }

    /// Turn blocking conflicts into the aggregate `BlockingConflicts` error
    pub fn ensure_not_blocked(&self) -> Result<()> {
        if !self.had_blocking_conflicts {
            return Ok(());
        }
        let paths: Vec<&str> = self
            .blocking_conflicts()
            .map(|o| o.label.as_str())
            .collect();
        Err(RulekitError::blocking_conflicts(&paths))
    }
}

/// A bundle file with its destination decided
#[derive(Debug)]
struct PlannedFile<'b> {
    file: &'b BundleFile,
    destination: Destination,
    label: String,
}

/// Installs bundles into one target
pub struct Installer<'a> {
    target: &'a InstallTarget,
    options: InstallOptions,
    progress: Box<dyn ProgressReporter>,
}

impl<'a> Installer<'a> {
    /// Create an installer without progress output
    pub fn new(target: &'a InstallTarget, options: InstallOptions) -> Self {
        Self {
            target,
            options,
            progress: Box::new(SilentProgressReporter),
        }
    }

    /// Report progress through `progress`
    pub fn with_progress(mut self, progress: Box<dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    /// Install every file of `bundle` and report what happened to each.
    ///
    /// Blocking conflicts are part of the report, not an error; fatal errors
    /// (unsafe paths, malformed bundles, I/O failures) abort the install.
    pub fn install(&mut self, bundle: &Bundle) -> Result<InstallReport> {
        let planned = self.plan(bundle)?;

        tracing::debug!(
            slug = %bundle.slug,
            mode = %self.target.mode,
            root = %self.target.root.display(),
            files = planned.len(),
            bytes = bundle.total_size(),
            "installing bundle"
        );

        let mut transaction = Transaction::new(self.options.atomic && !self.options.dry_run);
        self.progress.init_file_progress(planned.len() as u64);

        let mut outcomes = Vec::with_capacity(planned.len());
        for item in &planned {
            match self.install_file(item, &mut transaction) {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => {
                    self.progress.abandon();
                    // Dropping the transaction undoes the partial install
                    return Err(e);
                }
            }
            self.progress.update_file(&item.label);
        }
        self.progress.finish_files();

        let had_blocking_conflicts = outcomes.iter().any(|o| o.status == FileStatus::Conflict);
        let rolled_back = had_blocking_conflicts && transaction.is_enabled();
        if rolled_back {
            tracing::info!("Install blocked by conflicts, rolling back");
            let failures = transaction.rollback();
            if failures > 0 {
                tracing::warn!("{} change(s) could not be rolled back", failures);
            }
        } else {
            transaction.commit();
        }

        Ok(InstallReport {
            outcomes,
            had_blocking_conflicts,
            rolled_back,
            dry_run: self.options.dry_run,
        })
    }

    /// Decide every destination before any I/O.
    fn plan<'b>(&self, bundle: &'b Bundle) -> Result<Vec<PlannedFile<'b>>> {
        bundle.validate()?;
        bundle.verify_checksums()?;

        let guard = PathGuard::new(&self.target.root);
        let mut claimed: HashMap<PathBuf, &str> = HashMap::new();
        let mut planned = Vec::with_capacity(bundle.files.len());

        for file in &bundle.files {
            let destination = paths::destination(&file.path, self.target)?;

            let label = match &destination {
                Destination::Install(path) => {
                    guard.check(path)?;
                    let label = self.target.display_path(path);
                    if let Some(previous) = claimed.insert(path.clone(), &file.path) {
                        return Err(RulekitError::MalformedBundle {
                            message: format!(
                                "'{}' and '{}' both install to {}",
                                previous, file.path, label
                            ),
                        });
                    }
                    label
                }
                Destination::Skip(_) => file.path.clone(),
            };

            planned.push(PlannedFile {
                file,
                destination,
                label,
            });
        }

        self.check_overlaps(&claimed)?;
        Ok(planned)
    }

    /// Reject destinations that the install itself would break: a file that
    /// must also be a directory of another file, or a bundle file sitting
    /// where a forced overwrite would put its backup.
    fn check_overlaps(&self, claimed: &HashMap<PathBuf, &str>) -> Result<()> {
        let mut claimed_paths: Vec<_> = claimed.iter().collect();
        claimed_paths.sort();

        for (path, bundle_path) in claimed_paths {
            for ancestor in path.ancestors().skip(1) {
                if !ancestor.starts_with(&self.target.root) {
                    break;
                }
                if let Some(parent) = claimed.get(ancestor) {
                    return Err(RulekitError::MalformedBundle {
                        message: format!(
                            "'{}' installs to {}, which '{}' needs as a directory",
                            parent,
                            self.target.display_path(ancestor),
                            bundle_path
                        ),
                    });
                }
            }

            if self.options.force && self.options.backup {
                if let Some(other) = claimed.get(&backup::backup_path(path)) {
                    return Err(RulekitError::MalformedBundle {
                        message: format!(
                            "'{}' installs to the backup location of '{}'",
                            other, bundle_path
                        ),
                    });
                }
            }
        }
        Ok(())
    }

    fn install_file(
        &self,
        item: &PlannedFile<'_>,
        transaction: &mut Transaction,
    ) -> Result<FileOutcome> {
        let file = item.file;
        let mut outcome = FileOutcome {
            bundle_path: file.path.clone(),
            destination: None,
            label: item.label.clone(),
            status: FileStatus::Skipped,
            skip_reason: None,
            diff: None,
            backup: None,
        };

        let path = match &item.destination {
            Destination::Install(path) => path,
            Destination::Skip(reason) => {
                tracing::debug!("{}: skipped ({:?})", file.path, reason);
                outcome.skip_reason = Some(*reason);
                return Ok(outcome);
            }
        };
        outcome.destination = Some(path.clone());

        let dry_run = self.options.dry_run;
        if !dry_run {
            let created = file_ops::ensure_parent_dir(path)?;
            transaction.track_dirs_created(created);
        }

        let classification = classify::classify(path, &item.label, &file.content)?;
        tracing::debug!(
            "{} -> {}: {}",
            file.path,
            item.label,
            classification_name(&classification)
        );

        match classification {
            Classification::Created => {
                if !dry_run {
                    file_ops::write_atomic(path, &file.content)?;
                    transaction.track_file_created(path.clone());
                    tracing::info!("Created {}", item.label);
                }
                outcome.status = FileStatus::Created;
            }
            Classification::Unchanged => {
                outcome.status = FileStatus::Unchanged;
            }
            Classification::Conflict { diff } if self.options.force => {
                if !dry_run {
                    outcome.backup = self.backup_and_track(path, &item.label, transaction)?;
                    transaction.track_file_modified(path)?;
                    file_ops::write_atomic(path, &file.content)?;
                    tracing::info!("Overwrote {}", item.label);
                }
                outcome.status = FileStatus::Overwritten;
                outcome.diff = Some(diff);
            }
            Classification::Conflict { diff } if self.options.skip_conflicts => {
                tracing::info!("Skipped conflicting {}", item.label);
                outcome.status = FileStatus::Skipped;
                outcome.skip_reason = Some(SkipReason::ConflictSkipped);
                outcome.diff = Some(diff);
            }
            Classification::Conflict { diff } => {
                tracing::info!("Conflict at {}", item.label);
                outcome.status = FileStatus::Conflict;
                outcome.diff = Some(diff);
            }
        }

        Ok(outcome)
    }

    /// Back up `path` if enabled, recording the backup file in the transaction
    fn backup_and_track(
        &self,
        path: &Path,
        label: &str,
        transaction: &mut Transaction,
    ) -> Result<Option<BackupRecord>> {
        if !self.options.backup {
            return Ok(None);
        }

        let backup_path = backup::backup_path(path);
        let replaces_existing = backup_path.symlink_metadata().is_ok();
        if replaces_existing {
            transaction.track_file_modified(&backup_path)?;
        }

        let record = backup::maybe_backup(path, label, &self.options)?;
        if record.is_some() && !replaces_existing {
            transaction.track_file_created(backup_path);
        }
        Ok(record)
    }
}

fn classification_name(classification: &Classification) -> &'static str {
    match classification {
        Classification::Created => "created",
        Classification::Unchanged => "unchanged",
        Classification::Conflict { .. } => "conflict",
    }
}

/// Install `bundle` into `target` without progress output
pub fn install(
    bundle: &Bundle,
    target: &InstallTarget,
    options: InstallOptions,
) -> Result<InstallReport> {
    Installer::new(target, options).install(bundle)
}
