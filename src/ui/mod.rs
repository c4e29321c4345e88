//! UI/Progress presentation layer
//!
//! This module handles:
//! - Progress reporting for the install file loop
//! - Interactive progress bars using indicatif
//! - Silent progress for non-terminal output and --no-progress
//! - Rendering install reports (see [`report`])
//!
//! All progress reporting goes through the ProgressReporter trait, so the
//! installer never knows whether anything is drawn.

use indicatif::{ProgressBar, ProgressStyle};

pub mod report;

/// Longest file label shown next to the progress bar
const MAX_LABEL_CHARS: usize = 50;

/// Progress reporter trait for the install file loop
pub trait ProgressReporter: Send + Sync {
    /// Initialize file progress with total file count
    fn init_file_progress(&mut self, total_files: u64);

    /// Record that a file has been handled
    fn update_file(&mut self, file_path: &str);

    /// Finish file progress
    fn finish_files(&mut self);

    /// Abandon on error
    fn abandon(&mut self);
}

/// Interactive progress reporter with a visual progress bar
pub struct InteractiveProgressReporter {
    file_pb: Option<ProgressBar>,
}

impl InteractiveProgressReporter {
    pub fn new() -> Self {
        Self { file_pb: None }
    }
}

impl Default for InteractiveProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for InteractiveProgressReporter {
    fn init_file_progress(&mut self, total_files: u64) {
        let file_style = ProgressStyle::default_bar()
            .template("  [{bar:40.green/yellow}] {pos}/{len} files {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  ");

        let file_pb = ProgressBar::new(total_files);
        file_pb.set_style(file_style);
        self.file_pb = Some(file_pb);
    }

    fn update_file(&mut self, file_path: &str) {
        if let Some(ref file_pb) = self.file_pb {
            file_pb.set_message(truncate_label(file_path));
            file_pb.inc(1);
        }
    }

    fn finish_files(&mut self) {
        if let Some(file_pb) = self.file_pb.take() {
            file_pb.finish_and_clear();
        }
    }

    fn abandon(&mut self) {
        if let Some(file_pb) = self.file_pb.take() {
            file_pb.abandon();
        }
    }
}

/// Keep the tail of long paths, counting characters rather than bytes
fn truncate_label(label: &str) -> String {
    let count = label.chars().count();
    if count <= MAX_LABEL_CHARS {
        return label.to_string();
    }
    let tail: String = label.chars().skip(count - (MAX_LABEL_CHARS - 3)).collect();
    format!("...{}", tail)
}

/// Silent progress reporter
///
/// No-op implementation used when stderr is not a terminal or
/// --no-progress is given.
#[derive(Default)]
pub struct SilentProgressReporter;

impl ProgressReporter for SilentProgressReporter {
    fn init_file_progress(&mut self, _total_files: u64) {}

    fn update_file(&mut self, _file_path: &str) {}

    fn finish_files(&mut self) {}

    fn abandon(&mut self) {}
}
