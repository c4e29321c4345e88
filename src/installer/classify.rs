//! Conflict classification
//!
//! Compares what is on disk with what the bundle would write. The result only
//! says how the two relate; deciding whether to overwrite, skip or fail is
//! left to the installer.

use std::path::Path;

use super::diff;
use super::file_ops;
use crate::error::Result;

/// Diff text used whenever either side looks binary
pub const BINARY_DIFF_MARKER: &str = "(binary file differs)";

/// Bytes inspected by the binary heuristic
const BINARY_SNIFF_LEN: usize = 8000;

/// Share of non-text bytes above which content counts as binary
const BINARY_RATIO: f64 = 0.3;

/// How existing content relates to incoming content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Nothing exists at the destination
    Created,
    /// Existing bytes equal the incoming bytes exactly
    Unchanged,
    /// Existing content differs; `diff` previews the change
    Conflict { diff: String },
}

/// Classify `incoming` against whatever is stored at `destination`.
///
/// `label` names the file in diff headers. A missing destination is
/// `Created`; any other read failure is returned as an error.
pub fn classify(destination: &Path, label: &str, incoming: &[u8]) -> Result<Classification> {
    let existing = file_ops::read_existing(destination)?;
    Ok(compare(existing.as_deref(), incoming, label))
}

/// Classify already-read content
pub fn compare(existing: Option<&[u8]>, incoming: &[u8], label: &str) -> Classification {
    match existing {
        None => Classification::Created,
        Some(existing) if existing == incoming => Classification::Unchanged,
        Some(existing) => Classification::Conflict {
            diff: render_diff(existing, incoming, label),
        },
    }
}

fn render_diff(existing: &[u8], incoming: &[u8], label: &str) -> String {
    if is_binary(existing) || is_binary(incoming) {
        return BINARY_DIFF_MARKER.to_string();
    }

    let old = String::from_utf8_lossy(existing);
    let new = String::from_utf8_lossy(incoming);
    diff::unified_diff(&old, &new, label).unwrap_or_else(|| BINARY_DIFF_MARKER.to_string())
}

/// Heuristic binary detection.
///
/// Content is binary when its first bytes contain a NUL, or when too many of
/// them are control characters or invalid UTF-8.
pub fn is_binary(content: &[u8]) -> bool {
    let window = &content[..content.len().min(BINARY_SNIFF_LEN)];
    if window.is_empty() {
        return false;
    }
    if window.contains(&0) {
        return true;
    }

    let mut suspicious = window
        .iter()
        .filter(|&&b| (b < 0x20 && !matches!(b, b'\t' | b'\n' | b'\r' | 0x0c | 0x1b)) || b == 0x7f)
        .count();

    if let Err(e) = std::str::from_utf8(window) {
        // A multi-byte character cut off by the window is not evidence of binary data
        let truncated_tail = e.error_len().is_none();
        if !truncated_tail {
            suspicious += window.iter().filter(|&&b| b >= 0x80).count();
        }
    }

    suspicious as f64 / window.len() as f64 > BINARY_RATIO
}
