//! Resolved bundle model
//!
//! A bundle is the checksum-verified file set for one preset variant on one
//! platform. Files keep the order they were resolved in; the installer
//! processes them in exactly that order.

use std::collections::HashSet;

use crate::error::{Result, RulekitError};
use crate::hash;

pub mod loader;

pub use loader::load_bundle;

/// A single file inside a bundle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleFile {
    /// Bundle-relative, forward-slash path (e.g., "config/agent.md")
    pub path: String,

    /// Raw file content
    pub content: Vec<u8>,

    /// Checksum in `blake3:<hex>` form
    pub checksum: String,
}

impl BundleFile {
    /// Create a bundle file, computing its checksum from the content
    pub fn new(path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        let content = content.into();
        Self {
            path: path.into(),
            checksum: hash::hash_bytes(&content),
            content,
        }
    }
}

/// A resolved bundle ready for installation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundle {
    /// Bundle identifier (e.g., "acme/code-review")
    pub slug: String,

    /// Platform this bundle variant was built for
    pub platform: String,

    /// Files in resolution order
    pub files: Vec<BundleFile>,
}

impl Bundle {
    /// Create an empty bundle
    pub fn new(slug: impl Into<String>, platform: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            platform: platform.into(),
            files: Vec::new(),
        }
    }

    /// Append a file, computing its checksum
    pub fn with_file(mut self, path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.files.push(BundleFile::new(path, content));
        self
    }

    /// Check the structural invariants of the file list.
    ///
    /// Paths must be non-empty, use forward slashes, be unique and not
    /// absolute. Parent-directory traversal is left to the path translator,
    /// which reports it as a path safety violation.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();

        for file in &self.files {
            let malformed = |message: String| RulekitError::MalformedBundle { message };

            if file.path.trim().is_empty() {
                return Err(malformed("bundle contains a file with an empty path".to_string()));
            }
            if file.path.contains('\\') {
                return Err(malformed(format!(
                    "path '{}' must use forward slashes",
                    file.path
                )));
            }
            if file.path.contains('\0') {
                return Err(malformed(format!("path '{}' contains a NUL byte", file.path)));
            }
            if !seen.insert(file.path.as_str()) {
                return Err(malformed(format!("duplicate path '{}'", file.path)));
            }
        }

        Ok(())
    }

    /// Verify every file against its recorded checksum
    pub fn verify_checksums(&self) -> Result<()> {
        self.files.iter().try_for_each(verify_checksum)
    }

    /// Total size of all file contents in bytes
    pub fn total_size(&self) -> usize {
        self.files.iter().map(|f| f.content.len()).sum()
    }
}

/// Verify one file's content against its checksum.
///
/// Must succeed for every file before installation starts.
pub fn verify_checksum(file: &BundleFile) -> Result<()> {
    if !hash::is_valid_hash(&file.checksum) {
        return Err(RulekitError::MalformedBundle {
            message: format!(
                "file '{}' has an unrecognised checksum '{}'",
                file.path, file.checksum
            ),
        });
    }

    if hash::verify_hash(&file.checksum, &file.content) {
        Ok(())
    } else {
        Err(RulekitError::ChecksumMismatch {
            path: file.path.clone(),
            expected: file.checksum.clone(),
            actual: hash::hash_bytes(&file.content),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundle_file_checksum() {
        let file = BundleFile::new("config/agent.md", "hello");
        assert_eq!(file.checksum, hash::hash_bytes(b"hello"));
        assert!(verify_checksum(&file).is_ok());
    }

    #[test]
    fn test_validate_ok() {
        let bundle = Bundle::new("acme/review", "claude")
            .with_file("config/agent.md", "a")
            .with_file("README.md", "b");
        assert!(bundle.validate().is_ok());
    }

    #[test]
    fn test_validate_duplicate_path() {
        let bundle = Bundle::new("acme/review", "claude")
            .with_file("config/agent.md", "a")
            .with_file("config/agent.md", "b");
        let err = bundle.validate().unwrap_err();
        assert!(matches!(err, RulekitError::MalformedBundle { .. }));
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_validate_backslash() {
        let bundle = Bundle::new("acme/review", "claude").with_file("config\\agent.md", "a");
        assert!(matches!(
            bundle.validate().unwrap_err(),
            RulekitError::MalformedBundle { .. }
        ));
    }

    #[test]
    fn test_validate_empty_path() {
        let bundle = Bundle::new("acme/review", "claude").with_file("", "a");
        assert!(bundle.validate().is_err());
    }

    #[test]
    fn test_verify_checksum_mismatch() {
        let mut file = BundleFile::new("config/agent.md", "original");
        file.content = b"tampered".to_vec();
        let err = verify_checksum(&file).unwrap_err();
        assert!(matches!(err, RulekitError::ChecksumMismatch { .. }));
    }

    #[test]
    fn test_verify_checksum_bad_format() {
        let file = BundleFile {
            path: "a.md".to_string(),
            content: b"x".to_vec(),
            checksum: "md5:abc".to_string(),
        };
        assert!(matches!(
            verify_checksum(&file).unwrap_err(),
            RulekitError::MalformedBundle { .. }
        ));
    }

    #[test]
    fn test_verify_checksums_reports_first_failure() {
        let mut bundle = Bundle::new("acme/review", "claude")
            .with_file("a.md", "a")
            .with_file("b.md", "b");
        bundle.files[1].content = b"changed".to_vec();
        match bundle.verify_checksums().unwrap_err() {
            RulekitError::ChecksumMismatch { path, .. } => assert_eq!(path, "b.md"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_total_size() {
        let bundle = Bundle::new("s", "claude")
            .with_file("a", "12")
            .with_file("b", "345");
        assert_eq!(bundle.total_size(), 5);
    }
}
