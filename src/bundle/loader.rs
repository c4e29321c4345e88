//! Local bundle loading
//!
//! The registry client is not part of this tool; bundles reach the installer
//! either as a directory on disk or as a JSON manifest with inline contents
//! and checksums. Both forms are fully read and verified here, before any
//! installation step runs.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use walkdir::WalkDir;

use super::{Bundle, BundleFile};
use crate::error::{Result, RulekitError};

/// A bundle as read from disk, before its platform is settled
#[derive(Debug, Clone)]
pub struct LoadedBundle {
    /// Bundle identifier
    pub slug: String,

    /// Platform declared by the bundle manifest, if any
    pub platform: Option<String>,

    /// Verified files in resolution order
    pub files: Vec<BundleFile>,
}

impl LoadedBundle {
    /// Finish the bundle for the selected platform
    pub fn into_bundle(self, platform: impl Into<String>) -> Bundle {
        Bundle {
            slug: self.slug,
            platform: platform.into(),
            files: self.files,
        }
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct Manifest {
    slug: String,
    #[serde(default)]
    platform: Option<String>,
    files: Vec<ManifestFile>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestFile {
    path: String,
    content: String,
    #[serde(default)]
    encoding: ContentEncoding,
    checksum: String,
}

/// How a manifest file's `content` string is stored
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ContentEncoding {
    /// The content is the file text itself
    #[default]
    Utf8,
    /// The content is hex-encoded bytes, for binary files
    Hex,
}

impl ManifestFile {
    fn into_bundle_file(self) -> Result<BundleFile> {
        let content = match self.encoding {
            ContentEncoding::Utf8 => self.content.into_bytes(),
            ContentEncoding::Hex => {
                hex::decode(self.content.trim()).map_err(|e| RulekitError::MalformedBundle {
                    message: format!("'{}' has invalid hex content: {}", self.path, e),
                })?
            }
        };
        Ok(BundleFile {
            path: self.path,
            content,
            checksum: self.checksum,
        })
    }
}

/// Load a bundle from a directory or a `.json` manifest and verify its checksums
pub fn load_bundle(source: &Path) -> Result<LoadedBundle> {
    let metadata = fs::metadata(source).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            RulekitError::BundleNotFound {
                path: source.display().to_string(),
            }
        } else {
            RulekitError::FileReadFailed {
                path: source.display().to_string(),
                reason: e.to_string(),
            }
        }
    })?;

    let loaded = if metadata.is_dir() {
        load_directory(source)?
    } else {
        load_manifest(source)?
    };

    for file in &loaded.files {
        super::verify_checksum(file)?;
    }

    tracing::debug!(
        slug = %loaded.slug,
        files = loaded.files.len(),
        "loaded bundle from {}",
        source.display()
    );

    Ok(loaded)
}

fn load_directory(root: &Path) -> Result<LoadedBundle> {
    let mut files = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || e.file_name() != ".git");

    for entry in walker {
        let entry = entry.map_err(|e| RulekitError::FileReadFailed {
            path: root.display().to_string(),
            reason: e.to_string(),
        })?;

        if entry.file_type().is_symlink() {
            tracing::warn!("skipping symlink in bundle: {}", entry.path().display());
            continue;
        }
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(root)
            .map_err(|_| RulekitError::MalformedBundle {
                message: format!("{} is outside the bundle", entry.path().display()),
            })?;
        let path = relative
            .components()
            .map(|c| {
                c.as_os_str()
                    .to_str()
                    .ok_or_else(|| RulekitError::MalformedBundle {
                        message: format!("{} is not a UTF-8 file name", relative.display()),
                    })
            })
            .collect::<Result<Vec<_>>>()?
            .join("/");

        let content = fs::read(entry.path()).map_err(|e| RulekitError::FileReadFailed {
            path: entry.path().display().to_string(),
            reason: e.to_string(),
        })?;

        files.push(BundleFile::new(path, content));
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));

    let slug = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "bundle".to_string());

    Ok(LoadedBundle {
        slug,
        platform: None,
        files,
    })
}

fn load_manifest(path: &Path) -> Result<LoadedBundle> {
    let content = fs::read_to_string(path).map_err(|e| RulekitError::FileReadFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let manifest: Manifest =
        serde_json::from_str(&content).map_err(|e| RulekitError::MalformedBundle {
            message: format!("{}: {}", path.display(), e),
        })?;

    let files = manifest
        .files
        .into_iter()
        .map(ManifestFile::into_bundle_file)
        .collect::<Result<Vec<_>>>()?;

    Ok(LoadedBundle {
        slug: manifest.slug,
        platform: manifest.platform,
        files,
    })
}
