//! Version files written for production builds.
//!
//! Each production configuration carries a version-template plugin naming
//! the file to write. The file holds a JSON stamp identifying the build.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::paths::CONTENT_HASH_PLACEHOLDER;

/// Length of the content hash substituted into version file names.
const CONTENT_HASH_LEN: usize = 8;

#[derive(Debug, thiserror::Error)]
pub enum VersionError {
    #[error("failed to write version file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize version stamp: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Options of the version-template plugin: where the file goes and whom it
/// describes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionTarget {
    /// Output-relative path, possibly containing `[contenthash]`
    pub file_path: String,
    pub no_hash: bool,
    pub journey: String,
    pub brand: String,
}

/// Content of a version file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionStamp {
    pub build_id: String,
    pub journey: String,
    pub brand: String,
    pub created_at: DateTime<Utc>,
}

impl VersionStamp {
    pub fn new(journey: &str, brand: &str) -> Self {
        Self {
            build_id: generate_build_id(),
            journey: journey.to_string(),
            brand: brand.to_string(),
            created_at: Utc::now(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Generate a build identifier using ULID (sortable, filesystem-safe)
pub fn generate_build_id() -> String {
    ulid::Ulid::new().to_string().to_lowercase()
}

/// First hex characters of the content's SHA-256.
pub fn content_hash(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    let mut digest = hex::encode(hasher.finalize());
    digest.truncate(CONTENT_HASH_LEN);
    digest
}

/// File path with the content hash placeholder filled in, unless hashing is off.
pub fn stamped_file_path(target: &VersionTarget, content: &[u8]) -> String {
    if target.no_hash {
        target.file_path.clone()
    } else {
        target
            .file_path
            .replace(CONTENT_HASH_PLACEHOLDER, &content_hash(content))
    }
}

/// Write the version file for a target under `root`, returning the written path.
pub fn write_version_file(root: &Path, target: &VersionTarget) -> Result<PathBuf, VersionError> {
    let stamp = VersionStamp::new(&target.journey, &target.brand);
    let json = stamp.to_json()?;
    let path = root.join(stamped_file_path(target, json.as_bytes()));

    let io_err = |source| VersionError::Io {
        path: path.display().to_string(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(&path, &json).map_err(io_err)?;

    tracing::info!(path = %path.display(), build_id = %stamp.build_id, "version file written");
    Ok(path)
}
