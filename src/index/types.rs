//! Record types materialized by a scan
//!
//! These types are created only during a scan, are immutable thereafter,
//! and are discarded wholesale when the next rebuild replaces the snapshot.
//! An image's tags are a copy of its folder's tags at scan time, not a live
//! reference; later metadata edits only show up after a rebuild.
//!
//! Records serialize as camelCase for the HTTP API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One indexed image file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    /// Bare file name, e.g. `a1.jpg`
    pub file_name: String,
    /// Path relative to the configured root
    pub relative_path: String,
    /// Servable URL fragment, always forward-slash separated
    pub url: String,
    /// Name of the owning folder
    pub folder: String,
    /// Tags copied from the owning folder at scan time
    pub tags: Vec<String>,
}

impl ImageRecord {
    /// Create a new image record
    #[must_use]
    pub const fn new(
        file_name: String,
        relative_path: String,
        url: String,
        folder: String,
        tags: Vec<String>,
    ) -> Self {
        Self {
            file_name,
            relative_path,
            url,
            folder,
            tags,
        }
    }
}

/// One indexed image set
///
/// Folders with zero qualifying images are never recorded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FolderRecord {
    /// Folder name
    pub name: String,
    /// Path relative to the configured root
    pub relative_path: String,
    /// Tags parsed from the folder's sidecar metadata file
    pub tags: Vec<String>,
    /// Number of qualifying images the folder contains
    pub image_count: usize,
}

impl FolderRecord {
    /// Create a new folder record
    #[must_use]
    pub const fn new(
        name: String,
        relative_path: String,
        tags: Vec<String>,
        image_count: usize,
    ) -> Self {
        Self {
            name,
            relative_path,
            tags,
            image_count,
        }
    }
}

/// The paired collections produced by one scan pass
///
/// Queries always read one snapshot, so their results are internally
/// consistent even while a rebuild races concurrently.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// All indexed images, in scan order
    pub images: Vec<ImageRecord>,
    /// All indexed folders, in scan order
    pub folders: Vec<FolderRecord>,
    /// When this snapshot finished building
    pub built_at: DateTime<Utc>,
}

impl Snapshot {
    /// Create a snapshot stamped with the current time
    #[must_use]
    pub fn new(images: Vec<ImageRecord>, folders: Vec<FolderRecord>) -> Self {
        Self {
            images,
            folders,
            built_at: Utc::now(),
        }
    }

    /// An empty snapshot, used when no scan has succeeded yet
    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new())
    }
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;
