//! Scan-specific error types
//!
//! Only scan-wide failures surface as errors; they abort the rebuild and
//! degrade the index to empty collections. Per-folder metadata problems are
//! absorbed by the metadata reader (the folder becomes untagged) and never
//! reach this type.

use std::path::PathBuf;
use thiserror::Error;

/// Scan-wide hard failures
#[derive(Debug, Error)]
pub enum ScanError {
    /// A directory listing failed mid-scan
    #[error("Failed to read directory {path}: {source}")]
    DirRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A directory entry could not be read while enumerating
    #[error("Failed to read an entry of {path}: {source}")]
    EntryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
