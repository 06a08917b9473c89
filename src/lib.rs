//! Imgr - a folder-based image index and gallery API server
//!
//! This library scans a root directory whose immediate subdirectories are
//! treated as image sets, each optionally tagged via a `.tags.json` sidecar
//! file, and answers random, paginated and tag-filtered queries from an
//! in-memory snapshot with a freshness policy.

use thiserror::Error;

pub mod cli;
pub mod config;
pub mod index;
pub mod query;
pub mod scan;
pub mod server;

#[cfg(test)]
pub mod testing;

/// Error enum, contains all failure states of the program
#[derive(Debug, Error)]
pub enum ImgrError {
    /// Scan-wide failure while rebuilding the index
    #[error("Scan error: {0}")]
    ScanError(#[from] scan::ScanError),
    /// Represents a configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ::config::ConfigError),
    /// Represents an I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    /// Failed to serialize a result for output
    #[error("Serialization error: {0}")]
    SerializeError(#[from] serde_json::Error),
    /// Server startup or shutdown failure
    #[error("Server error: {0}")]
    ServerError(String),
}
