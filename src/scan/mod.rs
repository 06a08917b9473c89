//! Filesystem scanning for the image index
//!
//! Provides the two leaf components of the index pipeline:
//! 1. The metadata reader, which parses a folder's `.tags.json` sidecar file
//! 2. The folder scanner, which enumerates image sets one level below the
//!    root and builds the snapshot a rebuild installs

pub mod error;
pub mod metadata;
pub mod scanner;

pub use error::ScanError;
pub use metadata::{TAG_FILE_SUFFIX, read_folder_tags};
pub use scanner::{IMAGE_EXTENSIONS, Scanner};
