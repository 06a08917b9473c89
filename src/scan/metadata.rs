//! Sidecar tag metadata reader
//!
//! A folder's tags live in a file directly inside it whose name ends with
//! [`TAG_FILE_SUFFIX`], containing a JSON array of strings:
//!
//! ```json
//! ["portrait", "face"]
//! ```
//!
//! Metadata problems never abort a scan. A missing, unreadable or malformed
//! sidecar degrades the folder to untagged, with a warning for anything
//! other than plain absence.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Suffix marking a file as a folder's tag metadata file
pub const TAG_FILE_SUFFIX: &str = ".tags.json";

/// Read a folder's tag list, degrading to empty on any failure
///
/// Searches the folder's immediate contents for files ending in
/// [`TAG_FILE_SUFFIX`]. When several match, the lexicographically smallest
/// file name wins; directory-enumeration order is filesystem-dependent and
/// makes a poor tie-break.
#[must_use]
pub fn read_folder_tags(folder: &Path) -> Vec<String> {
    let tag_file = match find_tag_file(folder) {
        Ok(Some(path)) => path,
        Ok(None) => return Vec::new(),
        Err(error) => {
            tracing::warn!(folder = %folder.display(), %error, "failed to look for tag metadata");
            return Vec::new();
        }
    };

    match parse_tag_file(&tag_file) {
        Ok(tags) => tags,
        Err(error) => {
            tracing::warn!(
                file = %tag_file.display(),
                %error,
                "malformed tag metadata, treating folder as untagged"
            );
            Vec::new()
        }
    }
}

/// Locate the folder's tag file, non-recursively
fn find_tag_file(folder: &Path) -> io::Result<Option<PathBuf>> {
    let mut best: Option<(String, PathBuf)> = None;

    for entry in fs::read_dir(folder)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        if !name.ends_with(TAG_FILE_SUFFIX) {
            continue;
        }
        match &best {
            Some((current, _)) if *current <= name => {}
            _ => best = Some((name, entry.path())),
        }
    }

    Ok(best.map(|(_, path)| path))
}

#[derive(Debug, thiserror::Error)]
enum TagFileError {
    #[error("{0}")]
    Read(#[from] io::Error),
    #[error("{0}")]
    Parse(#[from] serde_json::Error),
}

fn parse_tag_file(path: &Path) -> Result<Vec<String>, TagFileError> {
    let contents = fs::read_to_string(path)?;
    let tags: Vec<String> = serde_json::from_str(&contents)?;
    Ok(tags)
}
