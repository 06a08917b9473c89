//! Folder scanner building index snapshots
//!
//! The scanner enumerates the immediate subdirectories of the configured
//! root as image sets; deeper nesting is never traversed. Each set yields
//! one folder record plus one image record per qualifying file, where
//! qualification is a case-insensitive extension allow-list. Folders with
//! no qualifying images are dropped entirely.
//!
//! Output order is deterministic: folders sorted by name, files sorted by
//! name within each folder. That order is the pagination contract of the
//! snapshot, so it must not depend on directory-enumeration order.
//!
//! # Error Channels
//!
//! - A missing, empty or unset root is a degraded-but-valid state: the scan
//!   succeeds with empty collections and logs a warning.
//! - Any unexpected I/O failure while enumerating aborts the whole scan
//!   with a [`ScanError`]; the caller decides what to install instead.
//! - Metadata problems are absorbed per folder by the metadata reader.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::config::Settings;
use crate::index::{FolderRecord, ImageRecord, Snapshot};
use super::error::ScanError;
use super::metadata::read_folder_tags;

/// Case-insensitive extension allow-list for image files
pub const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

/// Check whether a file name carries an allowed image extension
#[must_use]
pub fn is_image_file(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            let ext = ext.to_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
}

/// Scanner for one configured root directory
///
/// Holds the pieces of [`Settings`] the scan needs; construction never
/// touches the filesystem. Validation of the root happens per scan, so a
/// directory created after startup is picked up by the next rebuild.
pub struct Scanner {
    root: PathBuf,
    serve_prefix: String,
}

impl Scanner {
    /// Create a scanner from application settings
    #[must_use]
    pub fn new(settings: &Settings) -> Self {
        Self {
            root: settings.root_path.clone(),
            serve_prefix: settings.serve_prefix(),
        }
    }

    /// Scan the root directory and build a complete snapshot
    ///
    /// # Errors
    ///
    /// Returns [`ScanError`] on an unexpected I/O failure while enumerating
    /// directories. An absent or empty root is not an error.
    pub fn scan(&self) -> Result<Snapshot, ScanError> {
        if self.root.as_os_str().is_empty() {
            tracing::warn!("no root path configured, index will be empty");
            return Ok(Snapshot::empty());
        }
        if !self.root.is_dir() {
            tracing::warn!(root = %self.root.display(), "root path does not exist, index will be empty");
            return Ok(Snapshot::empty());
        }

        let sets = self.list_image_sets()?;

        let scanned: Result<Vec<_>, ScanError> = sets
            .par_iter()
            .map(|name| self.scan_folder(name))
            .collect();

        let mut images = Vec::new();
        let mut folders = Vec::new();
        for entry in scanned? {
            let Some((folder, mut folder_images)) = entry else {
                continue;
            };
            folders.push(folder);
            images.append(&mut folder_images);
        }

        tracing::debug!(
            folders = folders.len(),
            images = images.len(),
            "scan complete"
        );
        Ok(Snapshot::new(images, folders))
    }

    /// List the immediate subdirectory names of the root, sorted
    fn list_image_sets(&self) -> Result<Vec<String>, ScanError> {
        let entries = fs::read_dir(&self.root).map_err(|source| ScanError::DirRead {
            path: self.root.clone(),
            source,
        })?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| ScanError::EntryRead {
                path: self.root.clone(),
                source,
            })?;
            if !entry.path().is_dir() {
                continue;
            }
            match entry.file_name().to_str() {
                Some(name) => names.push(name.to_string()),
                None => {
                    tracing::warn!(entry = ?entry.file_name(), "skipping non-UTF-8 folder name");
                }
            }
        }

        names.sort();
        Ok(names)
    }

    /// Scan one image set, returning `None` if it holds no qualifying image
    fn scan_folder(
        &self,
        name: &str,
    ) -> Result<Option<(FolderRecord, Vec<ImageRecord>)>, ScanError> {
        let dir = self.root.join(name);
        let tags = read_folder_tags(&dir);

        let entries = fs::read_dir(&dir).map_err(|source| ScanError::DirRead {
            path: dir.clone(),
            source,
        })?;

        let mut file_names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| ScanError::EntryRead {
                path: dir.clone(),
                source,
            })?;
            if !entry.path().is_file() {
                continue;
            }
            let Some(file_name) = entry.file_name().to_str().map(str::to_string) else {
                tracing::warn!(entry = ?entry.file_name(), folder = name, "skipping non-UTF-8 file name");
                continue;
            };
            if is_image_file(&file_name) {
                file_names.push(file_name);
            }
        }

        if file_names.is_empty() {
            return Ok(None);
        }
        file_names.sort();

        let images: Vec<ImageRecord> = file_names
            .iter()
            .map(|file_name| {
                let relative_path = Path::new(name)
                    .join(file_name)
                    .to_string_lossy()
                    .into_owned();
                // URLs use forward slashes regardless of host conventions
                let url = format!("{}/{}/{}", self.serve_prefix, name, file_name);
                ImageRecord::new(
                    file_name.clone(),
                    relative_path,
                    url,
                    name.to_string(),
                    tags.clone(),
                )
            })
            .collect();

        let folder = FolderRecord::new(name.to_string(), name.to_string(), tags, images.len());
        Ok(Some((folder, images)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestLibrary;

    #[test]
    fn test_scan_builds_records_in_sorted_order() {
        let lib = TestLibrary::new();
        lib.add_folder("birds", &["feathered"]);
        lib.add_image("birds", "b2.png");
        lib.add_image("birds", "b1.jpg");
        lib.add_folder("ants", &[]);
        lib.add_image("ants", "a1.gif");

        let snapshot = Scanner::new(&lib.settings()).scan().unwrap();

        let folder_names: Vec<_> = snapshot.folders.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(folder_names, vec!["ants", "birds"]);

        let files: Vec<_> = snapshot.images.iter().map(|i| i.file_name.as_str()).collect();
        assert_eq!(files, vec!["a1.gif", "b1.jpg", "b2.png"]);
    }

    #[test]
    fn test_image_records_carry_folder_tags_and_urls() {
        let lib = TestLibrary::new();
        lib.add_folder("cats", &["fluffy"]);
        lib.add_image("cats", "c1.webp");

        let snapshot = Scanner::new(&lib.settings()).scan().unwrap();

        let image = &snapshot.images[0];
        assert_eq!(image.folder, "cats");
        assert_eq!(image.tags, vec!["fluffy".to_string()]);
        assert_eq!(image.url, "/images/cats/c1.webp");

        let folder = &snapshot.folders[0];
        assert_eq!(folder.image_count, 1);
        assert_eq!(folder.tags, image.tags);
    }

    #[test]
    fn test_extension_matching_is_case_insensitive() {
        let lib = TestLibrary::new();
        lib.add_folder("mixed", &[]);
        lib.add_image("mixed", "upper.JPG");
        lib.add_image("mixed", "camel.WebP");
        lib.add_image("mixed", "notes.txt");
        lib.add_image("mixed", "noext");

        let snapshot = Scanner::new(&lib.settings()).scan().unwrap();

        let files: Vec<_> = snapshot.images.iter().map(|i| i.file_name.as_str()).collect();
        assert_eq!(files, vec!["camel.WebP", "upper.JPG"]);
    }

    #[test]
    fn test_folder_without_images_is_dropped() {
        let lib = TestLibrary::new();
        lib.add_folder("empty", &["tagged-but-empty"]);
        lib.add_folder("full", &[]);
        lib.add_image("full", "f.png");

        let snapshot = Scanner::new(&lib.settings()).scan().unwrap();

        assert_eq!(snapshot.folders.len(), 1);
        assert_eq!(snapshot.folders[0].name, "full");
    }

    #[test]
    fn test_nested_directories_are_not_traversed() {
        let lib = TestLibrary::new();
        lib.add_folder("top", &[]);
        lib.add_image("top", "t.jpg");
        std::fs::create_dir(lib.root().join("top").join("nested")).unwrap();
        lib.add_image("top/nested", "hidden.png");

        let snapshot = Scanner::new(&lib.settings()).scan().unwrap();

        assert_eq!(snapshot.images.len(), 1);
        assert_eq!(snapshot.images[0].file_name, "t.jpg");
    }

    #[test]
    fn test_files_directly_in_root_are_ignored() {
        let lib = TestLibrary::new();
        lib.add_image(".", "loose.png");
        lib.add_folder("set", &[]);
        lib.add_image("set", "kept.png");

        let snapshot = Scanner::new(&lib.settings()).scan().unwrap();

        assert_eq!(snapshot.images.len(), 1);
        assert_eq!(snapshot.images[0].file_name, "kept.png");
    }

    #[test]
    fn test_missing_root_yields_empty_snapshot() {
        let lib = TestLibrary::new();
        let mut settings = lib.settings();
        settings.root_path = lib.root().join("does-not-exist");

        let snapshot = Scanner::new(&settings).scan().unwrap();

        assert!(snapshot.images.is_empty());
        assert!(snapshot.folders.is_empty());
    }

    #[test]
    fn test_unset_root_yields_empty_snapshot() {
        let settings = Settings::default();

        let snapshot = Scanner::new(&settings).scan().unwrap();

        assert!(snapshot.images.is_empty());
        assert!(snapshot.folders.is_empty());
    }

    #[test]
    fn test_is_image_file() {
        assert!(is_image_file("a.jpg"));
        assert!(is_image_file("a.JPEG"));
        assert!(is_image_file("dotted.name.png"));
        assert!(!is_image_file("a.tags.json"));
        assert!(!is_image_file("a.svg"));
        assert!(!is_image_file("png"));
    }
}
