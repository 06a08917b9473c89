//! Testing utilities for imgr
//!
//! This module provides a `TestLibrary` fixture that builds image-set
//! directory trees inside a temporary directory, cleaned up on drop.
//!
//! Only available when compiled with `cfg(test)`.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use crate::config::Settings;

/// A temporary on-disk image library for tests
///
/// The backing directory is removed when the fixture goes out of scope,
/// ensuring tests don't leave artifacts behind.
///
/// # Examples
/// ```ignore
/// let lib = TestLibrary::new();
/// lib.add_folder("cats", &["fluffy"]);
/// lib.add_image("cats", "c1.jpg");
/// let snapshot = Scanner::new(&lib.settings()).scan().unwrap();
/// ```
pub struct TestLibrary {
    dir: TempDir,
}

impl TestLibrary {
    /// Create an empty library in a fresh temporary directory
    ///
    /// # Panics
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    /// The library's root directory
    #[must_use]
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Settings pointing at this library with test-friendly defaults
    #[must_use]
    pub fn settings(&self) -> Settings {
        Settings {
            root_path: self.root().to_path_buf(),
            bind_addr: "127.0.0.1:0".to_string(),
            ..Settings::default()
        }
    }

    /// Create an image-set folder, with a sidecar tag file when `tags` is non-empty
    ///
    /// # Panics
    /// Panics if the directory or sidecar file cannot be created.
    pub fn add_folder(&self, name: &str, tags: &[&str]) {
        let dir = self.root().join(name);
        fs::create_dir_all(&dir).expect("Failed to create folder");
        if !tags.is_empty() {
            let contents = serde_json::to_string(tags).expect("Failed to serialize tags");
            fs::write(dir.join(format!("{name}.tags.json")), contents)
                .expect("Failed to write sidecar");
        }
    }

    /// Create an image file (empty content; only the name matters to the scanner)
    ///
    /// # Panics
    /// Panics if the file cannot be created.
    pub fn add_image(&self, folder: &str, file_name: &str) {
        let dir = self.root().join(folder);
        fs::create_dir_all(&dir).expect("Failed to create folder");
        fs::write(dir.join(file_name), b"\xff\xd8\xff").expect("Failed to write image");
    }

    /// Write a sidecar file with raw contents, for malformed-metadata cases
    ///
    /// # Panics
    /// Panics if the file cannot be created.
    pub fn add_sidecar(&self, folder: &str, file_name: &str, contents: &str) {
        let dir = self.root().join(folder);
        fs::create_dir_all(&dir).expect("Failed to create folder");
        fs::write(dir.join(file_name), contents).expect("Failed to write sidecar");
    }
}

impl Default for TestLibrary {
    fn default() -> Self {
        Self::new()
    }
}
