//! Query operations over the current snapshot
//!
//! The engine reads one snapshot from the [`IndexStore`] per call, so each
//! result is internally consistent even when a rebuild races concurrently.
//! Absent results are values (`None`, empty collections), never errors.

use std::collections::HashSet;
use std::sync::Arc;

use crate::index::{FolderRecord, ImageRecord, IndexStore, Snapshot};
use super::filter::QueryFilter;
use super::page::{Page, PageRequest};
use super::random::{RandomSource, ThreadRandom};

/// Query engine bound to an index store and a randomness source
#[derive(Clone)]
pub struct QueryEngine {
    store: Arc<IndexStore>,
    random: Arc<dyn RandomSource>,
}

impl QueryEngine {
    /// Create an engine using the thread-local randomness source
    #[must_use]
    pub fn new(store: Arc<IndexStore>) -> Self {
        Self::with_random_source(store, Arc::new(ThreadRandom))
    }

    /// Create an engine with an explicit randomness source
    #[must_use]
    pub fn with_random_source(store: Arc<IndexStore>, random: Arc<dyn RandomSource>) -> Self {
        Self { store, random }
    }

    /// Pick one image uniformly at random among those matching the filters
    ///
    /// Returns `None` when no image matches; an empty eligible set is a
    /// defined absent result, not an error.
    #[must_use]
    pub fn random_image(&self, folder: Option<&str>, tags: &[String]) -> Option<ImageRecord> {
        let snapshot = self.store.current();
        let filter = QueryFilter::new(folder, tags);
        let eligible: Vec<&ImageRecord> = snapshot
            .images
            .iter()
            .filter(|image| filter.matches_image(image))
            .collect();

        if eligible.is_empty() {
            return None;
        }
        let index = self.random.pick(eligible.len());
        Some(eligible[index].clone())
    }

    /// A page of images matching the filters, in scan order
    ///
    /// Ordering is stable across repeated calls against the same snapshot;
    /// it is not guaranteed stable across rebuilds.
    #[must_use]
    pub fn images(
        &self,
        request: PageRequest,
        folder: Option<&str>,
        tags: &[String],
    ) -> Page<ImageRecord> {
        let snapshot = self.store.current();
        let filter = QueryFilter::new(folder, tags);
        let eligible: Vec<&ImageRecord> = snapshot
            .images
            .iter()
            .filter(|image| filter.matches_image(image))
            .collect();

        Page::from_slice(&eligible, request)
    }

    /// All folders carrying at least one of the requested tags
    ///
    /// An empty tag list returns every folder.
    #[must_use]
    pub fn folders(&self, tags: &[String]) -> Vec<FolderRecord> {
        let snapshot = self.store.current();
        let filter = QueryFilter::new(None, tags);
        snapshot
            .folders
            .iter()
            .filter(|folder| filter.matches_folder(folder))
            .cloned()
            .collect()
    }

    /// Every known tag, case-insensitively de-duplicated and sorted
    ///
    /// The casing of the first occurrence in scan order wins when
    /// duplicates differ only in case.
    #[must_use]
    pub fn all_tags(&self) -> Vec<String> {
        let snapshot = self.store.current();
        let mut seen = HashSet::new();
        let mut tags: Vec<String> = Vec::new();
        for folder in &snapshot.folders {
            for tag in &folder.tags {
                if seen.insert(tag.to_lowercase()) {
                    tags.push(tag.clone());
                }
            }
        }
        tags.sort();
        tags
    }

    /// The snapshot the next query would read, for operator surfaces
    #[must_use]
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.store.current()
    }
}
