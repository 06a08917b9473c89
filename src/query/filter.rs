//! Filtering predicates for gallery queries
//!
//! A [`QueryFilter`] captures the optional folder name and tag list of a
//! query. Folder matching is exact but case-insensitive; tag matching is
//! OR-semantics set membership (one shared tag qualifies a record), also
//! case-insensitive. An absent criterion matches everything.

use crate::index::{FolderRecord, ImageRecord};

/// Normalized filter criteria for one query call
///
/// Requested values are lowercased once at construction so that matching a
/// large collection does not re-normalize per record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryFilter {
    folder: Option<String>,
    tags: Vec<String>,
}

impl QueryFilter {
    /// Create a filter from an optional folder name and requested tags
    ///
    /// An empty tag slice means "no tag criterion", not "no tags".
    #[must_use]
    pub fn new(folder: Option<&str>, tags: &[String]) -> Self {
        Self {
            folder: folder.map(str::to_lowercase),
            tags: tags.iter().map(|tag| tag.to_lowercase()).collect(),
        }
    }

    /// Whether an image satisfies both the folder and the tag criterion
    #[must_use]
    pub fn matches_image(&self, image: &ImageRecord) -> bool {
        if let Some(wanted) = &self.folder {
            if image.folder.to_lowercase() != *wanted {
                return false;
            }
        }
        self.matches_tags(&image.tags)
    }

    /// Whether a folder record satisfies the tag criterion
    ///
    /// The folder-name criterion does not apply here; folder listings are
    /// only ever filtered by tags.
    #[must_use]
    pub fn matches_folder(&self, folder: &FolderRecord) -> bool {
        self.matches_tags(&folder.tags)
    }

    /// OR-semantics tag overlap; an empty criterion matches everything
    fn matches_tags(&self, tags: &[String]) -> bool {
        if self.tags.is_empty() {
            return true;
        }
        tags.iter()
            .any(|tag| self.tags.iter().any(|wanted| tag.to_lowercase() == *wanted))
    }
}
