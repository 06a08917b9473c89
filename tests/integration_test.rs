//! Integration tests for the imgr index pipeline
//!
//! These tests verify end-to-end behavior by building real image-set
//! directory trees in temporary directories and driving the scanner, the
//! index store and the query engine together.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;

use imgr::config::Settings;
use imgr::index::IndexStore;
use imgr::query::{PageRequest, QueryEngine};

/// Helper to create settings pointing at a temporary root
fn settings_for(root: &Path) -> Settings {
    Settings {
        root_path: root.to_path_buf(),
        ..Settings::default()
    }
}

/// Helper to create an image-set folder with optional raw sidecar contents
fn add_folder(root: &Path, name: &str, sidecar: Option<&str>) {
    let dir = root.join(name);
    fs::create_dir_all(&dir).unwrap();
    if let Some(contents) = sidecar {
        fs::write(dir.join(format!("{name}.tags.json")), contents).unwrap();
    }
}

/// Helper to create an image file
fn add_image(root: &Path, folder: &str, file_name: &str) {
    fs::write(root.join(folder).join(file_name), b"image-bytes").unwrap();
}

/// Build the two-folder library of the reference scenario:
/// folder `A` tagged ["portrait","face"] with a1.jpg and a2.png, folder `B`
/// untagged with b1.gif.
fn reference_library() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    add_folder(root, "A", Some(r#"["portrait", "face"]"#));
    add_image(root, "A", "a1.jpg");
    add_image(root, "A", "a2.png");
    add_folder(root, "B", None);
    add_image(root, "B", "b1.gif");
    dir
}

fn engine_for(root: &Path) -> QueryEngine {
    QueryEngine::new(Arc::new(IndexStore::new(&settings_for(root))))
}

#[test]
fn test_reference_scenario_folders() {
    let dir = reference_library();
    let engine = engine_for(dir.path());

    let folders = engine.folders(&[]);
    assert_eq!(folders.len(), 2);

    let a = folders.iter().find(|f| f.name == "A").unwrap();
    assert_eq!(a.tags, vec!["portrait".to_string(), "face".to_string()]);
    assert_eq!(a.image_count, 2);

    let b = folders.iter().find(|f| f.name == "B").unwrap();
    assert!(b.tags.is_empty());
    assert_eq!(b.image_count, 1);
}

#[test]
fn test_reference_scenario_tag_filtered_gallery() {
    let dir = reference_library();
    let engine = engine_for(dir.path());

    let page = engine.images(PageRequest::new(1, 20), None, &["face".to_string()]);
    assert_eq!(page.total_count, 2);
    assert_eq!(page.total_pages, 1);

    let files: Vec<_> = page.items.iter().map(|i| i.file_name.as_str()).collect();
    assert_eq!(files, vec!["a1.jpg", "a2.png"]);
}

#[test]
fn test_reference_scenario_random_from_single_image_folder() {
    let dir = reference_library();
    let engine = engine_for(dir.path());

    for _ in 0..25 {
        let image = engine.random_image(Some("B"), &[]).unwrap();
        assert_eq!(image.file_name, "b1.gif");
        assert_eq!(image.url, "/images/B/b1.gif");
    }
}

#[test]
fn test_reference_scenario_unique_tags() {
    let dir = reference_library();
    let engine = engine_for(dir.path());

    assert_eq!(
        engine.all_tags(),
        vec!["face".to_string(), "portrait".to_string()]
    );
}

#[test]
fn test_missing_root_everything_empty() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_for(&dir.path().join("never-created"));

    assert!(engine.random_image(None, &[]).is_none());
    assert_eq!(engine.images(PageRequest::new(1, 20), None, &[]).total_count, 0);
    assert!(engine.folders(&[]).is_empty());
    assert!(engine.all_tags().is_empty());
}

#[test]
fn test_scan_order_pagination_is_stable_within_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    add_folder(root, "set", None);
    for i in 0..10 {
        add_image(root, "set", &format!("img{i:02}.jpg"));
    }
    let engine = engine_for(root);

    let first_walk: Vec<String> = (1..=4)
        .flat_map(|page| {
            engine
                .images(PageRequest::new(page, 3), None, &[])
                .items
                .into_iter()
                .map(|image| image.file_name)
        })
        .collect();
    let second_walk: Vec<String> = (1..=4)
        .flat_map(|page| {
            engine
                .images(PageRequest::new(page, 3), None, &[])
                .items
                .into_iter()
                .map(|image| image.file_name)
        })
        .collect();

    assert_eq!(first_walk.len(), 10);
    assert_eq!(first_walk, second_walk);
}

#[test]
fn test_rebuild_idempotent_on_unchanged_tree() {
    let dir = reference_library();
    let store = Arc::new(IndexStore::new(&settings_for(dir.path())));

    store.rebuild().unwrap();
    let first = store.current();
    store.rebuild().unwrap();
    let second = store.current();

    assert_eq!(first.images, second.images);
    assert_eq!(first.folders, second.folders);
}

#[test]
fn test_malformed_sidecar_degrades_folder_to_untagged() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    add_folder(root, "good", Some(r#"["ok"]"#));
    add_image(root, "good", "g.jpg");
    add_folder(root, "bad", Some("not json at all"));
    add_image(root, "bad", "b.jpg");

    let engine = engine_for(root);
    let folders = engine.folders(&[]);
    assert_eq!(folders.len(), 2);

    let bad = folders.iter().find(|f| f.name == "bad").unwrap();
    assert!(bad.tags.is_empty());

    // The corrupt folder is isolated; the good one keeps its tags
    assert_eq!(engine.all_tags(), vec!["ok".to_string()]);
}

#[test]
fn test_snapshot_invariant_every_image_has_its_folder() {
    let dir = reference_library();
    let store = Arc::new(IndexStore::new(&settings_for(dir.path())));
    store.rebuild().unwrap();

    let snapshot = store.current();
    for image in &snapshot.images {
        let matches = snapshot
            .folders
            .iter()
            .filter(|folder| folder.name == image.folder)
            .count();
        assert_eq!(matches, 1, "image {} has {matches} folder records", image.file_name);
    }
}

#[test]
fn test_concurrent_reads_see_complete_snapshots() {
    let dir = reference_library();
    let mut settings = settings_for(dir.path());
    settings.cache_ttl_secs = 0; // every read rebuilds
    let store = Arc::new(IndexStore::new(&settings));

    let mut handles = Vec::new();
    for _ in 0..4 {
        let store = Arc::clone(&store);
        handles.push(std::thread::spawn(move || {
            for _ in 0..20 {
                let snapshot = store.current();
                // A half-built snapshot would break the pairing invariant
                for image in &snapshot.images {
                    assert!(snapshot.folders.iter().any(|f| f.name == image.folder));
                }
                assert_eq!(
                    snapshot.images.len(),
                    snapshot.folders.iter().map(|f| f.image_count).sum::<usize>()
                );
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }
}
