//! Unit tests for the store module.

use bevy::math::Vec2;
use chrono::TimeZone;
use std::path::PathBuf;

use super::StoreError;
use super::files::{photo_file_name, read_library, write_library};
use super::library::PhotoLibrary;
use super::resources::PhotoStore;
use crate::model::{Annotation, AnnotationDraft, ArgbColor, LengthUnit, PhotoId};

fn draft(photo_id: PhotoId, x: f32) -> AnnotationDraft {
    AnnotationDraft::new(
        photo_id,
        Vec2::new(x, 0.5),
        Vec2::new(x + 0.1, 0.5),
        LengthUnit::Centimeter,
    )
}

fn library_with_photo() -> (PhotoLibrary, PhotoId) {
    let mut library = PhotoLibrary::default();
    let id = library.insert_photo(PathBuf::from("photos/a.jpg"), 1_000);
    (library, id)
}

fn orders(library: &PhotoLibrary, photo_id: PhotoId) -> Vec<(u64, u32)> {
    library
        .annotations_for(photo_id)
        .iter()
        .map(|a| (a.id, a.order))
        .collect()
}

fn temp_path(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join("dimensioncam_store_tests");
    std::fs::create_dir_all(&dir).unwrap();
    dir.join(name)
}

// Photos

#[test]
fn test_photos_listed_newest_first() {
    let mut library = PhotoLibrary::default();
    let old = library.insert_photo(PathBuf::from("old.jpg"), 100);
    let new = library.insert_photo(PathBuf::from("new.jpg"), 300);
    let mid = library.insert_photo(PathBuf::from("mid.jpg"), 200);

    let ids: Vec<PhotoId> = library.photos_newest_first().iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![new, mid, old]);
}

#[test]
fn test_delete_photo_cascades_to_annotations() {
    let (mut library, photo) = library_with_photo();
    let other = library.insert_photo(PathBuf::from("b.jpg"), 2_000);
    library.insert_annotation(draft(photo, 0.1)).unwrap();
    library.insert_annotation(draft(photo, 0.2)).unwrap();
    let kept = library.insert_annotation(draft(other, 0.3)).unwrap();

    let removed = library.delete_photo(photo).unwrap();
    assert_eq!(removed.id, photo);
    assert_eq!(library.annotation_count(photo), 0);
    assert!(library.annotation(kept).is_some());
    assert!(library.photo(photo).is_none());
}

#[test]
fn test_delete_missing_photo_is_an_error() {
    let mut library = PhotoLibrary::default();
    assert!(matches!(library.delete_photo(42), Err(StoreError::PhotoNotFound(42))));
}

// Annotations

#[test]
fn test_insert_assigns_dense_order() {
    let (mut library, photo) = library_with_photo();
    let a = library.insert_annotation(draft(photo, 0.1)).unwrap();
    let b = library.insert_annotation(draft(photo, 0.2)).unwrap();
    let c = library.insert_annotation(draft(photo, 0.3)).unwrap();
    assert_eq!(orders(&library, photo), vec![(a, 0), (b, 1), (c, 2)]);
}

#[test]
fn test_insert_clamps_endpoints() {
    let (mut library, photo) = library_with_photo();
    let mut d = draft(photo, 0.1);
    d.start = Vec2::new(-1.0, 2.0);
    let id = library.insert_annotation(d).unwrap();
    assert_eq!(library.annotation(id).unwrap().start, Vec2::new(0.0, 1.0));
}

#[test]
fn test_insert_for_unknown_photo_fails() {
    let mut library = PhotoLibrary::default();
    assert!(matches!(
        library.insert_annotation(draft(9, 0.1)),
        Err(StoreError::PhotoNotFound(9))
    ));
}

#[test]
fn test_update_keeps_owner_and_order() {
    let (mut library, photo) = library_with_photo();
    library.insert_annotation(draft(photo, 0.1)).unwrap();
    let id = library.insert_annotation(draft(photo, 0.2)).unwrap();

    let mut edited = library.annotation(id).unwrap().clone();
    edited.value = 42.5;
    edited.color = ArgbColor::GREEN;
    edited.end = Vec2::new(1.4, 0.5);
    edited.order = 0;
    edited.photo_id = 999;
    library.update_annotation(&edited).unwrap();

    let stored = library.annotation(id).unwrap();
    assert_eq!(stored.value, 42.5);
    assert_eq!(stored.color, ArgbColor::GREEN);
    assert_eq!(stored.end, Vec2::new(1.0, 0.5));
    assert_eq!(stored.order, 1);
    assert_eq!(stored.photo_id, photo);
}

#[test]
fn test_delete_annotation_closes_gap() {
    let (mut library, photo) = library_with_photo();
    let a = library.insert_annotation(draft(photo, 0.1)).unwrap();
    let b = library.insert_annotation(draft(photo, 0.2)).unwrap();
    let c = library.insert_annotation(draft(photo, 0.3)).unwrap();

    library.delete_annotation(b).unwrap();
    assert_eq!(orders(&library, photo), vec![(a, 0), (c, 1)]);
}

#[test]
fn test_reorder_sets_list_positions() {
    let (mut library, photo) = library_with_photo();
    let a = library.insert_annotation(draft(photo, 0.1)).unwrap();
    let b = library.insert_annotation(draft(photo, 0.2)).unwrap();
    let c = library.insert_annotation(draft(photo, 0.3)).unwrap();

    library.reorder(photo, &[c, a, b]).unwrap();
    assert_eq!(orders(&library, photo), vec![(c, 0), (a, 1), (b, 2)]);
}

#[test]
fn test_reorder_rejects_partial_lists() {
    let (mut library, photo) = library_with_photo();
    let a = library.insert_annotation(draft(photo, 0.1)).unwrap();
    library.insert_annotation(draft(photo, 0.2)).unwrap();

    assert!(matches!(
        library.reorder(photo, &[a]),
        Err(StoreError::ReorderMismatch(_))
    ));
    assert!(matches!(
        library.reorder(photo, &[a, a]),
        Err(StoreError::ReorderMismatch(_))
    ));
}

#[test]
fn test_replace_restores_snapshot() {
    let (mut library, photo) = library_with_photo();
    let a = library.insert_annotation(draft(photo, 0.1)).unwrap();
    let b = library.insert_annotation(draft(photo, 0.2)).unwrap();
    let snapshot = library.annotations_for(photo);

    library.delete_annotation(a).unwrap();
    let mut moved = library.annotation(b).unwrap().clone();
    moved.value = 7.0;
    library.update_annotation(&moved).unwrap();
    library.insert_annotation(draft(photo, 0.5)).unwrap();

    library.replace_annotations_for_photo(photo, &snapshot).unwrap();
    assert_eq!(library.annotations_for(photo), snapshot);
}

#[test]
fn test_replace_does_not_reuse_ids() {
    let (mut library, photo) = library_with_photo();
    let snapshot = vec![Annotation {
        id: 50,
        photo_id: photo,
        start: Vec2::ZERO,
        end: Vec2::ONE,
        value: 1.0,
        unit: LengthUnit::Meter,
        color: ArgbColor::RED,
        width: 3.0,
        order: 7,
    }];
    library.replace_annotations_for_photo(photo, &snapshot).unwrap();
    assert_eq!(orders(&library, photo), vec![(50, 0)]);

    let next = library.insert_annotation(draft(photo, 0.1)).unwrap();
    assert!(next > 50);
}

#[test]
fn test_repair_fixes_loaded_records() {
    let json = r#"{
        "version": 1,
        "next_photo_id": 1,
        "next_annotation_id": 1,
        "photos": [{ "id": 3, "path": "a.jpg", "created_at": 5 }],
        "annotations": [
            { "id": 8, "photo_id": 3, "start": [0.1, 0.1], "end": [2.0, 0.1],
              "value": 1.0, "unit": "cm", "color": 4294901760, "width": 5.0, "order": 4 },
            { "id": 9, "photo_id": 77, "start": [0.1, 0.1], "end": [0.2, 0.1],
              "value": 1.0, "unit": "cm", "color": 4294901760, "width": 5.0, "order": 0 }
        ]
    }"#;
    let mut library: PhotoLibrary = serde_json::from_str(json).unwrap();
    assert_eq!(library.repair(), 1);

    let list = library.annotations_for(3);
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].order, 0);
    assert_eq!(list[0].end, Vec2::new(1.0, 0.1));
    assert_eq!(library.insert_photo(PathBuf::from("b.jpg"), 6), 4);
    assert_eq!(library.insert_annotation(draft(3, 0.1)).unwrap(), 9);
}

// Files

#[test]
fn test_missing_library_file_is_empty() {
    let library = read_library(&temp_path("does_not_exist.json")).unwrap();
    assert_eq!(library, PhotoLibrary::default());
}

#[test]
fn test_library_file_round_trip() {
    let path = temp_path("round_trip.json");
    let (mut library, photo) = library_with_photo();
    library.insert_annotation(draft(photo, 0.1)).unwrap();

    write_library(&path, &library, 1).unwrap();
    let loaded = read_library(&path).unwrap();
    assert_eq!(loaded, library);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_corrupt_library_file_is_a_parse_error() {
    let path = temp_path("corrupt.json");
    std::fs::write(&path, "{ this is not json").unwrap();
    assert!(matches!(read_library(&path), Err(StoreError::Parse { .. })));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_photo_file_name_format() {
    let now = chrono::Local
        .with_ymd_and_hms(2024, 3, 9, 14, 5, 7)
        .single()
        .unwrap();
    assert_eq!(photo_file_name(now, 2, "JPG"), "IMG_20240309_140507_2.jpg");
}

#[test]
fn test_import_rejects_non_images() {
    let source = temp_path("not_an_image.jpg");
    std::fs::write(&source, b"plain text").unwrap();
    let result = super::files::import_photo_file(
        &source,
        &temp_path("imported"),
        chrono::Local::now(),
    );
    assert!(matches!(result, Err(StoreError::NotAnImage { .. })));
    let _ = std::fs::remove_file(&source);
}

#[test]
fn test_parallel_imports_get_distinct_files() {
    let dir = temp_path("parallel_import");
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    let photos_dir = dir.join("photos");
    let now = chrono::Local
        .with_ymd_and_hms(2024, 3, 9, 14, 5, 7)
        .single()
        .unwrap();

    let sources: Vec<PathBuf> = (0..8u8)
        .map(|i| {
            let source = dir.join(format!("source_{}.png", i));
            image::RgbaImage::from_pixel(4, 4, image::Rgba([i, 0, 0, 255]))
                .save(&source)
                .unwrap();
            source
        })
        .collect();

    let barrier = std::sync::Barrier::new(sources.len());
    let targets: Vec<PathBuf> = std::thread::scope(|scope| {
        let handles: Vec<_> = sources
            .iter()
            .map(|source| {
                let barrier = &barrier;
                let photos_dir = &photos_dir;
                scope.spawn(move || {
                    barrier.wait();
                    super::files::import_photo_file(source, photos_dir, now).unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let mut unique = targets.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), sources.len());

    // Every copy still holds its own source's pixels
    for (source, target) in sources.iter().zip(&targets) {
        assert_eq!(std::fs::read(source).unwrap(), std::fs::read(target).unwrap());
    }
    let _ = std::fs::remove_dir_all(&dir);
}

// Store resource

#[test]
fn test_store_write_scheduling() {
    let mut store = PhotoStore::default();
    assert!(!store.needs_write());

    store.mark_changed();
    assert!(store.needs_write());

    store.begin_write();
    assert!(!store.needs_write());

    // A change while writing waits for the current write
    store.mark_changed();
    assert!(!store.needs_write());
    store.finish_write(true);
    assert!(store.needs_write());

    store.begin_write();
    store.finish_write(true);
    assert!(!store.has_unsaved_changes());
}

#[test]
fn test_loaded_library_is_not_rewritten() {
    let mut store = PhotoStore::default();
    store.set_loaded(PhotoLibrary::default());
    assert!(!store.needs_write());
    assert!(!store.has_unsaved_changes());
}
