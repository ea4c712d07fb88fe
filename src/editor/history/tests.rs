//! Unit tests for the history module.

use bevy::ecs::message::Messages;
use bevy::ecs::system::RunSystemOnce;
use bevy::prelude::*;
use std::path::PathBuf;

use super::snapshot_history::SnapshotHistory;
use super::systems::{UndoRequest, default_endpoints, handle_undo, moved_order};
use super::MAX_HISTORY_SIZE;
use crate::editor::interaction::{DownResult, EndpointDrag};
use crate::editor::view::{CurrentPhoto, SelectedAnnotation};
use crate::geometry::DisplayRect;
use crate::model::{Annotation, AnnotationDraft, ArgbColor, LengthUnit};
use crate::store::PhotoStore;
use crate::store::library::PhotoLibrary;

fn annotation(id: u64, value: f32) -> Annotation {
    Annotation {
        id,
        photo_id: 1,
        start: Vec2::new(0.2, 0.5),
        end: Vec2::new(0.8, 0.5),
        value,
        unit: LengthUnit::Centimeter,
        color: ArgbColor::RED,
        width: 5.0,
        order: 0,
    }
}

#[test]
fn test_history_starts_empty() {
    let history = SnapshotHistory::default();
    assert!(!history.can_undo(1));
    assert_eq!(history.undo_count(), 0);
}

#[test]
fn test_push_and_pop_is_last_in_first_out() {
    let mut history = SnapshotHistory::default();
    history.push(1, vec![]);
    history.push(1, vec![annotation(1, 1.0)]);

    assert!(history.can_undo(1));
    assert_eq!(history.pop_undo(1), Some(vec![annotation(1, 1.0)]));
    assert_eq!(history.pop_undo(1), Some(vec![]));
    assert_eq!(history.pop_undo(1), None);
}

#[test]
fn test_snapshots_are_independent_copies() {
    let mut history = SnapshotHistory::default();
    let mut list = vec![annotation(1, 1.0)];
    history.push(1, list.clone());
    list[0].value = 99.0;

    assert_eq!(history.pop_undo(1).unwrap()[0].value, 1.0);
}

#[test]
fn test_other_photo_has_no_undo() {
    let mut history = SnapshotHistory::default();
    history.push(1, vec![]);
    assert!(!history.can_undo(2));
    assert_eq!(history.pop_undo(2), None);
    // Still there for the right photo
    assert!(history.can_undo(1));
}

#[test]
fn test_switching_photo_clears_history() {
    let mut history = SnapshotHistory::default();
    history.push(1, vec![]);
    history.push(1, vec![]);
    history.clear_for(2);
    assert!(!history.can_undo(1));
    assert!(!history.can_undo(2));

    history.push(2, vec![]);
    history.push(3, vec![annotation(1, 2.0)]);
    assert!(!history.can_undo(2));
    assert_eq!(history.undo_count(), 1);
}

#[test]
fn test_history_is_capped() {
    let mut history = SnapshotHistory::default();
    for i in 0..(MAX_HISTORY_SIZE + 5) {
        history.push(1, vec![annotation(i as u64, i as f32)]);
    }
    assert_eq!(history.undo_count(), MAX_HISTORY_SIZE);

    // Oldest entries were dropped
    let mut last = None;
    while let Some(snapshot) = history.pop_undo(1) {
        last = Some(snapshot);
    }
    assert_eq!(last.unwrap()[0].id, 5);
}

#[test]
fn test_default_endpoints_follow_viewport() {
    // Photo fills the area exactly
    let area = DisplayRect::new(Vec2::new(100.0, 0.0), Vec2::new(1000.0, 800.0));
    let (start, end) = default_endpoints(Some(&area), Some(&area));
    assert!((start - Vec2::new(0.2, 0.5)).length() < 0.0001);
    assert!((end - Vec2::new(0.8, 0.5)).length() < 0.0001);
}

#[test]
fn test_default_endpoints_zoomed_in_photo() {
    // Photo twice as wide as the area and centred on it
    let area = DisplayRect::from_size(1000.0, 800.0);
    let photo = DisplayRect::new(Vec2::new(-500.0, 0.0), Vec2::new(2000.0, 800.0));
    let (start, end) = default_endpoints(Some(&area), Some(&photo));
    assert!((start - Vec2::new(0.35, 0.5)).length() < 0.0001);
    assert!((end - Vec2::new(0.65, 0.5)).length() < 0.0001);
}

#[test]
fn test_default_endpoints_are_clamped_and_have_fallback() {
    let area = DisplayRect::from_size(1000.0, 800.0);
    let small = DisplayRect::new(Vec2::new(400.0, 300.0), Vec2::new(200.0, 200.0));
    let (start, end) = default_endpoints(Some(&area), Some(&small));
    assert_eq!(start, Vec2::new(0.0, 0.5));
    assert_eq!(end, Vec2::new(1.0, 0.5));

    let (start, end) = default_endpoints(None, None);
    assert_eq!(start, Vec2::new(0.2, 0.5));
    assert_eq!(end, Vec2::new(0.8, 0.5));
}

#[test]
fn test_moved_order() {
    assert_eq!(moved_order(&[1, 2, 3], 2, true), Some(vec![2, 1, 3]));
    assert_eq!(moved_order(&[1, 2, 3], 2, false), Some(vec![1, 3, 2]));
    assert_eq!(moved_order(&[1, 2, 3], 1, true), None);
    assert_eq!(moved_order(&[1, 2, 3], 3, false), None);
    assert_eq!(moved_order(&[1, 2, 3], 9, false), None);
}

#[test]
fn test_undo_cancels_held_drag() {
    let mut library = PhotoLibrary::default();
    let photo_id = library.insert_photo(PathBuf::from("a.jpg"), 1);
    let id = library
        .insert_annotation(AnnotationDraft::new(
            photo_id,
            Vec2::new(0.2, 0.5),
            Vec2::new(0.8, 0.5),
            LengthUnit::Centimeter,
        ))
        .unwrap();
    let before = library.annotations_for(photo_id);
    let mut edited = before[0].clone();
    edited.value = 42.0;
    library.update_annotation(&edited).unwrap();

    // Grab the start handle of the edited line and move it
    let rect = DisplayRect::new(Vec2::ZERO, Vec2::new(1000.0, 500.0));
    let mut drag = EndpointDrag::default();
    let down = drag.pointer_down(&library.annotations_for(photo_id), &rect, Vec2::new(200.0, 250.0));
    assert_eq!(down, DownResult::Grabbed(id));
    assert!(drag.pointer_move(&rect, Vec2::new(300.0, 250.0)));

    let mut history = SnapshotHistory::default();
    history.push(photo_id, before.clone());
    let mut store = PhotoStore::default();
    store.library = library;

    let mut world = World::new();
    world.init_resource::<Messages<UndoRequest>>();
    world.insert_resource(store);
    world.insert_resource(history);
    world.insert_resource(drag);
    world.insert_resource(CurrentPhoto {
        photo_id: Some(photo_id),
        ..default()
    });
    world.insert_resource(SelectedAnnotation { id: Some(id) });
    world.write_message(UndoRequest);
    world.run_system_once(handle_undo).unwrap();

    let drag = world.resource_mut::<EndpointDrag>().into_inner();
    assert!(!drag.is_active());
    // Releasing now must not write the pre-undo annotation back
    assert!(drag.pointer_up().is_none());
    assert_eq!(world.resource::<PhotoStore>().library.annotations_for(photo_id), before);
}
