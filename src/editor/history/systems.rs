//! Edit messages and the systems that apply them with undo snapshots.

use bevy::prelude::*;
use bevy_egui::EguiContexts;

use super::snapshot_history::SnapshotHistory;
use crate::config::AppSettings;
use crate::constants::{NEW_ANNOTATION_END, NEW_ANNOTATION_START};
use crate::editor::interaction::EndpointDrag;
use crate::editor::view::{CurrentPhoto, PhotoView, SelectedAnnotation, ViewportArea};
use crate::geometry::DisplayRect;
use crate::model::{Annotation, AnnotationDraft, AnnotationId, PhotoId};
use crate::store::PhotoStore;
use crate::ui::DialogState;

/// Add a line to the current photo at the default position
#[derive(Message)]
pub struct AddAnnotationRequest;

/// Store a changed annotation (drag end or properties dialog)
#[derive(Message)]
pub struct UpdateAnnotationRequest {
    pub annotation: Annotation,
}

#[derive(Message)]
pub struct DeleteAnnotationRequest {
    pub annotation_id: AnnotationId,
}

/// New list order; must name every annotation of the photo once
#[derive(Message)]
pub struct ReorderAnnotationsRequest {
    pub photo_id: PhotoId,
    pub ordered_ids: Vec<AnnotationId>,
}

/// Restore the previous annotation list of the current photo
#[derive(Message)]
pub struct UndoRequest;

/// Normalized endpoints of a new line: 20% and 80% across the free viewport
/// area at half its height, seen through the photo's display rect.
pub fn default_endpoints(area: Option<&DisplayRect>, photo: Option<&DisplayRect>) -> (Vec2, Vec2) {
    let fallback = (
        Vec2::from(NEW_ANNOTATION_START),
        Vec2::from(NEW_ANNOTATION_END),
    );
    let (Some(area), Some(photo)) = (area, photo) else {
        return fallback;
    };

    let start = area.min + area.size * Vec2::from(NEW_ANNOTATION_START);
    let end = area.min + area.size * Vec2::from(NEW_ANNOTATION_END);
    match (photo.unmap_clamped(start), photo.unmap_clamped(end)) {
        (Some(start), Some(end)) => (start, end),
        _ => fallback,
    }
}

/// List order after moving `id` one step up (towards index 0) or down.
/// `None` when the move is not possible.
pub fn moved_order(ids: &[AnnotationId], id: AnnotationId, up: bool) -> Option<Vec<AnnotationId>> {
    let index = ids.iter().position(|&i| i == id)?;
    let target = if up {
        index.checked_sub(1)?
    } else {
        let next = index + 1;
        if next >= ids.len() {
            return None;
        }
        next
    };
    let mut reordered = ids.to_vec();
    reordered.swap(index, target);
    Some(reordered)
}

pub fn handle_add_annotation(
    mut events: MessageReader<AddAnnotationRequest>,
    current: Res<CurrentPhoto>,
    view: Res<PhotoView>,
    area: Res<ViewportArea>,
    settings: Res<AppSettings>,
    mut store: ResMut<PhotoStore>,
    mut history: ResMut<SnapshotHistory>,
    mut selected: ResMut<SelectedAnnotation>,
) {
    for _ in events.read() {
        let Some(photo_id) = current.photo_id else {
            continue;
        };
        let (start, end) = default_endpoints(area.rect.as_ref(), view.rect.as_ref());
        let snapshot = store.library.annotations_for(photo_id);
        let draft = AnnotationDraft::new(photo_id, start, end, settings.data.default_unit);

        match store.library.insert_annotation(draft) {
            Ok(id) => {
                history.push(photo_id, snapshot);
                store.mark_changed();
                selected.id = Some(id);
                debug!("Added annotation {} to photo {}", id, photo_id);
            }
            Err(e) => warn!("Add annotation failed: {}", e),
        }
    }
}

pub fn handle_update_annotation(
    mut events: MessageReader<UpdateAnnotationRequest>,
    mut store: ResMut<PhotoStore>,
    mut history: ResMut<SnapshotHistory>,
) {
    for event in events.read() {
        let Some(stored) = store.library.annotation(event.annotation.id) else {
            warn!("Update for unknown annotation {}", event.annotation.id);
            continue;
        };
        if *stored == event.annotation {
            continue;
        }
        let photo_id = stored.photo_id;
        let snapshot = store.library.annotations_for(photo_id);

        match store.library.update_annotation(&event.annotation) {
            Ok(()) => {
                history.push(photo_id, snapshot);
                store.mark_changed();
            }
            Err(e) => warn!("Update annotation failed: {}", e),
        }
    }
}

pub fn handle_delete_annotation(
    mut events: MessageReader<DeleteAnnotationRequest>,
    mut store: ResMut<PhotoStore>,
    mut history: ResMut<SnapshotHistory>,
    mut selected: ResMut<SelectedAnnotation>,
) {
    for event in events.read() {
        let Some(photo_id) = store
            .library
            .annotation(event.annotation_id)
            .map(|a| a.photo_id)
        else {
            continue;
        };
        let snapshot = store.library.annotations_for(photo_id);

        match store.library.delete_annotation(event.annotation_id) {
            Ok(_) => {
                history.push(photo_id, snapshot);
                store.mark_changed();
                if selected.id == Some(event.annotation_id) {
                    selected.id = None;
                }
            }
            Err(e) => warn!("Delete annotation failed: {}", e),
        }
    }
}

pub fn handle_reorder_annotations(
    mut events: MessageReader<ReorderAnnotationsRequest>,
    mut store: ResMut<PhotoStore>,
    mut history: ResMut<SnapshotHistory>,
) {
    for event in events.read() {
        let snapshot = store.library.annotations_for(event.photo_id);

        match store.library.reorder(event.photo_id, &event.ordered_ids) {
            Ok(()) => {
                history.push(event.photo_id, snapshot);
                store.mark_changed();
            }
            Err(e) => warn!("Reorder failed: {}", e),
        }
    }
}

pub fn handle_undo(
    mut events: MessageReader<UndoRequest>,
    current: Res<CurrentPhoto>,
    mut store: ResMut<PhotoStore>,
    mut history: ResMut<SnapshotHistory>,
    mut selected: ResMut<SelectedAnnotation>,
    mut drag: ResMut<EndpointDrag>,
) {
    for _ in events.read() {
        let Some(photo_id) = current.photo_id else {
            continue;
        };
        let Some(snapshot) = history.pop_undo(photo_id) else {
            continue;
        };

        match store.library.replace_annotations_for_photo(photo_id, &snapshot) {
            Ok(()) => {
                store.mark_changed();
                // A held drag still carries the pre-undo annotation
                if drag.is_active() {
                    drag.cancel();
                }
                if let Some(id) = selected.id
                    && store.library.annotation(id).is_none()
                {
                    selected.id = None;
                }
                debug!("Undo on photo {}, {} steps left", photo_id, history.undo_count());
            }
            Err(e) => warn!("Undo failed: {}", e),
        }
    }
}

/// System to handle undo keyboard shortcut (Ctrl+Z)
pub fn handle_undo_shortcut(
    keyboard: Res<ButtonInput<KeyCode>>,
    dialog_state: Res<DialogState>,
    mut contexts: EguiContexts,
    mut undo: MessageWriter<UndoRequest>,
) {
    let ctrl = keyboard.pressed(KeyCode::ControlLeft)
        || keyboard.pressed(KeyCode::ControlRight)
        || keyboard.pressed(KeyCode::SuperLeft)
        || keyboard.pressed(KeyCode::SuperRight);
    let shift = keyboard.pressed(KeyCode::ShiftLeft) || keyboard.pressed(KeyCode::ShiftRight);

    if !(ctrl && !shift && keyboard.just_pressed(KeyCode::KeyZ)) || dialog_state.any_modal_open {
        return;
    }

    // Text fields handle their own undo
    let typing = contexts
        .ctx_mut()
        .map(|ctx| ctx.wants_keyboard_input())
        .unwrap_or(false);
    if !typing {
        undo.write(UndoRequest);
    }
}
