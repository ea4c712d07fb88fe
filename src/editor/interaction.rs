//! Dragging annotation endpoints with the mouse or a finger.

use bevy::prelude::*;
use bevy_egui::EguiContexts;

use super::history::UpdateAnnotationRequest;
use super::params::{PointerInput, is_cursor_over_ui};
use super::view::{CurrentPhoto, PhotoView, SelectedAnnotation};
use crate::constants::TOUCH_THRESHOLD;
use crate::geometry::{DisplayRect, EndpointHandle, hit_test_body, hit_test_endpoints};
use crate::model::{Annotation, AnnotationId};
use crate::store::PhotoStore;
use crate::ui::DialogState;

/// Pointer input in logical screen pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(Vec2),
    Move(Vec2),
    Up,
}

/// Outcome of a pointer press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownResult {
    /// An endpoint handle was grabbed; the press belongs to the drag
    Grabbed(AnnotationId),
    /// The line body was hit; the press may still pan the camera
    BodyHit(AnnotationId),
    Miss,
}

#[derive(Debug, Clone)]
struct ActiveDrag {
    handle: EndpointHandle,
    original: Annotation,
    current: Annotation,
}

/// Endpoint drag in progress.
///
/// Moves only change a private preview copy. The store sees one update when
/// the pointer is released, so an undo snapshot taken then still holds the
/// pre-drag endpoints.
#[derive(Resource, Default, Debug)]
pub struct EndpointDrag {
    active: Option<ActiveDrag>,
}

impl EndpointDrag {
    /// Hit-test a press against `annotations` (ascending z-order).
    pub fn pointer_down(&mut self, annotations: &[Annotation], rect: &DisplayRect, point: Vec2) -> DownResult {
        self.active = None;

        if let Some((id, handle)) = hit_test_endpoints(annotations, rect, point, TOUCH_THRESHOLD)
            && let Some(annotation) = annotations.iter().find(|a| a.id == id)
        {
            self.active = Some(ActiveDrag {
                handle,
                original: annotation.clone(),
                current: annotation.clone(),
            });
            return DownResult::Grabbed(id);
        }

        match hit_test_body(annotations, rect, point, 1.0) {
            Some(id) => DownResult::BodyHit(id),
            None => DownResult::Miss,
        }
    }

    /// Follow the pointer. Returns whether a drag consumed the move.
    pub fn pointer_move(&mut self, rect: &DisplayRect, point: Vec2) -> bool {
        let Some(drag) = self.active.as_mut() else {
            return false;
        };
        if let Some(normalized) = rect.unmap_clamped(point) {
            drag.current.set_endpoint(drag.handle, normalized);
        }
        true
    }

    /// End the drag. Returns the changed annotation, or `None` when nothing
    /// was dragged or the endpoint did not move.
    pub fn pointer_up(&mut self) -> Option<Annotation> {
        let drag = self.active.take()?;
        (drag.current != drag.original).then_some(drag.current)
    }

    /// The annotation as it looks mid-drag
    pub fn preview(&self) -> Option<&Annotation> {
        self.active.as_ref().map(|drag| &drag.current)
    }

    pub fn cancel(&mut self) {
        self.active = None;
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }
}

/// How the current press is being used outside of endpoint drags
#[derive(Resource, Default, Debug)]
pub struct PointerState {
    /// Press started on the photo without grabbing a handle
    pub panning: bool,
    /// Cursor is over an egui panel or window
    pub over_ui: bool,
}

/// Turn mouse and touch input into endpoint drags and selection changes
#[allow(clippy::too_many_arguments)]
pub fn handle_pointer_input(
    input: PointerInput,
    dialog_state: Res<DialogState>,
    mut contexts: EguiContexts,
    current: Res<CurrentPhoto>,
    view: Res<PhotoView>,
    store: Res<PhotoStore>,
    mut drag: ResMut<EndpointDrag>,
    mut pointer: ResMut<PointerState>,
    mut selected: ResMut<SelectedAnnotation>,
    mut updates: MessageWriter<UpdateAnnotationRequest>,
) {
    pointer.over_ui = is_cursor_over_ui(&mut contexts);

    let (Some(photo_id), Some(rect)) = (current.photo_id, view.rect) else {
        drag.cancel();
        pointer.panning = false;
        return;
    };

    for event in input.events() {
        match event {
            PointerEvent::Down(point) => {
                if pointer.over_ui || dialog_state.any_modal_open {
                    continue;
                }
                let annotations = store.library.annotations_for(photo_id);
                match drag.pointer_down(&annotations, &rect, point) {
                    DownResult::Grabbed(id) => {
                        selected.id = Some(id);
                        pointer.panning = false;
                    }
                    DownResult::BodyHit(id) => {
                        selected.id = Some(id);
                        pointer.panning = true;
                    }
                    DownResult::Miss => pointer.panning = true,
                }
            }
            PointerEvent::Move(point) => {
                drag.pointer_move(&rect, point);
            }
            PointerEvent::Up => {
                pointer.panning = false;
                if let Some(annotation) = drag.pointer_up() {
                    debug!("Endpoint drag finished on annotation {}", annotation.id);
                    updates.write(UpdateAnnotationRequest { annotation });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ArgbColor, LengthUnit};

    fn rect() -> DisplayRect {
        DisplayRect::new(Vec2::new(100.0, 100.0), Vec2::new(1000.0, 500.0))
    }

    fn line(id: AnnotationId, order: u32, start: Vec2, end: Vec2) -> Annotation {
        Annotation {
            id,
            photo_id: 1,
            start,
            end,
            value: 10.0,
            unit: LengthUnit::Centimeter,
            color: ArgbColor::RED,
            width: 5.0,
            order,
        }
    }

    fn sample() -> Vec<Annotation> {
        vec![line(1, 0, Vec2::new(0.2, 0.5), Vec2::new(0.8, 0.5))]
    }

    #[test]
    fn test_down_on_handle_grabs() {
        let mut drag = EndpointDrag::default();
        // Start handle sits at (300, 350)
        let result = drag.pointer_down(&sample(), &rect(), Vec2::new(310.0, 355.0));
        assert_eq!(result, DownResult::Grabbed(1));
        assert!(drag.is_active());
    }

    #[test]
    fn test_down_on_body_selects_without_drag() {
        let mut drag = EndpointDrag::default();
        let result = drag.pointer_down(&sample(), &rect(), Vec2::new(600.0, 352.0));
        assert_eq!(result, DownResult::BodyHit(1));
        assert!(!drag.is_active());
    }

    #[test]
    fn test_down_elsewhere_misses() {
        let mut drag = EndpointDrag::default();
        let result = drag.pointer_down(&sample(), &rect(), Vec2::new(600.0, 500.0));
        assert_eq!(result, DownResult::Miss);
        assert!(!drag.pointer_move(&rect(), Vec2::new(0.0, 0.0)));
        assert_eq!(drag.pointer_up(), None);
    }

    #[test]
    fn test_move_previews_and_up_emits_once() {
        let mut drag = EndpointDrag::default();
        let annotations = sample();
        drag.pointer_down(&annotations, &rect(), Vec2::new(905.0, 350.0));

        assert!(drag.pointer_move(&rect(), Vec2::new(1100.0, 600.0)));
        let preview = drag.preview().unwrap();
        assert!((preview.end - Vec2::new(1.0, 1.0)).length() < 0.0001);
        // Stored annotation untouched
        assert_eq!(annotations[0].end, Vec2::new(0.8, 0.5));

        let updated = drag.pointer_up().unwrap();
        assert_eq!(updated.id, 1);
        assert!((updated.end - Vec2::new(1.0, 1.0)).length() < 0.0001);
        assert_eq!(updated.start, Vec2::new(0.2, 0.5));
        assert_eq!(drag.pointer_up(), None);
    }

    #[test]
    fn test_drag_is_clamped_to_photo() {
        let mut drag = EndpointDrag::default();
        drag.pointer_down(&sample(), &rect(), Vec2::new(300.0, 350.0));
        drag.pointer_move(&rect(), Vec2::new(-500.0, -500.0));
        assert_eq!(drag.pointer_up().unwrap().start, Vec2::ZERO);
    }

    #[test]
    fn test_drag_without_movement_emits_nothing() {
        let mut drag = EndpointDrag::default();
        drag.pointer_down(&sample(), &rect(), Vec2::new(300.0, 350.0));
        drag.pointer_move(&rect(), Vec2::new(300.0, 350.0));
        assert_eq!(drag.pointer_up(), None);
        assert!(!drag.is_active());
    }

    #[test]
    fn test_topmost_handle_wins() {
        let mut drag = EndpointDrag::default();
        let annotations = vec![
            line(1, 0, Vec2::new(0.2, 0.5), Vec2::new(0.8, 0.5)),
            line(2, 1, Vec2::new(0.2, 0.5), Vec2::new(0.2, 0.9)),
        ];
        let result = drag.pointer_down(&annotations, &rect(), Vec2::new(300.0, 350.0));
        assert_eq!(result, DownResult::Grabbed(2));
    }

    #[test]
    fn test_cancel_drops_preview() {
        let mut drag = EndpointDrag::default();
        drag.pointer_down(&sample(), &rect(), Vec2::new(300.0, 350.0));
        drag.pointer_move(&rect(), Vec2::new(500.0, 400.0));
        drag.cancel();
        assert!(drag.preview().is_none());
        assert_eq!(drag.pointer_up(), None);
    }
}
