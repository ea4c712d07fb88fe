mod camera;
pub mod history;
pub mod interaction;
mod overlay;
pub mod params;
pub mod view;

pub use history::{
    AddAnnotationRequest, DeleteAnnotationRequest, ReorderAnnotationsRequest, SnapshotHistory, UndoRequest,
    UpdateAnnotationRequest,
};
pub use interaction::{EndpointDrag, PointerState};
pub use view::{CurrentPhoto, OpenPhotoRequest, PhotoView, SelectedAnnotation, ViewportArea};

use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

pub struct EditorPlugin;

impl Plugin for EditorPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CurrentPhoto>()
            .init_resource::<SelectedAnnotation>()
            .init_resource::<PhotoView>()
            .init_resource::<ViewportArea>()
            .init_resource::<EndpointDrag>()
            .init_resource::<PointerState>()
            .init_resource::<SnapshotHistory>()
            .add_message::<OpenPhotoRequest>()
            .add_message::<AddAnnotationRequest>()
            .add_message::<UpdateAnnotationRequest>()
            .add_message::<DeleteAnnotationRequest>()
            .add_message::<ReorderAnnotationsRequest>()
            .add_message::<UndoRequest>()
            .add_systems(Startup, camera::spawn_camera)
            .add_systems(
                Update,
                (
                    view::open_imported_photo,
                    view::close_deleted_photo,
                    view::open_photo_system,
                    view::poll_photo_decode,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                (
                    interaction::handle_pointer_input,
                    camera::camera_pan,
                    camera::camera_zoom,
                    camera::fit_camera_to_photo,
                    camera::apply_camera_zoom,
                    view::update_photo_view,
                )
                    .chain()
                    .after(view::poll_photo_decode),
            )
            .add_systems(
                Update,
                (
                    history::handle_undo_shortcut,
                    history::handle_add_annotation,
                    history::handle_update_annotation,
                    history::handle_delete_annotation,
                    history::handle_reorder_annotations,
                    history::handle_undo,
                )
                    .chain()
                    .after(interaction::handle_pointer_input),
            )
            .add_systems(EguiPrimaryContextPass, overlay::paint_annotation_overlay);
    }
}
