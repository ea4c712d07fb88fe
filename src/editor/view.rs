//! The photo being edited: loading, sprite, and where it sits on screen.

use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::tasks::{IoTaskPool, Task};
use bevy::window::PrimaryWindow;
use futures_lite::future;

use super::camera::{CameraZoom, EditorCamera};
use super::history::SnapshotHistory;
use super::interaction::EndpointDrag;
use crate::config::AppSettings;
use crate::geometry::DisplayRect;
use crate::i18n::{Text, tr};
use crate::model::{AnnotationId, PhotoId};
use crate::store::{PhotoDeleted, PhotoImported, PhotoStore, files::decode_photo};
use crate::ui::Notify;

/// Request to show a photo in the viewport
#[derive(Message)]
pub struct OpenPhotoRequest {
    pub photo_id: PhotoId,
}

/// The photo shown in the viewport
#[derive(Resource, Default)]
pub struct CurrentPhoto {
    pub photo_id: Option<PhotoId>,
    /// Intrinsic pixel size once decoded
    pub size: Option<Vec2>,
    pub loading: bool,
    /// Camera should frame the photo on the next update
    pub needs_fit: bool,
}

/// Currently selected annotation
#[derive(Resource, Default)]
pub struct SelectedAnnotation {
    pub id: Option<AnnotationId>,
}

/// Screen rectangle the photo covers this frame (logical pixels, y-down)
#[derive(Resource, Default)]
pub struct PhotoView {
    pub rect: Option<DisplayRect>,
}

/// Free area between the UI panels, written by the UI each frame
#[derive(Resource, Default)]
pub struct ViewportArea {
    pub rect: Option<DisplayRect>,
}

/// Marker for the photo sprite
#[derive(Component)]
pub struct PhotoSprite;

/// Background decode of the photo file
#[derive(Component)]
pub struct DecodePhotoTask {
    photo_id: PhotoId,
    task: Task<Result<image::DynamicImage, String>>,
}

/// Screen rectangle of a photo sprite centred on the world origin.
///
/// Follows a 2D orthographic camera at `camera_pos` where one logical pixel
/// spans `scale` world units.
pub fn photo_display_rect(photo_size: Vec2, camera_pos: Vec2, scale: f32, window_size: Vec2) -> DisplayRect {
    let half = photo_size / 2.0;
    let min = Vec2::new(
        (-half.x - camera_pos.x) / scale + window_size.x / 2.0,
        window_size.y / 2.0 - (half.y - camera_pos.y) / scale,
    );
    DisplayRect::new(min, photo_size / scale)
}

/// Camera position and scale that fit the photo inside `area` with a small
/// margin, centred in it. `None` for empty sizes.
pub fn fit_camera(photo_size: Vec2, window_size: Vec2, area: &DisplayRect) -> Option<(Vec2, f32)> {
    if area.is_degenerate() || photo_size.x <= 0.0 || photo_size.y <= 0.0 {
        return None;
    }
    let scale = (photo_size.x / area.size.x).max(photo_size.y / area.size.y) * 1.05;
    let center = area.center();
    let position = Vec2::new(
        (window_size.x / 2.0 - center.x) * scale,
        (center.y - window_size.y / 2.0) * scale,
    );
    Some((position, scale))
}

/// Start decoding the requested photo and reset per-photo editor state
#[allow(clippy::too_many_arguments)]
pub fn open_photo_system(
    mut commands: Commands,
    mut events: MessageReader<OpenPhotoRequest>,
    store: Res<PhotoStore>,
    mut current: ResMut<CurrentPhoto>,
    mut selected: ResMut<SelectedAnnotation>,
    mut history: ResMut<SnapshotHistory>,
    mut drag: ResMut<EndpointDrag>,
    pending: Query<Entity, With<DecodePhotoTask>>,
) {
    // Only the last request of a frame matters
    let Some(event) = events.read().last() else {
        return;
    };
    let Some(photo) = store.library.photo(event.photo_id) else {
        warn!("Open requested for unknown photo {}", event.photo_id);
        return;
    };

    for entity in pending.iter() {
        commands.entity(entity).despawn();
    }

    if current.photo_id != Some(photo.id) {
        history.clear_for(photo.id);
        selected.id = None;
        drag.cancel();
    }

    *current = CurrentPhoto {
        photo_id: Some(photo.id),
        size: None,
        loading: true,
        needs_fit: false,
    };

    let path = photo.path.clone();
    let photo_id = photo.id;
    info!("Opening photo {} from {:?}", photo_id, path);
    let task = IoTaskPool::get().spawn(async move { decode_photo(&path).map_err(|e| e.to_string()) });
    commands.spawn(DecodePhotoTask { photo_id, task });
}

/// Polls decode tasks and swaps in the photo sprite
#[allow(clippy::too_many_arguments)]
pub fn poll_photo_decode(
    mut commands: Commands,
    mut tasks: Query<(Entity, &mut DecodePhotoTask)>,
    sprites: Query<Entity, With<PhotoSprite>>,
    mut current: ResMut<CurrentPhoto>,
    mut images: ResMut<Assets<Image>>,
    settings: Res<AppSettings>,
    mut notify: MessageWriter<Notify>,
) {
    for (entity, mut pending) in tasks.iter_mut() {
        let Some(result) = future::block_on(future::poll_once(&mut pending.task)) else {
            continue;
        };
        commands.entity(entity).despawn();

        if current.photo_id != Some(pending.photo_id) {
            continue;
        }

        match result {
            Ok(decoded) => {
                let size = Vec2::new(decoded.width() as f32, decoded.height() as f32);
                let image = Image::from_dynamic(decoded, true, RenderAssetUsages::RENDER_WORLD);
                let handle = images.add(image);

                for sprite in sprites.iter() {
                    commands.entity(sprite).despawn();
                }
                commands.spawn((Sprite::from_image(handle), Transform::default(), PhotoSprite));

                current.size = Some(size);
                current.loading = false;
                current.needs_fit = true;
                debug!("Photo {} decoded at {}x{}", pending.photo_id, size.x, size.y);
            }
            Err(e) => {
                error!("Failed to decode photo {}: {}", pending.photo_id, e);
                *current = CurrentPhoto::default();
                notify.write(Notify::error(format!(
                    "{}: {}",
                    tr(settings.locale(), Text::PhotoLoadFailed),
                    e
                )));
            }
        }
    }
}

/// Open photos as soon as they were imported
pub fn open_imported_photo(
    mut imported: MessageReader<PhotoImported>,
    mut open: MessageWriter<OpenPhotoRequest>,
) {
    if let Some(event) = imported.read().last() {
        open.write(OpenPhotoRequest {
            photo_id: event.photo_id,
        });
    }
}

/// Close the viewport when its photo was deleted
pub fn close_deleted_photo(
    mut commands: Commands,
    mut deleted: MessageReader<PhotoDeleted>,
    sprites: Query<Entity, With<PhotoSprite>>,
    mut current: ResMut<CurrentPhoto>,
    mut selected: ResMut<SelectedAnnotation>,
    mut history: ResMut<SnapshotHistory>,
    mut drag: ResMut<EndpointDrag>,
) {
    for event in deleted.read() {
        if current.photo_id != Some(event.photo_id) {
            continue;
        }
        for sprite in sprites.iter() {
            commands.entity(sprite).despawn();
        }
        *current = CurrentPhoto::default();
        selected.id = None;
        history.clear();
        drag.cancel();
    }
}

/// Recompute where the photo sits on screen
pub fn update_photo_view(
    current: Res<CurrentPhoto>,
    window: Query<&Window, With<PrimaryWindow>>,
    camera: Query<(&Transform, &CameraZoom), With<EditorCamera>>,
    mut view: ResMut<PhotoView>,
) {
    view.rect = match (current.size, window.single(), camera.single()) {
        (Some(size), Ok(window), Ok((transform, zoom))) if !current.loading => Some(photo_display_rect(
            size,
            transform.translation.truncate(),
            zoom.scale,
            window.size(),
        )),
        _ => None,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_rect_centred_camera() {
        let rect = photo_display_rect(
            Vec2::new(400.0, 200.0),
            Vec2::ZERO,
            1.0,
            Vec2::new(800.0, 600.0),
        );
        assert_eq!(rect.min, Vec2::new(200.0, 200.0));
        assert_eq!(rect.size, Vec2::new(400.0, 200.0));
    }

    #[test]
    fn test_display_rect_follows_camera_and_zoom() {
        // Camera moved right and up by 100 world units, zoomed out 2x
        let rect = photo_display_rect(
            Vec2::new(400.0, 200.0),
            Vec2::new(100.0, 100.0),
            2.0,
            Vec2::new(800.0, 600.0),
        );
        assert_eq!(rect.size, Vec2::new(200.0, 100.0));
        // Photo appears left and lower on screen
        assert_eq!(rect.min, Vec2::new(400.0 - 150.0, 300.0 - 0.0));
    }

    #[test]
    fn test_fit_camera_centres_photo_in_area() {
        let window = Vec2::new(1600.0, 900.0);
        let area = DisplayRect::new(Vec2::new(300.0, 40.0), Vec2::new(1000.0, 860.0));
        let photo = Vec2::new(4000.0, 3000.0);

        let (position, scale) = fit_camera(photo, window, &area).unwrap();
        let rect = photo_display_rect(photo, position, scale, window);

        assert!((rect.center() - area.center()).length() < 0.01);
        assert!(rect.size.x <= area.size.x + 0.01);
        assert!(rect.size.y <= area.size.y + 0.01);
    }

    #[test]
    fn test_fit_camera_rejects_empty_area() {
        let area = DisplayRect::from_size(0.0, 100.0);
        assert!(fit_camera(Vec2::ONE, Vec2::ONE, &area).is_none());
    }
}
