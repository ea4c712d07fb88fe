use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;

use super::interaction::PointerState;
use super::view::{CurrentPhoto, ViewportArea, fit_camera};
use crate::ui::DialogState;

#[derive(Component)]
pub struct EditorCamera;

#[derive(Component)]
pub struct CameraZoom {
    pub scale: f32,
}

impl Default for CameraZoom {
    fn default() -> Self {
        Self { scale: 1.0 }
    }
}

/// Zoom limits (world units per logical pixel)
const MIN_ZOOM: f32 = 0.02;
const MAX_ZOOM: f32 = 50.0;

pub fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        EditorCamera,
        CameraZoom::default(),
        Transform::from_translation(Vec3::new(0.0, 0.0, 1000.0)),
    ));
}

/// Pan with the middle button, or with the left button / one finger when the
/// press did not grab an endpoint handle.
pub fn camera_pan(
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: MessageReader<MouseMotion>,
    touches: Res<Touches>,
    pointer: Res<PointerState>,
    mut camera_query: Query<(&mut Transform, &CameraZoom), With<EditorCamera>>,
) {
    let Ok((mut transform, zoom)) = camera_query.single_mut() else {
        mouse_motion.clear();
        return;
    };

    let mouse_panning = mouse_button.pressed(MouseButton::Middle)
        || (pointer.panning && mouse_button.pressed(MouseButton::Left));

    if mouse_panning {
        for event in mouse_motion.read() {
            let delta = event.delta * zoom.scale;
            transform.translation.x -= delta.x;
            transform.translation.y += delta.y;
        }
    } else {
        mouse_motion.clear();
    }

    if pointer.panning
        && let Some(touch) = touches.iter().next()
    {
        let delta = touch.delta() * zoom.scale;
        transform.translation.x -= delta.x;
        transform.translation.y += delta.y;
    }
}

pub fn camera_zoom(
    mut scroll_events: MessageReader<MouseWheel>,
    dialog_state: Res<DialogState>,
    pointer: Res<PointerState>,
    mut camera_query: Query<&mut CameraZoom, With<EditorCamera>>,
) {
    let Ok(mut zoom) = camera_query.single_mut() else {
        return;
    };

    // Scrolling a panel must not zoom the photo
    if dialog_state.any_modal_open || pointer.over_ui {
        scroll_events.clear();
        return;
    }

    for event in scroll_events.read() {
        let scroll_amount = match event.unit {
            MouseScrollUnit::Line => event.y * 0.1,
            MouseScrollUnit::Pixel => event.y * 0.001,
        };

        // Multiplicative so zoom feels the same at every scale
        zoom.scale = (zoom.scale * (1.0 - scroll_amount)).clamp(MIN_ZOOM, MAX_ZOOM);
    }
}

pub fn apply_camera_zoom(
    mut camera_query: Query<(&CameraZoom, &mut Projection), (With<EditorCamera>, Changed<CameraZoom>)>,
) {
    for (zoom, mut projection) in camera_query.iter_mut() {
        if let Projection::Orthographic(ref mut ortho) = *projection {
            ortho.scale = zoom.scale;
        }
    }
}

/// Center a freshly loaded photo in the free area between the panels
pub fn fit_camera_to_photo(
    mut current: ResMut<CurrentPhoto>,
    area: Res<ViewportArea>,
    window: Query<&Window, With<bevy::window::PrimaryWindow>>,
    mut camera_query: Query<(&mut Transform, &mut CameraZoom), With<EditorCamera>>,
) {
    if !current.needs_fit {
        return;
    }
    let (Some(size), Ok(window)) = (current.size, window.single()) else {
        return;
    };
    let Ok((mut transform, mut zoom)) = camera_query.single_mut() else {
        return;
    };

    let window_size = window.size();
    let area = area
        .rect
        .unwrap_or(crate::geometry::DisplayRect::new(Vec2::ZERO, window_size));
    if let Some((position, scale)) = fit_camera(size, window_size, &area) {
        transform.translation.x = position.x;
        transform.translation.y = position.y;
        zoom.scale = scale.clamp(MIN_ZOOM, MAX_ZOOM);
    }
    current.needs_fit = false;
}
