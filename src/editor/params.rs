//! Common SystemParam bundles to reduce parameter counts in editor systems.
//!
//! - [`PointerInput`]: mouse and touch input turned into [`PointerEvent`]s
//! - [`is_cursor_over_ui`]: check if the cursor is over egui UI (for input gating)

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::EguiContexts;

use super::interaction::PointerEvent;

/// Bundled window, mouse and touch input
#[derive(SystemParam)]
pub struct PointerInput<'w, 's> {
    pub window: Query<'w, 's, &'static Window, With<PrimaryWindow>>,
    pub mouse_button: Res<'w, ButtonInput<MouseButton>>,
    pub touches: Res<'w, Touches>,
}

impl PointerInput<'_, '_> {
    /// Cursor position in logical window pixels (y-down)
    pub fn cursor_position(&self) -> Option<Vec2> {
        self.window.single().ok()?.cursor_position()
    }

    /// Pointer events of this frame. The left mouse button and the first
    /// finger both drive the same pointer.
    pub fn events(&self) -> Vec<PointerEvent> {
        let mut events = Vec::new();

        if let Some(cursor) = self.cursor_position() {
            if self.mouse_button.just_pressed(MouseButton::Left) {
                events.push(PointerEvent::Down(cursor));
            } else if self.mouse_button.pressed(MouseButton::Left) {
                events.push(PointerEvent::Move(cursor));
            }
        }
        if self.mouse_button.just_released(MouseButton::Left) {
            events.push(PointerEvent::Up);
        }

        if let Some(touch) = self.touches.iter_just_pressed().next() {
            events.push(PointerEvent::Down(touch.position()));
        } else if let Some(touch) = self.touches.iter().next() {
            events.push(PointerEvent::Move(touch.position()));
        }
        if self.touches.iter_just_released().next().is_some()
            || self.touches.iter_just_canceled().next().is_some()
        {
            events.push(PointerEvent::Up);
        }

        events
    }
}

/// Check if the cursor is over egui UI
pub fn is_cursor_over_ui(contexts: &mut EguiContexts) -> bool {
    contexts
        .ctx_mut()
        .map(|ctx| ctx.is_pointer_over_area())
        .unwrap_or(false)
}
