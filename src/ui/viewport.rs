//! The free area between the panels where the photo is shown.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use crate::config::AppSettings;
use crate::editor::{CurrentPhoto, ViewportArea};
use crate::geometry::DisplayRect;
use crate::i18n::{Text, tr};
use crate::theme;

/// Record the space left over by the panels and show a hint when no photo is
/// open. Runs after every panel of the frame.
pub fn viewport_area_ui(
    mut contexts: EguiContexts,
    current: Res<CurrentPhoto>,
    settings: Res<AppSettings>,
    mut area: ResMut<ViewportArea>,
) -> Result {
    let ctx = contexts.ctx_mut()?;
    let free = ctx.available_rect();
    area.rect = Some(DisplayRect::new(
        Vec2::new(free.min.x, free.min.y),
        Vec2::new(free.width(), free.height()),
    ));

    if current.photo_id.is_none() {
        ctx.layer_painter(egui::LayerId::background()).text(
            free.center(),
            egui::Align2::CENTER_CENTER,
            tr(settings.locale(), Text::NoPhotoHint),
            egui::FontId::proportional(18.0),
            theme::ui::HINT_TEXT,
        );
    }
    Ok(())
}
