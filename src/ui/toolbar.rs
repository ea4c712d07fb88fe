use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use super::settings_dialog::SettingsDialogState;
use crate::config::AppSettings;
use crate::editor::{AddAnnotationRequest, CurrentPhoto, SnapshotHistory, UndoRequest};
use crate::export::ExportPhotoRequest;
use crate::i18n::{Text, tr};
use crate::store::PhotoStore;
use crate::theme;

/// Main toolbar: editing actions for the open photo and settings
#[allow(clippy::too_many_arguments)]
pub fn toolbar_ui(
    mut contexts: EguiContexts,
    current: Res<CurrentPhoto>,
    history: Res<SnapshotHistory>,
    store: Res<PhotoStore>,
    settings: Res<AppSettings>,
    mut settings_dialog: ResMut<SettingsDialogState>,
    mut add: MessageWriter<AddAnnotationRequest>,
    mut undo: MessageWriter<UndoRequest>,
    mut export: MessageWriter<ExportPhotoRequest>,
) -> Result {
    let locale = settings.locale();
    let ready = current.photo_id.is_some() && !current.loading;
    let can_undo = current.photo_id.is_some_and(|id| history.can_undo(id));

    egui::TopBottomPanel::top("main_toolbar")
        .frame(
            egui::Frame::side_top_panel(&contexts.ctx_mut()?.style())
                .inner_margin(egui::Margin::symmetric(12, 8)),
        )
        .show(contexts.ctx_mut()?, |ui| {
            ui.horizontal(|ui| {
                ui.spacing_mut().item_spacing.x = 4.0;

                let button = |text: &str| {
                    egui::Button::new(egui::RichText::new(text).size(14.0).strong())
                        .min_size(egui::vec2(0.0, 28.0))
                };

                if ui
                    .add_enabled(ready, button(tr(locale, Text::AddAnnotation)))
                    .clicked()
                {
                    add.write(AddAnnotationRequest);
                }

                if ui
                    .add_enabled(can_undo, button(tr(locale, Text::Undo)))
                    .on_hover_text("Ctrl+Z")
                    .clicked()
                {
                    undo.write(UndoRequest);
                }

                if ui
                    .add_enabled(ready, button(tr(locale, Text::Export)))
                    .clicked()
                    && let Some(photo_id) = current.photo_id
                {
                    export.write(ExportPhotoRequest { photo_id });
                }

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                if current.loading {
                    ui.label(egui::RichText::new(tr(locale, Text::Loading)).color(theme::ui::HINT_TEXT));
                } else if let Some(photo) = current.photo_id.and_then(|id| store.library.photo(id)) {
                    ui.label(egui::RichText::new(photo.display_name()).color(theme::ui::LABEL_TEXT));
                }

                // Right-aligned settings
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.add(button(tr(locale, Text::Settings))).clicked() {
                        settings_dialog.open(&settings);
                    }
                });
            });
        });
    Ok(())
}
