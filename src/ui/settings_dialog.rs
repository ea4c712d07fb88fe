use bevy::prelude::*;
use bevy::tasks::{AsyncComputeTaskPool, Task};
use bevy_egui::{EguiContexts, egui};
use futures_lite::future;
use std::path::PathBuf;

use crate::config::{AppSettings, SettingsData, UpdateSettingsRequest};
use crate::constants::MAX_EXPORT_SCALE_RANGE;
use crate::i18n::{Language, Text, language_name, tr, unit_label, style_name};
use crate::model::{EndpointStyle, LengthUnit};

/// State for the settings dialog
#[derive(Resource, Default)]
pub struct SettingsDialogState {
    /// Whether the dialog is open
    pub is_open: bool,
    /// Edited copy of the settings
    pub draft: SettingsData,
    /// Pending async file dialog for picking a label font
    pub pending_browse: Option<Task<Option<PathBuf>>>,
}

impl SettingsDialogState {
    /// Open the dialog with a fresh copy of the current settings
    pub fn open(&mut self, settings: &AppSettings) {
        self.draft = settings.data.clone();
        self.is_open = true;
    }

    fn has_changes(&self, settings: &AppSettings) -> bool {
        self.draft != settings.data
    }
}

/// Renders the settings dialog
pub fn settings_dialog_ui(
    mut contexts: EguiContexts,
    mut dialog_state: ResMut<SettingsDialogState>,
    settings: Res<AppSettings>,
    mut update_events: MessageWriter<UpdateSettingsRequest>,
) -> Result {
    // Poll pending browse task (before early return so cleanup happens even if closed)
    if let Some(ref mut task) = dialog_state.pending_browse
        && let Some(result) = future::block_on(future::poll_once(task))
    {
        dialog_state.pending_browse = None;
        if let Some(path) = result {
            dialog_state.draft.label_font = Some(path);
        }
    }

    if !dialog_state.is_open {
        return Ok(());
    }

    // Strings follow the saved language, not the one being picked
    let locale = settings.locale();
    let has_changes = dialog_state.has_changes(&settings);
    let mut should_close = false;
    let mut should_save = false;
    let mut should_browse = false;

    egui::Window::new(tr(locale, Text::Settings))
        .collapsible(false)
        .resizable(false)
        .min_width(360.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(contexts.ctx_mut()?, |ui| {
            let draft = &mut dialog_state.draft;

            egui::Grid::new("settings_grid")
                .num_columns(2)
                .spacing([16.0, 10.0])
                .show(ui, |ui| {
                    ui.label(tr(locale, Text::EndpointStyle));
                    ui.horizontal(|ui| {
                        for style in EndpointStyle::ALL {
                            ui.radio_value(&mut draft.endpoint_style, style, style_name(locale, style));
                        }
                    });
                    ui.end_row();

                    ui.label(tr(locale, Text::Language));
                    egui::ComboBox::from_id_salt("settings_language")
                        .selected_text(language_name(locale, draft.language))
                        .show_ui(ui, |ui| {
                            for language in Language::ALL {
                                ui.selectable_value(
                                    &mut draft.language,
                                    language,
                                    language_name(locale, language),
                                );
                            }
                        });
                    ui.end_row();

                    ui.label(tr(locale, Text::ExportScaleCap));
                    let (min, max) = MAX_EXPORT_SCALE_RANGE;
                    ui.add(
                        egui::Slider::new(&mut draft.max_export_scale, min..=max)
                            .step_by(0.1)
                            .suffix("×"),
                    );
                    ui.end_row();

                    ui.label(tr(locale, Text::DefaultUnit));
                    egui::ComboBox::from_id_salt("settings_unit")
                        .selected_text(unit_label(locale, draft.default_unit))
                        .show_ui(ui, |ui| {
                            for unit in LengthUnit::ALL {
                                ui.selectable_value(&mut draft.default_unit, unit, unit_label(locale, unit));
                            }
                        });
                    ui.end_row();

                    ui.label(tr(locale, Text::ShowIds));
                    ui.checkbox(&mut draft.show_ids, "");
                    ui.end_row();

                    ui.label(tr(locale, Text::LabelFont));
                    ui.horizontal(|ui| {
                        let shown = draft
                            .label_font
                            .as_ref()
                            .and_then(|p| p.file_name())
                            .map(|n| n.to_string_lossy().to_string())
                            .unwrap_or_else(|| tr(locale, Text::SystemFont).to_string());
                        ui.label(egui::RichText::new(shown).weak());
                        if ui.button(tr(locale, Text::Browse)).clicked() {
                            should_browse = true;
                        }
                        if ui
                            .add_enabled(draft.label_font.is_some(), egui::Button::new(tr(locale, Text::Clear)))
                            .clicked()
                        {
                            draft.label_font = None;
                        }
                    });
                    ui.end_row();
                });

            ui.add_space(16.0);

            // Action buttons
            ui.horizontal(|ui| {
                if ui
                    .add_enabled(has_changes, egui::Button::new(tr(locale, Text::Save)))
                    .clicked()
                {
                    should_save = true;
                }

                if ui.button(tr(locale, Text::Cancel)).clicked() {
                    should_close = true;
                }
            });
        });

    // Handle browse button - spawn async dialog
    if should_browse && dialog_state.pending_browse.is_none() {
        let title = tr(locale, Text::LabelFont);
        dialog_state.pending_browse = Some(AsyncComputeTaskPool::get().spawn(async move {
            rfd::AsyncFileDialog::new()
                .set_title(title)
                .add_filter("Fonts", &["ttf", "otf", "ttc"])
                .pick_file()
                .await
                .map(|h| h.path().to_path_buf())
        }));
    }

    if should_save {
        update_events.write(UpdateSettingsRequest {
            data: dialog_state.draft.clone(),
        });
        should_close = true;
    }

    if should_close {
        dialog_state.is_open = false;
        dialog_state.pending_browse = None;
    }

    Ok(())
}
