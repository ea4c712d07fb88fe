//! One-off notice dialogs: settings reset and unreadable library.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use crate::config::{AppSettings, ConfigResetNotification};
use crate::i18n::{Text, tr};
use crate::store::LibraryLoadError;
use crate::theme;

/// Tell the user their settings file was replaced by defaults
pub fn config_reset_notification_ui(
    mut contexts: EguiContexts,
    mut notification: ResMut<ConfigResetNotification>,
    settings: Res<AppSettings>,
) -> Result {
    if !notification.show {
        return Ok(());
    }
    let locale = settings.locale();

    egui::Window::new(tr(locale, Text::SettingsReset))
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(contexts.ctx_mut()?, |ui| {
            if let Some(ref reason) = notification.reason {
                ui.label(egui::RichText::new(reason).color(theme::ui::HINT_TEXT));
                ui.add_space(8.0);
            }
            if ui.button(tr(locale, Text::Ok)).clicked() {
                notification.show = false;
                notification.reason = None;
            }
        });
    Ok(())
}

/// Report a library file that could not be read
pub fn library_load_error_ui(
    mut contexts: EguiContexts,
    mut load_error: ResMut<LibraryLoadError>,
    settings: Res<AppSettings>,
) -> Result {
    let Some(message) = load_error.message.clone() else {
        return Ok(());
    };
    let locale = settings.locale();

    egui::Window::new(tr(locale, Text::LibraryLoadFailed))
        .collapsible(false)
        .resizable(true)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(contexts.ctx_mut()?, |ui| {
            ui.colored_label(theme::ui::ERROR_TEXT, message);
            ui.add_space(8.0);
            if ui.button(tr(locale, Text::Ok)).clicked() {
                load_error.message = None;
            }
        });
    Ok(())
}
