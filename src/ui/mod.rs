mod annotations_panel;
mod dialogs;
mod fonts;
pub mod notifications;
mod photos_panel;
mod properties_dialog;
mod settings_dialog;
mod toolbar;
mod viewport;

pub use notifications::{Notify, NotifyKind};

use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

use crate::config::ConfigResetNotification;
use crate::store::LibraryLoadError;

/// Resource that tracks whether any modal dialog is currently open.
/// Editor input handlers should check this to avoid processing input
/// when the user is interacting with a dialog.
#[derive(Resource, Default)]
pub struct DialogState {
    /// True when any modal dialog is open that should block editor input
    pub any_modal_open: bool,
}

/// System to aggregate all dialog open states into a single resource.
/// Runs in First schedule before input handlers.
fn update_dialog_state(
    photos: Res<photos_panel::PhotosPanelState>,
    properties: Res<properties_dialog::PropertiesDialogState>,
    settings: Res<settings_dialog::SettingsDialogState>,
    config_reset: Res<ConfigResetNotification>,
    load_error: Res<LibraryLoadError>,
    mut dialog_state: ResMut<DialogState>,
) {
    dialog_state.any_modal_open = photos.confirm_delete.is_some()
        || photos.pending_pick.is_some()
        || properties.is_open()
        || settings.is_open
        || settings.pending_browse.is_some()
        || config_reset.show
        || load_error.message.is_some();
}

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DialogState>()
            .init_resource::<notifications::Toasts>()
            .init_resource::<photos_panel::PhotosPanelState>()
            .init_resource::<properties_dialog::PropertiesDialogState>()
            .init_resource::<settings_dialog::SettingsDialogState>()
            .init_resource::<fonts::InstalledUiFonts>()
            .add_message::<Notify>()
            .add_systems(Update, notifications::collect_notifications)
            // Fonts must be set before any text is laid out this frame
            .add_systems(EguiPrimaryContextPass, fonts::sync_ui_fonts.before(photos_panel::photos_panel_ui))
            // Side panels must render first so top panels fit between them
            // Use chain() to enforce ordering
            .add_systems(
                EguiPrimaryContextPass,
                (
                    // First: side panels
                    photos_panel::photos_panel_ui,
                    annotations_panel::annotations_panel_ui,
                )
                    .chain(),
            )
            .add_systems(
                EguiPrimaryContextPass,
                (
                    // Second: top panel, then whatever is left is the viewport
                    toolbar::toolbar_ui,
                    viewport::viewport_area_ui,
                )
                    .chain()
                    .after(annotations_panel::annotations_panel_ui),
            )
            .add_systems(
                EguiPrimaryContextPass,
                (
                    // Last: dialogs/overlays
                    photos_panel::delete_photo_dialog_ui,
                    properties_dialog::properties_dialog_ui,
                    settings_dialog::settings_dialog_ui,
                    dialogs::config_reset_notification_ui,
                    dialogs::library_load_error_ui,
                    notifications::toasts_ui,
                )
                    .after(viewport::viewport_area_ui),
            )
            // Update dialog state at the start of each frame
            .add_systems(First, update_dialog_state);
    }
}
