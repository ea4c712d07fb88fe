//! Left panel: the photo library with thumbnails.

use std::path::PathBuf;

use bevy::prelude::*;
use bevy::tasks::{AsyncComputeTaskPool, Task};
use bevy_egui::{EguiContexts, egui};
use futures_lite::future;

use crate::config::AppSettings;
use crate::constants::THUMBNAIL_SIZE;
use crate::editor::{CurrentPhoto, OpenPhotoRequest};
use crate::export::{ExportPhotoRequest, ThumbnailCache};
use crate::i18n::{Locale, Text, tr};
use crate::model::{Photo, PhotoId};
use crate::store::{DeletePhotoRequest, ImportPhotoRequest, PhotoStore};
use crate::theme;

/// Displayed thumbnail edge length in the list
const LIST_THUMBNAIL_SIZE: f32 = THUMBNAIL_SIZE as f32 * 0.5;

/// Extensions offered by the add-photo dialog
const PHOTO_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "bmp", "tif", "tiff", "gif"];

#[derive(Resource, Default)]
pub struct PhotosPanelState {
    /// Native file dialog in flight
    pub pending_pick: Option<Task<Option<Vec<PathBuf>>>>,
    /// Photo waiting for delete confirmation
    pub confirm_delete: Option<PhotoId>,
}

/// What the user clicked in a photo row
enum RowAction {
    Open,
    Export,
    Delete,
}

fn photo_row(
    ui: &mut egui::Ui,
    photo: &Photo,
    annotation_count: usize,
    is_current: bool,
    thumbnails: &ThumbnailCache,
    locale: Locale,
) -> Option<RowAction> {
    let mut action = None;
    let border = if is_current {
        theme::ui::SELECTED_BORDER
    } else {
        theme::ui::UNSELECTED_BORDER
    };

    egui::Frame::new()
        .stroke(egui::Stroke::new(1.0, border))
        .corner_radius(4.0)
        .inner_margin(egui::Margin::same(6))
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                let size = egui::vec2(LIST_THUMBNAIL_SIZE, LIST_THUMBNAIL_SIZE);
                let thumb = if let Some(texture_id) = thumbnails.texture(photo.id) {
                    ui.add(
                        egui::Image::new(egui::load::SizedTexture::new(texture_id, size))
                            .maintain_aspect_ratio(true)
                            .fit_to_exact_size(size)
                            .corner_radius(2.0)
                            .sense(egui::Sense::click()),
                    )
                } else {
                    let (rect, response) = ui.allocate_exact_size(size, egui::Sense::click());
                    ui.painter().rect_filled(rect, 2.0, theme::ui::THUMBNAIL_PLACEHOLDER);
                    response
                };
                if thumb.clicked() {
                    action = Some(RowAction::Open);
                }

                ui.vertical(|ui| {
                    let name = egui::RichText::new(photo.display_name()).strong();
                    let name = if thumbnails.has_failed(photo.id) {
                        name.color(theme::ui::ERROR_TEXT)
                    } else {
                        name
                    };
                    ui.label(name);
                    ui.label(
                        egui::RichText::new(photo.created_label())
                            .color(theme::ui::HINT_TEXT)
                            .small(),
                    );
                    ui.label(
                        egui::RichText::new(format!(
                            "{} {}",
                            annotation_count,
                            tr(locale, Text::AnnotationCount)
                        ))
                        .color(theme::ui::LABEL_TEXT)
                        .small(),
                    );

                    ui.horizontal(|ui| {
                        if ui.small_button(tr(locale, Text::Open)).clicked() {
                            action = Some(RowAction::Open);
                        }
                        if ui.small_button(tr(locale, Text::Export)).clicked() {
                            action = Some(RowAction::Export);
                        }
                        if ui.small_button(tr(locale, Text::Delete)).clicked() {
                            action = Some(RowAction::Delete);
                        }
                    });
                });
            });
        });

    action
}

/// Photo list with add / open / export / delete
#[allow(clippy::too_many_arguments)]
pub fn photos_panel_ui(
    mut contexts: EguiContexts,
    mut state: ResMut<PhotosPanelState>,
    store: Res<PhotoStore>,
    current: Res<CurrentPhoto>,
    thumbnails: Res<ThumbnailCache>,
    settings: Res<AppSettings>,
    mut import: MessageWriter<ImportPhotoRequest>,
    mut open: MessageWriter<OpenPhotoRequest>,
    mut export: MessageWriter<ExportPhotoRequest>,
) -> Result {
    let locale = settings.locale();

    // Poll the file dialog (before drawing so the button re-enables this frame)
    if let Some(ref mut task) = state.pending_pick
        && let Some(result) = future::block_on(future::poll_once(task))
    {
        state.pending_pick = None;
        for source in result.unwrap_or_default() {
            import.write(ImportPhotoRequest { source });
        }
    }

    let mut should_pick = false;

    egui::SidePanel::left("photos_panel")
        .default_width(300.0)
        .min_width(220.0)
        .show(contexts.ctx_mut()?, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.heading(tr(locale, Text::Photos));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui
                        .add_enabled(
                            state.pending_pick.is_none(),
                            egui::Button::new(tr(locale, Text::AddPhoto)),
                        )
                        .clicked()
                    {
                        should_pick = true;
                    }
                });
            });
            ui.separator();

            let photos = store.library.photos_newest_first();
            if photos.is_empty() {
                ui.label(
                    egui::RichText::new(tr(locale, Text::NoPhotos))
                        .color(theme::ui::HINT_TEXT)
                        .italics(),
                );
                return;
            }

            egui::ScrollArea::vertical().show(ui, |ui| {
                for photo in photos {
                    let count = store.library.annotation_count(photo.id);
                    let is_current = current.photo_id == Some(photo.id);
                    match photo_row(ui, photo, count, is_current, &thumbnails, locale) {
                        Some(RowAction::Open) => {
                            open.write(OpenPhotoRequest { photo_id: photo.id });
                        }
                        Some(RowAction::Export) => {
                            export.write(ExportPhotoRequest { photo_id: photo.id });
                        }
                        Some(RowAction::Delete) => state.confirm_delete = Some(photo.id),
                        None => {}
                    }
                    ui.add_space(4.0);
                }
            });
        });

    if should_pick && state.pending_pick.is_none() {
        let title = tr(locale, Text::AddPhoto);
        state.pending_pick = Some(AsyncComputeTaskPool::get().spawn(async move {
            rfd::AsyncFileDialog::new()
                .set_title(title)
                .add_filter("Images", PHOTO_EXTENSIONS)
                .pick_files()
                .await
                .map(|files| files.iter().map(|f| f.path().to_path_buf()).collect())
        }));
    }

    Ok(())
}

/// Confirmation before a photo and its annotations are deleted
pub fn delete_photo_dialog_ui(
    mut contexts: EguiContexts,
    mut state: ResMut<PhotosPanelState>,
    settings: Res<AppSettings>,
    mut delete: MessageWriter<DeletePhotoRequest>,
) -> Result {
    let Some(photo_id) = state.confirm_delete else {
        return Ok(());
    };
    let locale = settings.locale();

    egui::Window::new(tr(locale, Text::DeletePhotoTitle))
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(contexts.ctx_mut()?, |ui| {
            ui.label(tr(locale, Text::DeletePhotoConfirm));
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui
                    .button(egui::RichText::new(tr(locale, Text::Delete)).color(theme::ui::ERROR_TEXT))
                    .clicked()
                {
                    delete.write(DeletePhotoRequest { photo_id });
                    state.confirm_delete = None;
                }
                if ui.button(tr(locale, Text::Cancel)).clicked() {
                    state.confirm_delete = None;
                }
            });
        });
    Ok(())
}
