//! Right panel: the current photo's lines in z-order.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use super::properties_dialog::PropertiesDialogState;
use crate::config::AppSettings;
use crate::editor::history::moved_order;
use crate::editor::{CurrentPhoto, DeleteAnnotationRequest, ReorderAnnotationsRequest, SelectedAnnotation};
use crate::geometry::label_text;
use crate::i18n::{Text, tr, unit_label};
use crate::model::AnnotationId;
use crate::store::PhotoStore;
use crate::theme;

enum RowAction {
    Edit(AnnotationId),
    MoveUp(AnnotationId),
    MoveDown(AnnotationId),
    Delete(AnnotationId),
}

#[allow(clippy::too_many_arguments)]
pub fn annotations_panel_ui(
    mut contexts: EguiContexts,
    current: Res<CurrentPhoto>,
    store: Res<PhotoStore>,
    settings: Res<AppSettings>,
    mut selected: ResMut<SelectedAnnotation>,
    mut properties: ResMut<PropertiesDialogState>,
    mut reorder: MessageWriter<ReorderAnnotationsRequest>,
    mut delete: MessageWriter<DeleteAnnotationRequest>,
) -> Result {
    let Some(photo_id) = current.photo_id else {
        return Ok(());
    };
    let locale = settings.locale();
    let annotations = store.library.annotations_for(photo_id);
    let mut action = None;

    egui::SidePanel::right("annotations_panel")
        .default_width(240.0)
        .min_width(200.0)
        .show(contexts.ctx_mut()?, |ui| {
            ui.add_space(6.0);
            ui.heading(tr(locale, Text::Annotations));
            ui.separator();

            if annotations.is_empty() {
                ui.label(
                    egui::RichText::new(tr(locale, Text::NoAnnotations))
                        .color(theme::ui::HINT_TEXT)
                        .italics(),
                );
                return;
            }

            let last = annotations.len() - 1;
            egui::ScrollArea::vertical().show(ui, |ui| {
                for (index, annotation) in annotations.iter().enumerate() {
                    ui.horizontal(|ui| {
                        let (swatch, _) = ui.allocate_exact_size(egui::vec2(14.0, 14.0), egui::Sense::hover());
                        ui.painter()
                            .rect_filled(swatch, 2.0, theme::argb_to_egui(annotation.color));

                        let text = format!(
                            "{}  ·  {:.0}px",
                            label_text(
                                annotation.value,
                                unit_label(locale, annotation.unit),
                                Some(index + 1)
                            ),
                            annotation.width
                        );
                        let is_selected = selected.id == Some(annotation.id);
                        if ui.selectable_label(is_selected, text).clicked() {
                            action = Some(RowAction::Edit(annotation.id));
                        }

                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui
                                .small_button("🗑")
                                .on_hover_text(tr(locale, Text::Delete))
                                .clicked()
                            {
                                action = Some(RowAction::Delete(annotation.id));
                            }
                            if ui
                                .add_enabled(index < last, egui::Button::new("⏷").small())
                                .on_hover_text(tr(locale, Text::MoveDown))
                                .clicked()
                            {
                                action = Some(RowAction::MoveDown(annotation.id));
                            }
                            if ui
                                .add_enabled(index > 0, egui::Button::new("⏶").small())
                                .on_hover_text(tr(locale, Text::MoveUp))
                                .clicked()
                            {
                                action = Some(RowAction::MoveUp(annotation.id));
                            }
                        });
                    });
                }
            });
        });

    let ids: Vec<AnnotationId> = annotations.iter().map(|a| a.id).collect();
    match action {
        Some(RowAction::Edit(id)) => {
            selected.id = Some(id);
            if let Some(annotation) = annotations.iter().find(|a| a.id == id) {
                properties.open(annotation.clone());
            }
        }
        Some(RowAction::MoveUp(id)) | Some(RowAction::MoveDown(id)) => {
            let up = matches!(action, Some(RowAction::MoveUp(_)));
            if let Some(ordered_ids) = moved_order(&ids, id, up) {
                reorder.write(ReorderAnnotationsRequest { photo_id, ordered_ids });
            }
        }
        Some(RowAction::Delete(id)) => {
            delete.write(DeleteAnnotationRequest { annotation_id: id });
        }
        None => {}
    }

    Ok(())
}
