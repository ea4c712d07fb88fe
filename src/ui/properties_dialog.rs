//! Dialog for editing a line's value, unit, colour and width.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use super::notifications::Notify;
use crate::config::AppSettings;
use crate::constants::STROKE_WIDTH_RANGE;
use crate::editor::UpdateAnnotationRequest;
use crate::geometry::format_value;
use crate::i18n::{Text, color_name, tr, unit_label};
use crate::model::{Annotation, LengthUnit, PaletteColor};
use crate::theme;

#[derive(Resource, Default)]
pub struct PropertiesDialogState {
    /// Working copy of the annotation being edited
    pub editing: Option<Annotation>,
    /// Raw text of the value field
    pub value_text: String,
    pub color: PaletteColor,
}

impl PropertiesDialogState {
    pub fn open(&mut self, annotation: Annotation) {
        self.value_text = format_value(annotation.value);
        self.color = PaletteColor::from_argb(annotation.color);
        self.editing = Some(annotation);
    }

    pub fn close(&mut self) {
        self.editing = None;
        self.value_text.clear();
    }

    pub fn is_open(&self) -> bool {
        self.editing.is_some()
    }
}

/// Parse a length typed by the user. Accepts a decimal comma.
pub fn parse_value(text: &str) -> Option<f32> {
    let value: f32 = text.trim().replace(',', ".").parse().ok()?;
    value.is_finite().then_some(value)
}

/// Apply the dialog fields to `annotation`. The value is kept when the text
/// does not parse; returns whether it parsed.
pub fn apply_edits(annotation: &mut Annotation, value_text: &str, color: PaletteColor) -> bool {
    annotation.color = color.argb();
    annotation.normalize();
    match parse_value(value_text) {
        Some(value) => {
            annotation.value = value;
            true
        }
        None => false,
    }
}

pub fn properties_dialog_ui(
    mut contexts: EguiContexts,
    mut state: ResMut<PropertiesDialogState>,
    settings: Res<AppSettings>,
    mut updates: MessageWriter<UpdateAnnotationRequest>,
    mut notify: MessageWriter<Notify>,
) -> Result {
    if !state.is_open() {
        return Ok(());
    }
    let locale = settings.locale();
    let mut should_save = false;
    let mut should_close = false;

    let state = &mut *state;
    let Some(annotation) = state.editing.as_mut() else {
        return Ok(());
    };

    egui::Window::new(tr(locale, Text::EditAnnotation))
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(contexts.ctx_mut()?, |ui| {
            egui::Grid::new("annotation_properties")
                .num_columns(2)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    ui.label(tr(locale, Text::Value));
                    ui.add(egui::TextEdit::singleline(&mut state.value_text).desired_width(120.0));
                    ui.end_row();

                    ui.label(tr(locale, Text::Unit));
                    egui::ComboBox::from_id_salt("annotation_unit")
                        .selected_text(unit_label(locale, annotation.unit))
                        .show_ui(ui, |ui| {
                            for unit in LengthUnit::ALL {
                                ui.selectable_value(&mut annotation.unit, unit, unit_label(locale, unit));
                            }
                        });
                    ui.end_row();

                    ui.label(tr(locale, Text::Color));
                    ui.horizontal(|ui| {
                        for color in PaletteColor::ALL {
                            ui.radio_value(
                                &mut state.color,
                                color,
                                egui::RichText::new(color_name(locale, color))
                                    .color(theme::argb_to_egui(color.argb())),
                            );
                        }
                    });
                    ui.end_row();

                    ui.label(tr(locale, Text::Width));
                    let (min, max) = STROKE_WIDTH_RANGE;
                    ui.add(egui::Slider::new(&mut annotation.width, min..=max).step_by(1.0));
                    ui.end_row();
                });

            ui.add_space(12.0);
            ui.horizontal(|ui| {
                if ui.button(tr(locale, Text::Save)).clicked() {
                    should_save = true;
                }
                if ui.button(tr(locale, Text::Cancel)).clicked() {
                    should_close = true;
                }
            });
        });

    if should_save {
        let mut edited = annotation.clone();
        if !apply_edits(&mut edited, &state.value_text, state.color) {
            notify.write(Notify::error(tr(locale, Text::InvalidNumber)));
        }
        updates.write(UpdateAnnotationRequest { annotation: edited });
        should_close = true;
    }

    if should_close {
        state.close();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ArgbColor;
    use bevy::math::Vec2;

    fn annotation() -> Annotation {
        Annotation {
            id: 3,
            photo_id: 1,
            start: Vec2::new(0.2, 0.5),
            end: Vec2::new(0.8, 0.5),
            value: 4.5,
            unit: LengthUnit::Centimeter,
            color: ArgbColor(0xFF123456),
            width: 5.0,
            order: 0,
        }
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("12.5"), Some(12.5));
        assert_eq!(parse_value(" 7 "), Some(7.0));
        assert_eq!(parse_value("3,25"), Some(3.25));
        assert_eq!(parse_value(""), None);
        assert_eq!(parse_value("abc"), None);
        assert_eq!(parse_value("inf"), None);
        assert_eq!(parse_value("NaN"), None);
    }

    #[test]
    fn test_open_prefills_fields() {
        let mut state = PropertiesDialogState::default();
        state.open(annotation());
        assert!(state.is_open());
        assert_eq!(state.value_text, "4.5");
        // Unknown colours show as red
        assert_eq!(state.color, PaletteColor::Red);

        state.close();
        assert!(!state.is_open());
    }

    #[test]
    fn test_invalid_value_keeps_previous() {
        let mut edited = annotation();
        assert!(!apply_edits(&mut edited, "twelve", PaletteColor::Blue));
        assert_eq!(edited.value, 4.5);
        assert_eq!(edited.color, ArgbColor::BLUE);
    }

    #[test]
    fn test_valid_value_is_applied() {
        let mut edited = annotation();
        edited.width = 0.2;
        assert!(apply_edits(&mut edited, "30", PaletteColor::Green));
        assert_eq!(edited.value, 30.0);
        assert_eq!(edited.color, ArgbColor::GREEN);
        assert_eq!(edited.width, 1.0);
    }
}
