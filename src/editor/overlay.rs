//! Paints the annotations of the current photo over the viewport with egui.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use super::interaction::EndpointDrag;
use super::view::{CurrentPhoto, PhotoView, SelectedAnnotation};
use crate::config::AppSettings;
use crate::constants::CONTROL_POINT_RADIUS;
use crate::model::Annotation;
use crate::render::{AnnotationScene, LabelPrimitive, Primitive, SceneOptions};
use crate::store::PhotoStore;
use crate::theme::{self, SELECTION_RING, SELECTION_RING_WIDTH};

/// Annotations of a photo with the one being dragged swapped for its preview
pub fn annotations_with_preview(mut annotations: Vec<Annotation>, preview: Option<&Annotation>) -> Vec<Annotation> {
    if let Some(preview) = preview
        && let Some(slot) = annotations.iter_mut().find(|a| a.id == preview.id)
    {
        *slot = preview.clone();
    }
    annotations
}

/// Top-left corner of a label galley of `size`, rotated about the anchor.
///
/// Before rotation the text is centred horizontally on the anchor with its
/// bottom `baseline_offset` above it.
pub fn label_origin(anchor: Vec2, angle_degrees: f32, size: Vec2, baseline_offset: f32) -> Vec2 {
    let local = Vec2::new(-size.x / 2.0, -baseline_offset - size.y);
    anchor + Vec2::from_angle(angle_degrees.to_radians()).rotate(local)
}

fn pos(p: Vec2) -> egui::Pos2 {
    egui::pos2(p.x, p.y)
}

fn paint_label(painter: &egui::Painter, label: &LabelPrimitive) {
    let font = egui::FontId::proportional(label.size);
    let angle = label.angle_degrees.to_radians();
    let color = theme::argb_to_egui(label.color);
    let shadow = theme::argb_to_egui(label.shadow_color);

    let galley = painter.layout_no_wrap(label.text.clone(), font, color);
    let size = Vec2::new(galley.size().x, galley.size().y);
    let origin = label_origin(label.anchor, label.angle_degrees, size, label.baseline_offset);

    let r = label.shadow_radius;
    for offset in [Vec2::new(r, r), Vec2::new(-r, r), Vec2::new(r, -r), Vec2::new(-r, -r)] {
        let shape = egui::epaint::TextShape::new(pos(origin + offset), galley.clone(), shadow)
            .with_override_text_color(shadow)
            .with_angle(angle);
        painter.add(shape);
    }
    painter.add(egui::epaint::TextShape::new(pos(origin), galley, color).with_angle(angle));
}

/// Draw the scene behind all panels, plus a ring around the selected handles
pub fn paint_annotation_overlay(
    mut contexts: EguiContexts,
    current: Res<CurrentPhoto>,
    view: Res<PhotoView>,
    store: Res<PhotoStore>,
    settings: Res<AppSettings>,
    drag: Res<EndpointDrag>,
    selected: Res<SelectedAnnotation>,
) -> Result {
    let (Some(photo_id), Some(rect)) = (current.photo_id, view.rect) else {
        return Ok(());
    };
    let ctx = contexts.ctx_mut()?;

    let annotations = annotations_with_preview(store.library.annotations_for(photo_id), drag.preview());
    let options = SceneOptions::screen(settings.data.show_ids, settings.locale());
    let scene = AnnotationScene::build(&annotations, &rect, settings.data.endpoint_style, &options);

    let painter = ctx.layer_painter(egui::LayerId::background());
    for primitive in &scene.primitives {
        match primitive {
            Primitive::Stroke {
                segment,
                width,
                color,
            } => {
                let stroke = egui::Stroke::new(*width, theme::argb_to_egui(*color));
                painter.line_segment([pos(segment.from), pos(segment.to)], stroke);
                // Round caps
                painter.circle_filled(pos(segment.from), width / 2.0, stroke.color);
                painter.circle_filled(pos(segment.to), width / 2.0, stroke.color);
            }
            Primitive::Circle {
                center,
                radius,
                color,
            } => {
                painter.circle_filled(pos(*center), *radius, theme::argb_to_egui(*color));
            }
            Primitive::Label(label) => paint_label(&painter, label),
        }
    }

    if let Some(annotation) = selected.id.and_then(|id| annotations.iter().find(|a| a.id == id)) {
        let ring = egui::Stroke::new(SELECTION_RING_WIDTH, SELECTION_RING);
        for point in [annotation.start, annotation.end] {
            painter.circle_stroke(pos(rect.map(point)), CONTROL_POINT_RADIUS, ring);
        }
    }

    Ok(())
}
