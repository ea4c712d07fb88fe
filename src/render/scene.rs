//! Resolution independent description of the annotation overlay.
//!
//! A scene is built once per frame (or per export) from the annotations in
//! z-order and handed to a backend: the egui painter on screen, or
//! [`super::raster`] for bitmaps.

use bevy::math::Vec2;

use crate::constants::{BASE_TEXT_SIZE, CONTROL_POINT_RADIUS, LABEL_OFFSET, SHADOW_RADIUS};
use crate::geometry::{
    DisplayRect, EndpointDecoration, Segment, endpoint_decoration, label_angle_degrees, label_text,
};
use crate::i18n::{Locale, unit_label};
use crate::model::{Annotation, ArgbColor, EndpointStyle};

/// Alpha of the translucent drag handles
const CONTROL_POINT_ALPHA: u8 = 150;

/// How a scene should be drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneOptions {
    /// Multiplier for stroke widths, text and handle sizes
    pub scale: f32,
    /// Draw drag handles at both ends of every line
    pub control_points: bool,
    /// Append the 1-based list position to labels
    pub show_ids: bool,
    pub locale: Locale,
}

impl SceneOptions {
    /// Interactive view: handles visible, unscaled
    pub fn screen(show_ids: bool, locale: Locale) -> Self {
        Self {
            scale: 1.0,
            control_points: true,
            show_ids,
            locale,
        }
    }

    /// Exported bitmap: no handles, no list numbers
    pub fn export(scale: f32, locale: Locale) -> Self {
        Self {
            scale,
            control_points: false,
            show_ids: false,
            locale,
        }
    }
}

/// Text placed along a line
#[derive(Debug, Clone, PartialEq)]
pub struct LabelPrimitive {
    pub text: String,
    /// Midpoint of the line; the label is centred on it horizontally
    pub anchor: Vec2,
    /// Upright rotation around `anchor`, in degrees (clockwise in y-down space)
    pub angle_degrees: f32,
    /// Distance from the anchor up to the text baseline, before rotation
    pub baseline_offset: f32,
    pub size: f32,
    pub color: ArgbColor,
    pub shadow_color: ArgbColor,
    pub shadow_radius: f32,
}

/// A single drawing instruction
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Stroke {
        segment: Segment,
        width: f32,
        color: ArgbColor,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: ArgbColor,
    },
    Label(LabelPrimitive),
}

/// Primitives in paint order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationScene {
    pub primitives: Vec<Primitive>,
}

impl AnnotationScene {
    /// Lay out `annotations` (ascending z-order) inside `rect`.
    pub fn build(
        annotations: &[Annotation],
        rect: &DisplayRect,
        style: EndpointStyle,
        options: &SceneOptions,
    ) -> Self {
        let mut primitives = Vec::with_capacity(annotations.len() * 6);

        for (index, annotation) in annotations.iter().enumerate() {
            let start = rect.map(annotation.start);
            let end = rect.map(annotation.end);
            let width = annotation.width * options.scale;
            let color = annotation.color;

            primitives.push(Primitive::Stroke {
                segment: Segment::new(start, end),
                width,
                color,
            });

            for (tip, tail) in [(start, end), (end, start)] {
                match endpoint_decoration(style, tip, tail, width) {
                    EndpointDecoration::Dot { center, radius } => {
                        primitives.push(Primitive::Circle {
                            center,
                            radius,
                            color,
                        });
                    }
                    decoration => {
                        primitives.extend(decoration.segments().into_iter().map(|segment| {
                            Primitive::Stroke {
                                segment,
                                width,
                                color,
                            }
                        }));
                    }
                }
            }

            let text = label_text(
                annotation.value,
                unit_label(options.locale, annotation.unit),
                options.show_ids.then_some(index + 1),
            );
            primitives.push(Primitive::Label(LabelPrimitive {
                text,
                anchor: (start + end) / 2.0,
                angle_degrees: label_angle_degrees(start, end),
                baseline_offset: LABEL_OFFSET * options.scale,
                size: BASE_TEXT_SIZE * options.scale,
                color: ArgbColor::WHITE,
                shadow_color: ArgbColor::BLACK,
                shadow_radius: SHADOW_RADIUS * options.scale,
            }));

            if options.control_points {
                let handle = ArgbColor::YELLOW.with_alpha(CONTROL_POINT_ALPHA);
                for center in [start, end] {
                    primitives.push(Primitive::Circle {
                        center,
                        radius: CONTROL_POINT_RADIUS * options.scale,
                        color: handle,
                    });
                }
            }
        }

        Self { primitives }
    }

    pub fn labels(&self) -> impl Iterator<Item = &LabelPrimitive> {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Label(label) => Some(label),
            _ => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LengthUnit;

    fn annotation(id: u64, order: u32, value: f32) -> Annotation {
        Annotation {
            id,
            photo_id: 1,
            start: Vec2::new(0.2, 0.5),
            end: Vec2::new(0.8, 0.5),
            value,
            unit: LengthUnit::Centimeter,
            color: ArgbColor::BLUE,
            width: 5.0,
            order,
        }
    }

    fn strokes(scene: &AnnotationScene) -> Vec<(Segment, f32)> {
        scene
            .primitives
            .iter()
            .filter_map(|p| match p {
                Primitive::Stroke { segment, width, .. } => Some((*segment, *width)),
                _ => None,
            })
            .collect()
    }

    fn circles(scene: &AnnotationScene) -> Vec<(Vec2, f32, ArgbColor)> {
        scene
            .primitives
            .iter()
            .filter_map(|p| match p {
                Primitive::Circle {
                    center,
                    radius,
                    color,
                } => Some((*center, *radius, *color)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_screen_scene_with_arrows() {
        let rect = DisplayRect::from_size(1000.0, 800.0);
        let scene = AnnotationScene::build(
            &[annotation(1, 0, 12.5)],
            &rect,
            EndpointStyle::Arrow,
            &SceneOptions::screen(true, Locale::En),
        );

        // Line plus two wings at each end
        let strokes = strokes(&scene);
        assert_eq!(strokes.len(), 5);
        assert_eq!(
            strokes[0].0,
            Segment::new(Vec2::new(200.0, 400.0), Vec2::new(800.0, 400.0))
        );

        // Two translucent yellow handles
        let circles = circles(&scene);
        assert_eq!(circles.len(), 2);
        assert_eq!(circles[0].1, 20.0);
        assert_eq!(circles[0].2, ArgbColor(0x96FF_FF00));

        let label = scene.labels().next().unwrap();
        assert_eq!(label.text, "12.5 cm (#1)");
        assert_eq!(label.anchor, Vec2::new(500.0, 400.0));
        assert_eq!(label.size, 40.0);
        assert_eq!(label.baseline_offset, 10.0);
    }

    #[test]
    fn test_export_scene_scales_and_hides_handles() {
        let rect = DisplayRect::from_size(2160.0, 1440.0);
        let scene = AnnotationScene::build(
            &[annotation(1, 0, 3.0)],
            &rect,
            EndpointStyle::TShape,
            &SceneOptions::export(2.0, Locale::En),
        );

        let strokes = strokes(&scene);
        assert_eq!(strokes.len(), 3);
        assert!(strokes.iter().all(|(_, width)| *width == 10.0));
        assert!(circles(&scene).is_empty());

        let label = scene.labels().next().unwrap();
        assert_eq!(label.text, "3 cm");
        assert_eq!(label.size, 80.0);
        assert_eq!(label.shadow_radius, 4.0);
    }

    #[test]
    fn test_dot_style_emits_circles() {
        let rect = DisplayRect::from_size(100.0, 100.0);
        let scene = AnnotationScene::build(
            &[annotation(1, 0, 1.0)],
            &rect,
            EndpointStyle::Dot,
            &SceneOptions::export(1.0, Locale::En),
        );
        let circles = circles(&scene);
        assert_eq!(circles.len(), 2);
        assert_eq!(circles[0].1, 10.0);
        assert_eq!(circles[0].2, ArgbColor::BLUE);
    }

    #[test]
    fn test_ids_follow_list_position() {
        let rect = DisplayRect::from_size(100.0, 100.0);
        let list = [annotation(9, 0, 1.0), annotation(4, 1, 2.0)];
        let scene = AnnotationScene::build(
            &list,
            &rect,
            EndpointStyle::Arrow,
            &SceneOptions::screen(true, Locale::Zh),
        );
        let texts: Vec<_> = scene.labels().map(|l| l.text.clone()).collect();
        assert_eq!(texts, vec!["1 厘米 (#1)", "2 厘米 (#2)"]);
    }

    #[test]
    fn test_empty_list_builds_empty_scene() {
        let scene = AnnotationScene::build(
            &[],
            &DisplayRect::from_size(10.0, 10.0),
            EndpointStyle::Arrow,
            &SceneOptions::screen(false, Locale::En),
        );
        assert!(scene.is_empty());
    }
}
