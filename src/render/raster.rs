//! Software rasterization of an [`AnnotationScene`] with tiny-skia.
//!
//! Photos are copied into a premultiplied [`Pixmap`], the scene is painted on
//! top, and the result is converted back to a straight-alpha RGBA image.

use ab_glyph::{Font, PxScale, ScaleFont, point};
use image::RgbaImage;
use tiny_skia::{
    Color, FillRule, FilterQuality, LineCap, Paint, PathBuilder, Pixmap, PixmapPaint,
    PremultipliedColorU8, Stroke, Transform,
};

use super::RenderError;
use super::fonts::LabelFont;
use super::scene::{AnnotationScene, LabelPrimitive, Primitive};
use crate::model::ArgbColor;

/// Labels smaller than this are not legible and are skipped
const MIN_LABEL_SIZE: f32 = 4.0;

/// Copy an RGBA image into a new premultiplied pixmap
pub fn pixmap_from_rgba(image: &RgbaImage) -> Result<Pixmap, RenderError> {
    let (width, height) = image.dimensions();
    let mut pixmap =
        Pixmap::new(width, height).ok_or(RenderError::PixmapCreation { width, height })?;

    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = premultiply(r, g, b, a);
    }

    Ok(pixmap)
}

/// Convert a pixmap back to straight-alpha RGBA
pub fn rgba_from_pixmap(pixmap: &Pixmap) -> RgbaImage {
    let mut image = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in image.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        dst.0 = [c.red(), c.green(), c.blue(), c.alpha()];
    }
    image
}

fn premultiply(r: u8, g: u8, b: u8, a: u8) -> PremultipliedColorU8 {
    let mul = |c: u8| ((c as u16 * a as u16 + 127) / 255) as u8;
    // Channels never exceed alpha after multiplication, so this cannot fail
    PremultipliedColorU8::from_rgba(mul(r), mul(g), mul(b), a)
        .unwrap_or(PremultipliedColorU8::TRANSPARENT)
}

fn skia_color(color: ArgbColor) -> Color {
    Color::from_rgba8(color.red(), color.green(), color.blue(), color.alpha())
}

fn solid_paint(color: ArgbColor) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(skia_color(color));
    paint.anti_alias = true;
    paint
}

/// Paint every primitive of `scene` onto `pixmap`.
///
/// Labels need a font; with `None` they are skipped and the number of
/// skipped labels is returned so callers can warn about it.
pub fn draw_scene(pixmap: &mut Pixmap, scene: &AnnotationScene, font: Option<&LabelFont>) -> usize {
    let mut skipped_labels = 0;

    for primitive in &scene.primitives {
        match primitive {
            Primitive::Stroke {
                segment,
                width,
                color,
            } => {
                let mut pb = PathBuilder::new();
                pb.move_to(segment.from.x, segment.from.y);
                pb.line_to(segment.to.x, segment.to.y);
                if let Some(path) = pb.finish() {
                    let stroke = Stroke {
                        width: *width,
                        line_cap: LineCap::Round,
                        ..Stroke::default()
                    };
                    pixmap.stroke_path(
                        &path,
                        &solid_paint(*color),
                        &stroke,
                        Transform::identity(),
                        None,
                    );
                }
            }
            Primitive::Circle {
                center,
                radius,
                color,
            } => {
                if let Some(path) = PathBuilder::from_circle(center.x, center.y, *radius) {
                    pixmap.fill_path(
                        &path,
                        &solid_paint(*color),
                        FillRule::Winding,
                        Transform::identity(),
                        None,
                    );
                }
            }
            Primitive::Label(label) => match font {
                Some(font) => draw_label(pixmap, label, font),
                None => skipped_labels += 1,
            },
        }
    }

    skipped_labels
}

/// Glyph coverage of a single line of text
struct TextMask {
    width: usize,
    height: usize,
    /// Distance from the top of the mask to the baseline
    baseline: f32,
    /// Extra border around the glyphs for the shadow
    padding: usize,
    coverage: Vec<f32>,
}

fn rasterize_text(font: &LabelFont, text: &str, size: f32, padding: usize) -> Option<TextMask> {
    let scale = PxScale::from(size);
    let scaled = font.font.as_scaled(scale);

    let mut caret = 0.0f32;
    let mut previous = None;
    let mut glyphs = Vec::new();
    for ch in text.chars() {
        let id = scaled.glyph_id(ch);
        if let Some(prev) = previous {
            caret += scaled.kern(prev, id);
        }
        glyphs.push(id.with_scale_and_position(scale, point(caret, scaled.ascent())));
        caret += scaled.h_advance(id);
        previous = Some(id);
    }

    let text_width = caret.ceil() as usize;
    let text_height = (scaled.ascent() - scaled.descent()).ceil() as usize;
    if text_width == 0 || text_height == 0 {
        return None;
    }

    let width = text_width + padding * 2;
    let height = text_height + padding * 2;
    let mut coverage = vec![0.0f32; width * height];

    for glyph in glyphs {
        let Some(outlined) = font.font.outline_glyph(glyph) else {
            continue;
        };
        let bounds = outlined.px_bounds();
        outlined.draw(|x, y, c| {
            let px = bounds.min.x as i64 + x as i64 + padding as i64;
            let py = bounds.min.y as i64 + y as i64 + padding as i64;
            if px >= 0 && py >= 0 && (px as usize) < width && (py as usize) < height {
                let cell = &mut coverage[py as usize * width + px as usize];
                *cell = (*cell + c).min(1.0);
            }
        });
    }

    Some(TextMask {
        width,
        height,
        baseline: scaled.ascent() + padding as f32,
        padding,
        coverage,
    })
}

/// Grow the glyph coverage by `radius` pixels to form a soft halo
fn dilate(mask: &TextMask, radius: f32) -> Vec<f32> {
    let r = radius.ceil() as i64;
    let (w, h) = (mask.width as i64, mask.height as i64);
    let mut out = vec![0.0f32; mask.coverage.len()];

    for y in 0..h {
        for x in 0..w {
            let mut best = 0.0f32;
            for dy in -r..=r {
                for dx in -r..=r {
                    let dist = ((dx * dx + dy * dy) as f32).sqrt();
                    if dist > radius + 0.5 {
                        continue;
                    }
                    let (sx, sy) = (x + dx, y + dy);
                    if sx < 0 || sy < 0 || sx >= w || sy >= h {
                        continue;
                    }
                    let falloff = 1.0 - (dist / (radius + 1.0));
                    best = best.max(mask.coverage[(sy * w + sx) as usize] * falloff);
                }
            }
            out[(y * w + x) as usize] = best;
        }
    }
    out
}

fn draw_label(pixmap: &mut Pixmap, label: &LabelPrimitive, font: &LabelFont) {
    if label.size < MIN_LABEL_SIZE || label.text.is_empty() {
        return;
    }

    let padding = label.shadow_radius.ceil() as usize + 1;
    let Some(mask) = rasterize_text(font, &label.text, label.size, padding) else {
        return;
    };
    let Some(mut layer) = Pixmap::new(mask.width as u32, mask.height as u32) else {
        return;
    };

    let shadow = if label.shadow_radius > 0.0 {
        dilate(&mask, label.shadow_radius)
    } else {
        vec![0.0; mask.coverage.len()]
    };

    let [tr, tg, tb, ta] = label.color.to_rgba();
    let [sr, sg, sb, sa] = label.shadow_color.to_rgba();
    for (i, px) in layer.pixels_mut().iter_mut().enumerate() {
        let text_a = mask.coverage[i] * ta as f32 / 255.0;
        let shadow_a = shadow[i] * sa as f32 / 255.0;
        // Text over shadow, source-over in straight alpha
        let out_a = text_a + shadow_a * (1.0 - text_a);
        if out_a <= 0.0 {
            continue;
        }
        let blend = |t: u8, s: u8| {
            (t as f32 * text_a + s as f32 * shadow_a * (1.0 - text_a)) / out_a
        };
        let a = (out_a * 255.0).round() as u8;
        *px = premultiply(
            blend(tr, sr).round() as u8,
            blend(tg, sg).round() as u8,
            blend(tb, sb).round() as u8,
            a,
        );
    }

    // Local layout: text centred on the anchor, baseline `baseline_offset`
    // above it, then rotated around the anchor.
    let text_width = (mask.width - mask.padding * 2) as f32;
    let left = label.anchor.x - text_width / 2.0 - mask.padding as f32;
    let top = label.anchor.y - label.baseline_offset - mask.baseline;
    let transform = Transform::from_rotate_at(label.angle_degrees, label.anchor.x, label.anchor.y)
        .pre_translate(left, top);

    let paint = PixmapPaint {
        quality: FilterQuality::Bilinear,
        ..PixmapPaint::default()
    };
    pixmap.draw_pixmap(0, 0, layer.as_ref(), &paint, transform, None);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::DisplayRect;
    use crate::i18n::Locale;
    use crate::model::{Annotation, EndpointStyle, LengthUnit};
    use crate::render::scene::SceneOptions;
    use bevy::math::Vec2;
    use image::Rgba;

    fn grey_photo(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba([128, 128, 128, 255]))
    }

    fn horizontal_line(color: ArgbColor) -> Annotation {
        Annotation {
            id: 1,
            photo_id: 1,
            start: Vec2::new(0.1, 0.5),
            end: Vec2::new(0.9, 0.5),
            value: 10.0,
            unit: LengthUnit::Centimeter,
            color,
            width: 5.0,
            order: 0,
        }
    }

    #[test]
    fn test_pixmap_round_trip_keeps_opaque_pixels() {
        let mut photo = grey_photo(4, 3);
        photo.put_pixel(1, 1, Rgba([10, 200, 30, 255]));
        let pixmap = pixmap_from_rgba(&photo).unwrap();
        assert_eq!(rgba_from_pixmap(&pixmap), photo);
    }

    #[test]
    fn test_zero_sized_image_is_rejected() {
        let empty = RgbaImage::new(0, 0);
        assert!(matches!(
            pixmap_from_rgba(&empty),
            Err(RenderError::PixmapCreation { .. })
        ));
    }

    #[test]
    fn test_line_is_painted_in_annotation_color() {
        let photo = grey_photo(200, 100);
        let mut pixmap = pixmap_from_rgba(&photo).unwrap();
        let scene = AnnotationScene::build(
            &[horizontal_line(ArgbColor::GREEN)],
            &DisplayRect::from_size(200.0, 100.0),
            EndpointStyle::TShape,
            &SceneOptions::export(1.0, Locale::En),
        );

        let skipped = draw_scene(&mut pixmap, &scene, None);
        assert_eq!(skipped, 1);

        let out = rgba_from_pixmap(&pixmap);
        // On the line, off the label
        assert_eq!(out.get_pixel(60, 50).0, [0, 255, 0, 255]);
        // Far from the line the photo is untouched
        assert_eq!(out.get_pixel(100, 5).0, [128, 128, 128, 255]);
    }

    #[test]
    fn test_dot_endpoints_are_filled() {
        let photo = grey_photo(200, 100);
        let mut pixmap = pixmap_from_rgba(&photo).unwrap();
        let scene = AnnotationScene::build(
            &[horizontal_line(ArgbColor::BLUE)],
            &DisplayRect::from_size(200.0, 100.0),
            EndpointStyle::Dot,
            &SceneOptions::export(1.0, Locale::En),
        );
        draw_scene(&mut pixmap, &scene, None);
        let out = rgba_from_pixmap(&pixmap);
        // Radius 10 around (20, 50), sampled above the stroke
        assert_eq!(out.get_pixel(20, 43).0, [0, 0, 255, 255]);
    }
}
