//! Compositing annotations onto full-resolution photos and writing JPEGs.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use image::buffer::ConvertBuffer;
use image::codecs::jpeg::JpegEncoder;
use image::{RgbImage, RgbaImage};

use super::ExportError;
use crate::constants::EXPORT_JPEG_QUALITY;
use crate::geometry::{DisplayRect, export_scale_factor};
use crate::i18n::Locale;
use crate::model::{Annotation, EndpointStyle};
use crate::render::raster::{draw_scene, pixmap_from_rgba, rgba_from_pixmap};
use crate::render::{AnnotationScene, LabelFont, SceneOptions, load_label_font};
use crate::store::files::decode_photo;

/// Everything a background export needs, detached from the ECS world
#[derive(Debug, Clone)]
pub struct ExportJob {
    pub photo_path: PathBuf,
    /// Annotations in ascending z-order
    pub annotations: Vec<Annotation>,
    pub style: EndpointStyle,
    pub max_scale: f32,
    pub locale: Locale,
    pub label_font: Option<PathBuf>,
    pub export_dir: PathBuf,
    pub now: DateTime<Local>,
}

#[derive(Debug)]
pub struct ExportOutcome {
    pub path: PathBuf,
    /// Labels left out because no font was available
    pub skipped_labels: usize,
}

/// Draw `annotations` onto `photo` at its own resolution.
///
/// Stroke widths and text grow with the bitmap width so the result looks
/// like the on-screen view. Returns the number of labels skipped for lack of
/// a font.
pub fn compose_annotated(
    photo: &RgbaImage,
    annotations: &[Annotation],
    style: EndpointStyle,
    max_scale: f32,
    locale: Locale,
    font: Option<&LabelFont>,
) -> Result<(RgbaImage, usize), ExportError> {
    let (width, height) = photo.dimensions();
    let scale = export_scale_factor(width as f32, max_scale);
    let rect = DisplayRect::from_size(width as f32, height as f32);
    let scene = AnnotationScene::build(annotations, &rect, style, &SceneOptions::export(scale, locale));

    let mut pixmap = pixmap_from_rgba(photo)?;
    let skipped = draw_scene(&mut pixmap, &scene, font);
    Ok((rgba_from_pixmap(&pixmap), skipped))
}

/// `DimensionCam_<yyyyMMdd_HHmmss>.jpg`, then `_2`, `_3`, ... when taken
pub fn export_file_names(now: DateTime<Local>) -> impl Iterator<Item = String> {
    let stem = format!("DimensionCam_{}", now.format("%Y%m%d_%H%M%S"));
    std::iter::once(format!("{}.jpg", stem)).chain((2u32..).map(move |n| format!("{}_{}.jpg", stem, n)))
}

/// Claim a fresh export file in `dir`
pub fn create_export_file(dir: &Path, now: DateTime<Local>) -> Result<(PathBuf, File), ExportError> {
    crate::paths::create_unique_file(dir, export_file_names(now)).map_err(|source| ExportError::Io {
        path: dir.to_path_buf(),
        source,
    })
}

/// Encode as JPEG into an already created file; alpha is dropped
pub fn write_jpeg(image: &RgbaImage, file: File, path: &Path) -> Result<(), ExportError> {
    let rgb: RgbImage = image.convert();
    let mut writer = BufWriter::new(file);
    let encoder = JpegEncoder::new_with_quality(&mut writer, EXPORT_JPEG_QUALITY);
    rgb.write_with_encoder(encoder).map_err(ExportError::Encode)?;
    writer.flush().map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Decode, composite and write one photo
pub fn run_export(job: ExportJob) -> Result<ExportOutcome, ExportError> {
    let photo = decode_photo(&job.photo_path)
        .map_err(|source| ExportError::Decode {
            path: job.photo_path.clone(),
            source,
        })?
        .to_rgba8();

    let font = if job.annotations.is_empty() {
        None
    } else {
        load_label_font(job.label_font.as_deref(), job.locale)
    };
    let (composed, skipped_labels) = compose_annotated(
        &photo,
        &job.annotations,
        job.style,
        job.max_scale,
        job.locale,
        font.as_ref(),
    )?;

    std::fs::create_dir_all(&job.export_dir).map_err(|source| ExportError::Io {
        path: job.export_dir.clone(),
        source,
    })?;
    let (path, file) = create_export_file(&job.export_dir, job.now)?;
    if let Err(e) = write_jpeg(&composed, file, &path) {
        let _ = std::fs::remove_file(&path);
        return Err(e);
    }

    Ok(ExportOutcome {
        path,
        skipped_labels,
    })
}
