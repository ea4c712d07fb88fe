//! File system helpers for the library file and managed photo copies.

use chrono::{DateTime, Local};
use image::{DynamicImage, ImageDecoder, ImageReader};
use std::path::{Path, PathBuf};

use super::StoreError;
use super::library::PhotoLibrary;

/// Read the library file. A missing file is an empty library.
pub fn read_library(path: &Path) -> Result<PhotoLibrary, StoreError> {
    let json = match std::fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(PhotoLibrary::default()),
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let mut library: PhotoLibrary =
        serde_json::from_str(&json).map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    let dropped = library.repair();
    if dropped > 0 {
        bevy::log::warn!("Dropped {} annotations without a photo", dropped);
    }
    Ok(library)
}

/// Write the library as pretty JSON through a temporary file and a rename,
/// so a crash mid-write leaves the previous file intact.
pub fn write_library(path: &Path, library: &PhotoLibrary, revision: u64) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(library).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let tmp = path.with_extension(format!("json.{}.tmp", revision));
    let io_err = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };
    std::fs::write(&tmp, json).map_err(io_err)?;
    std::fs::rename(&tmp, path).map_err(io_err)
}

/// Decode a photo with its EXIF orientation applied, so on-screen display,
/// thumbnails and exports agree on the intrinsic bounds.
pub fn decode_photo(path: &Path) -> Result<DynamicImage, image::ImageError> {
    let mut decoder = ImageReader::open(path)?
        .with_guessed_format()?
        .into_decoder()?;
    let orientation = decoder.orientation()?;
    let mut decoded = DynamicImage::from_decoder(decoder)?;
    decoded.apply_orientation(orientation);
    Ok(decoded)
}

/// File name for an imported photo: `IMG_<yyyyMMdd_HHmmss>_<n>.<ext>`
pub fn photo_file_name(now: DateTime<Local>, sequence: u32, extension: &str) -> String {
    format!(
        "IMG_{}_{}.{}",
        now.format("%Y%m%d_%H%M%S"),
        sequence,
        extension.to_lowercase()
    )
}

/// Copy an image into the managed photos directory.
///
/// The source must decode as an image. Returns the path of the copy.
pub fn import_photo_file(
    source: &Path,
    photos_dir: &Path,
    now: DateTime<Local>,
) -> Result<PathBuf, StoreError> {
    image::image_dimensions(source).map_err(|e| StoreError::NotAnImage {
        path: source.to_path_buf(),
        reason: e.to_string(),
    })?;

    std::fs::create_dir_all(photos_dir).map_err(|source| StoreError::Io {
        path: photos_dir.to_path_buf(),
        source,
    })?;

    let extension = source
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("jpg");

    let mut input = std::fs::File::open(source).map_err(|e| StoreError::Io {
        path: source.to_path_buf(),
        source: e,
    })?;
    let names = (1..).map(|sequence| photo_file_name(now, sequence, extension));
    let (target, mut output) =
        crate::paths::create_unique_file(photos_dir, names).map_err(|source| StoreError::Io {
            path: photos_dir.to_path_buf(),
            source,
        })?;

    if let Err(e) = std::io::copy(&mut input, &mut output) {
        let _ = std::fs::remove_file(&target);
        return Err(StoreError::Io {
            path: target,
            source: e,
        });
    }
    Ok(target)
}

/// Delete a photo file if it is a managed copy. Foreign files are left alone.
pub fn remove_photo_file(path: &Path) -> Result<bool, StoreError> {
    if !crate::paths::is_managed_photo(path) {
        return Ok(false);
    }
    match std::fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(source) => Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}
