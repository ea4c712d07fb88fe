//! Centralized path resolution for platform-appropriate user data directories.
//!
//! In development mode (cargo run), paths resolve to local directories.
//! In installed mode, paths resolve to platform-specific locations:
//! - Windows: `%APPDATA%\DimensionCam\`
//! - macOS: `~/Library/Application Support/DimensionCam/`
//! - Linux: `~/.config/dimensioncam/` (config), `~/.local/share/dimensioncam/` (data)

use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Returns true when running in development mode (cargo run).
///
/// Detection methods:
/// - `CARGO` env var is set (cargo run sets this)
/// - Debug assertions enabled (debug builds)
pub fn is_dev_mode() -> bool {
    std::env::var("CARGO").is_ok() || cfg!(debug_assertions)
}

/// Platform-appropriate config directory.
///
/// - Dev mode: current directory
/// - Linux: `~/.config/dimensioncam/`
/// - Windows/macOS: same as data_dir
pub fn config_dir() -> Option<PathBuf> {
    if is_dev_mode() {
        return Some(PathBuf::from("."));
    }

    #[cfg(target_os = "linux")]
    {
        dirs::config_dir().map(|p| p.join("dimensioncam"))
    }

    #[cfg(not(target_os = "linux"))]
    {
        data_dir()
    }
}

/// Platform-appropriate data directory.
///
/// - Dev mode: current directory
/// - Windows: `%APPDATA%\DimensionCam\`
/// - macOS: `~/Library/Application Support/DimensionCam/`
/// - Linux: `~/.local/share/dimensioncam/`
pub fn data_dir() -> Option<PathBuf> {
    if is_dev_mode() {
        return Some(PathBuf::from("."));
    }

    #[cfg(target_os = "linux")]
    {
        dirs::data_dir().map(|p| p.join("dimensioncam"))
    }

    #[cfg(not(target_os = "linux"))]
    {
        dirs::data_dir().map(|p| p.join("DimensionCam"))
    }
}

/// Path to the settings file.
pub fn settings_file() -> PathBuf {
    config_dir()
        .map(|p| p.join("settings.json"))
        .unwrap_or_else(|| PathBuf::from("settings.json"))
}

/// Path to the photo library file (photos and their annotations).
pub fn library_file() -> PathBuf {
    data_dir()
        .map(|p| p.join("library.json"))
        .unwrap_or_else(|| PathBuf::from("library.json"))
}

/// Directory holding copies of imported photos.
pub fn photos_dir() -> PathBuf {
    data_dir()
        .map(|p| p.join("photos"))
        .unwrap_or_else(|| PathBuf::from("photos"))
}

/// Path to the logs directory.
pub fn logs_dir() -> PathBuf {
    data_dir()
        .map(|p| p.join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

/// Directory exported images are written to.
///
/// - `{pictures}/DimensionCam/` when the platform has a pictures folder
/// - `{data_dir}/exports/` otherwise
pub fn export_dir() -> PathBuf {
    dirs::picture_dir()
        .map(|p| p.join("DimensionCam"))
        .or_else(|| data_dir().map(|p| p.join("exports")))
        .unwrap_or_else(|| PathBuf::from("exports"))
}

/// Ensure all required directories exist.
///
/// Called early in startup to create config and data directories.
pub fn ensure_directories() -> std::io::Result<()> {
    if let Some(config) = config_dir() {
        std::fs::create_dir_all(&config)?;
    }
    if let Some(data) = data_dir() {
        std::fs::create_dir_all(&data)?;
    }
    std::fs::create_dir_all(photos_dir())?;
    std::fs::create_dir_all(logs_dir())?;
    Ok(())
}

/// Whether a photo file lives inside the managed photos directory.
///
/// Only managed copies are deleted together with their photo record; files
/// referenced elsewhere on disk belong to the user.
pub fn is_managed_photo(path: &Path) -> bool {
    is_inside(path, &photos_dir())
}

/// Create the first file of `names` inside `dir` that does not exist yet.
///
/// Each name is claimed with `create_new`, so concurrent callers never end
/// up with the same path.
pub fn create_unique_file(
    dir: &Path,
    names: impl IntoIterator<Item = String>,
) -> std::io::Result<(PathBuf, File)> {
    for name in names {
        let path = dir.join(name);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e),
        }
    }
    Err(std::io::Error::new(ErrorKind::AlreadyExists, "no free file name left"))
}

fn is_inside(path: &Path, dir: &Path) -> bool {
    match (path.canonicalize(), dir.canonicalize()) {
        (Ok(path), Ok(dir)) => path.starts_with(dir),
        _ => path.starts_with(dir),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_dir_not_none() {
        // In test mode (debug), should return Some
        assert!(config_dir().is_some());
    }

    #[test]
    fn test_data_dir_not_none() {
        assert!(data_dir().is_some());
    }

    #[test]
    fn test_settings_file_has_json_extension() {
        let path = settings_file();
        assert!(path.to_string_lossy().ends_with("settings.json"));
    }

    #[test]
    fn test_library_file_has_json_extension() {
        assert!(library_file().to_string_lossy().ends_with("library.json"));
    }

    #[test]
    fn test_dev_mode_returns_local_paths() {
        // In tests, is_dev_mode() should be true due to debug_assertions
        assert!(is_dev_mode());
        assert_eq!(config_dir(), Some(PathBuf::from(".")));
        assert_eq!(data_dir(), Some(PathBuf::from(".")));
        assert_eq!(photos_dir(), PathBuf::from("./photos"));
    }

    #[test]
    fn test_managed_photo_detection() {
        assert!(is_managed_photo(&photos_dir().join("IMG_1.jpg")));
        assert!(!is_managed_photo(Path::new("/somewhere/else/IMG_1.jpg")));
    }

    #[test]
    fn test_unique_file_skips_taken_names() {
        let dir = std::env::temp_dir().join(format!("dimensioncam_unique_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("a.txt"), b"taken").unwrap();

        let names = ["a.txt", "b.txt"].map(String::from);
        let (path, _file) = create_unique_file(&dir, names.clone()).unwrap();
        assert_eq!(path, dir.join("b.txt"));
        assert_eq!(std::fs::read(dir.join("a.txt")).unwrap(), b"taken");

        let err = create_unique_file(&dir, names).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
