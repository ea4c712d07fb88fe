use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::PhotoId;

/// A photo known to the library
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub id: PhotoId,
    /// Location of the image data on disk
    pub path: PathBuf,
    /// Creation time in milliseconds since the Unix epoch
    pub created_at: i64,
}

impl Photo {
    /// File name shown in lists, falls back to the full path.
    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Local creation date formatted for the photo list.
    pub fn created_label(&self) -> String {
        chrono::DateTime::from_timestamp_millis(self.created_at)
            .map(|utc| {
                utc.with_timezone(&chrono::Local)
                    .format("%Y-%m-%d %H:%M")
                    .to_string()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_uses_file_name() {
        let photo = Photo {
            id: 1,
            path: PathBuf::from("photos/IMG_20240101_120000_1.jpg"),
            created_at: 0,
        };
        assert_eq!(photo.display_name(), "IMG_20240101_120000_1.jpg");
    }

    #[test]
    fn test_created_label_is_not_empty_for_valid_timestamp() {
        let photo = Photo {
            id: 1,
            path: PathBuf::from("a.jpg"),
            created_at: 1_700_000_000_000,
        };
        assert!(photo.created_label().starts_with("2023-11-1"));
    }
}
