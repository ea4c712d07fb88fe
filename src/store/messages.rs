//! Message types for photo library operations.

use bevy::prelude::*;
use std::path::PathBuf;

use crate::model::PhotoId;

/// Copy an image file into the library
#[derive(Message)]
pub struct ImportPhotoRequest {
    pub source: PathBuf,
}

/// Sent once an import finished and the photo is in the library
#[derive(Message)]
pub struct PhotoImported {
    pub photo_id: PhotoId,
}

/// Delete a photo, its annotations and its managed file
#[derive(Message)]
pub struct DeletePhotoRequest {
    pub photo_id: PhotoId,
}

/// Sent after a photo was removed from the library
#[derive(Message)]
pub struct PhotoDeleted {
    pub photo_id: PhotoId,
}
