//! Photo library storage.
//!
//! The library lives in memory as [`PhotoLibrary`] inside the [`PhotoStore`]
//! resource and is written to `library.json` on the IO task pool after every
//! change.
//!
//! ## Module Structure
//!
//! - [`library`] - pure library operations (photos, annotations, ordering)
//! - [`files`] - library file and managed photo file helpers
//! - [`messages`] - import / delete requests and their completion messages
//! - [`resources`] - store resource and task components
//! - [`save`] - background writes, at most one in flight
//! - [`load`] - startup load
//! - [`import`] - photo import and deletion systems

pub mod files;
mod import;
pub mod library;
mod load;
mod messages;
mod resources;
mod save;

#[cfg(test)]
mod tests;

use bevy::prelude::*;
use std::path::PathBuf;

use crate::config::ConfigLoaded;
use crate::model::{AnnotationId, PhotoId};

pub use library::PhotoLibrary;
pub use messages::{DeletePhotoRequest, ImportPhotoRequest, PhotoDeleted, PhotoImported};
pub use resources::{LibraryLoadError, PhotoStore};

/// Library and photo file errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Photo {0} not found")]
    PhotoNotFound(PhotoId),

    #[error("Annotation {0} not found")]
    AnnotationNotFound(AnnotationId),

    #[error("New order for photo {0} does not match its annotations")]
    ReorderMismatch(PhotoId),

    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid library file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{path:?} is not a readable image: {reason}")]
    NotAnImage { path: PathBuf, reason: String },
}

/// System set for library loading (editor systems run after this)
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct LibraryLoaded;

pub struct StorePlugin;

impl Plugin for StorePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PhotoStore>()
            .init_resource::<LibraryLoadError>()
            .add_message::<ImportPhotoRequest>()
            .add_message::<PhotoImported>()
            .add_message::<DeletePhotoRequest>()
            .add_message::<PhotoDeleted>()
            .add_systems(
                Startup,
                load::load_library_system
                    .in_set(LibraryLoaded)
                    .after(ConfigLoaded),
            )
            .add_systems(
                Update,
                (
                    import::start_photo_imports.run_if(on_message::<ImportPhotoRequest>),
                    import::poll_import_tasks,
                    import::delete_photo_system.run_if(on_message::<DeletePhotoRequest>),
                ),
            )
            .add_systems(
                PostUpdate,
                (save::start_library_write, save::poll_write_tasks).chain(),
            )
            .add_systems(Last, save::flush_library_on_exit.run_if(on_message::<AppExit>));
    }
}
