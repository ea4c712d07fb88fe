//! Startup load of the library file.

use bevy::prelude::*;

use super::files::read_library;
use super::resources::{LibraryLoadError, PhotoStore};

/// Read `library.json` into the store.
///
/// A broken file is reported and the app starts empty. Nothing is written
/// back until the user changes something, so the broken file survives for
/// inspection until then.
pub fn load_library_system(mut store: ResMut<PhotoStore>, mut load_error: ResMut<LibraryLoadError>) {
    match read_library(&store.path) {
        Ok(library) => {
            info!(
                "Loaded library from {:?} ({} photos)",
                store.path,
                library.photo_count()
            );
            store.set_loaded(library);
        }
        Err(e) => {
            error!("Failed to load library: {}", e);
            load_error.message = Some(e.to_string());
            store.set_loaded(Default::default());
        }
    }
}
