//! Resource and task types for library state tracking.

use bevy::prelude::*;
use bevy::tasks::Task;
use std::path::PathBuf;

use super::StoreError;
use super::library::PhotoLibrary;

/// The photo library plus its persistence state
#[derive(Resource)]
pub struct PhotoStore {
    pub library: PhotoLibrary,
    /// Path of the library file
    pub path: PathBuf,
    /// Bumped on every change; views compare it to detect edits
    revision: u64,
    /// Revision that was last handed to a write task
    written_revision: u64,
    /// Whether a write task is in flight
    writing: bool,
    /// Whether the last finished write failed
    write_failed: bool,
}

impl Default for PhotoStore {
    fn default() -> Self {
        Self {
            library: PhotoLibrary::default(),
            path: crate::paths::library_file(),
            revision: 0,
            written_revision: 0,
            writing: false,
            write_failed: false,
        }
    }
}

impl PhotoStore {
    /// Record that `library` was mutated and needs to be written
    pub fn mark_changed(&mut self) {
        self.revision += 1;
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Whether a write should start now: there are unwritten changes and no
    /// write is in flight
    pub fn needs_write(&self) -> bool {
        !self.writing && self.revision != self.written_revision
    }

    /// Whether changes exist that may not be on disk yet
    pub fn has_unsaved_changes(&self) -> bool {
        self.writing || self.write_failed || self.revision != self.written_revision
    }

    /// Mark the current revision as handed to a writer
    pub fn begin_write(&mut self) -> u64 {
        self.writing = true;
        self.written_revision = self.revision;
        self.revision
    }

    /// The in-flight write finished. Failed writes are not retried; the next
    /// change writes the whole library again.
    pub fn finish_write(&mut self, success: bool) {
        self.writing = false;
        self.write_failed = !success;
    }

    /// Replace the library after loading, without scheduling a write
    pub fn set_loaded(&mut self, library: PhotoLibrary) {
        self.library = library;
        self.revision = 0;
        self.written_revision = 0;
        self.writing = false;
        self.write_failed = false;
    }
}

/// Load problem shown once to the user
#[derive(Resource, Default)]
pub struct LibraryLoadError {
    pub message: Option<String>,
}

/// Result of a background library write
pub struct WriteResult {
    pub revision: u64,
    pub error: Option<StoreError>,
}

/// Component for the library write task
#[derive(Component)]
pub struct WriteLibraryTask(pub Task<WriteResult>);

/// Result of a background photo import
pub struct ImportResult {
    pub source: PathBuf,
    pub created_at: i64,
    pub outcome: Result<PathBuf, StoreError>,
}

/// Component for a photo import task
#[derive(Component)]
pub struct ImportPhotoTask(pub Task<ImportResult>);
