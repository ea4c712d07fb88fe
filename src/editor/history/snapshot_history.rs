//! Snapshot history resource for tracking undo state.

use bevy::prelude::*;

use super::MAX_HISTORY_SIZE;
use crate::model::{Annotation, PhotoId};

/// Undo stack of whole annotation lists for the current photo.
///
/// Each entry is a deep copy of the photo's annotations taken right before a
/// change, so undo restores exactly that list.
#[derive(Resource, Default)]
pub struct SnapshotHistory {
    /// Photo the snapshots belong to
    photo_id: Option<PhotoId>,
    /// Snapshots that can be restored (most recent last)
    undo_stack: Vec<Vec<Annotation>>,
}

impl SnapshotHistory {
    /// Record the state of `photo_id` before a change.
    ///
    /// Snapshots of another photo drop the existing history first.
    pub fn push(&mut self, photo_id: PhotoId, snapshot: Vec<Annotation>) {
        if self.photo_id != Some(photo_id) {
            self.clear_for(photo_id);
        }

        self.undo_stack.push(snapshot);

        // Trim history if it exceeds max size
        if self.undo_stack.len() > MAX_HISTORY_SIZE {
            let excess = self.undo_stack.len() - MAX_HISTORY_SIZE;
            self.undo_stack.drain(..excess);
        }
    }

    /// Pop the last snapshot of `photo_id` for undo
    pub fn pop_undo(&mut self, photo_id: PhotoId) -> Option<Vec<Annotation>> {
        if self.photo_id != Some(photo_id) {
            return None;
        }
        self.undo_stack.pop()
    }

    /// Check if there are snapshots to restore for `photo_id`
    pub fn can_undo(&self, photo_id: PhotoId) -> bool {
        self.photo_id == Some(photo_id) && !self.undo_stack.is_empty()
    }

    /// Get the count of undoable changes
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Start an empty history for another photo
    pub fn clear_for(&mut self, photo_id: PhotoId) {
        self.photo_id = Some(photo_id);
        self.undo_stack.clear();
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.photo_id = None;
        self.undo_stack.clear();
    }
}
