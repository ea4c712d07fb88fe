//! Undo support for annotation edits.
//!
//! Every edit of the current photo's annotations first records a snapshot of
//! the full list; undo puts the last snapshot back.
//!
//! ## Module Structure
//!
//! - [`snapshot_history`] - SnapshotHistory resource (undo stack)
//! - [`systems`] - edit messages, the systems applying them, Ctrl+Z

mod snapshot_history;
mod systems;

#[cfg(test)]
mod tests;

pub use snapshot_history::SnapshotHistory;
pub use systems::{
    AddAnnotationRequest, DeleteAnnotationRequest, ReorderAnnotationsRequest, UndoRequest,
    UpdateAnnotationRequest, handle_add_annotation, handle_delete_annotation,
    handle_reorder_annotations, handle_undo, handle_undo_shortcut, handle_update_annotation,
    moved_order,
};

pub use crate::constants::MAX_HISTORY_SIZE;
