//! In-memory photo library: photos and their annotations.
//!
//! This is the source of truth while the app runs. Every operation keeps the
//! annotation invariants: endpoints inside the unit square, widths of at
//! least 1, and a dense `0..n` order per photo.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::StoreError;
use crate::model::{Annotation, AnnotationDraft, AnnotationId, Photo, PhotoId};

/// Current on-disk format version
pub const LIBRARY_VERSION: u32 = 1;

fn current_version() -> u32 {
    LIBRARY_VERSION
}

fn first_id() -> u64 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoLibrary {
    #[serde(default = "current_version")]
    pub version: u32,
    #[serde(default = "first_id")]
    next_photo_id: PhotoId,
    #[serde(default = "first_id")]
    next_annotation_id: AnnotationId,
    #[serde(default)]
    photos: Vec<Photo>,
    #[serde(default)]
    annotations: Vec<Annotation>,
}

impl Default for PhotoLibrary {
    fn default() -> Self {
        Self {
            version: LIBRARY_VERSION,
            next_photo_id: 1,
            next_annotation_id: 1,
            photos: Vec::new(),
            annotations: Vec::new(),
        }
    }
}

impl PhotoLibrary {
    // ------------------------------------------------------------------
    // Photos
    // ------------------------------------------------------------------

    /// Register a photo and return its new id
    pub fn insert_photo(&mut self, path: PathBuf, created_at: i64) -> PhotoId {
        let id = self.next_photo_id;
        self.next_photo_id += 1;
        self.photos.push(Photo {
            id,
            path,
            created_at,
        });
        id
    }

    pub fn photo(&self, id: PhotoId) -> Option<&Photo> {
        self.photos.iter().find(|p| p.id == id)
    }

    pub fn photo_count(&self) -> usize {
        self.photos.len()
    }

    /// All photos, newest first
    pub fn photos_newest_first(&self) -> Vec<&Photo> {
        let mut photos: Vec<&Photo> = self.photos.iter().collect();
        photos.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        photos
    }

    /// Remove a photo together with all of its annotations
    pub fn delete_photo(&mut self, id: PhotoId) -> Result<Photo, StoreError> {
        let index = self
            .photos
            .iter()
            .position(|p| p.id == id)
            .ok_or(StoreError::PhotoNotFound(id))?;
        self.annotations.retain(|a| a.photo_id != id);
        Ok(self.photos.remove(index))
    }

    // ------------------------------------------------------------------
    // Annotations
    // ------------------------------------------------------------------

    /// Annotations of a photo in ascending z-order
    pub fn annotations_for(&self, photo_id: PhotoId) -> Vec<Annotation> {
        let mut list: Vec<Annotation> = self
            .annotations
            .iter()
            .filter(|a| a.photo_id == photo_id)
            .cloned()
            .collect();
        list.sort_by_key(|a| a.order);
        list
    }

    pub fn annotation_count(&self, photo_id: PhotoId) -> usize {
        self.annotations
            .iter()
            .filter(|a| a.photo_id == photo_id)
            .count()
    }

    pub fn annotation(&self, id: AnnotationId) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.id == id)
    }

    /// Add an annotation on top of the photo's existing ones
    pub fn insert_annotation(&mut self, draft: AnnotationDraft) -> Result<AnnotationId, StoreError> {
        if self.photo(draft.photo_id).is_none() {
            return Err(StoreError::PhotoNotFound(draft.photo_id));
        }
        let id = self.next_annotation_id;
        self.next_annotation_id += 1;
        let mut annotation = Annotation {
            id,
            photo_id: draft.photo_id,
            start: draft.start,
            end: draft.end,
            value: draft.value,
            unit: draft.unit,
            color: draft.color,
            width: draft.width,
            order: self.annotation_count(draft.photo_id) as u32,
        };
        annotation.normalize();
        self.annotations.push(annotation);
        Ok(id)
    }

    /// Overwrite an annotation's geometry and style.
    ///
    /// Ownership and z-order are kept from the stored record; use
    /// [`Self::reorder`] to change the order.
    pub fn update_annotation(&mut self, annotation: &Annotation) -> Result<(), StoreError> {
        let stored = self
            .annotations
            .iter_mut()
            .find(|a| a.id == annotation.id)
            .ok_or(StoreError::AnnotationNotFound(annotation.id))?;
        let (photo_id, order) = (stored.photo_id, stored.order);
        *stored = annotation.clone();
        stored.photo_id = photo_id;
        stored.order = order;
        stored.normalize();
        Ok(())
    }

    /// Remove one annotation and close the gap in its photo's order
    pub fn delete_annotation(&mut self, id: AnnotationId) -> Result<Annotation, StoreError> {
        let index = self
            .annotations
            .iter()
            .position(|a| a.id == id)
            .ok_or(StoreError::AnnotationNotFound(id))?;
        let removed = self.annotations.remove(index);
        self.renumber(removed.photo_id);
        Ok(removed)
    }

    /// Replace every annotation of a photo with `list` (used by undo).
    ///
    /// The list order becomes the new z-order. Ids are kept, so a snapshot
    /// restores the same records it was taken from.
    pub fn replace_annotations_for_photo(
        &mut self,
        photo_id: PhotoId,
        list: &[Annotation],
    ) -> Result<(), StoreError> {
        if self.photo(photo_id).is_none() {
            return Err(StoreError::PhotoNotFound(photo_id));
        }
        self.annotations.retain(|a| a.photo_id != photo_id);

        for (order, annotation) in list.iter().enumerate() {
            let mut restored = annotation.clone();
            if restored.id == 0 || self.annotation(restored.id).is_some() {
                restored.id = self.next_annotation_id;
            }
            restored.photo_id = photo_id;
            restored.order = order as u32;
            restored.normalize();
            self.next_annotation_id = self.next_annotation_id.max(restored.id + 1);
            self.annotations.push(restored);
        }
        Ok(())
    }

    /// Assign order `i` to the `i`-th id in `ordered_ids`.
    ///
    /// `ordered_ids` must contain every annotation of the photo exactly once.
    pub fn reorder(&mut self, photo_id: PhotoId, ordered_ids: &[AnnotationId]) -> Result<(), StoreError> {
        let mut current: Vec<AnnotationId> = self
            .annotations
            .iter()
            .filter(|a| a.photo_id == photo_id)
            .map(|a| a.id)
            .collect();
        let mut requested = ordered_ids.to_vec();
        current.sort_unstable();
        requested.sort_unstable();
        if current != requested {
            return Err(StoreError::ReorderMismatch(photo_id));
        }

        for annotation in self.annotations.iter_mut().filter(|a| a.photo_id == photo_id) {
            if let Some(position) = ordered_ids.iter().position(|&id| id == annotation.id) {
                annotation.order = position as u32;
            }
        }
        Ok(())
    }

    /// Re-assign a dense `0..n` order keeping the current relative order
    fn renumber(&mut self, photo_id: PhotoId) {
        let ordered: Vec<AnnotationId> = self.annotations_for(photo_id).iter().map(|a| a.id).collect();
        for annotation in self.annotations.iter_mut().filter(|a| a.photo_id == photo_id) {
            if let Some(position) = ordered.iter().position(|&id| id == annotation.id) {
                annotation.order = position as u32;
            }
        }
    }

    // ------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------

    /// Fix records read from disk so the invariants hold again.
    ///
    /// Drops annotations whose photo is gone, clamps values, renumbers
    /// orders and moves the id counters past every stored id. Returns the
    /// number of dropped annotations.
    pub fn repair(&mut self) -> usize {
        let before = self.annotations.len();
        let photos: Vec<PhotoId> = self.photos.iter().map(|p| p.id).collect();
        self.annotations.retain(|a| photos.contains(&a.photo_id));
        let dropped = before - self.annotations.len();

        for annotation in &mut self.annotations {
            annotation.normalize();
        }
        for photo_id in photos {
            self.renumber(photo_id);
        }

        let max_photo = self.photos.iter().map(|p| p.id).max().unwrap_or(0);
        let max_annotation = self.annotations.iter().map(|a| a.id).max().unwrap_or(0);
        self.next_photo_id = self.next_photo_id.max(max_photo + 1);
        self.next_annotation_id = self.next_annotation_id.max(max_annotation + 1);
        self.version = LIBRARY_VERSION;
        dropped
    }
}
