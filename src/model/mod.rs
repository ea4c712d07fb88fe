//! Persisted data model: photos and their measurement annotations.
//!
//! These types are plain data with serde support. They carry no ECS
//! components; the store keeps them in a [`crate::store::PhotoLibrary`].

mod annotation;
mod color;
mod photo;
mod style;

pub use annotation::{Annotation, AnnotationDraft, LengthUnit, clamp_unit};
pub use color::{ArgbColor, PaletteColor};
pub use photo::Photo;
pub use style::EndpointStyle;

/// Identifier of a stored photo
pub type PhotoId = u64;

/// Identifier of a stored annotation
pub type AnnotationId = u64;
