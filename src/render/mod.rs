//! Annotation drawing shared by the on-screen overlay and bitmap export.
//!
//! [`scene`] turns annotations into primitives; [`raster`] paints them into
//! a tiny-skia pixmap; [`fonts`] finds a TrueType font for labels.

pub mod fonts;
pub mod raster;
pub mod scene;

use std::path::PathBuf;

pub use fonts::{LabelFont, SystemFont, load_label_font};
pub use scene::{AnnotationScene, LabelPrimitive, Primitive, SceneOptions};

/// Rendering errors
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Failed to create a {width}x{height} pixmap")]
    PixmapCreation { width: u32, height: u32 },

    #[error("Failed to read font {path:?}: {source}")]
    FontRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Not a usable font: {0}")]
    InvalidFont(String),
}
