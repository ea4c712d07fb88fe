//! Centralized constants used across the application.
//!
//! This module contains magic numbers and configuration values that are used
//! in multiple places or would benefit from being named constants.

/// Default window width in pixels
pub const DEFAULT_WINDOW_WIDTH: f32 = 1600.0;

/// Default window height in pixels
pub const DEFAULT_WINDOW_HEIGHT: f32 = 900.0;

/// Reference bitmap width for export scaling. A 1080px wide export renders
/// strokes and labels at the same size as the on-screen view.
pub const STANDARD_SCREEN_WIDTH: f32 = 1080.0;

/// Exponent of the export scale power law (1080px -> 1.0, 2160px -> ~1.62).
pub const EXPORT_SCALE_EXPONENT: f32 = 0.7;

/// Default upper bound for the export scale factor
pub const DEFAULT_MAX_EXPORT_SCALE: f32 = 2.0;

/// Allowed range for the user-configurable export scale cap
pub const MAX_EXPORT_SCALE_RANGE: (f32, f32) = (1.0, 4.0);

/// Pointer distance in screen pixels for grabbing an endpoint handle
pub const TOUCH_THRESHOLD: f32 = 50.0;

/// Label text size at scale factor 1.0
pub const BASE_TEXT_SIZE: f32 = 40.0;

/// Distance between the line and the label baseline at scale factor 1.0
pub const LABEL_OFFSET: f32 = 10.0;

/// Shadow radius behind label text at scale factor 1.0
pub const SHADOW_RADIUS: f32 = 2.0;

/// Control point circle radius at scale factor 1.0
pub const CONTROL_POINT_RADIUS: f32 = 20.0;

/// Minimum arrow/endpoint decoration size
pub const MIN_ARROW_SIZE: f32 = 30.0;

/// Decoration size as a multiple of the stroke width
pub const ARROW_SIZE_PER_WIDTH: f32 = 5.0;

/// Half-angle between an arrow wing and the line, in degrees
pub const ARROW_WING_ANGLE_DEG: f32 = 30.0;

/// Stroke width of a newly created annotation
pub const DEFAULT_STROKE_WIDTH: f32 = 5.0;

/// Stroke width bounds offered by the properties dialog
pub const STROKE_WIDTH_RANGE: (f32, f32) = (1.0, 20.0);

/// Screen-relative placement of a new annotation (fractions of the viewport)
pub const NEW_ANNOTATION_START: (f32, f32) = (0.2, 0.5);
pub const NEW_ANNOTATION_END: (f32, f32) = (0.8, 0.5);

/// Longest side of the annotated thumbnails in the photo list
pub const THUMBNAIL_SIZE: u32 = 160;

/// Maximum number of thumbnails to render per frame.
/// Higher values load faster but may cause frame drops.
pub const MAX_THUMBNAILS_PER_FRAME: usize = 2;

/// JPEG quality for exported images
pub const EXPORT_JPEG_QUALITY: u8 = 95;

/// How long transient notifications stay on screen, in seconds
pub const NOTIFICATION_SECONDS: f32 = 3.5;

/// Maximum number of undo snapshots kept per photo
pub const MAX_HISTORY_SIZE: usize = 100;
