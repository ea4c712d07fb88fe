use bevy::math::Vec2;
use serde::{Deserialize, Serialize};

use super::{AnnotationId, ArgbColor, PhotoId};
use crate::constants::DEFAULT_STROKE_WIDTH;

/// Physical unit of a measured value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LengthUnit {
    #[serde(rename = "mm")]
    Millimeter,
    #[default]
    #[serde(rename = "cm")]
    Centimeter,
    #[serde(rename = "dm")]
    Decimeter,
    #[serde(rename = "m")]
    Meter,
}

impl LengthUnit {
    pub const ALL: [Self; 4] = [
        Self::Millimeter,
        Self::Centimeter,
        Self::Decimeter,
        Self::Meter,
    ];

    /// International symbol, used for English labels
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Millimeter => "mm",
            Self::Centimeter => "cm",
            Self::Decimeter => "dm",
            Self::Meter => "m",
        }
    }
}

/// A measurement line drawn over a photo.
///
/// Endpoints are normalized to the photo's intrinsic bounds, so `(0, 0)` is
/// the top-left corner and `(1, 1)` the bottom-right corner of the image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: AnnotationId,
    pub photo_id: PhotoId,
    pub start: Vec2,
    pub end: Vec2,
    /// User-entered measured length
    pub value: f32,
    #[serde(default)]
    pub unit: LengthUnit,
    pub color: ArgbColor,
    /// Stroke width in screen pixels at scale factor 1.0
    pub width: f32,
    /// Position in the photo's list and draw order (dense, ascending)
    pub order: u32,
}

impl Annotation {
    /// Clamp both endpoints into the unit square and the width to at least 1.
    pub fn normalize(&mut self) {
        self.start = clamp_unit(self.start);
        self.end = clamp_unit(self.end);
        self.width = sanitize_width(self.width);
    }

    /// Endpoint in normalized space for the given handle
    pub fn endpoint(&self, handle: crate::geometry::EndpointHandle) -> Vec2 {
        match handle {
            crate::geometry::EndpointHandle::Start => self.start,
            crate::geometry::EndpointHandle::End => self.end,
        }
    }

    /// Move one endpoint, clamped into the unit square
    pub fn set_endpoint(&mut self, handle: crate::geometry::EndpointHandle, point: Vec2) {
        let point = clamp_unit(point);
        match handle {
            crate::geometry::EndpointHandle::Start => self.start = point,
            crate::geometry::EndpointHandle::End => self.end = point,
        }
    }
}

/// Fields of an annotation that does not have an id or order yet
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationDraft {
    pub photo_id: PhotoId,
    pub start: Vec2,
    pub end: Vec2,
    pub value: f32,
    pub unit: LengthUnit,
    pub color: ArgbColor,
    pub width: f32,
}

impl AnnotationDraft {
    /// A new measurement line with default styling
    pub fn new(photo_id: PhotoId, start: Vec2, end: Vec2, unit: LengthUnit) -> Self {
        Self {
            photo_id,
            start,
            end,
            value: 0.0,
            unit,
            color: ArgbColor::RED,
            width: DEFAULT_STROKE_WIDTH,
        }
    }
}

/// Clamp a normalized point into the unit square
pub fn clamp_unit(p: Vec2) -> Vec2 {
    // NaN from a degenerate mapping collapses to the origin
    let fix = |v: f32| if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
    Vec2::new(fix(p.x), fix(p.y))
}

pub(crate) fn sanitize_width(width: f32) -> f32 {
    if width.is_finite() { width.max(1.0) } else { DEFAULT_STROKE_WIDTH }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::EndpointHandle;

    fn sample() -> Annotation {
        Annotation {
            id: 7,
            photo_id: 1,
            start: Vec2::new(0.2, 0.5),
            end: Vec2::new(0.8, 0.5),
            value: 12.5,
            unit: LengthUnit::Centimeter,
            color: ArgbColor::RED,
            width: 5.0,
            order: 0,
        }
    }

    #[test]
    fn test_normalize_clamps_endpoints() {
        let mut a = sample();
        a.start = Vec2::new(-0.5, 1.5);
        a.end = Vec2::new(f32::NAN, 0.3);
        a.width = 0.2;
        a.normalize();
        assert_eq!(a.start, Vec2::new(0.0, 1.0));
        assert_eq!(a.end, Vec2::new(0.0, 0.3));
        assert_eq!(a.width, 1.0);
    }

    #[test]
    fn test_set_endpoint_clamps() {
        let mut a = sample();
        a.set_endpoint(EndpointHandle::End, Vec2::new(1.2, -0.1));
        assert_eq!(a.end, Vec2::new(1.0, 0.0));
        assert_eq!(a.endpoint(EndpointHandle::Start), Vec2::new(0.2, 0.5));
    }

    #[test]
    fn test_draft_defaults() {
        let d = AnnotationDraft::new(3, Vec2::ZERO, Vec2::ONE, LengthUnit::Meter);
        assert_eq!(d.value, 0.0);
        assert_eq!(d.color, ArgbColor::RED);
        assert_eq!(d.width, 5.0);
        assert_eq!(d.unit, LengthUnit::Meter);
    }

    #[test]
    fn test_unit_serde_names() {
        assert_eq!(
            serde_json::to_string(&LengthUnit::Millimeter).unwrap(),
            "\"mm\""
        );
        let parsed: LengthUnit = serde_json::from_str("\"dm\"").unwrap();
        assert_eq!(parsed, LengthUnit::Decimeter);
    }

    #[test]
    fn test_missing_unit_defaults_to_centimeter() {
        let json = r#"{"id":1,"photo_id":2,"start":[0.1,0.2],"end":[0.3,0.4],
            "value":3.0,"color":4294901760,"width":5.0,"order":0}"#;
        let a: Annotation = serde_json::from_str(json).unwrap();
        assert_eq!(a.unit, LengthUnit::Centimeter);
        assert_eq!(a.color, ArgbColor::RED);
    }
}
