use bevy::math::Vec2;

use crate::model::clamp_unit;

/// Rectangle a photo is drawn into, in y-down pixel space.
///
/// On screen this is the area the photo sprite currently covers; for export
/// it is the bitmap bounds `(0, 0, width, height)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayRect {
    pub min: Vec2,
    pub size: Vec2,
}

impl DisplayRect {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    /// Bitmap bounds anchored at the origin
    pub fn from_size(width: f32, height: f32) -> Self {
        Self::new(Vec2::ZERO, Vec2::new(width, height))
    }

    /// Rectangle spanned by two opposite corners in any order
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        let min = a.min(b);
        Self::new(min, a.max(b) - min)
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    /// Whether the rectangle has no usable area
    pub fn is_degenerate(&self) -> bool {
        !(self.size.x.is_finite() && self.size.y.is_finite())
            || self.size.x <= f32::EPSILON
            || self.size.y <= f32::EPSILON
    }

    /// Normalized coordinate to pixel coordinate
    pub fn map(&self, normalized: Vec2) -> Vec2 {
        self.min + normalized * self.size
    }

    /// Pixel coordinate to normalized coordinate, `None` for a degenerate rect
    pub fn unmap(&self, pixel: Vec2) -> Option<Vec2> {
        if self.is_degenerate() {
            return None;
        }
        Some((pixel - self.min) / self.size)
    }

    /// Like [`Self::unmap`], clamped into the unit square
    pub fn unmap_clamped(&self, pixel: Vec2) -> Option<Vec2> {
        self.unmap(pixel).map(clamp_unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_scales_and_offsets() {
        let rect = DisplayRect::new(Vec2::new(100.0, 50.0), Vec2::new(400.0, 200.0));
        assert_eq!(rect.map(Vec2::ZERO), Vec2::new(100.0, 50.0));
        assert_eq!(rect.map(Vec2::ONE), Vec2::new(500.0, 250.0));
        assert_eq!(rect.map(Vec2::new(0.5, 0.25)), Vec2::new(300.0, 100.0));
    }

    #[test]
    fn test_unmap_inverts_map() {
        let rect = DisplayRect::new(Vec2::new(-30.0, 12.0), Vec2::new(640.0, 480.0));
        let n = Vec2::new(0.37, 0.81);
        let back = rect.unmap(rect.map(n)).unwrap();
        assert!((back - n).length() < 0.0001);
    }

    #[test]
    fn test_unmap_clamped_outside_rect() {
        let rect = DisplayRect::from_size(100.0, 100.0);
        assert_eq!(
            rect.unmap_clamped(Vec2::new(-20.0, 250.0)),
            Some(Vec2::new(0.0, 1.0))
        );
        // Unclamped keeps the overshoot
        assert_eq!(rect.unmap(Vec2::new(150.0, 50.0)), Some(Vec2::new(1.5, 0.5)));
    }

    #[test]
    fn test_degenerate_rect_has_no_inverse() {
        let rect = DisplayRect::from_size(0.0, 100.0);
        assert!(rect.is_degenerate());
        assert_eq!(rect.unmap(Vec2::new(10.0, 10.0)), None);
        assert_eq!(rect.unmap_clamped(Vec2::new(10.0, 10.0)), None);
    }

    #[test]
    fn test_from_corners_orders_points() {
        let rect = DisplayRect::from_corners(Vec2::new(300.0, 20.0), Vec2::new(100.0, 220.0));
        assert_eq!(rect.min, Vec2::new(100.0, 20.0));
        assert_eq!(rect.size, Vec2::new(200.0, 200.0));
        assert_eq!(rect.center(), Vec2::new(200.0, 120.0));
    }
}
