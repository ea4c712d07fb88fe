use crate::constants::{EXPORT_SCALE_EXPONENT, STANDARD_SCREEN_WIDTH};

/// Multiplier for stroke widths and text sizes when drawing into a bitmap.
///
/// Follows a sub-linear power law of the bitmap width relative to a 1080px
/// reference, so large photos get thicker lines without them growing as fast
/// as the image. Never below 1.0, never above `max_scale`.
pub fn export_scale_factor(bitmap_width: f32, max_scale: f32) -> f32 {
    let max_scale = max_scale.max(1.0);
    if !(bitmap_width.is_finite() && bitmap_width > 0.0) {
        return 1.0;
    }
    let ratio = bitmap_width / STANDARD_SCREEN_WIDTH;
    ratio.powf(EXPORT_SCALE_EXPONENT).clamp(1.0, max_scale)
}
