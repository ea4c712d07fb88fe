use bevy::math::Vec2;

/// Rotation in degrees that keeps a label along `start -> end` upright.
///
/// The raw direction angle is folded into `[-90, 90]` so text never renders
/// upside down.
pub fn label_angle_degrees(start: Vec2, end: Vec2) -> f32 {
    let delta = end - start;
    let mut degrees = delta.y.atan2(delta.x).to_degrees();
    if degrees > 90.0 {
        degrees -= 180.0;
    } else if degrees < -90.0 {
        degrees += 180.0;
    }
    degrees
}

/// Measured value with at most one decimal and no trailing `.0`.
pub fn format_value(value: f32) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let rounded = (value * 10.0).round() / 10.0;
    // Avoid printing "-0"
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    if rounded.fract() == 0.0 {
        format!("{:.0}", rounded)
    } else {
        format!("{:.1}", rounded)
    }
}

/// Label shown next to a line, e.g. `12.5 cm` or `12.5 cm (#2)`.
///
/// `index` is the 1-based position in the photo's annotation list.
pub fn label_text(value: f32, unit: &str, index: Option<usize>) -> String {
    match index {
        Some(n) => format!("{} {} (#{})", format_value(value), unit, n),
        None => format!("{} {}", format_value(value), unit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_horizontal_and_vertical_angles() {
        assert!(label_angle_degrees(Vec2::ZERO, Vec2::new(10.0, 0.0)).abs() < 0.001);
        assert!((label_angle_degrees(Vec2::ZERO, Vec2::new(0.0, 10.0)) - 90.0).abs() < 0.001);
        assert!((label_angle_degrees(Vec2::ZERO, Vec2::new(0.0, -10.0)) + 90.0).abs() < 0.001);
    }

    #[test]
    fn test_right_to_left_line_is_folded() {
        // Pointing left: raw angle 180 -> 0
        assert!(label_angle_degrees(Vec2::new(10.0, 0.0), Vec2::ZERO).abs() < 0.001);
        // Down-left: raw 135 -> -45
        let deg = label_angle_degrees(Vec2::ZERO, Vec2::new(-10.0, 10.0));
        assert!((deg + 45.0).abs() < 0.001);
        // Up-left: raw -135 -> 45
        let deg = label_angle_degrees(Vec2::ZERO, Vec2::new(-10.0, -10.0));
        assert!((deg - 45.0).abs() < 0.001);
    }

    #[test]
    fn test_angle_always_within_upright_range() {
        for step in 0..36 {
            let theta = (step as f32 * 10.0).to_radians();
            let deg = label_angle_degrees(Vec2::ZERO, Vec2::from_angle(theta) * 50.0);
            assert!((-90.0..=90.0).contains(&deg), "angle {} out of range", deg);
        }
    }

    #[test]
    fn test_zero_length_line_angle() {
        assert_eq!(label_angle_degrees(Vec2::ONE, Vec2::ONE), 0.0);
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(0.0), "0");
        assert_eq!(format_value(12.0), "12");
        assert_eq!(format_value(12.5), "12.5");
        assert_eq!(format_value(12.04), "12");
        assert_eq!(format_value(3.26), "3.3");
        assert_eq!(format_value(-0.01), "0");
    }

    #[test]
    fn test_label_text_with_and_without_index() {
        assert_eq!(label_text(12.5, "cm", None), "12.5 cm");
        assert_eq!(label_text(3.0, "mm", Some(2)), "3 mm (#2)");
    }
}
