use bevy::math::Vec2;

use crate::constants::{ARROW_SIZE_PER_WIDTH, ARROW_WING_ANGLE_DEG, MIN_ARROW_SIZE};
use crate::model::EndpointStyle;

/// Straight stroke between two pixel positions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: Vec2,
    pub to: Vec2,
}

impl Segment {
    pub fn new(from: Vec2, to: Vec2) -> Self {
        Self { from, to }
    }
}

/// Glyph drawn at one end of a measurement line
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EndpointDecoration {
    /// Two wings opening back along the line
    Arrow { left: Segment, right: Segment },
    /// Bar through the tip, perpendicular to the line
    TBar(Segment),
    /// Filled circle centred on the tip
    Dot { center: Vec2, radius: f32 },
}

impl EndpointDecoration {
    /// Stroked segments of this glyph (dots have none)
    pub fn segments(&self) -> Vec<Segment> {
        match *self {
            Self::Arrow { left, right } => vec![left, right],
            Self::TBar(bar) => vec![bar],
            Self::Dot { .. } => Vec::new(),
        }
    }
}

/// Decoration size for an already scaled stroke width
pub fn decoration_size(width: f32) -> f32 {
    (width * ARROW_SIZE_PER_WIDTH).max(MIN_ARROW_SIZE)
}

/// Build the decoration at `tip`, with `tail` being the opposite endpoint.
///
/// `width` is the stroke width after scaling. Coincident endpoints give an
/// angle of zero, so a zero-length line still gets a deterministic glyph.
pub fn endpoint_decoration(
    style: EndpointStyle,
    tip: Vec2,
    tail: Vec2,
    width: f32,
) -> EndpointDecoration {
    let direction = tail - tip;
    let angle = direction.y.atan2(direction.x);
    let size = decoration_size(width);

    match style {
        EndpointStyle::Arrow => {
            let wing = ARROW_WING_ANGLE_DEG.to_radians();
            EndpointDecoration::Arrow {
                left: Segment::new(tip, tip + Vec2::from_angle(angle + wing) * size),
                right: Segment::new(tip, tip + Vec2::from_angle(angle - wing) * size),
            }
        }
        EndpointStyle::TShape => {
            let half = Vec2::from_angle(angle + std::f32::consts::FRAC_PI_2) * (size / 2.0);
            EndpointDecoration::TBar(Segment::new(tip - half, tip + half))
        }
        EndpointStyle::Dot => EndpointDecoration::Dot {
            center: tip,
            radius: width * 2.0,
        },
    }
}
