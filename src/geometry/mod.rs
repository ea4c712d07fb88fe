//! Pure geometry for measurement annotations.
//!
//! Everything here works on plain [`Vec2`](bevy::math::Vec2) values in a
//! y-down pixel space, so the same code serves the on-screen overlay and the
//! full resolution export.
//!
//! - [`mapping`] - normalized <-> pixel transforms through a [`DisplayRect`]
//! - [`decoration`] - arrow, T-bar and dot glyphs at line ends
//! - [`label`] - upright label angle and label text
//! - [`hit_test`] - endpoint handle and line body picking
//! - [`scale`] - export scale factor

pub mod decoration;
pub mod label;
pub mod mapping;
pub mod scale;

pub use decoration::{EndpointDecoration, Segment, endpoint_decoration};
pub use hit_test::{EndpointHandle, hit_test_body, hit_test_endpoints};
pub use label::{format_value, label_angle_degrees, label_text};
pub use mapping::DisplayRect;
pub use scale::export_scale_factor;
