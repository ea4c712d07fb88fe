//! Centralized color theme for the application.
//!
//! This module provides the colors used by the editor UI and the viewport.
//! Annotation colors themselves are stored per annotation as ARGB values.

use bevy::prelude::Color;
use bevy_egui::egui;

use crate::model::ArgbColor;

// ============================================================================
// Viewport Colors
// ============================================================================

/// Dark neutral background behind the photo
pub const VIEWPORT_BACKGROUND: Color = Color::srgb(0.11, 0.11, 0.12);

// ============================================================================
// Overlay Colors
// ============================================================================

/// Ring drawn around the handles of the selected line
pub const SELECTION_RING: egui::Color32 = egui::Color32::WHITE;

/// Width of the selection ring
pub const SELECTION_RING_WIDTH: f32 = 2.0;

// ============================================================================
// UI Colors (egui)
// ============================================================================

pub mod ui {
    use bevy_egui::egui;

    /// Light grey for label text
    pub const LABEL_TEXT: egui::Color32 = egui::Color32::LIGHT_GRAY;

    /// Grey for help/hint text
    pub const HINT_TEXT: egui::Color32 = egui::Color32::GRAY;

    /// White for selected row borders
    pub const SELECTED_BORDER: egui::Color32 = egui::Color32::WHITE;

    /// Dark grey for swatch borders
    pub const UNSELECTED_BORDER: egui::Color32 = egui::Color32::DARK_GRAY;

    /// Red for error messages
    pub const ERROR_TEXT: egui::Color32 = egui::Color32::from_rgb(230, 90, 90);

    /// Green for success messages
    pub const SUCCESS_TEXT: egui::Color32 = egui::Color32::from_rgb(100, 200, 100);

    /// Background of transient notifications
    pub const TOAST_BACKGROUND: egui::Color32 = egui::Color32::from_rgba_premultiplied(30, 30, 32, 235);

    /// Placeholder behind thumbnails that are still rendering
    pub const THUMBNAIL_PLACEHOLDER: egui::Color32 = egui::Color32::from_rgb(60, 60, 60);
}

// ============================================================================
// Color Conversion Utilities
// ============================================================================

/// Convert a stored ARGB color to egui Color32 (preserving alpha)
pub fn argb_to_egui(color: ArgbColor) -> egui::Color32 {
    let [r, g, b, a] = color.to_rgba();
    egui::Color32::from_rgba_unmultiplied(r, g, b, a)
}
