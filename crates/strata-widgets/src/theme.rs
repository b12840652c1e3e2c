//! Colour conversion and shared UI colours

use iced::Color;
use strata_core::Rgb;

/// Canvas background behind the plot
pub const CANVAS_BACKGROUND: Color = Color::WHITE;

/// Legend text
pub const LEGEND_TEXT: Color = Color::from_rgb(0.85, 0.85, 0.85);

/// Legend text for a formation hidden by exclusive visibility
pub const LEGEND_TEXT_MUTED: Color = Color::from_rgb(0.45, 0.45, 0.45);

/// Border around the legend entry currently emphasised
pub const LEGEND_ACTIVE_BORDER: Color = Color::from_rgb(1.0, 0.8, 0.3);

pub fn to_color(rgb: Rgb) -> Color {
    Color::from_rgb8(rgb.r, rgb.g, rgb.b)
}

pub fn with_alpha(rgb: Rgb, alpha: f32) -> Color {
    Color {
        a: alpha.clamp(0.0, 1.0),
        ..to_color(rgb)
    }
}
