//! Colours shared by the scene, the SVG snapshot and the widgets
//!
//! Kept free of any GUI type so the core stays testable headless; the widget
//! crate converts [`Rgb`] into its toolkit colour.

use std::fmt;

/// 8-bit sRGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

pub const BLACK: Rgb = Rgb::new(0, 0, 0);
pub const WHITE: Rgb = Rgb::new(255, 255, 255);

/// Faint per-row background strip
pub const ROW_STRIP: Rgb = Rgb::new(0xf2, 0xf2, 0xf2);
/// Bold dashed separator between groups
pub const SEPARATOR: Rgb = Rgb::new(0x33, 0x33, 0x33);
/// Translucent background behind new groups
pub const NEW_GROUP_BACKGROUND: Rgb = Rgb::new(0xff, 0xe0, 0x82);
/// Marker line above the first new group
pub const NEW_GROUP_MARKER: Rgb = Rgb::new(0xd6, 0x27, 0x28);
/// Axis lines and tick labels
pub const AXIS: Rgb = Rgb::new(0x55, 0x55, 0x55);
/// Group label text
pub const GROUP_LABEL: Rgb = Rgb::new(0x22, 0x22, 0x22);

/// Categorical palette for formation fills (20 distinct hues)
pub const FORMATION_PALETTE: [Rgb; 20] = [
    Rgb::new(0x1f, 0x77, 0xb4), // Blue
    Rgb::new(0xae, 0xc7, 0xe8), // Light blue
    Rgb::new(0xff, 0x7f, 0x0e), // Orange
    Rgb::new(0xff, 0xbb, 0x78), // Light orange
    Rgb::new(0x2c, 0xa0, 0x2c), // Green
    Rgb::new(0x98, 0xdf, 0x8a), // Light green
    Rgb::new(0xd6, 0x27, 0x28), // Red
    Rgb::new(0xff, 0x98, 0x96), // Light red
    Rgb::new(0x94, 0x67, 0xbd), // Purple
    Rgb::new(0xc5, 0xb0, 0xd5), // Light purple
    Rgb::new(0x8c, 0x56, 0x4b), // Brown
    Rgb::new(0xc4, 0x9c, 0x94), // Light brown
    Rgb::new(0xe3, 0x77, 0xc2), // Pink
    Rgb::new(0xf7, 0xb6, 0xd2), // Light pink
    Rgb::new(0x7f, 0x7f, 0x7f), // Gray
    Rgb::new(0xc7, 0xc7, 0xc7), // Light gray
    Rgb::new(0xbc, 0xbd, 0x22), // Olive
    Rgb::new(0xdb, 0xdb, 0x8d), // Light olive
    Rgb::new(0x17, 0xbe, 0xcf), // Cyan
    Rgb::new(0x9e, 0xda, 0xe5), // Light cyan
];

/// Deterministic palette colour for a formation name
///
/// FNV-1a over the UTF-8 bytes, so the same name maps to the same colour
/// across sessions and machines regardless of load order.
pub fn formation_color(name: &str) -> Rgb {
    const FNV_OFFSET: u32 = 0x811c_9dc5;
    const FNV_PRIME: u32 = 0x0100_0193;

    let hash = name
        .as_bytes()
        .iter()
        .fold(FNV_OFFSET, |h, &b| (h ^ b as u32).wrapping_mul(FNV_PRIME));
    FORMATION_PALETTE[hash as usize % FORMATION_PALETTE.len()]
}
