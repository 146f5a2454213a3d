/// Scene lighting: one ambient term and one directional term.
///
/// Both are linear RGB in [0, 1]. The ambient color doubles as the
/// background clear color.

use glam::Vec3;

/// Default ambient color (light grey)
pub const DEFAULT_AMBIENT: u32 = 0xBBBBBB;

/// Default directional color (white)
pub const DEFAULT_DIRECTIONAL: u32 = 0xFFFFFF;

/// Ambient and directional light colors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub ambient: Vec3,
    pub directional: Vec3,
}

impl Light {
    pub fn new(ambient: Vec3, directional: Vec3) -> Self {
        Self { ambient, directional }
    }

    /// Build from packed `0xRRGGBB` integers. Bits above the low 24 are ignored.
    pub fn from_rgb(ambient: u32, directional: u32) -> Self {
        Self {
            ambient: unpack_rgb(ambient),
            directional: unpack_rgb(directional),
        }
    }
}

impl Default for Light {
    fn default() -> Self {
        Self::from_rgb(DEFAULT_AMBIENT, DEFAULT_DIRECTIONAL)
    }
}

/// `0xRRGGBB` -> (r, g, b) / 255
pub fn unpack_rgb(rgb: u32) -> Vec3 {
    let r = (rgb >> 16) & 0xFF;
    let g = (rgb >> 8) & 0xFF;
    let b = rgb & 0xFF;
    Vec3::new(r as f32, g as f32, b as f32) / 255.0
}

#[cfg(test)]
#[path = "light_tests.rs"]
mod tests;
