//! Core types for the rasterizer

use serde::{Serialize, Deserialize};
use super::math::Vec3;

/// Number of values per vertex in the flat stream: x, y, z, r, g, b
pub const VERTEX_STRIDE: usize = 6;

/// Number of values per triangle in the flat stream (3 vertices)
pub const TRI_STRIDE: usize = 3 * VERTEX_STRIDE;

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Convert to [u8; 4] for framebuffer
    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// A vertex parsed out of the flat stream: camera-space position plus
/// a linear-light base color (per-channel reflectance, pre-lighting,
/// not clamped to a displayable range).
#[derive(Debug, Clone, Copy, Default)]
pub struct Vertex {
    pub pos: Vec3,
    pub color: Vec3,
}

impl Vertex {
    pub fn new(pos: Vec3, color: Vec3) -> Self {
        Self { pos, color }
    }

    /// Parse one vertex from a VERTEX_STRIDE slice of the stream
    pub fn from_slice(v: &[f32]) -> Self {
        Self {
            pos: Vec3::new(v[0], v[1], v[2]),
            color: Vec3::new(v[3], v[4], v[5]),
        }
    }
}

/// A single point light.
///
/// `power` drives both the diffuse/specular magnitude and the ambient
/// floor; `shininess` is the specular exponent. Both are expected to
/// be non-negative (the renderer's setters enforce this).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Light {
    pub position: Vec3,
    pub power: f32,
    pub shininess: f32,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            position: Vec3::new(-1000.0, -500.0, 16000.0),
            power: 128.0,
            shininess: 4.0,
        }
    }
}

/// Diagnostic switches
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DebugFlags {
    /// Log skipped degenerate triangles to stderr
    pub log_degenerate: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_from_slice() {
        let v = Vertex::from_slice(&[1.0, 2.0, 3.0, 255.0, 0.0, 127.0]);
        assert_eq!(v.pos, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(v.color, Vec3::new(255.0, 0.0, 127.0));
    }
}
