//! Procedural height-field terrain
//!
//! An animated grid of height samples, triangulated into the flat
//! vertex stream the rasterizer consumes. Pure data generation; the
//! caller applies whole-scene transforms and hands the stream to the
//! renderer.

use serde::{Serialize, Deserialize};
use macroquad::rand::gen_range;

use crate::rasterizer::{Vec3, TRI_STRIDE};

/// Grid extent in world units, inclusive on both ends
pub const GRID_MIN: f32 = -500.0;
pub const GRID_MAX: f32 = 500.0;
/// Spacing between grid nodes
pub const CELL_SIZE: f32 = 100.0;
/// Nodes along one axis
pub const GRID_NODES: usize = 11;

/// Camera-space depth of the backdrop quad
pub const BACKGROUND_DEPTH: f32 = 17500.0;
/// Backdrop base color, linear light (deliberately over-range blue)
pub const BACKGROUND_COLOR: Vec3 = Vec3 { x: 12.0, y: 200.0, z: 655.0 };

/// Height-field deformation applied each frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeformMode {
    /// Travelling two-axis sine wave
    Sin,
    /// Per-node random phase, slow oscillation
    Random,
    /// No deformation
    Flat,
}

impl DeformMode {
    pub fn label(&self) -> &'static str {
        match self {
            DeformMode::Sin => "sin",
            DeformMode::Random => "random",
            DeformMode::Flat => "flat",
        }
    }
}

/// Vertex base-color scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorMode {
    /// Height-dependent greens
    Grass,
    /// One primary per corner
    Rgb,
    /// Uniform mid-gray
    Gray,
}

impl ColorMode {
    pub fn label(&self) -> &'static str {
        match self {
            ColorMode::Grass => "grass",
            ColorMode::Rgb => "rgb",
            ColorMode::Gray => "gray",
        }
    }
}

/// Animated terrain grid. Owns the random phase lattice so the
/// Random mode oscillates coherently across frames.
pub struct Terrain {
    pub deform: DeformMode,
    pub color: ColorMode,
    phases: Vec<f32>,
}

impl Terrain {
    pub fn new() -> Self {
        let phases = (0..GRID_NODES * GRID_NODES)
            .map(|_| gen_range(0.0, std::f32::consts::TAU))
            .collect();
        Self {
            deform: DeformMode::Sin,
            color: ColorMode::Grass,
            phases,
        }
    }

    /// Height at grid node (ix, iz) for the given time in milliseconds
    fn height(&self, ix: usize, iz: usize, time_ms: f32) -> f32 {
        let x = GRID_MIN + ix as f32 * CELL_SIZE;
        let z = GRID_MIN + iz as f32 * CELL_SIZE;
        match self.deform {
            DeformMode::Sin => {
                (((x + time_ms / 10.0) / 150.0).sin() + ((z + time_ms / 10.0) / 150.0).sin()) * 100.0
            }
            DeformMode::Random => {
                (self.phases[iz * GRID_NODES + ix] + time_ms / 2000.0).sin() * 100.0
            }
            DeformMode::Flat => 0.0,
        }
    }

    fn vertex_color(&self, corner: usize, y: f32) -> Vec3 {
        match self.color {
            ColorMode::Grass => Vec3::new(
                350.0 - (y / 3.0).min(0.0),
                250.0 - (y * 4.0).min(0.0),
                80.0 - y.min(0.0),
            ),
            ColorMode::Rgb => match corner {
                0 => Vec3::new(255.0, 20.0, 20.0),
                1 => Vec3::new(20.0, 255.0, 20.0),
                _ => Vec3::new(20.0, 20.0, 255.0),
            },
            ColorMode::Gray => Vec3::new(127.0, 127.0, 127.0),
        }
    }

    /// Generate the triangle stream for one frame: two triangles per
    /// grid cell, TRI_STRIDE values each, in world coordinates
    /// (y up/down as deformation, terrain in the x/z plane).
    pub fn triangles(&self, time_ms: f32) -> Vec<f32> {
        let mut heights = vec![0.0f32; GRID_NODES * GRID_NODES];
        for iz in 0..GRID_NODES {
            for ix in 0..GRID_NODES {
                heights[iz * GRID_NODES + ix] = self.height(ix, iz, time_ms);
            }
        }

        let cells = GRID_NODES - 1;
        let mut stream = Vec::with_capacity(cells * cells * 2 * TRI_STRIDE);

        for iz in 0..cells {
            for ix in 0..cells {
                let x = GRID_MIN + ix as f32 * CELL_SIZE;
                let z = GRID_MIN + iz as f32 * CELL_SIZE;

                let y1 = heights[iz * GRID_NODES + ix];
                let y2 = heights[(iz + 1) * GRID_NODES + ix + 1];
                let y3 = heights[(iz + 1) * GRID_NODES + ix];
                let y4 = heights[iz * GRID_NODES + ix + 1];

                let c1 = self.vertex_color(0, y1);
                let c2 = self.vertex_color(1, y2);
                let c3 = self.vertex_color(2, y3);
                let c4 = self.vertex_color(3, y4);

                push_vertex(&mut stream, x, y1, z, c1);
                push_vertex(&mut stream, x + CELL_SIZE, y2, z + CELL_SIZE, c2);
                push_vertex(&mut stream, x, y3, z + CELL_SIZE, c3);

                push_vertex(&mut stream, x, y1, z, c1);
                push_vertex(&mut stream, x + CELL_SIZE, y4, z, c4);
                push_vertex(&mut stream, x + CELL_SIZE, y2, z + CELL_SIZE, c2);
            }
        }

        stream
    }
}

impl Default for Terrain {
    fn default() -> Self {
        Self::new()
    }
}

fn push_vertex(stream: &mut Vec<f32>, x: f32, y: f32, z: f32, color: Vec3) {
    stream.extend_from_slice(&[x, y, z, color.x, color.y, color.z]);
}

/// Backdrop quad filling the viewport behind the terrain, already in
/// camera space (it skips the whole-scene transforms).
pub fn background(width: f32, height: f32) -> Vec<f32> {
    let c = BACKGROUND_COLOR;
    let mut stream = Vec::with_capacity(2 * TRI_STRIDE);
    push_vertex(&mut stream, -width, -height, BACKGROUND_DEPTH, c);
    push_vertex(&mut stream, -width, height, BACKGROUND_DEPTH, c);
    push_vertex(&mut stream, width, -height, BACKGROUND_DEPTH, c);
    push_vertex(&mut stream, -width, height, BACKGROUND_DEPTH, c);
    push_vertex(&mut stream, width, height, BACKGROUND_DEPTH, c);
    push_vertex(&mut stream, width, -height, BACKGROUND_DEPTH, c);
    stream
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_shape() {
        let terrain = Terrain::new();
        let stream = terrain.triangles(0.0);
        let cells = GRID_NODES - 1;
        assert_eq!(stream.len(), cells * cells * 2 * TRI_STRIDE);
    }

    #[test]
    fn test_flat_mode_has_zero_heights() {
        let mut terrain = Terrain::new();
        terrain.deform = DeformMode::Flat;
        let stream = terrain.triangles(1234.0);
        for v in stream.chunks_exact(6) {
            assert_eq!(v[1], 0.0);
        }
    }

    #[test]
    fn test_grass_color_at_ground_level() {
        let terrain = Terrain::new();
        let c = terrain.vertex_color(0, 0.0);
        assert_eq!(c, Vec3::new(350.0, 250.0, 80.0));
    }

    #[test]
    fn test_grass_brightens_in_valleys() {
        let terrain = Terrain::new();
        let valley = terrain.vertex_color(0, -90.0);
        let ridge = terrain.vertex_color(0, 90.0);
        assert!(valley.x > ridge.x && valley.y > ridge.y && valley.z > ridge.z);
    }

    #[test]
    fn test_background_shape() {
        let bg = background(800.0, 600.0);
        assert_eq!(bg.len(), 2 * TRI_STRIDE);
        for v in bg.chunks_exact(6) {
            assert_eq!(v[2], BACKGROUND_DEPTH);
        }
    }
}
