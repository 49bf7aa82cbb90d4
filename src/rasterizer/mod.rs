//! Software rasterizer with a single point light
//!
//! One synchronous pass per frame:
//! - Perspective projection onto the near clipping plane
//! - Edge-function scan conversion with per-pixel depth testing
//! - Flat-normal Blinn-Phong shading evaluated per vertex and
//!   interpolated per pixel, in linear light space
//! - Rough sRGB conversion (square-root tone map) on output
//!
//! Geometry arrives as a flat stream of vertex attributes; see
//! [`TRI_STRIDE`] for the interchange contract.

mod math;
mod types;
mod lighting;
mod render;

pub use math::*;
pub use types::*;
pub use lighting::*;
pub use render::*;
