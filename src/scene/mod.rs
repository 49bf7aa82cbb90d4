//! Demo scene: procedural terrain, whole-stream transforms, presets
//!
//! Everything here sits outside the rasterizer core; it produces and
//! massages the flat vertex stream the renderer draws.

mod terrain;
mod transform;
mod preset;

pub use terrain::*;
pub use transform::*;
pub use preset::*;
