//! Whole-stream rigid transforms
//!
//! These walk the flat vertex stream in place, VERTEX_STRIDE values
//! per vertex, rotating/translating positions and leaving colors
//! untouched (except `dim`, which only touches colors). Applied by
//! the driver before the stream reaches the rasterizer.

use crate::rasterizer::VERTEX_STRIDE;

/// Rotate every position about the x axis (pitch)
pub fn rotate_x(stream: &mut [f32], theta: f32) {
    let (s, c) = theta.sin_cos();
    for v in stream.chunks_exact_mut(VERTEX_STRIDE) {
        let y = v[1];
        let z = v[2];
        v[1] = c * y + s * z;
        v[2] = c * z - s * y;
    }
}

/// Rotate every position about the y axis (yaw)
pub fn rotate_y(stream: &mut [f32], theta: f32) {
    let (s, c) = theta.sin_cos();
    for v in stream.chunks_exact_mut(VERTEX_STRIDE) {
        let x = v[0];
        let z = v[2];
        v[0] = c * x - s * z;
        v[2] = c * z + s * x;
    }
}

/// Rotate every position about the z axis (roll)
pub fn rotate_z(stream: &mut [f32], theta: f32) {
    let (s, c) = theta.sin_cos();
    for v in stream.chunks_exact_mut(VERTEX_STRIDE) {
        let x = v[0];
        let y = v[1];
        v[0] = c * x - s * y;
        v[1] = c * y + s * x;
    }
}

/// Push every position along the depth axis
pub fn translate_z(stream: &mut [f32], dist: f32) {
    for v in stream.chunks_exact_mut(VERTEX_STRIDE) {
        v[2] += dist;
    }
}

/// Divide every base color by `factor`
pub fn dim(stream: &mut [f32], factor: f32) {
    for v in stream.chunks_exact_mut(VERTEX_STRIDE) {
        v[3] /= factor;
        v[4] /= factor;
        v[5] /= factor;
    }
}
