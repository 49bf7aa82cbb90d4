//! Per-vertex point-light shading
//!
//! Blinn-Phong with inverse-square falloff, evaluated in linear light
//! space. One flat normal per triangle; the rasterizer interpolates
//! the three vertex intensities across the pixels it fills.

use super::math::Vec3;
use super::types::Light;

/// Flat face normal from two edge vectors.
///
/// Degenerate (zero-area) triangles come out as the zero vector; the
/// rasterizer filters those before lighting runs.
pub fn face_normal(v1: Vec3, v2: Vec3, v3: Vec3) -> Vec3 {
    (v2 - v1).cross(v3 - v1).normalize()
}

/// Outgoing radiance at one vertex.
///
/// View direction is the negated vertex position (camera at the
/// origin looking down +z). Specular only contributes on the lit
/// side of the surface. Falloff is inverse-square, scaled by the
/// near-plane distance so intensities survive the projection scale.
pub fn vertex_intensity(pos: Vec3, normal: Vec3, light: &Light, near: f32) -> f32 {
    let view = -pos;
    let lvec = light.position + view;
    let ldir = lvec.normalize();

    let lambertian = ldir.dot(normal).max(0.0);

    let spec = if lambertian > 0.0 {
        let halfdir = (ldir + view.normalize()).normalize();
        halfdir.dot(normal).max(0.0).powf(light.shininess)
    } else {
        0.0
    };

    let ambient = light.power.sqrt();
    let falloff = near / lvec.len_sq();

    (ambient + (lambertian + spec) * light.power) * falloff
}

#[cfg(test)]
mod tests {
    use super::*;

    fn light_at(pos: Vec3) -> Light {
        Light { position: pos, power: 16.0, shininess: 4.0 }
    }

    #[test]
    fn test_intensity_decreases_with_distance() {
        // Vertex facing the camera, light pulled straight back from it
        let pos = Vec3::new(0.0, 0.0, 500.0);
        let normal = Vec3::new(0.0, 0.0, -1.0);

        let mut prev = f32::INFINITY;
        for d in [100.0, 200.0, 300.0, 400.0] {
            let light = light_at(Vec3::new(0.0, 0.0, 500.0 - d));
            let i = vertex_intensity(pos, normal, &light, 100.0);
            assert!(i < prev, "intensity not decreasing at distance {}", d);
            prev = i;
        }
    }

    #[test]
    fn test_unlit_side_gets_ambient_only() {
        // Normal points away from the light: no diffuse, no specular
        let pos = Vec3::new(0.0, 0.0, 500.0);
        let normal = Vec3::new(0.0, 0.0, 1.0);
        let light = light_at(Vec3::new(0.0, 0.0, 100.0));

        let i = vertex_intensity(pos, normal, &light, 100.0);
        let lvec = light.position + -pos;
        let expected = light.power.sqrt() * 100.0 / lvec.len_sq();
        assert!((i - expected).abs() < 1e-6);
    }

    #[test]
    fn test_specular_adds_on_lit_side() {
        // Light along the view axis: half vector == normal, full lobe
        let pos = Vec3::new(0.0, 0.0, 500.0);
        let normal = Vec3::new(0.0, 0.0, -1.0);
        let light = light_at(Vec3::new(0.0, 0.0, 100.0));

        let i = vertex_intensity(pos, normal, &light, 100.0);
        let lvec = light.position + -pos;
        // lambertian = 1, spec = 1
        let expected = (light.power.sqrt() + 2.0 * light.power) * 100.0 / lvec.len_sq();
        assert!((i - expected).abs() < 1e-3);
    }

    #[test]
    fn test_degenerate_face_normal_is_zero() {
        let n = face_normal(
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(2.0, 2.0, 1.0),
        );
        assert_eq!(n, Vec3::ZERO);
    }
}
