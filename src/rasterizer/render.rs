//! Core rendering: framebuffer storage and triangle scan conversion

use std::path::Path;

use super::math::{project, Vec2, Vec3};
use super::lighting::{face_normal, vertex_intensity};
use super::types::{Color, DebugFlags, Light, Vertex, TRI_STRIDE, VERTEX_STRIDE};

/// Screen-space doubled areas below this are treated as colinear
const DEGENERATE_EPS: f32 = 1e-4;

/// Errors from rejected renderer configuration
#[derive(Debug)]
pub enum RendererError {
    /// Light position must be exactly 3 components
    InvalidLightPosition(usize),
    /// Light power must be finite and non-negative
    InvalidLightPower(f32),
    /// Shininess must be finite and non-negative
    InvalidShininess(f32),
}

impl std::fmt::Display for RendererError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RendererError::InvalidLightPosition(n) => {
                write!(f, "light position needs 3 components, got {}", n)
            }
            RendererError::InvalidLightPower(v) => write!(f, "invalid light power: {}", v),
            RendererError::InvalidShininess(v) => write!(f, "invalid shininess: {}", v),
        }
    }
}

impl std::error::Error for RendererError {}

/// Framebuffer for software rendering: an RGBA color image and a
/// depth map in lock-step (same linear index for the same pixel).
pub struct Framebuffer {
    pub pixels: Vec<u8>,   // RGBA, 4 bytes per pixel
    pub depth: Vec<f32>,   // One depth cell per pixel
    pub width: usize,
    pub height: usize,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize, far: f32) -> Self {
        Self {
            pixels: vec![0; width * height * 4],
            depth: vec![far; width * height],
            width,
            height,
        }
    }

    /// Reset every depth cell to the far-clip value. Color is left
    /// alone; clearing it is a separate, optional operation.
    pub fn reset_depth(&mut self, far: f32) {
        self.depth.fill(far);
    }

    /// Zero the color image (including alpha)
    pub fn clear_color(&mut self) {
        self.pixels.fill(0);
    }

    /// Depth-tested write: stores color and depth together iff `z` is
    /// strictly closer than the current cell. Returns whether the
    /// pixel was written.
    pub fn set_pixel_with_depth(&mut self, x: usize, y: usize, z: f32, color: Color) -> bool {
        if x < self.width && y < self.height {
            let idx = y * self.width + x;
            if z < self.depth[idx] {
                self.depth[idx] = z;
                let pixel_idx = idx * 4;
                self.pixels[pixel_idx..pixel_idx + 4].copy_from_slice(&color.to_bytes());
                return true;
            }
        }
        false
    }

    pub fn depth_at(&self, x: usize, y: usize) -> f32 {
        self.depth[y * self.width + x]
    }

    pub fn color_at(&self, x: usize, y: usize) -> Color {
        let idx = (y * self.width + x) * 4;
        Color {
            r: self.pixels[idx],
            g: self.pixels[idx + 1],
            b: self.pixels[idx + 2],
            a: self.pixels[idx + 3],
        }
    }
}

/// Square-root tone map from linear radiance to a display byte.
/// The saturating cast clamps to the byte range; NaN goes to zero.
fn tone_map(v: f32) -> u8 {
    (v.sqrt() * 16.0) as u8
}

/// The rasterization pipeline: consumes a flat triangle stream and
/// writes shaded, depth-tested pixels into an owned framebuffer.
///
/// One frame is `begin_frame` (depth reset), any number of
/// `draw_tris` calls, then `end_frame` to publish the color image
/// for `render()` read-back.
pub struct Renderer {
    half_width: f32,
    half_height: f32,
    near: f32,
    far: f32,
    light: Light,
    pub debug: DebugFlags,
    fb: Framebuffer,
    frame: Vec<u8>,
}

impl Renderer {
    /// Viewport size and clipping planes are fixed for the lifetime
    /// of the renderer; all arguments are expected to be positive.
    /// Width and height are halved internally so the screen origin
    /// sits at the viewport center.
    pub fn new(width: usize, height: usize, near: f32, far: f32) -> Self {
        Self {
            half_width: width as f32 / 2.0,
            half_height: height as f32 / 2.0,
            near,
            far,
            light: Light::default(),
            debug: DebugFlags::default(),
            fb: Framebuffer::new(width, height, far),
            frame: vec![0; width * height * 4],
        }
    }

    pub fn width(&self) -> usize {
        self.fb.width
    }

    pub fn height(&self) -> usize {
        self.fb.height
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    pub fn light(&self) -> &Light {
        &self.light
    }

    /// Typed light position setter
    pub fn set_light_position(&mut self, position: Vec3) {
        self.light.position = position;
    }

    /// Interchange setter taking a raw component slice. Anything but
    /// exactly 3 components is rejected and the previous light kept.
    pub fn set_light_slice(&mut self, position: &[f32]) -> Result<(), RendererError> {
        match position {
            &[x, y, z] => {
                self.light.position = Vec3::new(x, y, z);
                Ok(())
            }
            _ => Err(RendererError::InvalidLightPosition(position.len())),
        }
    }

    pub fn set_light_power(&mut self, power: f32) -> Result<(), RendererError> {
        if power.is_finite() && power >= 0.0 {
            self.light.power = power;
            Ok(())
        } else {
            Err(RendererError::InvalidLightPower(power))
        }
    }

    pub fn set_shininess(&mut self, shininess: f32) -> Result<(), RendererError> {
        if shininess.is_finite() && shininess >= 0.0 {
            self.light.shininess = shininess;
            Ok(())
        } else {
            Err(RendererError::InvalidShininess(shininess))
        }
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.fb
    }

    /// Start a frame: without the depth reset the previous frame's
    /// surfaces would keep occluding the new one.
    pub fn begin_frame(&mut self) {
        self.fb.reset_depth(self.far);
    }

    /// Zero the color image. Only needed when the frame doesn't
    /// repaint the whole viewport.
    pub fn clear(&mut self) {
        self.fb.clear_color();
    }

    /// Publish the working color image for read-back
    pub fn end_frame(&mut self) {
        self.frame.copy_from_slice(&self.fb.pixels);
    }

    /// The image published by the last `end_frame`, RGBA bytes
    pub fn render(&self) -> &[u8] {
        &self.frame
    }

    /// Save the published image as a PNG
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<(), image::ImageError> {
        image::save_buffer(
            path,
            &self.frame,
            self.fb.width as u32,
            self.fb.height as u32,
            image::ExtendedColorType::Rgba8,
        )
    }

    /// Draw a flat triangle stream: TRI_STRIDE values per triangle,
    /// three repetitions of (x, y, z, r, g, b). A trailing partial
    /// triangle is silently dropped. Triangles are independent; a
    /// degenerate one is skipped without aborting the batch.
    pub fn draw_tris(&mut self, stream: &[f32]) {
        for tri in stream.chunks_exact(TRI_STRIDE) {
            let v1 = Vertex::from_slice(&tri[..VERTEX_STRIDE]);
            let v2 = Vertex::from_slice(&tri[VERTEX_STRIDE..2 * VERTEX_STRIDE]);
            let v3 = Vertex::from_slice(&tri[2 * VERTEX_STRIDE..]);
            self.draw_triangle(v1, v2, v3);
        }
    }

    fn draw_triangle(&mut self, v1: Vertex, v2: Vertex, v3: Vertex) {
        let p1 = project(v1.pos, self.near);
        let p2 = project(v2.pos, self.near);
        let p3 = project(v3.pos, self.near);

        // Integer bounding box, clipped to the viewport and shifted
        // so pixel (0, 0) is the top-left corner
        let min_x = ((-self.half_width).max(p1.x.min(p2.x).min(p3.x)) + self.half_width).floor();
        let min_y = ((-self.half_height).max(p1.y.min(p2.y).min(p3.y)) + self.half_height).floor();
        let max_x = (self.half_width.min(p1.x.max(p2.x).max(p3.x)) + self.half_width).ceil();
        let max_y = (self.half_height.min(p1.y.max(p2.y).max(p3.y)) + self.half_height).ceil();

        if min_x == max_x || min_y == max_y {
            if self.debug.log_degenerate {
                eprintln!(
                    "skipping triangle with zero-extent bounding box ({}, {})",
                    max_x - min_x,
                    max_y - min_y
                );
            }
            return;
        }

        // Screen-space edge vectors; cr is the doubled signed area
        // and the denominator of the barycentric weights
        let vs1 = Vec2::new(p2.x - p1.x, p2.y - p1.y);
        let vs2 = Vec2::new(p3.x - p1.x, p3.y - p1.y);
        let cr = vs1.x * vs2.y - vs1.y * vs2.x;

        if cr.abs() < DEGENERATE_EPS {
            if self.debug.log_degenerate {
                eprintln!("skipping colinear triangle (doubled area {})", cr);
            }
            return;
        }

        // One flat normal per triangle, three intensities
        let normal = face_normal(v1.pos, v2.pos, v3.pos);
        let shade = [
            vertex_intensity(v1.pos, normal, &self.light, self.near),
            vertex_intensity(v2.pos, normal, &self.light, self.near),
            vertex_intensity(v3.pos, normal, &self.light, self.near),
        ];

        let min_x = min_x as usize;
        let min_y = min_y as usize;
        let max_x = max_x as usize;
        let max_y = max_y as usize;

        for i in min_y..max_y {
            // Triangles are convex, so each row holds one contiguous
            // run of interior pixels; once we've been inside and step
            // out again the rest of the row can be skipped.
            let mut hit = false;
            for j in min_x..max_x {
                let q0 = j as f32 - (p1.x + self.half_width);
                let q1 = i as f32 - (p1.y + self.half_height);

                // Split the inside test to bail as early as possible
                let s = (q0 * vs2.y - q1 * vs2.x) / cr;
                if s >= 0.0 {
                    let t = (vs1.x * q1 - vs1.y * q0) / cr;
                    if t >= 0.0 && s + t <= 1.0 {
                        hit = true;
                        let u = 1.0 - s - t;
                        let z = u * v1.pos.z + s * v2.pos.z + t * v3.pos.z;
                        let color = Color::new(
                            tone_map(shade[0] * v1.color.x * u
                                + shade[1] * v2.color.x * s
                                + shade[2] * v3.color.x * t),
                            tone_map(shade[0] * v1.color.y * u
                                + shade[1] * v2.color.y * s
                                + shade[2] * v3.color.y * t),
                            tone_map(shade[0] * v1.color.z * u
                                + shade[1] * v2.color.z * s
                                + shade[2] * v3.color.z * t),
                        );
                        self.fb.set_pixel_with_depth(j, i, z, color);
                    } else if hit {
                        break;
                    }
                } else if hit {
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NEAR: f32 = 100.0;
    const FAR: f32 = 1000.0;

    fn test_renderer() -> Renderer {
        let mut r = Renderer::new(4, 4, NEAR, FAR);
        r.set_light_slice(&[0.0, 0.0, -1000.0]).unwrap();
        r.set_light_power(1.0).unwrap();
        r.set_shininess(4.0).unwrap();
        r
    }

    fn white_tri(z: f32) -> Vec<f32> {
        vec![
            -200.0, -200.0, z, 255.0, 255.0, 255.0,
            200.0, -200.0, z, 255.0, 255.0, 255.0,
            0.0, 200.0, z, 255.0, 255.0, 255.0,
        ]
    }

    fn tri_with_color(z: f32, c: [f32; 3]) -> Vec<f32> {
        let mut t = white_tri(z);
        for v in t.chunks_exact_mut(VERTEX_STRIDE) {
            v[3] = c[0];
            v[4] = c[1];
            v[5] = c[2];
        }
        t
    }

    fn untouched(r: &Renderer) -> bool {
        let fb = r.framebuffer();
        fb.pixels.iter().all(|&b| b == 0) && fb.depth.iter().all(|&d| d == FAR)
    }

    #[test]
    fn test_end_to_end_single_triangle() {
        let mut r = test_renderer();
        r.begin_frame();
        r.draw_tris(&white_tri(500.0));
        r.end_frame();

        // Pixel nearest the projected centroid must be written
        let depth = r.framebuffer().depth_at(2, 0);
        assert!(depth < FAR, "centroid pixel not written (depth {})", depth);
        let c = r.framebuffer().color_at(2, 0);
        assert!(c.r > 0 && c.g > 0 && c.b > 0, "expected lit pixel, got {:?}", c);
        assert_eq!(c.a, 255);
    }

    #[test]
    fn test_begin_frame_resets_depth() {
        let mut r = test_renderer();
        r.begin_frame();
        r.draw_tris(&white_tri(500.0));
        assert!(r.framebuffer().depth.iter().any(|&d| d < FAR));

        r.begin_frame();
        assert!(r.framebuffer().depth.iter().all(|&d| d == FAR));
    }

    #[test]
    fn test_nearer_triangle_wins_either_order() {
        let near_tri = tri_with_color(300.0, [255.0, 0.0, 0.0]);
        let far_tri = tri_with_color(500.0, [0.0, 0.0, 255.0]);

        let mut only_near = test_renderer();
        only_near.begin_frame();
        only_near.draw_tris(&near_tri);
        only_near.end_frame();

        for order in [[&near_tri, &far_tri], [&far_tri, &near_tri]] {
            let mut r = test_renderer();
            r.begin_frame();
            for tri in order {
                r.draw_tris(tri);
            }
            r.end_frame();
            // Both triangles cover the whole 4x4 viewport; every
            // pixel must come out as the nearer triangle's shading
            assert_eq!(r.render(), only_near.render());
            assert!((r.framebuffer().depth_at(2, 2) - 300.0).abs() < 1e-2);
        }
    }

    #[test]
    fn test_colinear_triangle_writes_nothing() {
        let mut r = test_renderer();
        r.begin_frame();
        r.draw_tris(&[
            -200.0, -200.0, 500.0, 255.0, 255.0, 255.0,
            0.0, 0.0, 500.0, 255.0, 255.0, 255.0,
            200.0, 200.0, 500.0, 255.0, 255.0, 255.0,
        ]);
        assert!(untouched(&r));
    }

    #[test]
    fn test_offscreen_triangle_writes_nothing() {
        let mut r = test_renderer();
        r.begin_frame();
        // Projects to x in [60, 80], entirely right of the viewport
        r.draw_tris(&[
            300.0, -200.0, 500.0, 255.0, 255.0, 255.0,
            400.0, -200.0, 500.0, 255.0, 255.0, 255.0,
            350.0, 200.0, 500.0, 255.0, 255.0, 255.0,
        ]);
        assert!(untouched(&r));
    }

    #[test]
    fn test_pixels_outside_footprint_untouched() {
        let mut r = test_renderer();
        r.begin_frame();
        // Small triangle missing the viewport's outer corners
        r.draw_tris(&[
            -20.0, -20.0, 500.0, 255.0, 255.0, 255.0,
            20.0, -20.0, 500.0, 255.0, 255.0, 255.0,
            0.0, 20.0, 500.0, 255.0, 255.0, 255.0,
        ]);
        assert!(r.framebuffer().depth.iter().any(|&d| d < FAR));
        assert_eq!(r.framebuffer().depth_at(0, 3), FAR);
        assert_eq!(r.framebuffer().color_at(0, 3), Color { r: 0, g: 0, b: 0, a: 0 });
    }

    #[test]
    fn test_trailing_partial_triangle_dropped() {
        let mut r = test_renderer();
        r.begin_frame();
        let mut stream = white_tri(500.0);
        stream.extend_from_slice(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        r.draw_tris(&stream);
        assert!(r.framebuffer().depth.iter().any(|&d| d < FAR));

        let mut r2 = test_renderer();
        r2.begin_frame();
        r2.draw_tris(&white_tri(500.0)[..17]);
        assert!(untouched(&r2));
    }

    #[test]
    fn test_clear_color_leaves_depth() {
        let mut r = test_renderer();
        r.begin_frame();
        r.draw_tris(&white_tri(500.0));
        r.clear();
        assert!(r.framebuffer().pixels.iter().all(|&b| b == 0));
        assert!(r.framebuffer().depth.iter().any(|&d| d < FAR));
    }

    #[test]
    fn test_light_config_roundtrip_and_rejection() {
        let mut r = test_renderer();
        r.set_light_power(42.5).unwrap();
        assert_eq!(r.light().power, 42.5);
        r.set_shininess(9.0).unwrap();
        assert_eq!(r.light().shininess, 9.0);

        let before = r.light().position;
        assert!(r.set_light_slice(&[1.0, 2.0]).is_err());
        assert!(r.set_light_slice(&[1.0, 2.0, 3.0, 4.0]).is_err());
        assert_eq!(r.light().position, before);

        assert!(r.set_light_power(-1.0).is_err());
        assert_eq!(r.light().power, 42.5);
        assert!(r.set_shininess(f32::NAN).is_err());
        assert_eq!(r.light().shininess, 9.0);
    }

    #[test]
    fn test_render_stable_until_end_frame() {
        let mut r = test_renderer();
        r.begin_frame();
        r.draw_tris(&white_tri(500.0));
        // Nothing published yet
        assert!(r.render().iter().all(|&b| b == 0));
        r.end_frame();
        assert!(r.render().iter().any(|&b| b != 0));
    }
}
