//! Ripple Engine: software-rasterized rippling terrain
//!
//! A single-threaded software rendering pipeline:
//! - Perspective projection and edge-function scan conversion
//! - Z-buffered, per-vertex point-light shading (Blinn-Phong)
//! - Animated height-field terrain demo driving it once per tick

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod rasterizer;
mod scene;

use macroquad::prelude::*;
use rasterizer::{Renderer, Vec3};
use scene::{
    background, dim, rotate_x, rotate_y, rotate_z, translate_z,
    ColorMode, DeformMode, ScenePreset, Terrain,
};

/// Framebuffer size
const WIDTH: usize = 800;
const HEIGHT: usize = 600;

/// Clipping planes; the terrain is pushed to CAMERA_DEPTH between them
const NEAR: f32 = 10000.0;
const FAR: f32 = 18000.0;
const CAMERA_DEPTH: f32 = 16700.0;

/// Terrain base colors are authored bright; dimmed before lighting
const COLOR_DIM: f32 = 6.0;

/// Degrees per second for the held rotation keys
const ROTATE_SPEED: f32 = 45.0;

#[cfg(not(target_arch = "wasm32"))]
const PRESET_PATH: &str = "scene.ron";

fn window_conf() -> Conf {
    Conf {
        window_title: format!("Ripple Engine v{}", VERSION),
        window_width: WIDTH as i32,
        window_height: HEIGHT as i32,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    let mut renderer = Renderer::new(WIDTH, HEIGHT, NEAR, FAR);
    let mut terrain = Terrain::new();
    let mut preset = ScenePreset::default();

    println!("=== Ripple Engine ===");
    println!("W/S pitch  A/D yaw  Q/E roll");
    println!("Up/Down light power  Left/Right shininess");
    println!("1/2/3 deform mode  4/5/6 color mode  mouse moves the light");
    #[cfg(not(target_arch = "wasm32"))]
    println!("P screenshot  F5 save preset  F9 load preset");

    loop {
        handle_input(&mut preset, &mut terrain);

        #[cfg(not(target_arch = "wasm32"))]
        handle_file_keys(&renderer, &mut preset, &mut terrain);

        // Mouse position reprojected onto the light's depth plane
        let (mx, my) = mouse_position();
        let fx = mx * WIDTH as f32 / screen_width() - WIDTH as f32 / 2.0;
        let fy = my * HEIGHT as f32 / screen_height() - HEIGHT as f32 / 2.0;
        let lz = renderer.light().position.z;
        renderer.set_light_position(Vec3::new(fx * lz / NEAR, fy * lz / NEAR, lz));

        let power = 2f32.powf(preset.light_power_exp);
        if let Err(e) = renderer.set_light_power(power) {
            eprintln!("light power rejected: {}", e);
        }
        if let Err(e) = renderer.set_shininess(preset.shininess) {
            eprintln!("shininess rejected: {}", e);
        }

        // Build this frame's stream: backdrop straight in camera
        // space, terrain rotated and pushed out in front of the camera
        let mut tris = terrain.triangles(get_time() as f32 * 1000.0);
        rotate_x(&mut tris, preset.pitch.to_radians());
        rotate_y(&mut tris, preset.yaw.to_radians());
        rotate_z(&mut tris, preset.roll.to_radians());
        translate_z(&mut tris, CAMERA_DEPTH);
        dim(&mut tris, COLOR_DIM);

        let mut stream = background(WIDTH as f32, HEIGHT as f32);
        stream.extend_from_slice(&tris);

        renderer.begin_frame();
        renderer.draw_tris(&stream);
        renderer.end_frame();

        // Blit the software framebuffer to the window
        let texture = Texture2D::from_rgba8(WIDTH as u16, HEIGHT as u16, renderer.render());
        texture.set_filter(FilterMode::Nearest);
        draw_texture_ex(
            &texture,
            0.0,
            0.0,
            WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(screen_width(), screen_height())),
                ..Default::default()
            },
        );

        draw_light_glow(&renderer, power);
        draw_hud(&preset, &terrain);

        next_frame().await;
    }
}

fn handle_input(preset: &mut ScenePreset, terrain: &mut Terrain) {
    let step = ROTATE_SPEED * get_frame_time();
    if is_key_down(KeyCode::W) {
        preset.pitch += step;
    }
    if is_key_down(KeyCode::S) {
        preset.pitch -= step;
    }
    if is_key_down(KeyCode::A) {
        preset.yaw -= step;
    }
    if is_key_down(KeyCode::D) {
        preset.yaw += step;
    }
    if is_key_down(KeyCode::Q) {
        preset.roll -= step;
    }
    if is_key_down(KeyCode::E) {
        preset.roll += step;
    }

    if is_key_pressed(KeyCode::Up) {
        preset.light_power_exp = (preset.light_power_exp + 1.0).min(10.0);
    }
    if is_key_pressed(KeyCode::Down) {
        preset.light_power_exp = (preset.light_power_exp - 1.0).max(0.0);
    }
    if is_key_pressed(KeyCode::Right) {
        preset.shininess = (preset.shininess + 1.0).min(64.0);
    }
    if is_key_pressed(KeyCode::Left) {
        preset.shininess = (preset.shininess - 1.0).max(0.0);
    }

    if is_key_pressed(KeyCode::Key1) {
        terrain.deform = DeformMode::Sin;
    }
    if is_key_pressed(KeyCode::Key2) {
        terrain.deform = DeformMode::Random;
    }
    if is_key_pressed(KeyCode::Key3) {
        terrain.deform = DeformMode::Flat;
    }
    if is_key_pressed(KeyCode::Key4) {
        terrain.color = ColorMode::Grass;
    }
    if is_key_pressed(KeyCode::Key5) {
        terrain.color = ColorMode::Rgb;
    }
    if is_key_pressed(KeyCode::Key6) {
        terrain.color = ColorMode::Gray;
    }
    preset.deform = terrain.deform;
    preset.color = terrain.color;
}

#[cfg(not(target_arch = "wasm32"))]
fn handle_file_keys(renderer: &Renderer, preset: &mut ScenePreset, terrain: &mut Terrain) {
    if is_key_pressed(KeyCode::P) {
        match renderer.save_png("screenshot.png") {
            Ok(()) => println!("Saved screenshot.png"),
            Err(e) => eprintln!("Screenshot failed: {}", e),
        }
    }
    if is_key_pressed(KeyCode::F5) {
        match scene::save_preset(preset, PRESET_PATH) {
            Ok(()) => println!("Saved {}", PRESET_PATH),
            Err(e) => eprintln!("Preset save failed: {}", e),
        }
    }
    if is_key_pressed(KeyCode::F9) {
        match scene::load_preset(PRESET_PATH) {
            Ok(loaded) => {
                *preset = loaded;
                terrain.deform = loaded.deform;
                terrain.color = loaded.color;
                println!("Loaded {}", PRESET_PATH);
            }
            Err(e) => eprintln!("Preset load failed: {}", e),
        }
    }
}

/// Rough radial gradient where the light projects onto the screen
fn draw_light_glow(renderer: &Renderer, power: f32) {
    let pos = renderer.light().position;
    if pos.z <= 0.0 {
        return;
    }
    let sx = (pos.x * NEAR / pos.z + WIDTH as f32 / 2.0) * screen_width() / WIDTH as f32;
    let sy = (pos.y * NEAR / pos.z + HEIGHT as f32 / 2.0) * screen_height() / HEIGHT as f32;

    for (radius, alpha) in [(1.0, 0.06), (0.5, 0.12), (0.25, 0.25), (0.125, 0.5)] {
        draw_circle(sx, sy, power * radius, Color::new(1.0, 1.0, 1.0, alpha));
    }
}

fn draw_hud(preset: &ScenePreset, terrain: &Terrain) {
    draw_rectangle(0.0, 0.0, 230.0, 40.0, BLACK);
    draw_text(&format!("{} FPS", get_fps()), 2.0, 16.0, 16.0, WHITE);
    draw_text(
        &format!(
            "pow 2^{} shine {} {} {}",
            preset.light_power_exp,
            preset.shininess,
            terrain.deform.label(),
            terrain.color.label()
        ),
        2.0,
        34.0,
        16.0,
        WHITE,
    );
}
