//! Glowcast demo: a point light that follows the mouse
//!
//! Loads an occlusion map (or builds a procedural scene), renders the
//! lighting frame on the CPU every frame, and presents it through
//! macroquad. Keys tweak the marching settings live.

use glowcast::{
    load_settings, render_lighting, AmbientBase, Framebuffer, LightSettings, OcclusionMap,
    Vec2 as LightVec2, STEP_CEILING, VERSION,
};
use macroquad::prelude::*;

const SETTINGS_PATH: &str = "assets/lighting.ron";
const OCCLUSION_PATH: &str = "assets/occlusion.png";

/// Render resolution of the procedural fallback scene
const FALLBACK_WIDTH: usize = 400;
const FALLBACK_HEIGHT: usize = 300;

fn window_conf() -> Conf {
    Conf {
        window_title: format!("Glowcast v{}", VERSION),
        window_width: 800,
        window_height: 600,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    let mut settings = match load_settings(SETTINGS_PATH) {
        Ok(s) => {
            println!("Loaded settings from {}", SETTINGS_PATH);
            s
        }
        Err(_) => LightSettings::default(),
    };

    let map = match load_file(OCCLUSION_PATH).await {
        Ok(bytes) => match OcclusionMap::from_bytes(&bytes, "occlusion".to_string()) {
            Ok(map) => {
                println!(
                    "Loaded occlusion map: {} ({}x{})",
                    map.name, map.width, map.height
                );
                map
            }
            Err(e) => {
                eprintln!("{}", e);
                OcclusionMap::demo_scene(FALLBACK_WIDTH, FALLBACK_HEIGHT)
            }
        },
        Err(_) => {
            println!("No {}, using procedural scene", OCCLUSION_PATH);
            OcclusionMap::demo_scene(FALLBACK_WIDTH, FALLBACK_HEIGHT)
        }
    };

    let mut fb = Framebuffer::new(map.width, map.height);

    println!("=== Glowcast ===");

    loop {
        // Live tweaks
        if is_key_down(KeyCode::Up) {
            settings.transmit = (settings.transmit + 0.001).min(1.0);
        }
        if is_key_down(KeyCode::Down) {
            settings.transmit = (settings.transmit - 0.001).max(0.0);
        }
        if is_key_down(KeyCode::Right) {
            settings.ambient_mix = (settings.ambient_mix + 0.005).min(1.0);
        }
        if is_key_down(KeyCode::Left) {
            settings.ambient_mix = (settings.ambient_mix - 0.005).max(0.0);
        }
        if is_key_pressed(KeyCode::LeftBracket) {
            settings.max_steps = (settings.max_steps / 2).max(1);
        }
        if is_key_pressed(KeyCode::RightBracket) {
            settings.max_steps = (settings.max_steps * 2).min(STEP_CEILING as u32);
        }
        if is_key_pressed(KeyCode::B) {
            settings.ambient_base = match settings.ambient_base {
                AmbientBase::White => AmbientBase::OcclusionTint,
                AmbientBase::OcclusionTint => AmbientBase::White,
            };
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            if is_key_pressed(KeyCode::S) {
                match glowcast::save_settings(&settings, SETTINGS_PATH) {
                    Ok(()) => println!("Saved settings to {}", SETTINGS_PATH),
                    Err(e) => eprintln!("Failed to save settings: {}", e),
                }
            }
            if is_key_pressed(KeyCode::P) {
                match fb.save("glowcast_frame.png") {
                    Ok(()) => println!("Saved glowcast_frame.png"),
                    Err(e) => eprintln!("Failed to save frame: {}", e),
                }
            }
        }

        // Light follows the mouse, window coords mapped to map pixels
        let (mx, my) = mouse_position();
        let light_px = LightVec2::new(
            mx / screen_width() * map.width as f32,
            my / screen_height() * map.height as f32,
        );

        if let Err(e) = render_lighting(&map, light_px, &settings, &mut fb) {
            eprintln!("Render failed: {}", e);
        }

        // Upload the framebuffer and stretch it over the window
        let texture = Texture2D::from_rgba8(fb.width as u16, fb.height as u16, &fb.pixels);
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

        draw_text(
            &format!(
                "transmit {:.3} | steps {} | ambient {:.2} ({:?}) | {:.0} fps",
                settings.transmit,
                settings.max_steps,
                settings.ambient_mix,
                settings.ambient_base,
                1.0 / get_frame_time().max(1e-6),
            ),
            10.0,
            20.0,
            20.0,
            GREEN,
        );
        draw_text(
            "mouse: light | Up/Down: transmit | Left/Right: ambient | [ ]: steps | B: base | S: save | P: screenshot",
            10.0,
            40.0,
            16.0,
            GRAY,
        );

        next_frame().await;
    }
}
