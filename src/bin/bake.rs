//! Headless lighting baker
//!
//! Renders one lighting frame from an occlusion map and writes it to an
//! image file. Light defaults to the map center.
//!
//! Usage: glowcast-bake <occlusion.png> <out.png>
//!        [--light X,Y] [--transmit T] [--steps N] [--ambient M] [--base white|tint]

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
fn run() -> Result<(), String> {
    use glowcast::{
        shade_pixel, AmbientBase, Framebuffer, LightSettings, OcclusionMap, Vec2,
    };
    use indicatif::ProgressBar;

    let mut args = std::env::args().skip(1);
    let occlusion_path = args.next().ok_or_else(usage)?;
    let out_path = args.next().ok_or_else(usage)?;

    let mut settings = LightSettings::default();
    let mut light_px: Option<Vec2> = None;

    while let Some(flag) = args.next() {
        let value = args
            .next()
            .ok_or_else(|| format!("Missing value for {}", flag))?;
        match flag.as_str() {
            "--light" => {
                let (x, y) = value
                    .split_once(',')
                    .ok_or_else(|| format!("Expected X,Y for --light, got {}", value))?;
                light_px = Some(Vec2::new(
                    x.trim().parse().map_err(|e| format!("Bad light X: {}", e))?,
                    y.trim().parse().map_err(|e| format!("Bad light Y: {}", e))?,
                ));
            }
            "--transmit" => {
                settings.transmit = value.parse().map_err(|e| format!("Bad transmit: {}", e))?;
            }
            "--steps" => {
                settings.max_steps = value.parse().map_err(|e| format!("Bad steps: {}", e))?;
            }
            "--ambient" => {
                settings.ambient_mix = value.parse().map_err(|e| format!("Bad ambient: {}", e))?;
            }
            "--base" => {
                settings.ambient_base = match value.as_str() {
                    "white" => AmbientBase::White,
                    "tint" => AmbientBase::OcclusionTint,
                    other => return Err(format!("Unknown base: {} (white|tint)", other)),
                };
            }
            other => return Err(format!("Unknown flag: {}", other)),
        }
    }

    let map = OcclusionMap::from_file(&occlusion_path).map_err(|e| e.to_string())?;
    println!(
        "Baking {} ({}x{}), transmit {}, {} steps",
        map.name, map.width, map.height, settings.transmit, settings.max_steps
    );

    let light_px = light_px.unwrap_or_else(|| {
        Vec2::new(map.width as f32 / 2.0, map.height as f32 / 2.0)
    });
    let light_pos = Vec2::new(
        light_px.x / map.width as f32,
        light_px.y / map.height as f32,
    );

    let mut fb = Framebuffer::new(map.width, map.height);
    let bar = ProgressBar::new(map.height as u64);
    for y in 0..map.height {
        let v = (y as f32 + 0.5) / map.height as f32;
        for x in 0..map.width {
            let frag_pos = Vec2::new((x as f32 + 0.5) / map.width as f32, v);
            let color = shade_pixel(&map, light_pos, frag_pos, &settings).to_color();
            fb.set_pixel(x, y, color);
        }
        bar.inc(1);
    }
    bar.finish();

    fb.save(&out_path).map_err(|e| e.to_string())?;
    println!("Wrote {} ({}x{})", out_path, fb.width, fb.height);
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
fn usage() -> String {
    "Usage: glowcast-bake <occlusion.png> <out.png> \
     [--light X,Y] [--transmit T] [--steps N] [--ambient M] [--base white|tint]"
        .to_string()
}
