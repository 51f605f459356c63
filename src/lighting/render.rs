//! Full-frame lighting render
//!
//! Shades every output pixel by marching from the light source through the
//! occlusion map, then blends in the ambient term. Rows are split across
//! available cores on native targets; the march is pure, so chunks share
//! nothing but immutable inputs.

use super::{estimator, AmbientBase, Color, LightSettings, LightingError, OcclusionMap, Rgba};
use crate::math::Vec2;

/// Framebuffer for software rendering
pub struct Framebuffer {
    pub pixels: Vec<u8>, // RGBA, 4 bytes per pixel
    pub width: usize,
    pub height: usize,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![0; width * height * 4],
            width,
            height,
        }
    }

    pub fn clear(&mut self, color: Color) {
        let bytes = color.to_bytes();
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&bytes);
        }
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, color: Color) {
        if x < self.width && y < self.height {
            let idx = (y * self.width + x) * 4;
            self.pixels[idx..idx + 4].copy_from_slice(&color.to_bytes());
        }
    }

    /// Write the framebuffer to an image file (format from the extension)
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), LightingError> {
        image::save_buffer(
            path,
            &self.pixels,
            self.width as u32,
            self.height as u32,
            image::ExtendedColorType::Rgba8,
        )?;
        Ok(())
    }
}

/// Shade one output pixel: march from the light, then apply the ambient
/// blend. Both positions are normalized `[0,1]x[0,1]` coordinates.
pub fn shade_pixel(
    map: &OcclusionMap,
    light_pos: Vec2,
    frag_pos: Vec2,
    settings: &LightSettings,
) -> Rgba {
    let light = estimator::march(map, light_pos, frag_pos, settings.transmit, settings.max_steps);
    let base = match settings.ambient_base {
        AmbientBase::White => Rgba::WHITE,
        AmbientBase::OcclusionTint => map.sample(frag_pos.x, frag_pos.y),
    };
    light.lerp(base, settings.ambient_mix)
}

/// Render a full lighting frame into `fb`.
///
/// `light_px` is in framebuffer pixel space; fragments are sampled at
/// pixel centers. The occlusion map is addressed in normalized
/// coordinates, so its resolution is free to differ from the output's.
pub fn render_lighting(
    map: &OcclusionMap,
    light_px: Vec2,
    settings: &LightSettings,
    fb: &mut Framebuffer,
) -> Result<(), LightingError> {
    if fb.width == 0 || fb.height == 0 {
        return Err(LightingError::InvalidResolution {
            width: fb.width as f32,
            height: fb.height as f32,
        });
    }

    let resolution = Vec2::new(fb.width as f32, fb.height as f32);
    let light_pos = Vec2::new(light_px.x / resolution.x, light_px.y / resolution.y);
    let width = fb.width;

    #[cfg(not(target_arch = "wasm32"))]
    {
        let threads = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let rows_per_band = (fb.height + threads - 1) / threads;

        std::thread::scope(|s| {
            for (band, chunk) in fb.pixels.chunks_mut(rows_per_band * width * 4).enumerate() {
                let y0 = band * rows_per_band;
                s.spawn(move || {
                    shade_rows(map, light_pos, settings, resolution, y0, chunk, width);
                });
            }
        });
    }

    #[cfg(target_arch = "wasm32")]
    shade_rows(map, light_pos, settings, resolution, 0, &mut fb.pixels, width);

    Ok(())
}

/// Shade a horizontal band of rows starting at `y0` into `rows_px`
fn shade_rows(
    map: &OcclusionMap,
    light_pos: Vec2,
    settings: &LightSettings,
    resolution: Vec2,
    y0: usize,
    rows_px: &mut [u8],
    width: usize,
) {
    for (dy, row) in rows_px.chunks_exact_mut(width * 4).enumerate() {
        let v = (y0 + dy) as f32 + 0.5;
        for (x, px) in row.chunks_exact_mut(4).enumerate() {
            let frag_pos = Vec2::new((x as f32 + 0.5) / resolution.x, v / resolution.y);
            let color = shade_pixel(map, light_pos, frag_pos, settings).to_color();
            px.copy_from_slice(&color.to_bytes());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_ambient() -> LightSettings {
        LightSettings {
            ambient_mix: 0.0,
            ..LightSettings::default()
        }
    }

    #[test]
    fn test_framebuffer_set_pixel() {
        let mut fb = Framebuffer::new(4, 4);
        fb.set_pixel(1, 2, Color::new(10, 20, 30));
        let idx = (2 * 4 + 1) * 4;
        assert_eq!(&fb.pixels[idx..idx + 4], &[10, 20, 30, 255]);
        // Out of bounds is a no-op
        fb.set_pixel(4, 0, Color::WHITE);
        fb.set_pixel(0, 4, Color::WHITE);
    }

    #[test]
    fn test_framebuffer_clear() {
        let mut fb = Framebuffer::new(2, 2);
        fb.clear(Color::new(7, 8, 9));
        assert_eq!(&fb.pixels[0..4], &[7, 8, 9, 255]);
        assert_eq!(&fb.pixels[12..16], &[7, 8, 9, 255]);
    }

    #[test]
    fn test_empty_scene_fully_lit() {
        // Clear map, lossless medium: every pixel receives full light
        let map = OcclusionMap::solid(8, 8, Rgba::CLEAR);
        let mut settings = no_ambient();
        settings.transmit = 1.0;

        let mut fb = Framebuffer::new(8, 8);
        render_lighting(&map, Vec2::new(4.0, 4.0), &settings, &mut fb).unwrap();
        assert!(fb.pixels.iter().all(|&b| b == 255));
    }

    #[test]
    fn test_opaque_scene_leaves_only_ambient() {
        // Light dies on the first step everywhere except at the light
        // itself; the white ambient floor is what remains
        let map = OcclusionMap::solid(8, 8, Rgba::new(0.0, 0.0, 0.0, 1.0));
        let settings = LightSettings::default(); // ambient_mix 0.1, white base

        let corner = shade_pixel(
            &map,
            Vec2::new(0.5, 0.5),
            Vec2::new(0.95, 0.95),
            &settings,
        );
        assert!((corner.r - 0.1).abs() < 1e-4);
        assert!((corner.g - 0.1).abs() < 1e-4);
        assert!((corner.b - 0.1).abs() < 1e-4);
    }

    #[test]
    fn test_ambient_base_occlusion_tint() {
        let tint = Rgba::new(0.5, 0.25, 1.0, 1.0);
        let map = OcclusionMap::solid(8, 8, tint);
        let settings = LightSettings {
            ambient_mix: 1.0,
            ambient_base: AmbientBase::OcclusionTint,
            ..LightSettings::default()
        };

        // Full ambient mix: output is exactly the map's own color
        let out = shade_pixel(&map, Vec2::new(0.2, 0.2), Vec2::new(0.8, 0.8), &settings);
        assert_eq!(out.to_color(), tint.to_color());
    }

    #[test]
    fn test_render_rejects_empty_framebuffer() {
        let map = OcclusionMap::solid(8, 8, Rgba::CLEAR);
        let mut fb = Framebuffer::new(0, 8);
        let result = render_lighting(&map, Vec2::ZERO, &LightSettings::default(), &mut fb);
        assert!(matches!(
            result,
            Err(LightingError::InvalidResolution { .. })
        ));
    }

    #[test]
    fn test_wall_casts_shadow() {
        // Opaque wall between light and the right edge: pixels behind it
        // end up darker than unshadowed ones at the same distance
        let mut map = OcclusionMap::solid(32, 32, Rgba::CLEAR);
        map.fill_rect(20, 0, 22, 32, Rgba::new(0.0, 0.0, 0.0, 1.0));
        let mut settings = no_ambient();
        settings.transmit = 1.0;

        let light_pos = Vec2::new(0.25, 0.5);
        let shadowed = shade_pixel(&map, light_pos, Vec2::new(0.9, 0.5), &settings);
        let open = shade_pixel(&map, light_pos, Vec2::new(0.25, 0.9), &settings);
        assert!(shadowed.r < 0.01);
        assert!(open.r > 0.5);
    }
}
