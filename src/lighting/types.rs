//! Core types for the lighting engine

use crate::math::Vec2;
use serde::{Deserialize, Serialize};

/// Error type for lighting operations
#[derive(Debug)]
pub enum LightingError {
    /// Width or height was zero or negative
    InvalidResolution { width: f32, height: f32 },
    IoError(std::io::Error),
    ImageError(image::ImageError),
    ParseError(ron::error::SpannedError),
    SerializeError(ron::Error),
}

impl From<std::io::Error> for LightingError {
    fn from(e: std::io::Error) -> Self {
        LightingError::IoError(e)
    }
}

impl From<image::ImageError> for LightingError {
    fn from(e: image::ImageError) -> Self {
        LightingError::ImageError(e)
    }
}

impl From<ron::error::SpannedError> for LightingError {
    fn from(e: ron::error::SpannedError) -> Self {
        LightingError::ParseError(e)
    }
}

impl From<ron::Error> for LightingError {
    fn from(e: ron::Error) -> Self {
        LightingError::SerializeError(e)
    }
}

impl std::fmt::Display for LightingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LightingError::InvalidResolution { width, height } => {
                write!(f, "Invalid resolution: {}x{}", width, height)
            }
            LightingError::IoError(e) => write!(f, "IO error: {}", e),
            LightingError::ImageError(e) => write!(f, "Image error: {}", e),
            LightingError::ParseError(e) => write!(f, "Parse error: {}", e),
            LightingError::SerializeError(e) => write!(f, "Serialize error: {}", e),
        }
    }
}

/// RGBA quad (0.0-1.0 per channel)
///
/// Doubles as an occlusion sample (`a` = occluder opacity, `rgb` = the tint
/// light picks up passing through) and as the light accumulator the march
/// attenuates step by step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    /// Full, unattenuated light
    pub const WHITE: Rgba = Rgba { r: 1.0, g: 1.0, b: 1.0, a: 1.0 };
    /// Empty space: no occluder, no tint
    pub const CLEAR: Rgba = Rgba { r: 0.0, g: 0.0, b: 0.0, a: 0.0 };

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// From 8-bit RGBA (as stored in image files)
    pub fn from_bytes(p: [u8; 4]) -> Self {
        Self {
            r: p[0] as f32 / 255.0,
            g: p[1] as f32 / 255.0,
            b: p[2] as f32 / 255.0,
            a: p[3] as f32 / 255.0,
        }
    }

    /// Summed RGB intensity, used by the extinction check
    pub fn intensity(self) -> f32 {
        self.r + self.g + self.b
    }

    /// Componentwise blend: `self * (1 - t) + other * t`
    pub fn lerp(self, other: Rgba, t: f32) -> Rgba {
        let s = 1.0 - t;
        Rgba {
            r: self.r * s + other.r * t,
            g: self.g * s + other.g * t,
            b: self.b * s + other.b * t,
            a: self.a * s + other.a * t,
        }
    }

    /// Quantize to 8-bit for framebuffer output
    pub fn to_color(self) -> Color {
        Color {
            r: (self.r.clamp(0.0, 1.0) * 255.0).round() as u8,
            g: (self.g.clamp(0.0, 1.0) * 255.0).round() as u8,
            b: (self.b.clamp(0.0, 1.0) * 255.0).round() as u8,
            a: (self.a.clamp(0.0, 1.0) * 255.0).round() as u8,
        }
    }
}

/// RGBA color (0-255 per channel), the framebuffer pixel format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Convert to [u8; 4] for framebuffer
    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// The sampler seam: anything that can answer "what occludes this
/// normalized position". Implemented by [`OcclusionMap`] and by plain
/// closures (handy in tests and for procedural fields).
pub trait OcclusionSource {
    fn sample_at(&self, pos: Vec2) -> Rgba;
}

impl<F> OcclusionSource for F
where
    F: Fn(Vec2) -> Rgba,
{
    fn sample_at(&self, pos: Vec2) -> Rgba {
        self(pos)
    }
}

/// Occlusion map: the per-pixel occluder field light marches through
#[derive(Debug, Clone)]
pub struct OcclusionMap {
    pub width: usize,
    pub height: usize,
    pub samples: Vec<Rgba>,
    pub name: String,
}

impl OcclusionMap {
    /// Uniform field (useful as a blank canvas for procedural scenes)
    pub fn solid(width: usize, height: usize, sample: Rgba) -> Self {
        Self {
            width,
            height,
            samples: vec![sample; width * height],
            name: String::new(),
        }
    }

    /// Load an occlusion map from an image file
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, LightingError> {
        use image::GenericImageView;

        let path = path.as_ref();
        let img = image::open(path)?;
        let (width, height) = img.dimensions();
        let rgba = img.to_rgba8();

        let samples: Vec<Rgba> = rgba.pixels().map(|p| Rgba::from_bytes(p.0)).collect();

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        Ok(Self {
            width: width as usize,
            height: height as usize,
            samples,
            name,
        })
    }

    /// Load an occlusion map from raw image bytes
    pub fn from_bytes(bytes: &[u8], name: String) -> Result<Self, LightingError> {
        use image::GenericImageView;

        let img = image::load_from_memory(bytes)?;
        let (width, height) = img.dimensions();
        let rgba = img.to_rgba8();

        let samples: Vec<Rgba> = rgba.pixels().map(|p| Rgba::from_bytes(p.0)).collect();

        Ok(Self {
            width: width as usize,
            height: height as usize,
            samples,
            name,
        })
    }

    /// Procedural test scene: opaque walls with a doorway plus a few
    /// tinted glass panes, so the demo runs without any asset files
    pub fn demo_scene(width: usize, height: usize) -> Self {
        let mut map = Self::solid(width, height, Rgba::CLEAR);
        map.name = "demo_scene".to_string();

        let wall = Rgba::new(0.0, 0.0, 0.0, 1.0);
        let red_glass = Rgba::new(0.95, 0.25, 0.2, 0.6);
        let blue_glass = Rgba::new(0.25, 0.45, 0.95, 0.6);
        let green_glass = Rgba::new(0.3, 0.9, 0.35, 0.5);

        let w = width;
        let h = height;

        // Vertical wall with a doorway
        map.fill_rect(w * 2 / 5, 0, w * 2 / 5 + w / 60 + 1, h * 2 / 5, wall);
        map.fill_rect(w * 2 / 5, h * 3 / 5, w * 2 / 5 + w / 60 + 1, h, wall);

        // Horizontal wall segment
        map.fill_rect(w / 10, h * 7 / 10, w * 3 / 10, h * 7 / 10 + h / 60 + 1, wall);

        // Glass panes
        map.fill_rect(w * 3 / 5, h / 8, w * 7 / 10, h * 3 / 8, red_glass);
        map.fill_rect(w * 3 / 4, h / 2, w * 7 / 8, h * 3 / 4, blue_glass);
        map.fill_rect(w / 8, h / 6, w / 4, h / 3, green_glass);

        // A few opaque pillars
        let pw = (w / 40).max(2);
        map.fill_rect(w / 2, h / 6, w / 2 + pw, h / 6 + pw, wall);
        map.fill_rect(w * 5 / 8, h * 4 / 5, w * 5 / 8 + pw, h * 4 / 5 + pw, wall);

        map
    }

    /// Fill a pixel-space rectangle, clipped to the map bounds
    pub fn fill_rect(&mut self, x0: usize, y0: usize, x1: usize, y1: usize, sample: Rgba) {
        for y in y0..y1.min(self.height) {
            for x in x0..x1.min(self.width) {
                self.samples[y * self.width + x] = sample;
            }
        }
    }

    /// Sample at normalized UV coordinates, clamp-to-edge.
    ///
    /// The march walks off the map near borders; clamping repeats the edge
    /// texel instead of leaking samples from the opposite side.
    pub fn sample(&self, u: f32, v: f32) -> Rgba {
        if self.samples.is_empty() {
            return Rgba::CLEAR;
        }
        let tx = ((u * self.width as f32) as isize).clamp(0, self.width as isize - 1) as usize;
        let ty = ((v * self.height as f32) as isize).clamp(0, self.height as isize - 1) as usize;
        self.samples[ty * self.width + tx]
    }

    /// Get sample at x,y pixel coordinates
    pub fn get_sample(&self, x: usize, y: usize) -> Rgba {
        if x < self.width && y < self.height {
            self.samples[y * self.width + x]
        } else {
            Rgba::CLEAR
        }
    }
}

impl OcclusionSource for OcclusionMap {
    fn sample_at(&self, pos: Vec2) -> Rgba {
        self.sample(pos.x, pos.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba_from_bytes() {
        let c = Rgba::from_bytes([255, 0, 127, 255]);
        assert!((c.r - 1.0).abs() < 0.001);
        assert!(c.g == 0.0);
        assert!((c.b - 0.498).abs() < 0.001);
    }

    #[test]
    fn test_rgba_to_color_rounds() {
        let c = Rgba::new(0.5, 0.25, 1.0, 1.0).to_color();
        assert_eq!(c, Color { r: 128, g: 64, b: 255, a: 255 });
    }

    #[test]
    fn test_rgba_to_color_clamps() {
        let c = Rgba::new(1.5, -0.5, 0.0, 1.0).to_color();
        assert_eq!(c.r, 255);
        assert_eq!(c.g, 0);
    }

    #[test]
    fn test_sample_clamps_to_edge() {
        let mut map = OcclusionMap::solid(4, 4, Rgba::CLEAR);
        let edge = Rgba::new(1.0, 0.0, 0.0, 1.0);
        map.fill_rect(3, 0, 4, 1, edge);

        // Past the right edge of the top row: repeats the corner texel
        assert_eq!(map.sample(1.5, 0.0), edge);
        assert_eq!(map.sample(0.99, 0.0), edge);
        // Past the left edge: repeats the first texel
        assert_eq!(map.sample(-2.0, 0.0), Rgba::CLEAR);
    }

    #[test]
    fn test_closure_is_a_source() {
        let field = |pos: Vec2| Rgba::new(pos.x, pos.y, 0.0, 1.0);
        let s = field.sample_at(Vec2::new(0.25, 0.75));
        assert!((s.r - 0.25).abs() < 0.001);
        assert!((s.g - 0.75).abs() < 0.001);
    }
}
