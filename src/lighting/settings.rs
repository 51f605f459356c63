//! Lighting settings
//!
//! Uses RON (Rusty Object Notation) for human-readable settings files.

use super::LightingError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// What the ambient term blends toward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AmbientBase {
    /// Flat white floor (inverted black-and-white look)
    White,
    /// The occlusion map's own color at the fragment
    OcclusionTint,
}

/// Tunables for a lighting pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LightSettings {
    /// Fraction of light surviving one step of empty medium (0.0-1.0)
    pub transmit: f32,
    /// Marching step budget (clamped to STEP_CEILING at march time)
    pub max_steps: u32,
    /// Ambient blend weight: final = (1 - mix) * light + mix * base
    pub ambient_mix: f32,
    /// What the ambient term blends toward
    pub ambient_base: AmbientBase,
}

impl Default for LightSettings {
    fn default() -> Self {
        Self {
            transmit: 0.99,
            max_steps: 512,
            ambient_mix: 0.1,
            ambient_base: AmbientBase::White,
        }
    }
}

/// Load settings from a RON file
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<LightSettings, LightingError> {
    let contents = fs::read_to_string(path)?;
    let settings: LightSettings = ron::from_str(&contents)?;
    Ok(settings)
}

/// Save settings to a RON file
pub fn save_settings<P: AsRef<Path>>(
    settings: &LightSettings,
    path: P,
) -> Result<(), LightingError> {
    let config = ron::ser::PrettyConfig::new();
    let contents = ron::ser::to_string_pretty(settings, config)?;
    fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let s = LightSettings::default();
        assert!((s.transmit - 0.99).abs() < 1e-6);
        assert_eq!(s.max_steps, 512);
        assert!((s.ambient_mix - 0.1).abs() < 1e-6);
        assert_eq!(s.ambient_base, AmbientBase::White);
    }

    #[test]
    fn test_parse_ron() {
        let s: LightSettings = ron::from_str(
            "(transmit: 0.9, max_steps: 64, ambient_mix: 0.2, ambient_base: OcclusionTint)",
        )
        .unwrap();
        assert!((s.transmit - 0.9).abs() < 1e-6);
        assert_eq!(s.max_steps, 64);
        assert_eq!(s.ambient_base, AmbientBase::OcclusionTint);
    }

    #[test]
    fn test_ron_round_trip() {
        let s = LightSettings {
            transmit: 0.95,
            max_steps: 128,
            ambient_mix: 0.25,
            ambient_base: AmbientBase::OcclusionTint,
        };
        let text = ron::ser::to_string_pretty(&s, ron::ser::PrettyConfig::new()).unwrap();
        let back: LightSettings = ron::from_str(&text).unwrap();
        assert!((back.transmit - s.transmit).abs() < 1e-6);
        assert_eq!(back.max_steps, s.max_steps);
        assert_eq!(back.ambient_base, s.ambient_base);
    }
}
