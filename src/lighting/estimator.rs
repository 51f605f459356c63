//! Light-attenuation raymarching
//!
//! The core of the engine: walk from the light source toward a sample
//! point through the occlusion field, multiplying an RGBA accumulator by
//! the occluder term at every step. Where opacity is high the occluder's
//! own tint decides what survives; where it is low a flat transmit factor
//! models absorption by the empty medium.

use super::{
    LightingError, OcclusionSource, Rgba, ARRIVAL_EPSILON, EXTINCTION_EPSILON, STEP_CEILING,
};
use crate::math::Vec2;

/// Estimate surviving light at `frag_px`, cast from `light_px`.
///
/// Positions are in pixel space and divided by `resolution` before the
/// march, so both must be expressed against the same resolution. Fails
/// with `InvalidResolution` when either component is zero or negative.
pub fn cast_light<S: OcclusionSource>(
    field: &S,
    light_px: Vec2,
    frag_px: Vec2,
    resolution: Vec2,
    transmit: f32,
    max_steps: u32,
) -> Result<Rgba, LightingError> {
    if resolution.x <= 0.0 || resolution.y <= 0.0 {
        return Err(LightingError::InvalidResolution {
            width: resolution.x,
            height: resolution.y,
        });
    }

    let light_pos = Vec2::new(light_px.x / resolution.x, light_px.y / resolution.y);
    let frag_pos = Vec2::new(frag_px.x / resolution.x, frag_px.y / resolution.y);
    Ok(march(field, light_pos, frag_pos, transmit, max_steps))
}

/// March in normalized `[0,1]x[0,1]` space.
///
/// Runs at most `min(max_steps, STEP_CEILING)` iterations; the step vector
/// is the unit direction divided by that count, so the full budget spans
/// unit distance. Ends early on arrival at `frag_pos` or once the summed
/// RGB intensity drops below the extinction threshold (further steps could
/// only darken an already black result).
///
/// The arrival check is Euclidean distance in normalized space, so its
/// scale depends on the aspect ratio of the resolution the positions were
/// normalized against.
pub fn march<S: OcclusionSource>(
    field: &S,
    light_pos: Vec2,
    frag_pos: Vec2,
    transmit: f32,
    max_steps: u32,
) -> Rgba {
    let mut light = Rgba::WHITE;

    // Zero budget: valid no-op, light passes unattenuated
    if max_steps == 0 {
        return light;
    }

    let to_frag = frag_pos - light_pos;
    // Light sits on the sample point: nothing in between to attenuate
    if to_frag.length() == 0.0 {
        return light;
    }

    let effective = (max_steps as usize).min(STEP_CEILING);
    let step = to_frag.normalize() / effective as f32;
    let mut current = light_pos;

    for _ in 0..effective {
        let s = field.sample_at(current);
        let pass = (1.0 - s.a) * transmit;
        light.r *= s.a * s.r + pass;
        light.g *= s.a * s.g + pass;
        light.b *= s.a * s.b + pass;

        if current.distance(frag_pos) <= ARRIVAL_EPSILON
            || light.intensity() <= EXTINCTION_EPSILON
        {
            break;
        }
        current = current + step;
    }

    light
}
