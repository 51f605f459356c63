//! 2D light casting through an occlusion map
//!
//! The light source shoots one ray per shaded pixel. The ray is walked in
//! fixed steps through the occlusion map, multiplying an RGBA accumulator
//! by the occluder term at every step:
//! - Opaque occluders (`a` near 1) replace light with their own tint
//! - Empty medium (`a` near 0) attenuates by a flat transmit factor
//! - The march ends on arrival at the pixel or when light dies out

mod estimator;
mod render;
mod settings;
mod types;

pub use estimator::*;
pub use render::*;
pub use settings::*;
pub use types::*;

/// Upper bound on marching iterations, regardless of the requested budget
pub const STEP_CEILING: usize = 512;

/// Normalized-space distance at which the march counts as arrived
pub const ARRIVAL_EPSILON: f32 = 0.001;

/// Summed RGB intensity below which light counts as extinguished
pub const EXTINCTION_EPSILON: f32 = 0.001;
