//! Glowcast: raymarched 2D lighting engine
//!
//! Software lighting for 2D scenes. A point light is cast through an RGBA
//! occlusion map by marching from the light toward each shaded pixel:
//! - Multiplicative attenuation with per-occluder tint
//! - Bounded marching loop (512-step ceiling, early exit on arrival or
//!   extinction)
//! - Row-parallel full-frame renderer
//! - RON-configured settings, PNG occlusion maps

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod lighting;
pub mod math;

pub use lighting::*;
pub use math::Vec2;
