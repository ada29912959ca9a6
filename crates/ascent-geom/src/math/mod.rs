// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Math helpers: vectors, degree conversion, and seeded pseudo-random numbers.
//!
//! All operations stay in `f32` to match the precision of stored collision
//! data.

use std::f32::consts::TAU;

mod prng;
mod vec3;

pub use prng::{seed_from_label, Prng};
pub use vec3::Vec3;

/// Global epsilon used by math routines when detecting degenerate values.
pub const EPSILON: f32 = 1e-6;

/// Converts degrees to radians with float32 precision.
pub fn deg_to_rad(value: f32) -> f32 {
    value * (TAU / 360.0)
}

