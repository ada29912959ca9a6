// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Core geometry types used by the collision engine (AABB, triangle).
//!
//! - Sphere and overlap tests are inclusive on faces: touching counts.
//! - Distances are exact Euclidean values in `f32`; nothing here
//!   approximates with bounding spheres or sampling.

#[doc = "Axis-aligned bounding boxes."]
pub mod aabb;
#[doc = "Triangles and point-triangle closest-point queries."]
pub mod triangle;

pub use aabb::Aabb;
pub use triangle::Triangle;
