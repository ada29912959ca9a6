// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![doc = r"Collision geometry for Ascent.

This crate provides:
- `f32` math (`Vec3`, scalar helpers) and the deterministic `Prng`.
- Axis-aligned bounding boxes (`Aabb`) and triangles with exact
  closest-point queries.
- A static triangle `Bvh`, `CollisionMesh` and the unioned `CollisionModel`.
- The KCL collision container codec.
- A read-through `CollisionCache` over pluggable `MeshSource`s.

Design notes:
- Deterministic: no ambient RNG; every random draw takes an explicit `Prng`.
- Distances are exact; bounding volumes only prune.
- Models are immutable and shared through `Arc`.
"]

/// Static bounding-volume hierarchy over triangles.
pub mod bvh;
pub mod cache;
pub mod error;
pub mod kcl;
/// Vector math, scalar helpers and the seeded PRNG.
pub mod math;
pub mod mesh;
pub mod model;
pub mod source;
/// Foundational geometric types.
pub mod types;

pub use cache::CollisionCache;
pub use error::MeshError;
pub use kcl::{decode_kcl, encode_kcl, KclFile, RawModel, RawTriangle};
pub use math::{seed_from_label, Prng, Vec3};
pub use mesh::CollisionMesh;
pub use model::CollisionModel;
pub use source::{FsMeshSource, MemoryMeshSource, MeshSource};
pub use types::{Aabb, Triangle};
