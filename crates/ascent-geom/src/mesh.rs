// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Single triangle soup with a query hierarchy.

use crate::bvh::Bvh;
use crate::error::MeshError;
use crate::math::{deg_to_rad, Prng, Vec3};
use crate::types::{Aabb, Triangle};

/// Immutable triangle mesh with per-face normals, bounds and a [`Bvh`].
///
/// Invariants:
/// - `normals.len() == triangles.len()`.
/// - `bounds` contains every vertex.
/// - The mesh holds at least one triangle.
#[derive(Debug, Clone)]
pub struct CollisionMesh {
    triangles: Vec<Triangle>,
    normals: Vec<Vec3>,
    bounds: Aabb,
    bvh: Bvh,
}

impl CollisionMesh {
    /// Builds a mesh from triangles and their face normals.
    ///
    /// Returns [`MeshError::Empty`] for an empty soup,
    /// [`MeshError::BadLayout`] when the normal count does not match and
    /// [`MeshError::NonFinite`] for the first triangle carrying a NaN or
    /// infinite vertex or normal.
    pub fn new(triangles: Vec<Triangle>, normals: Vec<Vec3>) -> Result<Self, MeshError> {
        if normals.len() != triangles.len() {
            return Err(MeshError::BadLayout { model: 0, detail: "normal count differs from triangle count" });
        }
        // Bounds are built with min/max, which skip NaN.
        let bad = triangles
            .iter()
            .zip(&normals)
            .position(|(t, n)| !(n.is_finite() && t.vertices.iter().all(|v| v.is_finite())));
        if let Some(triangle) = bad {
            return Err(MeshError::NonFinite { model: 0, triangle });
        }
        let points: Vec<Vec3> = triangles.iter().flat_map(|t| t.vertices).collect();
        let bounds = Aabb::from_points(&points).ok_or(MeshError::Empty)?;
        let bvh = Bvh::build(&triangles);
        Ok(Self { triangles, normals, bounds, bvh })
    }

    /// Builds a mesh using each triangle's winding-order normal.
    pub fn from_triangles(triangles: Vec<Triangle>) -> Result<Self, MeshError> {
        let normals = triangles.iter().map(Triangle::geometric_normal).collect();
        Self::new(triangles, normals)
    }

    /// Triangles in load order.
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Face normal of each triangle.
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    /// Bounds in mesh-local space.
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Exact distance from `point` to the nearest triangle.
    pub fn nearest_distance(&self, point: Vec3) -> f32 {
        self.bvh
            .nearest_distance_squared(&self.triangles, point)
            .map_or(f32::INFINITY, f32::sqrt)
    }

    /// Returns `true` if a sphere of `radius` at `center` touches the mesh.
    ///
    /// The bounding box rejects far spheres before the hierarchy is walked.
    pub fn intersects(&self, center: Vec3, radius: f32) -> bool {
        if !self.bounds.intersects_sphere(center, radius) {
            return false;
        }
        self.bvh.any_within(&self.triangles, center, radius * radius)
    }

    /// One trial of standable-surface sampling.
    ///
    /// Picks a triangle uniformly and returns `(centroid, face_normal)` when
    /// the face normal lies within `angle_threshold_deg` of `target_normal`
    /// (`dot(n, target) >= cos(threshold)`), `None` otherwise.
    pub fn sample_standable_position(
        &self,
        target_normal: Vec3,
        angle_threshold_deg: f32,
        rng: &mut Prng,
    ) -> Option<(Vec3, Vec3)> {
        let idx = rng.next_index(self.triangles.len());
        let normal = self.normals[idx];
        if normal.dot(target_normal) < deg_to_rad(angle_threshold_deg).cos() {
            return None;
        }
        Some((self.triangles[idx].centroid(), normal))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn floor() -> CollisionMesh {
        CollisionMesh::from_triangles(vec![
            Triangle::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 100.0), Vec3::new(100.0, 0.0, 0.0)),
            Triangle::new(
                Vec3::new(100.0, 0.0, 0.0),
                Vec3::new(0.0, 0.0, 100.0),
                Vec3::new(100.0, 0.0, 100.0),
            ),
        ])
        .unwrap()
    }

    #[test]
    fn empty_soup_is_rejected() {
        assert!(matches!(CollisionMesh::from_triangles(Vec::new()), Err(MeshError::Empty)));
    }

    #[test]
    fn nan_vertex_is_rejected() {
        let good = Triangle::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0), Vec3::new(1.0, 0.0, 0.0));
        let bad = Triangle::new(Vec3::new(f32::NAN, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0), Vec3::new(1.0, 0.0, 0.0));
        assert!(matches!(
            CollisionMesh::from_triangles(vec![good, bad]),
            Err(MeshError::NonFinite { model: 0, triangle: 1 })
        ));
        let inf = Triangle::new(Vec3::ZERO, Vec3::new(0.0, 0.0, f32::INFINITY), Vec3::new(1.0, 0.0, 0.0));
        assert!(matches!(
            CollisionMesh::new(vec![good, inf], vec![Vec3::UNIT_Y; 2]),
            Err(MeshError::NonFinite { model: 0, triangle: 1 })
        ));
        assert!(matches!(
            CollisionMesh::new(vec![good], vec![Vec3::new(0.0, f32::NAN, 0.0)]),
            Err(MeshError::NonFinite { model: 0, triangle: 0 })
        ));
    }

    #[test]
    fn sphere_touching_floor_intersects() {
        let mesh = floor();
        assert!(mesh.intersects(Vec3::new(50.0, 10.0, 50.0), 10.0));
        assert!(!mesh.intersects(Vec3::new(50.0, 10.5, 50.0), 10.0));
        assert_eq!(mesh.nearest_distance(Vec3::new(50.0, -7.0, 50.0)), 7.0);
    }

    #[test]
    fn upward_floor_is_always_standable() {
        let mesh = floor();
        let mut rng = Prng::from_seed_u64(3);
        for _ in 0..20 {
            let (pos, n) = mesh.sample_standable_position(Vec3::UNIT_Y, 45.0, &mut rng).unwrap();
            assert_eq!(n, Vec3::UNIT_Y);
            assert!(mesh.bounds().distance_squared_to(pos) == 0.0);
        }
    }

    #[test]
    fn zero_degree_cone_rejects_mismatched_normals() {
        let mesh = floor();
        let mut rng = Prng::from_seed_u64(9);
        let tilted = Vec3::new(0.0, 1.0, 0.01).normalize();
        for _ in 0..50 {
            assert!(mesh.sample_standable_position(tilted, 0.0, &mut rng).is_none());
        }
    }
}
