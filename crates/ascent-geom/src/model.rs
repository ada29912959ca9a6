// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Collision footprint of one placeable object.

use std::io::{self, Write};
use std::sync::Arc;

use crate::error::MeshError;
use crate::kcl::decode_kcl;
use crate::math::{Prng, Vec3};
use crate::mesh::CollisionMesh;
use crate::types::Aabb;

/// Union of one or more [`CollisionMesh`]es in object-local space.
///
/// Models are immutable; meshes are shared between models through `Arc`, so
/// [`CollisionModel::union`] is cheap and never touches its operands.
#[derive(Debug, Clone)]
pub struct CollisionModel {
    meshes: Vec<Arc<CollisionMesh>>,
    bounds: Aabb,
}

impl CollisionModel {
    /// Wraps a single mesh.
    pub fn from_mesh(mesh: CollisionMesh) -> Self {
        let bounds = mesh.bounds();
        Self { meshes: vec![Arc::new(mesh)], bounds }
    }

    /// Builds a model from shared meshes; `None` if `meshes` is empty.
    pub fn from_meshes(meshes: Vec<Arc<CollisionMesh>>) -> Option<Self> {
        let (first, rest) = meshes.split_first()?;
        let bounds = rest.iter().fold(first.bounds(), |b, m| b.union(&m.bounds()));
        Some(Self { meshes, bounds })
    }

    /// Decodes every model of a collision container into one
    /// `CollisionModel`.
    pub fn from_kcl(bytes: &[u8]) -> Result<Self, MeshError> {
        let file = decode_kcl(bytes)?;
        let mut meshes = Vec::with_capacity(file.models.len());
        for (i, raw) in file.models.iter().enumerate() {
            if raw.triangles.is_empty() {
                continue;
            }
            let (triangles, normals) = raw.reconstruct(i)?;
            let mesh = CollisionMesh::new(triangles, normals).map_err(|e| match e {
                MeshError::NonFinite { triangle, .. } => MeshError::NonFinite { model: i, triangle },
                MeshError::BadLayout { detail, .. } => MeshError::BadLayout { model: i, detail },
                other => other,
            })?;
            meshes.push(Arc::new(mesh));
        }
        Self::from_meshes(meshes).ok_or(MeshError::Empty)
    }

    /// Returns a new model containing the meshes of both operands.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let mut meshes = Vec::with_capacity(self.meshes.len() + other.meshes.len());
        meshes.extend(self.meshes.iter().cloned());
        meshes.extend(other.meshes.iter().cloned());
        Self { meshes, bounds: self.bounds.union(&other.bounds) }
    }

    /// Constituent meshes.
    pub fn meshes(&self) -> &[Arc<CollisionMesh>] {
        &self.meshes
    }

    /// Bounds of all constituent meshes.
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Total triangle count.
    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(|m| m.triangles().len()).sum()
    }

    /// Returns `true` if a sphere of `radius` at `center` (object-local)
    /// touches any constituent mesh.
    pub fn intersects(&self, center: Vec3, radius: f32) -> bool {
        self.bounds.intersects_sphere(center, radius)
            && self.meshes.iter().any(|m| m.intersects(center, radius))
    }

    /// Samples a surface point an actor of `actor_radius` can stand on.
    ///
    /// Each trial picks a random mesh and one of its triangles; a hit is kept
    /// only when a sphere of `actor_radius` centred at
    /// `pos + normal * (actor_radius + 1)` clears the whole model. Returns
    /// `None` after `max_trials` misses.
    pub fn standable_position(
        &self,
        actor_radius: f32,
        target_normal: Vec3,
        angle_threshold_deg: f32,
        max_trials: usize,
        rng: &mut Prng,
    ) -> Option<(Vec3, Vec3)> {
        for _ in 0..max_trials {
            let mesh = rng.pick(&self.meshes)?;
            let Some((pos, normal)) =
                mesh.sample_standable_position(target_normal, angle_threshold_deg, rng)
            else {
                continue;
            };
            if !self.intersects(pos + normal * (actor_radius + 1.0), actor_radius) {
                return Some((pos, normal));
            }
        }
        None
    }

    /// Writes the model's triangles, translated by `offset`, as Wavefront OBJ
    /// faces. `first_vertex` is the 1-based index the first written vertex
    /// will have in the output file; the next free index is returned.
    pub fn write_obj<W: Write>(&self, out: &mut W, offset: Vec3, first_vertex: usize) -> io::Result<usize> {
        let mut next = first_vertex;
        for mesh in &self.meshes {
            for tri in mesh.triangles() {
                for v in tri.vertices {
                    let p = v + offset;
                    writeln!(out, "v {} {} {}", p.x(), p.y(), p.z())?;
                }
                writeln!(out, "f {} {} {}", next, next + 1, next + 2)?;
                next += 3;
            }
        }
        Ok(next)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::kcl::encode_kcl;
    use crate::types::Triangle;

    fn quad(y: f32, size: f32) -> Vec<Triangle> {
        vec![
            Triangle::new(Vec3::new(0.0, y, 0.0), Vec3::new(0.0, y, size), Vec3::new(size, y, 0.0)),
            Triangle::new(Vec3::new(size, y, 0.0), Vec3::new(0.0, y, size), Vec3::new(size, y, size)),
        ]
    }

    #[test]
    fn union_leaves_operands_untouched() {
        let a = CollisionModel::from_mesh(CollisionMesh::from_triangles(quad(0.0, 10.0)).unwrap());
        let b = CollisionModel::from_mesh(CollisionMesh::from_triangles(quad(100.0, 10.0)).unwrap());
        let u = a.union(&b);
        assert_eq!(u.meshes().len(), 2);
        assert_eq!(a.meshes().len(), 1);
        assert_eq!(b.meshes().len(), 1);
        assert!(u.intersects(Vec3::new(5.0, 101.0, 5.0), 2.0));
        assert!(!a.intersects(Vec3::new(5.0, 101.0, 5.0), 2.0));
    }

    #[test]
    fn kcl_models_load_as_one_object() {
        let bytes = encode_kcl(&[quad(0.0, 50.0), quad(-20.0, 50.0)]).unwrap();
        let model = CollisionModel::from_kcl(&bytes).unwrap();
        assert_eq!(model.meshes().len(), 2);
        assert_eq!(model.triangle_count(), 4);
        assert!(model.intersects(Vec3::new(25.0, -25.0, 25.0), 6.0));
    }

    #[test]
    fn standable_position_needs_clearance() {
        // A floor with a downward-facing lid 50 units above it.
        let floor = CollisionMesh::from_triangles(quad(0.0, 200.0)).unwrap();
        let lid_tris = quad(50.0, 200.0)
            .into_iter()
            .map(|t| Triangle::new(t.vertices[0], t.vertices[2], t.vertices[1]))
            .collect();
        let lid = CollisionMesh::from_triangles(lid_tris).unwrap();
        let boxed = CollisionModel::from_meshes(vec![Arc::new(floor.clone()), Arc::new(lid)]).unwrap();
        let mut rng = Prng::from_seed_u64(1);
        assert!(boxed.standable_position(40.0, Vec3::UNIT_Y, 45.0, 200, &mut rng).is_none());

        let open = CollisionModel::from_mesh(floor);
        let (pos, normal) = open.standable_position(40.0, Vec3::UNIT_Y, 45.0, 200, &mut rng).unwrap();
        assert_eq!(normal, Vec3::UNIT_Y);
        assert!(pos.y().abs() < 1e-3);
    }

    #[test]
    fn obj_export_numbers_faces_sequentially() {
        let model = CollisionModel::from_mesh(CollisionMesh::from_triangles(quad(0.0, 1.0)).unwrap());
        let mut buf = Vec::new();
        let next = model.write_obj(&mut buf, Vec3::new(10.0, 0.0, 0.0), 1).unwrap();
        assert_eq!(next, 7);
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("v 10 0 0\n"));
        assert!(text.contains("f 4 5 6\n"));
    }
}
