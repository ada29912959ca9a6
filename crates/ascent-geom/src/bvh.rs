// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Static bounding-volume hierarchy over a triangle soup.
//!
//! Determinism contract:
//! - The tree shape depends only on the input order of triangles: splits sort
//!   by centroid with `total_cmp` and break ties by triangle index.
//! - Queries return exact minimum distances, so traversal order never changes
//!   a result, only how much of the tree is visited.

use core::cmp::Ordering;

use crate::math::Vec3;
use crate::types::{Aabb, Triangle};

/// Triangles per leaf before a node is split.
const LEAF_SIZE: usize = 4;

#[derive(Debug, Clone)]
enum NodeKind {
    /// Range into `Bvh::order`.
    Leaf { start: usize, len: usize },
    /// Indices into `Bvh::nodes`.
    Branch { left: usize, right: usize },
}

#[derive(Debug, Clone)]
struct Node {
    bounds: Aabb,
    kind: NodeKind,
}

/// Median-split AABB tree answering nearest-distance queries against the
/// triangles it was built from.
///
/// The hierarchy stores triangle indices only; callers pass the same triangle
/// slice to every query.
#[derive(Debug, Clone, Default)]
pub struct Bvh {
    nodes: Vec<Node>,
    order: Vec<usize>,
}

impl Bvh {
    /// Builds a hierarchy over `triangles`.
    pub fn build(triangles: &[Triangle]) -> Self {
        let mut bvh = Self { nodes: Vec::new(), order: (0..triangles.len()).collect() };
        if triangles.is_empty() {
            return bvh;
        }
        let bounds: Vec<Aabb> = triangles.iter().map(Triangle::bounds).collect();
        let centroids: Vec<Vec3> = triangles.iter().map(Triangle::centroid).collect();
        let len = triangles.len();
        bvh.build_node(&bounds, &centroids, 0, len);
        bvh
    }

    /// Number of nodes in the hierarchy.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn build_node(&mut self, bounds: &[Aabb], centroids: &[Vec3], start: usize, len: usize) -> usize {
        let slice = &self.order[start..start + len];
        let mut node_bounds = bounds[slice[0]];
        for &i in &slice[1..] {
            node_bounds = node_bounds.union(&bounds[i]);
        }

        let index = self.nodes.len();
        self.nodes.push(Node { bounds: node_bounds, kind: NodeKind::Leaf { start, len } });
        if len <= LEAF_SIZE {
            return index;
        }

        // Split on the longest axis of the centroid spread.
        let mut cmin = centroids[slice[0]];
        let mut cmax = cmin;
        for &i in &slice[1..] {
            cmin = cmin.min(centroids[i]);
            cmax = cmax.max(centroids[i]);
        }
        let spread = cmax - cmin;
        let axis = if spread.x() >= spread.y() && spread.x() >= spread.z() {
            0
        } else if spread.y() >= spread.z() {
            1
        } else {
            2
        };

        self.order[start..start + len].sort_by(|&a, &b| {
            match centroids[a].component(axis).total_cmp(&centroids[b].component(axis)) {
                Ordering::Equal => a.cmp(&b),
                o => o,
            }
        });

        let half = len / 2;
        let left = self.build_node(bounds, centroids, start, half);
        let right = self.build_node(bounds, centroids, start + half, len - half);
        self.nodes[index].kind = NodeKind::Branch { left, right };
        index
    }

    /// Exact squared distance from `p` to the nearest triangle, or `None` if
    /// the hierarchy is empty.
    pub fn nearest_distance_squared(&self, triangles: &[Triangle], p: Vec3) -> Option<f32> {
        if self.nodes.is_empty() {
            return None;
        }
        let mut best = f32::INFINITY;
        let mut stack = vec![0usize];
        while let Some(idx) = stack.pop() {
            let node = &self.nodes[idx];
            if node.bounds.distance_squared_to(p) > best {
                continue;
            }
            match node.kind {
                NodeKind::Leaf { start, len } => {
                    for &t in &self.order[start..start + len] {
                        let d = triangles[t].distance_squared_to(p);
                        if d < best {
                            best = d;
                        }
                    }
                }
                NodeKind::Branch { left, right } => {
                    let dl = self.nodes[left].bounds.distance_squared_to(p);
                    let dr = self.nodes[right].bounds.distance_squared_to(p);
                    // Push the farther child first so the nearer one is visited next.
                    if dl <= dr {
                        stack.push(right);
                        stack.push(left);
                    } else {
                        stack.push(left);
                        stack.push(right);
                    }
                }
            }
        }
        Some(best)
    }

    /// Returns `true` if any triangle lies within `sqrt(max_distance_squared)`
    /// of `p` (inclusive).
    ///
    /// Equivalent to `nearest_distance_squared(..) <= max_distance_squared`
    /// but stops at the first hit.
    pub fn any_within(&self, triangles: &[Triangle], p: Vec3, max_distance_squared: f32) -> bool {
        if self.nodes.is_empty() {
            return false;
        }
        let mut stack = vec![0usize];
        while let Some(idx) = stack.pop() {
            let node = &self.nodes[idx];
            if node.bounds.distance_squared_to(p) > max_distance_squared {
                continue;
            }
            match node.kind {
                NodeKind::Leaf { start, len } => {
                    if self.order[start..start + len]
                        .iter()
                        .any(|&t| triangles[t].distance_squared_to(p) <= max_distance_squared)
                    {
                        return true;
                    }
                }
                NodeKind::Branch { left, right } => {
                    stack.push(right);
                    stack.push(left);
                }
            }
        }
        false
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    fn strip(n: usize) -> Vec<Triangle> {
        (0..n)
            .map(|i| {
                #[allow(clippy::cast_precision_loss)]
                let x = i as f32 * 10.0;
                Triangle::new(
                    Vec3::new(x, 0.0, 0.0),
                    Vec3::new(x + 5.0, 0.0, 0.0),
                    Vec3::new(x, 0.0, 5.0),
                )
            })
            .collect()
    }

    #[test]
    fn empty_tree_answers_none() {
        let bvh = Bvh::build(&[]);
        assert_eq!(bvh.nearest_distance_squared(&[], Vec3::ZERO), None);
        assert!(!bvh.any_within(&[], Vec3::ZERO, 1e9));
    }

    #[test]
    fn nearest_matches_linear_scan() {
        let tris = strip(37);
        let bvh = Bvh::build(&tris);
        assert!(bvh.node_count() > 1);
        for p in [
            Vec3::new(123.0, 7.0, 2.0),
            Vec3::new(-50.0, 0.0, 0.0),
            Vec3::new(366.0, -3.0, 9.0),
        ] {
            let brute = tris
                .iter()
                .map(|t| t.distance_squared_to(p))
                .fold(f32::INFINITY, f32::min);
            assert_eq!(bvh.nearest_distance_squared(&tris, p), Some(brute));
        }
    }

    #[test]
    fn any_within_is_inclusive() {
        let tris = strip(8);
        let bvh = Bvh::build(&tris);
        let p = Vec3::new(2.0, 4.0, 2.0);
        assert!(bvh.any_within(&tris, p, 16.0));
        assert!(!bvh.any_within(&tris, p, 15.99));
    }
}
