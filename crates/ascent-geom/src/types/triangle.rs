// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use crate::math::Vec3;
use crate::types::aabb::Aabb;

/// A triangle given by three explicit vertices.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Triangle {
    /// Vertices in winding order.
    pub vertices: [Vec3; 3],
}

impl Triangle {
    /// Creates a triangle from its three vertices.
    pub const fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self { vertices: [a, b, c] }
    }

    /// Arithmetic mean of the three vertices.
    pub fn centroid(&self) -> Vec3 {
        let [a, b, c] = self.vertices;
        (a + b + c) / 3.0
    }

    /// Tight bounds of the three vertices.
    pub fn bounds(&self) -> Aabb {
        let [a, b, c] = self.vertices;
        let min = a.min(b).min(c);
        let max = a.max(b).max(c);
        Aabb::new(min, max)
    }

    /// Unit normal from the winding order, or zero for a degenerate triangle.
    pub fn geometric_normal(&self) -> Vec3 {
        let [a, b, c] = self.vertices;
        (b - a).cross(c - a).normalize()
    }

    /// Closest point on the (closed) triangle to `p`.
    ///
    /// Voronoi-region walk from Ericson, *Real-Time Collision Detection* §5.1.5.
    /// Exact up to `f32` rounding; degenerate triangles collapse to their
    /// closest edge or vertex.
    pub fn closest_point(&self, p: Vec3) -> Vec3 {
        let [a, b, c] = self.vertices;
        let ab = b - a;
        let ac = c - a;

        let ap = p - a;
        let d1 = ab.dot(ap);
        let d2 = ac.dot(ap);
        if d1 <= 0.0 && d2 <= 0.0 {
            return a;
        }

        let bp = p - b;
        let d3 = ab.dot(bp);
        let d4 = ac.dot(bp);
        if d3 >= 0.0 && d4 <= d3 {
            return b;
        }

        let vc = d1 * d4 - d3 * d2;
        if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
            let v = d1 / (d1 - d3);
            return a + ab * v;
        }

        let cp = p - c;
        let d5 = ab.dot(cp);
        let d6 = ac.dot(cp);
        if d6 >= 0.0 && d5 <= d6 {
            return c;
        }

        let vb = d5 * d2 - d1 * d6;
        if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
            let w = d2 / (d2 - d6);
            return a + ac * w;
        }

        let va = d3 * d6 - d5 * d4;
        if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
            let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
            return b + (c - b) * w;
        }

        let sum = va + vb + vc;
        if sum == 0.0 {
            // Collinear vertices that slipped through every region test.
            return Self::closest_on_segments(p, a, b, c);
        }
        let denom = 1.0 / sum;
        let v = vb * denom;
        let w = vc * denom;
        a + ab * v + ac * w
    }

    /// Squared distance from `p` to the triangle.
    pub fn distance_squared_to(&self, p: Vec3) -> f32 {
        (self.closest_point(p) - p).length_squared()
    }

    fn closest_on_segments(p: Vec3, a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
        let candidates = [
            closest_on_segment(p, a, b),
            closest_on_segment(p, b, c),
            closest_on_segment(p, c, a),
        ];
        let mut best = candidates[0];
        for q in &candidates[1..] {
            if (*q - p).length_squared() < (best - p).length_squared() {
                best = *q;
            }
        }
        best
    }
}

fn closest_on_segment(p: Vec3, a: Vec3, b: Vec3) -> Vec3 {
    let ab = b - a;
    let len2 = ab.length_squared();
    if len2 == 0.0 {
        return a;
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    a + ab * t
}
