// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use crate::math::Vec3;

/// Axis-aligned bounding box.
///
/// Invariants:
/// - `min` components are less than or equal to `max` components.
/// - Coordinates are in the same space as the geometry they bound (object
///   local space for collision meshes).
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aabb {
    min: Vec3,
    max: Vec3,
}

impl Aabb {
    /// Constructs an AABB from its minimum and maximum corners.
    ///
    /// # Panics
    /// Panics if any component of `min` is greater than its counterpart in `max`.
    #[must_use]
    pub fn new(min: Vec3, max: Vec3) -> Self {
        assert!(
            min.x() <= max.x() && min.y() <= max.y() && min.z() <= max.z(),
            "invalid AABB: min > max"
        );
        Self { min, max }
    }

    /// Checked constructor: `None` if the corners violate the invariant or are
    /// not finite.
    #[must_use]
    pub fn try_new(min: Vec3, max: Vec3) -> Option<Self> {
        let ordered = min.x() <= max.x() && min.y() <= max.y() && min.z() <= max.z();
        (ordered && min.is_finite() && max.is_finite()).then_some(Self { min, max })
    }

    /// Returns the minimum corner.
    #[must_use]
    pub fn min(&self) -> Vec3 {
        self.min
    }

    /// Returns the maximum corner.
    #[must_use]
    pub fn max(&self) -> Vec3 {
        self.max
    }

    /// Returns the centre of the box.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Builds an AABB centred at `center` with half-extents `hx, hy, hz`.
    #[must_use]
    pub fn from_center_half_extents(center: Vec3, hx: f32, hy: f32, hz: f32) -> Self {
        let he = Vec3::new(hx.abs(), hy.abs(), hz.abs());
        Self { min: center - he, max: center + he }
    }

    /// Builds the minimal AABB that contains all `points`, or `None` if empty.
    #[must_use]
    pub fn from_points(points: &[Vec3]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut min = *first;
        let mut max = *first;
        for p in rest {
            min = min.min(*p);
            max = max.max(*p);
        }
        Some(Self { min, max })
    }

    /// Returns `true` if this AABB overlaps another (inclusive on faces).
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        (0..3).all(|i| {
            self.max.component(i) >= other.min.component(i)
                && self.min.component(i) <= other.max.component(i)
        })
    }

    /// Returns the union of two AABBs.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self { min: self.min.min(other.min), max: self.max.max(other.max) }
    }

    /// Returns the box translated by `offset`.
    #[must_use]
    pub fn translate(&self, offset: Vec3) -> Self {
        Self { min: self.min + offset, max: self.max + offset }
    }

    /// Scales the box uniformly by `factor` about its own centre.
    ///
    /// Negative factors are treated as their absolute value so the invariant
    /// holds.
    #[must_use]
    pub fn scale(&self, factor: f32) -> Self {
        let center = self.center();
        let factor = factor.abs();
        Self {
            min: center + (self.min - center) * factor,
            max: center + (self.max - center) * factor,
        }
    }

    /// Largest side length of the box.
    #[must_use]
    pub fn max_extent(&self) -> f32 {
        let size = self.max - self.min;
        size.x().max(size.y()).max(size.z())
    }

    /// Squared distance from `point` to the closest point of the box (zero
    /// when the point is inside).
    #[must_use]
    pub fn distance_squared_to(&self, point: Vec3) -> f32 {
        let mut d = 0.0;
        for i in 0..3 {
            let c = point.component(i);
            let lo = self.min.component(i);
            let hi = self.max.component(i);
            if c < lo {
                d += (lo - c) * (lo - c);
            } else if c > hi {
                d += (c - hi) * (c - hi);
            }
        }
        d
    }

    /// Returns `true` if a sphere of `radius` at `center` can touch the box.
    ///
    /// Used as a broad-phase reject before exact mesh queries, so it is
    /// inclusive: a sphere exactly touching a face counts.
    #[must_use]
    pub fn intersects_sphere(&self, center: Vec3, radius: f32) -> bool {
        self.distance_squared_to(center) <= radius * radius
    }
}
