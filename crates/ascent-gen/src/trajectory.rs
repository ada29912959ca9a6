// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Recorded jump paths.

use std::sync::Arc;

use ascent_geom::{CollisionModel, Vec3};
use serde::{Deserialize, Serialize};

/// Ordered path offsets, normalised so the first point is the origin.
///
/// Points are shared; [`Trajectory::scale`] allocates a new path and leaves
/// the recorded one untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec3>", into = "Vec<Vec3>")]
pub struct Trajectory {
    points: Arc<[Vec3]>,
}

impl Trajectory {
    /// Builds a trajectory from raw samples, translating them so the first
    /// sample sits at the origin. `None` for an empty list.
    pub fn new(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let points = core::iter::once(Vec3::ZERO).chain(iter.map(|p| p - first)).collect();
        Some(Self { points })
    }

    /// Path offsets; the first is always zero.
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`: empty trajectories cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Landing offset relative to the start.
    pub fn endpoint(&self) -> Vec3 {
        self.points.last().copied().unwrap_or(Vec3::ZERO)
    }

    /// Returns a copy with every offset multiplied by `factor`.
    #[must_use]
    pub fn scale(&self, factor: f32) -> Self {
        Self { points: self.points.iter().map(|&p| p * factor).collect() }
    }

    /// World-space samples for a jump starting at `start` with yaw
    /// `y_rotation` (radians).
    pub fn world_points(&self, start: Vec3, y_rotation: f32) -> impl Iterator<Item = Vec3> + '_ {
        self.points.iter().map(move |p| start + p.rotate_y(y_rotation))
    }

    /// Returns `true` if a sphere of `radius` swept along the path touches
    /// `model` placed at `model_position`.
    pub fn intersects_object(
        &self,
        start: Vec3,
        y_rotation: f32,
        radius: f32,
        model: &CollisionModel,
        model_position: Vec3,
    ) -> bool {
        self.world_points(start, y_rotation).any(|p| model.intersects(p - model_position, radius))
    }
}

impl TryFrom<Vec<Vec3>> for Trajectory {
    type Error = &'static str;

    fn try_from(points: Vec<Vec3>) -> Result<Self, Self::Error> {
        Self::new(points).ok_or("trajectory needs at least one point")
    }
}

impl From<Trajectory> for Vec<Vec3> {
    fn from(t: Trajectory) -> Self {
        t.points.to_vec()
    }
}
