// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Generated level: zones, stage-level objects and run summary.

use std::io::Write;

use ascent_geom::{CollisionCache, Vec3};
use serde::{Deserialize, Serialize};

use crate::dataset::WorldDataset;
use crate::error::GenerateError;
use crate::segment::SegmentKind;
use crate::sink::SceneSink;
use crate::stage::{Area, RunContext, StageObject};

/// Counters collected during a run.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Candidates tried, successful ones included.
    pub attempts: u64,
    /// Candidates dropped by the distance heuristic.
    pub distance_rejections: u64,
    /// Single placement reverts.
    pub single_reverts: u32,
    /// Whole-zone reverts.
    pub zone_reverts: u32,
}

/// Objects of one segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    /// `OnlyUp<World><Segment>Zone<n>`.
    pub name: String,
    /// Segment that filled the zone.
    pub kind: SegmentKind,
    /// Fixtures first, then placements in commit order.
    pub objects: Vec<StageObject>,
}

/// Summary of one committed placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedObject {
    /// Unit name of the primary object.
    pub object_type: String,
    /// World position.
    pub position: Vec3,
    /// Index into [`Level::zones`].
    pub zone: usize,
}

/// Summary of one committed jump.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JumpSummary {
    /// Jump name from the dataset.
    pub name: String,
    /// Index of the take-off placement.
    pub from: usize,
    /// Index of the landing placement.
    pub to: usize,
    /// World position of the take-off.
    pub start: Vec3,
    /// Yaw in radians.
    pub y_rotation: f32,
    /// Trajectory scale factor.
    pub scale: f32,
}

/// A generated level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    /// World the level was generated for.
    pub world: String,
    /// Sky model of the world.
    pub sky: String,
    /// Player start.
    pub start: Vec3,
    /// Zones in creation order.
    pub zones: Vec<Zone>,
    /// Objects outside any zone.
    pub objects: Vec<StageObject>,
    /// Areas outside any zone.
    pub areas: Vec<Area>,
    /// Committed placements in history order, start platform first.
    pub placements: Vec<PlacedObject>,
    /// Committed jumps in history order.
    pub jumps: Vec<JumpSummary>,
    /// Run counters.
    pub stats: GenerationStats,
    pub(crate) context: RunContext,
}

impl Level {
    pub(crate) fn new(
        world: &WorldDataset,
        start: Vec3,
        zones: Vec<Zone>,
        placements: Vec<PlacedObject>,
        jumps: Vec<JumpSummary>,
        stats: GenerationStats,
        context: RunContext,
    ) -> Self {
        Self {
            world: world.name.clone(),
            sky: world.sky.clone(),
            start,
            zones,
            objects: Vec::new(),
            areas: Vec::new(),
            placements,
            jumps,
            stats,
            context,
        }
    }

    /// Every object of the level, stage-level first, then zone by zone.
    pub fn all_objects(&self) -> impl Iterator<Item = &StageObject> {
        self.objects.iter().chain(self.zones.iter().flat_map(|z| &z.objects))
    }

    /// Streams the level into `sink`.
    pub fn emit(&self, sink: &mut impl SceneSink) {
        for obj in &self.objects {
            sink.object(obj);
        }
        for area in &self.areas {
            sink.area(area);
        }
        for zone in &self.zones {
            sink.begin_zone(&zone.name);
            for obj in &zone.objects {
                sink.object(obj);
            }
        }
    }

    /// Writes the collision of every placement, relative to the start, as
    /// one Wavefront OBJ. Placements without collision are skipped.
    pub fn write_collision_obj<W: Write>(&self, cache: &CollisionCache, out: &mut W) -> Result<(), GenerateError> {
        let mut next = 1;
        for p in &self.placements {
            let model = cache.get(&p.object_type).map_err(|source| GenerateError::mesh(&p.object_type, source))?;
            if let Some(model) = model {
                next = model.write_obj(out, p.position - self.start, next)?;
            }
        }
        Ok(())
    }
}
