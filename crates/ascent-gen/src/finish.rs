// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Stage finishing: exit pipe, kill plane and the warps that chain stages.
//!
//! Stages are stacked: falling off the top of the next stage lands the
//! player above this one, and falling off the bottom of this one returns
//! them to the previous stage (or to the start, for the first stage).

use ascent_geom::Vec3;
use serde::{Deserialize, Serialize};

use crate::level::Level;
use crate::stage::{self, params, Area, AreaKind, Component, ObjectId, RunContext, StageObject};

const GRID: i16 = 8;
const CELL: f32 = 4000.0;
const PIPE_HEIGHT: f32 = 450.0;
const SPAWN_HEIGHT: f32 = 2000.0;
const WARP_HEIGHT: f32 = 20_000.0;
const FLOOR_SCALE: Vec3 = Vec3::new(100_000.0, 20.0, 100_000.0);

/// Names of the stages around the generated one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageLinks {
    /// Stage being generated.
    pub current: String,
    /// Stage below; `None` for the first stage.
    pub previous: Option<String>,
    /// Stage the exit pipe leads to.
    pub next: String,
}

fn cell_offset(i: i16) -> f32 {
    f32::from(i - GRID / 2) * CELL
}

fn change_stage(ctx: &mut RunContext, stage: &str, id: String, restart: ObjectId, at: Vec3, scale: Vec3) -> Area {
    let kind = AreaKind::ChangeStage { stage_name: stage.to_owned(), change_stage_id: id, restart };
    Area::new(ctx, kind, at, scale)
}

impl Level {
    /// Adds the stage-level objects and areas that connect this level to
    /// its neighbours. Call once, after generation.
    pub fn finish(&mut self, links: &StageLinks) {
        let start = self.start;
        let last = self.placements.last().map_or(start, |p| p.position);
        let ctx = &mut self.context;
        let mut objects: Vec<StageObject> = Vec::new();
        let mut areas: Vec<Area> = Vec::new();

        objects.push(stage::stage_change_pipe(ctx, &links.next, last + Vec3::new(0.0, PIPE_HEIGHT, 0.0)));
        areas.push(Area::new(ctx, AreaKind::Death, start + Vec3::new(0.0, -4000.0, 0.0), FLOOR_SCALE));

        // Entry points when falling from the next stage.
        let top = Vec3::new(start.x(), last.y() + SPAWN_HEIGHT, start.z());
        for x in 0..GRID {
            for y in 0..GRID {
                let spawn = top + Vec3::new(cell_offset(x), 0.0, cell_offset(y));
                let obj = stage::player_start(ctx, spawn);
                areas.push(change_stage(
                    ctx,
                    &links.next,
                    format!("EX_FallFromTop_{x}_{y}"),
                    obj.id,
                    spawn + Vec3::new(0.0, WARP_HEIGHT, 0.0),
                    Vec3::splat(0.001),
                ));
                // Touching water briefly hands control back to a falling player.
                areas.push(Area::new(ctx, AreaKind::Water, spawn + Vec3::new(0.0, -500.0, 0.0), Vec3::splat(0.25)));
                objects.push(obj);
            }
        }

        match &links.previous {
            None => {
                let spawn = stage::player_start(ctx, start);
                areas.push(change_stage(
                    ctx,
                    &links.current,
                    "EX_FallFromTop_InitialStage".to_owned(),
                    spawn.id,
                    start + Vec3::new(0.0, -2000.0, 0.0),
                    FLOOR_SCALE,
                ));
                objects.push(spawn);
            }
            Some(previous) => {
                let spawn = stage::player_start(ctx, start)
                    .with_component(Component::StageChange { change_stage_id: String::new() });
                let fallback = "EX_FallFromTop_Default";
                areas.push(change_stage(
                    ctx,
                    &links.next,
                    fallback.to_owned(),
                    spawn.id,
                    top + Vec3::new(0.0, WARP_HEIGHT, 0.0),
                    Vec3::splat(0.001),
                ));
                areas.push(change_stage(
                    ctx,
                    previous,
                    fallback.to_owned(),
                    spawn.id,
                    start + Vec3::new(0.0, -3000.0, 0.0),
                    FLOOR_SCALE,
                ));
                for x in 0..GRID {
                    for y in 0..GRID {
                        areas.push(change_stage(
                            ctx,
                            previous,
                            format!("EX_FallFromTop_{x}_{y}"),
                            spawn.id,
                            start + Vec3::new(cell_offset(x), -2000.0, cell_offset(y)),
                            Vec3::splat(CELL / 1000.0),
                        ));
                    }
                }
                objects.push(spawn);
            }
        }

        objects.push(StageObject::new(ctx, params::LIFE_UP, params::LIFE_UP, start + Vec3::new(250.0, -800.0, 0.0)));
        self.objects.extend(objects);
        self.areas.extend(areas);
    }
}
