// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Placement engine: sample, position, validate, commit or backtrack.
//!
//! When no candidate fits, the run backs out of the dead end:
//! - one committed step, while the active zone holds one;
//! - otherwise the whole zone; the next zone opens on the same boundary;
//! - if that reopened zone also fails before committing anything, the run
//!   steps back into the zone below it and resumes that zone's segment.

use std::sync::Arc;

use ascent_geom::{seed_from_label, CollisionCache, CollisionModel, Prng, Vec3};
use tracing::{debug, info, instrument, warn};

use crate::config::GeneratorConfig;
use crate::dataset::{JumpData, JumpSource, WorldDataset};
use crate::error::{DatasetError, GenerateError};
use crate::level::{GenerationStats, JumpSummary, Level, PlacedObject, Zone};
use crate::segment::{Candidate, Segment, SegmentKind};
use crate::stage::{self, ObjectId, RunContext, StageObject};
use crate::trajectory::Trajectory;

/// Depth of the start platform below the player start.
const START_PLATFORM_DEPTH: f32 = 1500.0;

/// Seed for one stage of a multi-stage run: the label seed offset by the
/// byte sum of the stage name, so each stage draws different segments.
pub fn stage_seed(seed: &str, stage_name: &str) -> u64 {
    let offset: u64 = stage_name.bytes().map(u64::from).sum();
    seed_from_label(seed).wrapping_add(offset)
}

/// A committed object in the run history.
#[derive(Debug, Clone)]
struct Placement {
    primary: StageObject,
    extra: Vec<StageObject>,
    model: Arc<CollisionModel>,
    zone: usize,
}

impl Placement {
    fn object_type(&self) -> &str {
        &self.primary.unit_name
    }

    const fn position(&self) -> Vec3 {
        self.primary.position
    }
}

/// A committed jump between two placements.
///
/// Both actors fly the leading actor's path; only their radii differ.
#[derive(Debug, Clone)]
struct JumpRecord {
    from: usize,
    to: usize,
    name: String,
    start: Vec3,
    y_rotation: f32,
    scale: f32,
    path: Trajectory,
}

impl JumpRecord {
    /// `true` if either actor's sweep touches `model` placed at `position`.
    fn touches(&self, model: &CollisionModel, position: Vec3, config: &GeneratorConfig) -> bool {
        let origin = self.start + Vec3::new(0.0, config.trajectory_lift, 0.0);
        [config.leading_radius, config.following_radius]
            .into_iter()
            .any(|radius| self.path.intersects_object(origin, self.y_rotation, radius, model, position))
    }
}

#[derive(Debug, Clone, Copy)]
struct Checkpoint {
    placements: usize,
    jumps: usize,
}

#[derive(Debug, Clone)]
struct OpenZone {
    name: String,
    kind: SegmentKind,
    checkpoint: Checkpoint,
    // Fixtures without collision; they never enter the history.
    extras: Vec<StageObject>,
    // Opened on a boundary whose previous zone was just reverted.
    reopened: bool,
    // The zone's segment once it is closed.
    segment: Option<Segment>,
}

/// How a run backs out of a dead end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Backtrack {
    /// Drop the last placement of the active zone.
    Step,
    /// Drop the active zone and the last placement of the zone before it.
    StepBack,
    /// Drop the active zone.
    Zone,
}

/// Generates levels for one configuration, collision cache and jump
/// catalogue. Runs share nothing mutable, so one generator serves any
/// number of sequential runs.
pub struct Generator<'a> {
    config: &'a GeneratorConfig,
    cache: &'a CollisionCache,
    jumps: &'a dyn JumpSource,
}

impl core::fmt::Debug for Generator<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Generator").field("config", self.config).field("cache", self.cache).finish_non_exhaustive()
    }
}

impl<'a> Generator<'a> {
    /// Creates a generator.
    pub fn new(config: &'a GeneratorConfig, cache: &'a CollisionCache, jumps: &'a dyn JumpSource) -> Self {
        Self { config, cache, jumps }
    }

    /// The configuration runs use.
    pub const fn config(&self) -> &GeneratorConfig {
        self.config
    }

    /// Generates a level for `world` whose player starts at `start`.
    ///
    /// # Errors
    /// [`GenerateError::RevertUnderflow`] when the first zone cannot be
    /// continued; load failures of collision or jump data; and
    /// [`GenerateError::RevertLimit`] when a configured revert budget runs
    /// out.
    #[instrument(skip(self, world, rng), fields(world = %world.name))]
    pub fn generate(&self, start: Vec3, world: &WorldDataset, rng: &mut Prng) -> Result<Level, GenerateError> {
        let mut run = Run::new(self, world, start)?;
        run.execute(rng)?;
        info!(
            placements = run.placements.len(),
            jumps = run.jumps.len(),
            zones = run.zones.len(),
            attempts = run.stats.attempts,
            "level generated"
        );
        Ok(run.into_level())
    }
}

fn lookup(cache: &CollisionCache, object_type: &str) -> Result<Option<Arc<CollisionModel>>, GenerateError> {
    cache.get(object_type).map_err(|source| GenerateError::mesh(object_type, source))
}

/// A validated candidate waiting to be committed.
struct Pending {
    placement: Placement,
    jump: JumpRecord,
    requested: String,
}

struct Run<'g, 'w> {
    generator: &'g Generator<'g>,
    world: &'w WorldDataset,
    kinds: Vec<SegmentKind>,
    start: Vec3,
    ctx: RunContext,
    // Start platform; the history never shrinks below it.
    origin: Placement,
    placements: Vec<Placement>,
    jumps: Vec<JumpRecord>,
    zones: Vec<OpenZone>,
    // Zone the active segment fills.
    segment_zone: usize,
    // Set by a zone revert; the next zone opens on the same boundary.
    boundary_reverted: bool,
    stats: GenerationStats,
}

impl<'g, 'w> Run<'g, 'w> {
    fn new(generator: &'g Generator<'g>, world: &'w WorldDataset, start: Vec3) -> Result<Self, GenerateError> {
        let model = lookup(generator.cache, &world.start_object)?
            .ok_or_else(|| GenerateError::StartWithoutCollision(world.start_object.clone()))?;
        let mut ctx = RunContext::new();
        let primary =
            stage::fix_map_parts(&mut ctx, &world.start_object, start - Vec3::new(0.0, START_PLATFORM_DEPTH, 0.0));
        let origin = Placement { primary, extra: Vec::new(), model, zone: 0 };
        Ok(Self {
            generator,
            world,
            kinds: world.segment_kinds(generator.config),
            start,
            ctx,
            placements: vec![origin.clone()],
            origin,
            jumps: Vec::new(),
            zones: Vec::new(),
            segment_zone: 0,
            boundary_reverted: false,
            stats: GenerationStats::default(),
        })
    }

    fn tail(&self) -> &Placement {
        self.placements.last().unwrap_or(&self.origin)
    }

    fn target(&self) -> usize {
        self.world.target_object_count
    }

    /// `true` if the history holds a committed step past `checkpoint`.
    fn holds_step_past(&self, checkpoint: Checkpoint) -> bool {
        self.placements.len() > checkpoint.placements && self.jumps.len() > checkpoint.jumps
    }

    fn execute(&mut self, rng: &mut Prng) -> Result<(), GenerateError> {
        let mut segment = self.open_segment(None, rng)?;
        while self.placements.len() < self.target() {
            if segment.is_done() {
                let previous = segment.kind();
                self.close_segment(segment);
                segment = self.open_segment(Some(previous), rng)?;
            }
            let jumps = self.generator.jumps.jumps(segment.jump_category())?;
            match self.find_placement(&segment, &jumps, rng)? {
                Some(pending) => self.commit(&mut segment, pending),
                None => self.revert(&mut segment)?,
            }
        }
        self.close_segment(segment);
        Ok(())
    }

    fn draw_kind(&self, previous: Option<SegmentKind>, rng: &mut Prng) -> Result<SegmentKind, GenerateError> {
        loop {
            let kind = rng.pick(&self.kinds).copied().ok_or_else(|| GenerateError::NoSegments(self.world.name.clone()))?;
            if self.kinds.len() == 1 || Some(kind) != previous {
                return Ok(kind);
            }
        }
    }

    fn open_segment(&mut self, previous: Option<SegmentKind>, rng: &mut Prng) -> Result<Segment, GenerateError> {
        let config = self.generator.config;
        let kind = self.draw_kind(previous, rng)?;
        let mut segment = Segment::new(kind, config, rng);
        let index = self.zones.len();
        let name = format!("OnlyUp{}{}Zone{}", self.world.name, kind.label(), index);
        debug!(zone = %name, count = segment.remaining(), "segment opened");

        let tail = self.tail();
        let exit = segment.exit_surface(tail.object_type(), &tail.model, config, rng).unwrap_or(Vec3::ZERO);
        let at = tail.position() + exit;
        let mut zone = OpenZone {
            name,
            kind,
            checkpoint: Checkpoint { placements: self.placements.len(), jumps: self.jumps.len() },
            extras: Vec::new(),
            reopened: core::mem::take(&mut self.boundary_reverted),
            segment: None,
        };
        for obj in segment.initial_objects(&mut self.ctx, at, config) {
            match lookup(self.generator.cache, &obj.unit_name)? {
                Some(model) => {
                    self.placements.push(Placement { primary: obj, extra: Vec::new(), model, zone: index });
                }
                None => zone.extras.push(obj),
            }
        }
        self.zones.push(zone);
        self.segment_zone = index;
        Ok(segment)
    }

    fn close_segment(&mut self, segment: Segment) {
        // A reverted zone is already gone; its segment goes with it.
        if let Some(zone) = self.zones.get_mut(self.segment_zone) {
            zone.segment = Some(segment);
        }
    }

    fn find_placement(
        &mut self,
        segment: &Segment,
        jumps: &[JumpData],
        rng: &mut Prng,
    ) -> Result<Option<Pending>, GenerateError> {
        let config = self.generator.config;
        let is_last_object = self.placements.len() + 1 >= self.target();
        for attempt in 0..config.max_attempts {
            self.stats.attempts += 1;
            let requested = if is_last_object {
                config.final_object.as_str()
            } else {
                segment
                    .pick_object(self.world, rng)
                    .ok_or(GenerateError::EmptyPalette { kind: segment.kind() })?
            };
            let jump = rng
                .pick(jumps)
                .ok_or_else(|| DatasetError::MissingCategory(segment.jump_category().to_owned()))?;
            let y_rotation = segment.y_rotation(rng);
            let scale = segment.jump_scale(rng);

            let Some(model) = lookup(self.generator.cache, requested)? else {
                debug!(object_type = requested, attempt, "no collision data");
                continue;
            };
            let prev = self.placements.last().unwrap_or(&self.origin);
            let Some(exit) = segment.exit_surface(prev.object_type(), &prev.model, config, rng) else {
                debug!(object_type = prev.object_type(), attempt, "no exit surface");
                continue;
            };
            let Some((entry, entry_normal)) = segment.entry_surface(requested, &model, config, rng) else {
                debug!(object_type = requested, attempt, "no entry surface");
                continue;
            };

            let path = jump.leading.scale(scale);
            let jump_offset = path.endpoint().rotate_y(y_rotation);
            let jump_start = prev.position() + exit;
            let position = jump_start + jump_offset - entry - entry_normal * (config.leading_radius + 1.0);

            if rng.next_f32() < position.planar_distance(self.start) / config.distance_falloff {
                self.stats.distance_rejections += 1;
                debug!(object_type = requested, attempt, "too far from start");
                continue;
            }

            let candidate = Candidate {
                object_type: requested,
                position,
                is_last_object,
                previous: &prev.primary,
                jump_offset,
                max_extent: model.bounds().max_extent(),
            };
            let mut objects = segment.create_objects(&mut self.ctx, &candidate, config, rng).into_iter();
            let Some(primary) = objects.next() else {
                continue;
            };
            let Some(placed_model) = lookup(self.generator.cache, &primary.unit_name)? else {
                debug!(object_type = %primary.unit_name, attempt, "no collision data");
                continue;
            };
            let jump = JumpRecord {
                from: self.placements.len() - 1,
                to: self.placements.len(),
                name: jump.name.clone(),
                start: jump_start,
                y_rotation,
                scale,
                path,
            };
            if self.jump_is_clear(&jump) && self.object_is_clear(&placed_model, primary.position) {
                let placement = Placement {
                    primary,
                    extra: objects.collect(),
                    model: placed_model,
                    zone: self.segment_zone,
                };
                return Ok(Some(Pending { placement, jump, requested: requested.to_owned() }));
            }
            debug!(object_type = requested, attempt, "candidate collides");
        }
        Ok(None)
    }

    /// The new jump must clear every placement, the previous one included.
    fn jump_is_clear(&self, jump: &JumpRecord) -> bool {
        let config = self.generator.config;
        self.placements.iter().all(|p| !jump.touches(&p.model, p.position(), config))
    }

    /// The new object must not sit in the path of any earlier jump.
    fn object_is_clear(&self, model: &CollisionModel, position: Vec3) -> bool {
        let config = self.generator.config;
        self.jumps.iter().all(|j| !j.touches(model, position, config))
    }

    fn commit(&mut self, segment: &mut Segment, pending: Pending) {
        let Pending { placement, jump, requested } = pending;
        let ids: Vec<ObjectId> =
            core::iter::once(placement.primary.id).chain(placement.extra.iter().map(|o| o.id)).collect();
        segment.commit(&ids);
        self.placements.push(placement);
        self.jumps.push(jump);
        info!("[{}/{}] added {}", self.placements.len(), self.target(), requested);
    }

    /// Picks how to leave a dead end; `None` while no zone is open.
    fn backtrack(&self) -> Result<Option<Backtrack>, GenerateError> {
        let Some(zone) = self.zones.last() else {
            return Ok(None);
        };
        let index = self.zones.len() - 1;
        if self.holds_step_past(zone.checkpoint) {
            return Ok(Some(Backtrack::Step));
        }
        // Reopening the same boundary failed too, so the dead end lies in the
        // zone before it.
        let below = index.checked_sub(1).and_then(|i| self.zones.get(i));
        if let Some(below) = below {
            let cp = zone.checkpoint;
            let stepped = cp.placements > below.checkpoint.placements && cp.jumps > below.checkpoint.jumps;
            if zone.reopened && stepped && below.segment.is_some() {
                return Ok(Some(Backtrack::StepBack));
            }
            return Ok(Some(Backtrack::Zone));
        }
        Err(GenerateError::RevertUnderflow {
            zone: index,
            object_index: self.placements.len().saturating_sub(1),
            object_type: self.tail().object_type().to_owned(),
        })
    }

    fn revert(&mut self, segment: &mut Segment) -> Result<(), GenerateError> {
        let Some(action) = self.backtrack()? else {
            return Ok(());
        };
        if let Some(limit) = self.generator.config.max_reverts {
            if self.stats.single_reverts + self.stats.zone_reverts >= limit {
                return Err(GenerateError::RevertLimit { limit, stats: self.stats });
            }
        }

        match action {
            Backtrack::Step => {
                warn!(object_type = self.tail().object_type(), "stuck, reverting one placement");
                self.drop_last_step(segment);
            }
            Backtrack::StepBack => {
                let Some(zone) = self.zones.pop() else {
                    return Ok(());
                };
                warn!(zone = %zone.name, "stuck at a reopened zone start, stepping back into the previous zone");
                self.truncate(zone.checkpoint);
                let below = self.zones.len().saturating_sub(1);
                if let Some(restored) = self.zones.get_mut(below).and_then(|z| z.segment.take()) {
                    *segment = restored;
                }
                self.segment_zone = below;
                self.drop_last_step(segment);
            }
            Backtrack::Zone => {
                let Some(zone) = self.zones.pop() else {
                    return Ok(());
                };
                warn!(zone = %zone.name, "stuck at zone start, reverting zone");
                self.truncate(zone.checkpoint);
                segment.abandon();
                self.boundary_reverted = true;
                self.stats.zone_reverts += 1;
            }
        }
        Ok(())
    }

    fn drop_last_step(&mut self, segment: &mut Segment) {
        self.placements.pop();
        self.jumps.pop();
        segment.revert();
        self.stats.single_reverts += 1;
    }

    fn truncate(&mut self, checkpoint: Checkpoint) {
        self.placements.truncate(checkpoint.placements);
        self.jumps.truncate(checkpoint.jumps);
    }

    fn into_level(self) -> Level {
        let mut zones: Vec<Zone> = self
            .zones
            .iter()
            .map(|z| Zone { name: z.name.clone(), kind: z.kind, objects: z.extras.clone() })
            .collect();
        let placements = self
            .placements
            .iter()
            .map(|p| PlacedObject { object_type: p.object_type().to_owned(), position: p.position(), zone: p.zone })
            .collect();
        for p in self.placements {
            if let Some(zone) = zones.get_mut(p.zone) {
                zone.objects.push(p.primary);
                zone.objects.extend(p.extra);
            }
        }
        for (zone, open) in zones.iter_mut().zip(&self.zones) {
            let Some((trigger, targets)) = open.segment.as_ref().and_then(Segment::appear_link) else {
                continue;
            };
            if let Some(obj) = zone.objects.iter_mut().find(|o| o.id == trigger) {
                obj.links.switch_appear_target = targets.to_vec();
            }
        }
        let jumps = self
            .jumps
            .into_iter()
            .map(|j| JumpSummary {
                name: j.name,
                from: j.from,
                to: j.to,
                start: j.start,
                y_rotation: j.y_rotation,
                scale: j.scale,
            })
            .collect();
        Level::new(self.world, self.start, zones, placements, jumps, self.stats, self.ctx)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ascent_geom::{encode_kcl, MemoryMeshSource, Triangle};

    use super::*;
    use crate::config::CountRange;
    use crate::dataset::{JumpMetadata, MemoryJumpSource};

    const START: Vec3 = Vec3::new(0.0, 10_000.0, 0.0);

    /// A flat world where every hop lands in place, one step lower.
    struct Fixture {
        config: GeneratorConfig,
        cache: CollisionCache,
        jumps: MemoryJumpSource,
        world: WorldDataset,
    }

    impl Fixture {
        fn new(count: u32) -> Self {
            let (a, b, c, d) = (
                Vec3::new(-50.0, 0.0, -50.0),
                Vec3::new(-50.0, 0.0, 50.0),
                Vec3::new(50.0, 0.0, -50.0),
                Vec3::new(50.0, 0.0, 50.0),
            );
            let flat = encode_kcl(&[vec![Triangle::new(a, b, c), Triangle::new(c, b, d)]]).unwrap();
            let still = Trajectory::new(vec![Vec3::ZERO; 4]).unwrap();
            let hop = JumpData {
                name: "hop".into(),
                metadata: JumpMetadata::default(),
                leading: still.clone(),
                following: still,
            };
            let mut config = GeneratorConfig {
                leading_radius: 10.0,
                following_radius: 5.0,
                moving_platform_chance: 0.0,
                final_object: "Flat".into(),
                timer_excluded_worlds: vec!["FlatWorld".into()],
                ..GeneratorConfig::default()
            };
            config.segment_counts.default = CountRange::new(count, count);
            let mut world = WorldDataset::new("FlatWorld", vec!["Flat".into()]);
            world.start_object = "Flat".into();
            world.target_object_count = 50;
            Self {
                config,
                cache: CollisionCache::new(MemoryMeshSource::new().with("Flat", flat.to_vec())),
                jumps: MemoryJumpSource::new().with("Default", vec![hop]),
                world,
            }
        }

        fn generator(&self) -> Generator<'_> {
            Generator::new(&self.config, &self.cache, &self.jumps)
        }
    }

    fn step(run: &mut Run<'_, '_>, segment: &mut Segment, rng: &mut Prng) {
        let jumps = run.generator.jumps.jumps(segment.jump_category()).unwrap();
        let pending = run.find_placement(segment, &jumps, rng).unwrap().unwrap();
        run.commit(segment, pending);
    }

    fn history(run: &Run<'_, '_>) -> (usize, usize) {
        (run.placements.len(), run.jumps.len())
    }

    #[test]
    fn stage_seed_differs_per_stage() {
        assert_ne!(stage_seed("abc", "SandWorld"), stage_seed("abc", "LavaWorld"));
        assert_eq!(stage_seed("abc", "SandWorld"), stage_seed("abc", "SandWorld"));
        assert_eq!(stage_seed("abc", ""), seed_from_label("abc"));
    }

    #[test]
    fn single_revert_undoes_exactly_one_step() {
        let fx = Fixture::new(5);
        let generator = fx.generator();
        let mut run = Run::new(&generator, &fx.world, START).unwrap();
        let mut rng = Prng::from_seed_u64(7);
        let mut segment = run.open_segment(None, &mut rng).unwrap();
        for _ in 0..3 {
            step(&mut run, &mut segment, &mut rng);
        }
        assert_eq!(history(&run), (4, 3));
        assert_eq!(segment.remaining(), 2);
        let kept: Vec<Vec3> = run.placements[..3].iter().map(Placement::position).collect();

        run.revert(&mut segment).unwrap();
        assert_eq!(history(&run), (3, 2));
        assert_eq!(segment.remaining(), 3);
        assert_eq!(run.placements.iter().map(Placement::position).collect::<Vec<_>>(), kept);
        assert_eq!(run.jumps.last().map(|j| (j.from, j.to)), Some((1, 2)));
        assert_eq!(run.zones.len(), 1);
        assert_eq!((run.stats.single_reverts, run.stats.zone_reverts), (1, 0));

        // Back to the start platform, then nothing is left to undo.
        run.revert(&mut segment).unwrap();
        run.revert(&mut segment).unwrap();
        assert_eq!(history(&run), (1, 0));
        assert_eq!(segment.remaining(), 5);
        assert!(matches!(
            run.revert(&mut segment),
            Err(GenerateError::RevertUnderflow { zone: 0, object_index: 0, .. })
        ));
    }

    #[test]
    fn failed_reopened_zone_steps_back_into_the_previous_zone() {
        let fx = Fixture::new(2);
        let generator = fx.generator();
        let mut run = Run::new(&generator, &fx.world, START).unwrap();
        let mut rng = Prng::from_seed_u64(3);
        let mut segment = run.open_segment(None, &mut rng).unwrap();
        step(&mut run, &mut segment, &mut rng);
        step(&mut run, &mut segment, &mut rng);
        assert!(segment.is_done());
        run.close_segment(segment);

        let mut segment = run.open_segment(Some(SegmentKind::Default), &mut rng).unwrap();
        assert!(!run.zones[1].reopened);
        run.revert(&mut segment).unwrap();
        assert_eq!(run.zones.len(), 1);
        assert_eq!(history(&run), (3, 2));
        assert!(segment.is_done());
        assert_eq!((run.stats.single_reverts, run.stats.zone_reverts), (0, 1));

        run.close_segment(segment);
        let mut segment = run.open_segment(Some(SegmentKind::Default), &mut rng).unwrap();
        assert!(run.zones[1].reopened);
        run.revert(&mut segment).unwrap();
        assert_eq!(run.zones.len(), 1);
        assert_eq!(run.segment_zone, 0);
        assert_eq!(history(&run), (2, 1));
        assert_eq!(segment.remaining(), 1);
        assert_eq!((run.stats.single_reverts, run.stats.zone_reverts), (1, 1));

        // The restored segment refills its own zone.
        step(&mut run, &mut segment, &mut rng);
        assert!(segment.is_done());
        assert_eq!(run.placements.last().map(|p| p.zone), Some(0));
        run.close_segment(segment);
        let segment = run.open_segment(Some(SegmentKind::Default), &mut rng).unwrap();
        assert!(!run.zones[1].reopened);
        assert_eq!(segment.remaining(), 2);
    }

    #[test]
    fn both_actors_sweep_the_leading_path() {
        let fx = Fixture::new(2);
        let model = fx.cache.get("Flat").unwrap().unwrap();
        let leading = Trajectory::new([Vec3::ZERO, Vec3::new(0.0, 0.0, 1000.0)]).unwrap();
        let jump = JumpRecord {
            from: 0,
            to: 1,
            name: "hop".into(),
            start: Vec3::ZERO,
            y_rotation: 0.0,
            scale: 1.0,
            path: leading,
        };
        let lift = fx.config.trajectory_lift;
        // Just below the lifted path, outside both radii.
        let clear = Vec3::new(0.0, lift - 10.5, 0.0);
        assert!(!jump.touches(&model, clear, &fx.config));
        // Touched at the landing sample.
        let hit = Vec3::new(0.0, lift - 4.0, 1000.0);
        assert!(jump.touches(&model, hit, &fx.config));

        let wide = GeneratorConfig { leading_radius: 1.0, following_radius: 20.0, ..fx.config.clone() };
        assert!(jump.touches(&model, clear, &wide));
    }
}
