// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Segment state machine.
//!
//! A segment is a run of placements sharing one object palette, jump
//! category and placement policy. The set of policies is closed; the
//! generator only talks to [`Segment`].
//!
//! Lifecycle:
//! - [`Segment::new`] draws the object count for the kind.
//! - [`Segment::initial_objects`] emits the segment's fixtures once, at the
//!   exit surface of the previous placement.
//! - Each committed placement calls [`Segment::commit`]; a single-step
//!   revert calls [`Segment::revert`]. The segment is done at zero.

use core::f32::consts::TAU;

use ascent_geom::{CollisionModel, Prng, Vec3};
use serde::{Deserialize, Serialize};

use crate::config::{CountRange, GeneratorConfig};
use crate::dataset::WorldDataset;
use crate::stage::{self, params, Component, MoveKey, ObjectId, RailKey, RunContext, StageObject};

/// Jump category used by default, timer and binocular segments.
pub const DEFAULT_JUMPS: &str = "Default";
/// Jump category for the lava bubble capture.
pub const BUBBLE_JUMPS: &str = "TestCaptureBubble";
/// Jump category for the wall-poking capture.
pub const POKE_JUMPS: &str = "Pokio";

const BINOCULAR_OBJECTS: [&str; 2] = ["SandWorldHomeMeganeStep001", "SandWorldHomeMeganeStep000"];
const BINOCULAR_EXIT: &str = "SandWorldHomeLift001";
const BINOCULAR_CAGE: &str = "SandWorldHomeLift000";
const BUBBLE_OBJECTS: [&str; 1] = ["LavaWorldBubbleLaneExKeyMoveParts000"];
const POKE_OBJECTS: [&str; 2] = ["SkyWorldHomeRotateParts000", "SkyWorldHomeConveyerParts001"];
const WOBBLE_PLATFORM: &str = "LavaWorldHomeTimer002WobbleParts000";
const POKE_SAMPLES: usize = 20;

/// The closed set of segment policies.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SegmentKind {
    /// Static or moving platforms from the world palette.
    Default,
    /// Default platforms revealed by stepping on a timer switch.
    Timer,
    /// Platforms only visible through a binocular capture.
    Binocular,
    /// Platforms crossed as a lava bubble.
    Bubble,
    /// Walls climbed by poking into them.
    Poke,
}

impl SegmentKind {
    /// Name used when labelling zones.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Default => "DefaultSegment",
            Self::Timer => "TimerSegment",
            Self::Binocular => "BinocularSegment",
            Self::Bubble => "BubbleSegment",
            Self::Poke => "PokeSegment",
        }
    }
}

/// Everything a segment needs to build the objects of one candidate.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    /// Object drawn for the placement.
    pub object_type: &'a str,
    /// World position of the object origin.
    pub position: Vec3,
    /// The run ends with this placement.
    pub is_last_object: bool,
    /// Primary object of the previous placement.
    pub previous: &'a StageObject,
    /// Rotated landing offset of the jump.
    pub jump_offset: Vec3,
    /// Largest side of the object's collision bounds.
    pub max_extent: f32,
}

#[derive(Debug, Clone)]
struct DefaultPolicy {
    allow_moving: bool,
}

impl DefaultPolicy {
    fn create(&self, ctx: &mut RunContext, c: &Candidate<'_>, config: &GeneratorConfig, rng: &mut Prng) -> Vec<StageObject> {
        let may_move = self.allow_moving
            && !c.is_last_object
            && rng.chance(config.moving_platform_chance)
            && !c.previous.is_moving_platform()
            && c.max_extent < config.moving_platform_max_extent;
        if !may_move {
            return vec![stage::fix_map_parts(ctx, c.object_type, c.position).with_comment(SegmentKind::Default.label())];
        }
        let wobble = random_unit_cube(rng) * 500.0;
        let waypoint = c.position + wobble - c.jump_offset.normalize() * 750.0;
        let speed = rng.uniform(7.0, 15.0);
        moving_platform(ctx, c.object_type, c.position, waypoint, speed, true)
            .into_iter()
            .map(|o| o.with_comment(SegmentKind::Default.label()))
            .collect()
    }
}

/// Reveal bookkeeping of a timer segment.
#[derive(Debug, Clone, Default)]
struct TimerPolicy {
    trigger: Option<ObjectId>,
    targets: Vec<ObjectId>,
    // Targets registered by each committed step, newest last.
    steps: Vec<usize>,
}

#[derive(Debug, Clone)]
enum Policy {
    Default(DefaultPolicy),
    Timer { inner: DefaultPolicy, timer: TimerPolicy },
    Binocular,
    Bubble,
    Poke,
}

/// Per-run state of the active segment.
#[derive(Debug, Clone)]
pub struct Segment {
    remaining: u32,
    policy: Policy,
}

fn draw_count(range: CountRange, rng: &mut Prng) -> u32 {
    let span = u64::from(range.max.saturating_sub(range.min)) + 1;
    range.min + u32::try_from(rng.next_below(span)).unwrap_or(0)
}

fn random_unit_cube(rng: &mut Prng) -> Vec3 {
    let x = rng.uniform(-1.0, 1.0);
    let y = rng.uniform(-1.0, 1.0);
    let z = rng.uniform(-1.0, 1.0);
    Vec3::new(x, y, z)
}

/// Keyed platform from `from` to `to`, optionally with a drawn rail.
fn moving_platform(
    ctx: &mut RunContext,
    unit_name: &str,
    from: Vec3,
    to: Vec3,
    speed: f32,
    with_rail: bool,
) -> Vec<StageObject> {
    let obj = stage::key_move_parts(
        ctx,
        unit_name,
        MoveKey { position: from, speed, wait_time: 0 },
        MoveKey { position: to, speed, wait_time: 0 },
    );
    let mut out = vec![obj];
    if with_rail {
        out.extend(stage::rail_drawer(ctx, &[from, to]));
    }
    out
}

impl Segment {
    /// Starts a segment of `kind`, drawing its object count.
    pub fn new(kind: SegmentKind, config: &GeneratorConfig, rng: &mut Prng) -> Self {
        let counts = &config.segment_counts;
        let (range, policy) = match kind {
            SegmentKind::Default => (counts.default, Policy::Default(DefaultPolicy { allow_moving: true })),
            SegmentKind::Timer => (
                counts.timer,
                Policy::Timer { inner: DefaultPolicy { allow_moving: true }, timer: TimerPolicy::default() },
            ),
            SegmentKind::Binocular => (counts.binocular, Policy::Binocular),
            SegmentKind::Bubble => (counts.bubble, Policy::Bubble),
            SegmentKind::Poke => (counts.poke, Policy::Poke),
        };
        Self { remaining: draw_count(range, rng), policy }
    }

    /// The policy this segment follows.
    pub const fn kind(&self) -> SegmentKind {
        match self.policy {
            Policy::Default(_) => SegmentKind::Default,
            Policy::Timer { .. } => SegmentKind::Timer,
            Policy::Binocular => SegmentKind::Binocular,
            Policy::Bubble => SegmentKind::Bubble,
            Policy::Poke => SegmentKind::Poke,
        }
    }

    /// Placements still to commit.
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    /// `true` once the counter reaches zero.
    pub const fn is_done(&self) -> bool {
        self.remaining == 0
    }

    /// `true` when the next commit finishes the segment.
    pub const fn is_last_in_segment(&self) -> bool {
        self.remaining == 1
    }

    /// Ends the segment early; used when its zone is reverted.
    pub fn abandon(&mut self) {
        self.remaining = 0;
    }

    /// Draws an object from the segment's palette.
    pub fn pick_object<'w>(&self, world: &'w WorldDataset, rng: &mut Prng) -> Option<&'w str> {
        match self.policy {
            Policy::Default(_) | Policy::Timer { .. } => rng.pick(&world.objects).map(String::as_str),
            Policy::Binocular => rng.pick(&BINOCULAR_OBJECTS).copied(),
            Policy::Bubble => rng.pick(&BUBBLE_OBJECTS).copied(),
            Policy::Poke => rng.pick(&POKE_OBJECTS).copied(),
        }
    }

    /// `true` if `object_type` is one of this segment's poke walls.
    fn pokes(&self, object_type: &str) -> bool {
        matches!(self.policy, Policy::Poke) && POKE_OBJECTS.contains(&object_type)
    }

    /// Jump category the segment draws from.
    pub const fn jump_category(&self) -> &'static str {
        match self.policy {
            Policy::Default(_) | Policy::Timer { .. } | Policy::Binocular => DEFAULT_JUMPS,
            Policy::Bubble => BUBBLE_JUMPS,
            Policy::Poke => POKE_JUMPS,
        }
    }

    /// Draws a jump scale factor.
    pub fn jump_scale(&self, rng: &mut Prng) -> f32 {
        match self.policy {
            Policy::Default(_) | Policy::Timer { .. } => {
                if rng.chance(0.2) {
                    rng.uniform(0.8, 1.1)
                } else {
                    rng.uniform(0.4, 0.9)
                }
            }
            Policy::Binocular => rng.uniform(0.3, 0.4),
            Policy::Bubble | Policy::Poke => rng.uniform(0.8, 1.0),
        }
    }

    /// Draws the jump yaw in radians.
    pub fn y_rotation(&self, rng: &mut Prng) -> f32 {
        match self.policy {
            Policy::Poke => 0.0,
            _ => rng.uniform(0.0, TAU),
        }
    }

    /// Local landing point and landing normal on `object_type`.
    ///
    /// Walls of the poke palette land on the lowest of several
    /// forward-facing samples with a zero normal; everything else lands on
    /// an upward-facing standable point with an up normal.
    pub fn entry_surface(
        &self,
        object_type: &str,
        model: &CollisionModel,
        config: &GeneratorConfig,
        rng: &mut Prng,
    ) -> Option<(Vec3, Vec3)> {
        if self.pokes(object_type) {
            let lowest = poke_samples(model, config, rng).min_by(|a, b| a.y().total_cmp(&b.y()))?;
            return Some((lowest, Vec3::ZERO));
        }
        standable(model, Vec3::UNIT_Y, config, rng).map(|p| (p, Vec3::UNIT_Y))
    }

    /// Local take-off point on `object_type`.
    pub fn exit_surface(
        &self,
        object_type: &str,
        model: &CollisionModel,
        config: &GeneratorConfig,
        rng: &mut Prng,
    ) -> Option<Vec3> {
        if self.pokes(object_type) {
            return poke_samples(model, config, rng).max_by(|a, b| a.y().total_cmp(&b.y()));
        }
        standable(model, Vec3::UNIT_Y, config, rng)
    }

    /// Builds the stage objects of a candidate, primary first.
    pub fn create_objects(
        &self,
        ctx: &mut RunContext,
        c: &Candidate<'_>,
        config: &GeneratorConfig,
        rng: &mut Prng,
    ) -> Vec<StageObject> {
        match &self.policy {
            Policy::Default(inner) => inner.create(ctx, c, config, rng),
            Policy::Timer { inner, .. } => inner
                .create(ctx, c, config, rng)
                .into_iter()
                .map(|o| o.as_link_dest().with_comment(SegmentKind::Timer.label()))
                .collect(),
            Policy::Binocular => {
                if self.is_last_in_segment() {
                    vec![stage::fix_map_parts(ctx, BINOCULAR_EXIT, c.position)]
                } else {
                    vec![StageObject::new(ctx, c.object_type, params::MEGANE_MAP_PARTS, c.position)]
                }
            }
            Policy::Bubble => {
                if self.is_last_in_segment() {
                    vec![stage::fix_map_parts(ctx, WOBBLE_PLATFORM, c.position)]
                } else if rng.chance(0.5) {
                    let waypoint = c.position + random_unit_cube(rng) * 150.0;
                    let speed = rng.uniform(3.0, 6.0);
                    moving_platform(ctx, c.object_type, c.position, waypoint, speed, true)
                } else {
                    vec![stage::fix_map_parts(ctx, c.object_type, c.position)]
                }
            }
            Policy::Poke => {
                if self.is_last_in_segment() {
                    let at = c.position + Vec3::new(0.0, -1750.0, -500.0);
                    vec![stage::fix_map_parts(ctx, WOBBLE_PLATFORM, at)]
                } else {
                    let slide = Vec3::new(rng.uniform(250.0, 700.0), 0.0, 0.0);
                    let speed = rng.uniform(3.0, 6.0);
                    moving_platform(ctx, c.object_type, c.position, c.position + slide, speed, false)
                }
            }
        }
    }

    /// Fixtures placed once when the segment starts at `start`.
    pub fn initial_objects(&mut self, ctx: &mut RunContext, start: Vec3, config: &GeneratorConfig) -> Vec<StageObject> {
        match &mut self.policy {
            Policy::Default(_) => Vec::new(),
            Policy::Timer { timer, .. } => {
                let trigger = stage::trample_switch_timer(ctx, start - Vec3::new(0.0, 200.0, 0.0), config.timer_frames);
                *timer = TimerPolicy { trigger: Some(trigger.id), ..TimerPolicy::default() };
                vec![trigger]
            }
            Policy::Binocular => {
                let pos = start + Vec3::new(500.0, 0.0, 0.0);
                let panels = [
                    (Vec3::ZERO, Vec3::ZERO),
                    (Vec3::new(0.0, 0.0, -150.0), Vec3::new(90.0, 0.0, 0.0)),
                    (Vec3::new(0.0, 0.0, 150.0), Vec3::new(-90.0, 0.0, 0.0)),
                    (Vec3::new(150.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 90.0)),
                    (Vec3::new(-150.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -90.0)),
                ];
                let mut out: Vec<StageObject> = panels
                    .into_iter()
                    .map(|(offset, rot)| stage::fix_map_parts(ctx, BINOCULAR_CAGE, pos + offset).with_rotation(rot))
                    .collect();
                out.push(StageObject::new(ctx, "Megane", "Megane", pos + Vec3::new(0.0, 50.0, 0.0)));
                out
            }
            Policy::Bubble => {
                let pos = start + Vec3::new(250.0, 0.0, 0.0);
                let capture = stage::move_next(
                    ctx,
                    BUBBLE_JUMPS,
                    "Bubble",
                    RailKey { position: pos + Vec3::new(0.0, 300.0, 0.0), delay_frames: 0, rail_move_speed: 10.0, wait_frames: 0 },
                    RailKey { position: pos, delay_frames: 120, rail_move_speed: 10.0, wait_frames: 60 },
                );
                let lane = stage::fix_map_parts(ctx, BUBBLE_OBJECTS[0], pos + Vec3::new(0.0, -350.0, 0.0));
                vec![capture, lane]
            }
            Policy::Poke => {
                let platform = stage::fix_map_parts(ctx, "SeaWorldHomeSwitchKeyMoveParts000", start);
                let capture = StageObject::new(ctx, "Tsukkun", "Tsukkun", start + Vec3::new(0.0, 150.0, 0.0))
                    .with_component(Component::Capture { cap_name: "EnemyCapTsukkun".to_owned() });
                let wall = stage::fix_map_parts(ctx, POKE_OBJECTS[0], start + Vec3::new(0.0, 0.0, -250.0));
                vec![platform, capture, wall]
            }
        }
    }

    /// Records a committed placement whose top-level objects are `placed`.
    pub fn commit(&mut self, placed: &[ObjectId]) {
        self.remaining = self.remaining.saturating_sub(1);
        if let Policy::Timer { timer, .. } = &mut self.policy {
            timer.targets.extend_from_slice(placed);
            timer.steps.push(placed.len());
        }
    }

    /// Undoes the most recent [`Segment::commit`].
    pub fn revert(&mut self) {
        self.remaining += 1;
        if let Policy::Timer { timer, .. } = &mut self.policy {
            let n = timer.steps.pop().unwrap_or(0);
            let keep = timer.targets.len().saturating_sub(n);
            timer.targets.truncate(keep);
        }
    }

    /// Timer trigger and the objects it currently reveals.
    pub fn appear_link(&self) -> Option<(ObjectId, &[ObjectId])> {
        match &self.policy {
            Policy::Timer { timer, .. } => timer.trigger.map(|id| (id, timer.targets.as_slice())),
            _ => None,
        }
    }
}

fn standable(model: &CollisionModel, normal: Vec3, config: &GeneratorConfig, rng: &mut Prng) -> Option<Vec3> {
    model
        .standable_position(config.leading_radius, normal, config.standable_angle_deg, config.standable_trials, rng)
        .map(|(p, _)| p)
}

fn poke_samples<'a>(
    model: &'a CollisionModel,
    config: &'a GeneratorConfig,
    rng: &'a mut Prng,
) -> impl Iterator<Item = Vec3> + 'a {
    (0..POKE_SAMPLES).filter_map(move |_| standable(model, Vec3::UNIT_Z, config, rng))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use ascent_geom::{CollisionMesh, Triangle};

    use super::*;

    fn world() -> WorldDataset {
        WorldDataset::new("TestWorld", vec!["Block".to_owned()])
    }

    #[test]
    fn counts_follow_configured_ranges() {
        let cfg = GeneratorConfig::default();
        let mut rng = Prng::from_seed_u64(11);
        for _ in 0..50 {
            let n = Segment::new(SegmentKind::Poke, &cfg, &mut rng).remaining();
            assert!((3..=4).contains(&n));
            let n = Segment::new(SegmentKind::Default, &cfg, &mut rng).remaining();
            assert!((7..=11).contains(&n));
        }
    }

    #[test]
    fn timer_reverts_exactly_the_last_step() {
        let cfg = GeneratorConfig::default();
        let mut rng = Prng::from_seed_u64(5);
        let mut ctx = RunContext::new();
        let mut seg = Segment::new(SegmentKind::Timer, &cfg, &mut rng);
        let start = seg.remaining();
        let fixtures = seg.initial_objects(&mut ctx, Vec3::new(0.0, 1000.0, 0.0), &cfg);
        assert_eq!(fixtures.len(), 1);
        assert_eq!(fixtures[0].position.y(), 800.0);

        seg.commit(&[ObjectId(10), ObjectId(11)]);
        seg.commit(&[ObjectId(12)]);
        let (trigger, targets) = seg.appear_link().unwrap();
        assert_eq!(trigger, fixtures[0].id);
        assert_eq!(targets, &[ObjectId(10), ObjectId(11), ObjectId(12)]);

        seg.revert();
        assert_eq!(seg.appear_link().unwrap().1, &[ObjectId(10), ObjectId(11)]);
        seg.revert();
        assert!(seg.appear_link().unwrap().1.is_empty());
        assert_eq!(seg.remaining(), start);
    }

    #[test]
    fn timer_marks_its_objects_as_link_destinations() {
        let cfg = GeneratorConfig { moving_platform_chance: 1.0, ..GeneratorConfig::default() };
        let mut rng = Prng::from_seed_u64(8);
        let mut ctx = RunContext::new();
        let seg = Segment::new(SegmentKind::Timer, &cfg, &mut rng);
        let prev = stage::fix_map_parts(&mut ctx, "Block", Vec3::ZERO);
        let c = Candidate {
            object_type: "Block",
            position: Vec3::new(0.0, 500.0, 0.0),
            is_last_object: false,
            previous: &prev,
            jump_offset: Vec3::new(0.0, 0.0, 800.0),
            max_extent: 200.0,
        };
        let objs = seg.create_objects(&mut ctx, &c, &cfg, &mut rng);
        assert_eq!(objs.len(), 2, "moving platform plus rail drawer");
        assert!(objs[0].is_moving_platform());
        assert!(objs.iter().all(|o| o.link_dest && o.comment.as_deref() == Some("TimerSegment")));
    }

    #[test]
    fn moving_platforms_never_follow_moving_platforms() {
        let cfg = GeneratorConfig { moving_platform_chance: 1.0, ..GeneratorConfig::default() };
        let mut rng = Prng::from_seed_u64(2);
        let mut ctx = RunContext::new();
        let seg = Segment::new(SegmentKind::Default, &cfg, &mut rng);
        let k = MoveKey { position: Vec3::ZERO, speed: 1.0, wait_time: 0 };
        let prev = stage::key_move_parts(&mut ctx, "Block", k, k);
        let mut c = Candidate {
            object_type: "Block",
            position: Vec3::ZERO,
            is_last_object: false,
            previous: &prev,
            jump_offset: Vec3::UNIT_X,
            max_extent: 200.0,
        };
        assert_eq!(seg.create_objects(&mut ctx, &c, &cfg, &mut rng).len(), 1);
        let fixed = stage::fix_map_parts(&mut ctx, "Block", Vec3::ZERO);
        c.previous = &fixed;
        c.max_extent = 1000.0;
        assert_eq!(seg.create_objects(&mut ctx, &c, &cfg, &mut rng).len(), 1);
        c.max_extent = 999.0;
        c.is_last_object = true;
        assert_eq!(seg.create_objects(&mut ctx, &c, &cfg, &mut rng).len(), 1);
        c.is_last_object = false;
        assert_eq!(seg.create_objects(&mut ctx, &c, &cfg, &mut rng).len(), 2);
    }

    #[test]
    fn special_palettes_and_categories() {
        let cfg = GeneratorConfig::default();
        let mut rng = Prng::from_seed_u64(4);
        let poke = Segment::new(SegmentKind::Poke, &cfg, &mut rng);
        assert_eq!(poke.jump_category(), POKE_JUMPS);
        assert_eq!(poke.y_rotation(&mut rng), 0.0);
        assert!(poke.pokes("SkyWorldHomeRotateParts000"));
        assert!(!poke.pokes("Block"));
        let def = Segment::new(SegmentKind::Default, &cfg, &mut rng);
        assert!(!def.pokes("SkyWorldHomeRotateParts000"));
        assert_eq!(def.pick_object(&world(), &mut rng), Some("Block"));
        for _ in 0..20 {
            let s = Segment::new(SegmentKind::Binocular, &cfg, &mut rng).jump_scale(&mut rng);
            assert!((0.3..=0.4).contains(&s));
        }
    }

    #[test]
    fn poke_segment_lands_on_foreign_platforms_from_above() {
        let cfg = GeneratorConfig { standable_trials: 50, ..GeneratorConfig::default() };
        let mut rng = Prng::from_seed_u64(6);
        let poke = Segment::new(SegmentKind::Poke, &cfg, &mut rng);
        let (a, b, c, d) = (
            Vec3::new(-500.0, 0.0, -500.0),
            Vec3::new(-500.0, 0.0, 500.0),
            Vec3::new(500.0, 0.0, -500.0),
            Vec3::new(500.0, 0.0, 500.0),
        );
        let floor = CollisionMesh::from_triangles(vec![Triangle::new(a, b, c), Triangle::new(c, b, d)]).unwrap();
        let model = CollisionModel::from_mesh(floor);

        let (entry, normal) = poke.entry_surface("Block", &model, &cfg, &mut rng).unwrap();
        assert_eq!(normal, Vec3::UNIT_Y);
        assert_eq!(entry.y(), 0.0);
        assert!(poke.exit_surface("Block", &model, &cfg, &mut rng).is_some());
        // A floor has no wall facing +Z to poke into.
        assert!(poke.entry_surface("SkyWorldHomeRotateParts000", &model, &cfg, &mut rng).is_none());
        assert!(poke.exit_surface("SkyWorldHomeRotateParts000", &model, &cfg, &mut rng).is_none());
    }
}
