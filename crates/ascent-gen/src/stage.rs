// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Stage objects, areas and the factories that build them.
//!
//! Objects own their child link targets (the second key of a moving
//! platform, the rail a drawer follows). Links to objects placed elsewhere in
//! the stage are stored by [`ObjectId`].

use core::fmt;

use ascent_geom::Vec3;
use serde::{Deserialize, Serialize};

/// Parameter configs the generator emits.
pub mod params {
    /// Static platform.
    pub const FIX_MAP_PARTS: &str = "FixMapParts";
    /// Platform moving between keyed positions.
    pub const KEY_MOVE_MAP_PARTS: &str = "KeyMoveMapParts";
    /// Object that renders a rail.
    pub const RAIL_DRAWER: &str = "RailDrawer";
    /// Rail path.
    pub const RAIL: &str = "Rail";
    /// Rail control point.
    pub const POINT: &str = "Point";
    /// Platform only visible through binoculars.
    pub const MEGANE_MAP_PARTS: &str = "MeganeMapParts";
    /// Step-on switch that starts a timer.
    pub const TRAMPLE_SWITCH_TIMER: &str = "TrampleSwitchTimer";
    /// Pipe leading to another stage.
    pub const STAGE_CHANGE_PIPE: &str = "DokanStageChange";
    /// Spawn point.
    pub const PLAYER_START: &str = "PlayerStartObj";
    /// Extra health pickup.
    pub const LIFE_UP: &str = "LifeMaxUpItem";
}

/// Stage-unique object identifier, allocated by [`RunContext`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "obj{}", self.0)
    }
}

/// Per-run counters. Ids start at 1 and are never reused within a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunContext {
    next_id: u32,
}

impl Default for RunContext {
    fn default() -> Self {
        Self { next_id: 1 }
    }
}

impl RunContext {
    /// Creates a context whose first id is 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates the next id.
    pub fn next_id(&mut self) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Number of ids handed out so far.
    pub fn issued(&self) -> u32 {
        self.next_id - 1
    }
}

/// Typed behaviour attached to a stage object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Component {
    /// Key of a keyed moving platform.
    KeyMoveNext {
        /// Travel speed towards the next key.
        speed: f32,
        /// Frames to wait at this key.
        wait_time: i32,
    },
    /// Key of a rail-following actor.
    MoveNext {
        /// Frames before moving.
        delay_frames: i32,
        /// Rail travel speed.
        rail_move_speed: f32,
        /// Frames to wait at this key.
        wait_frames: i32,
    },
    /// A rail through explicit points.
    Rail {
        /// Rail points in order; each is also emitted as a `Point` child.
        points: Vec<Vec3>,
        /// Interpolation, e.g. `Linear`.
        rail_type: String,
        /// Whether the rail loops.
        closed: bool,
    },
    /// One rail control point.
    RailPoint {
        /// Point position.
        position: Vec3,
    },
    /// Makes an actor capturable.
    Capture {
        /// Cap used for the capture.
        cap_name: String,
    },
    /// Countdown started by a switch.
    Timer {
        /// Duration in frames.
        valid_frames: u32,
    },
    /// Travel to another stage.
    StageChange {
        /// Target entrance id (empty for none).
        change_stage_id: String,
    },
}

/// Links from an object to other objects.
///
/// Always created fresh per object; nothing is shared between link sets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Links {
    /// Next key of a keyed moving platform (owned).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_move_next: Vec<StageObject>,
    /// Next key of a rail-following actor (owned).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub move_next: Vec<StageObject>,
    /// Rail drawn or followed (owned).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rail: Vec<StageObject>,
    /// Objects revealed when a switch fires.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub switch_appear_target: Vec<ObjectId>,
    /// Where the player respawns after using an area.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub player_restart_pos: Vec<ObjectId>,
}

impl Links {
    /// `true` when no link of any kind is set.
    pub fn is_empty(&self) -> bool {
        self.key_move_next.is_empty()
            && self.move_next.is_empty()
            && self.rail.is_empty()
            && self.switch_appear_target.is_empty()
            && self.player_restart_pos.is_empty()
    }
}

/// One placed object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageObject {
    /// Stage-unique id.
    pub id: ObjectId,
    /// Object (model and collision) name.
    pub unit_name: String,
    /// Behaviour class.
    pub parameter_config: String,
    /// World position of the object origin.
    pub position: Vec3,
    /// Euler rotation in degrees.
    pub rotation: Vec3,
    /// Per-axis scale.
    pub scale: Vec3,
    /// Only reachable through another object's links.
    pub link_dest: bool,
    /// Free-form note for tools.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Attached behaviours.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<Component>,
    /// Outgoing links.
    #[serde(default, skip_serializing_if = "Links::is_empty")]
    pub links: Links,
}

impl StageObject {
    /// Creates an unrotated, unit-scale object.
    pub fn new(
        ctx: &mut RunContext,
        unit_name: impl Into<String>,
        parameter_config: impl Into<String>,
        position: Vec3,
    ) -> Self {
        Self {
            id: ctx.next_id(),
            unit_name: unit_name.into(),
            parameter_config: parameter_config.into(),
            position,
            rotation: Vec3::ZERO,
            scale: Vec3::splat(1.0),
            link_dest: false,
            comment: None,
            components: Vec::new(),
            links: Links::default(),
        }
    }

    /// Sets the rotation in degrees.
    #[must_use]
    pub fn with_rotation(mut self, degrees: Vec3) -> Self {
        self.rotation = degrees;
        self
    }

    /// Appends a component.
    #[must_use]
    pub fn with_component(mut self, component: Component) -> Self {
        self.components.push(component);
        self
    }

    /// Sets the comment.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Marks the object as a link destination.
    #[must_use]
    pub fn as_link_dest(mut self) -> Self {
        self.link_dest = true;
        self
    }

    /// `true` for keyed moving platforms.
    pub fn is_moving_platform(&self) -> bool {
        self.parameter_config == params::KEY_MOVE_MAP_PARTS
    }
}

/// What an area does when the player enters it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AreaKind {
    /// Kills the player.
    Death,
    /// Moves the player to another stage.
    ChangeStage {
        /// Stage to load.
        stage_name: String,
        /// Entrance id in that stage.
        change_stage_id: String,
        /// Spawn point linked as restart position.
        restart: ObjectId,
    },
    /// Swim volume; briefly restores control to a falling player.
    Water,
}

/// Axis-aligned trigger volume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Area {
    /// Stage-unique id.
    pub id: ObjectId,
    /// Behaviour.
    pub kind: AreaKind,
    /// Centre position.
    pub position: Vec3,
    /// Per-axis scale of the unit volume.
    pub scale: Vec3,
}

impl Area {
    /// Creates an area.
    pub fn new(ctx: &mut RunContext, kind: AreaKind, position: Vec3, scale: Vec3) -> Self {
        Self { id: ctx.next_id(), kind, position, scale }
    }

    /// Links to restart points, derived from the kind.
    pub fn links(&self) -> Links {
        let mut links = Links::default();
        if let AreaKind::ChangeStage { restart, .. } = &self.kind {
            links.player_restart_pos.push(*restart);
        }
        links
    }
}

/// Static platform.
pub fn fix_map_parts(ctx: &mut RunContext, unit_name: &str, position: Vec3) -> StageObject {
    StageObject::new(ctx, unit_name, params::FIX_MAP_PARTS, position)
}

/// A key of a keyed moving platform.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MoveKey {
    /// Position of the key.
    pub position: Vec3,
    /// Speed towards the next key.
    pub speed: f32,
    /// Frames to wait here.
    pub wait_time: i32,
}

/// Platform moving from `first` to `second`; the second key is an owned
/// link destination.
pub fn key_move_parts(ctx: &mut RunContext, unit_name: &str, first: MoveKey, second: MoveKey) -> StageObject {
    let key = |ctx: &mut RunContext, k: MoveKey| {
        StageObject::new(ctx, unit_name, params::KEY_MOVE_MAP_PARTS, k.position)
            .with_component(Component::KeyMoveNext { speed: k.speed, wait_time: k.wait_time })
            .with_component(Component::StageChange { change_stage_id: String::new() })
    };
    let mut obj = key(ctx, first);
    let next = key(ctx, second).as_link_dest();
    obj.links.key_move_next.push(next);
    obj
}

/// A key of a rail-following actor.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RailKey {
    /// Position of the key.
    pub position: Vec3,
    /// Frames before moving.
    pub delay_frames: i32,
    /// Rail speed.
    pub rail_move_speed: f32,
    /// Frames to wait here.
    pub wait_frames: i32,
}

/// Actor moving between two keys along a rail.
pub fn move_next(
    ctx: &mut RunContext,
    unit_name: &str,
    parameter_config: &str,
    first: RailKey,
    second: RailKey,
) -> StageObject {
    let key = |ctx: &mut RunContext, k: RailKey| {
        StageObject::new(ctx, unit_name, parameter_config, k.position).with_component(Component::MoveNext {
            delay_frames: k.delay_frames,
            rail_move_speed: k.rail_move_speed,
            wait_frames: k.wait_frames,
        })
    };
    let mut obj = key(ctx, first);
    let next = key(ctx, second).as_link_dest();
    obj.links.move_next.push(next);
    obj
}

/// Linear open rail through `points`; `None` when `points` is empty.
pub fn rail(ctx: &mut RunContext, points: &[Vec3]) -> Option<StageObject> {
    let first = *points.first()?;
    let mut rail = StageObject::new(ctx, params::RAIL, params::RAIL, first)
        .as_link_dest()
        .with_component(Component::Rail { points: points.to_vec(), rail_type: "Linear".to_owned(), closed: false });
    for &p in points {
        let point =
            StageObject::new(ctx, params::POINT, params::POINT, p).with_component(Component::RailPoint { position: p });
        rail.links.rail.push(point);
    }
    Some(rail)
}

/// Object drawing the rail through `points`, placed at the first point.
pub fn rail_drawer(ctx: &mut RunContext, points: &[Vec3]) -> Option<StageObject> {
    let rail = rail(ctx, points)?;
    let mut drawer = StageObject::new(ctx, params::RAIL_DRAWER, params::RAIL_DRAWER, rail.position);
    drawer.links.rail.push(rail);
    Some(drawer)
}

/// Step-on switch starting a countdown of `frames`.
pub fn trample_switch_timer(ctx: &mut RunContext, position: Vec3, frames: u32) -> StageObject {
    StageObject::new(ctx, params::TRAMPLE_SWITCH_TIMER, params::TRAMPLE_SWITCH_TIMER, position)
        .with_component(Component::Timer { valid_frames: frames })
}

/// Pipe leading to `change_stage_id`.
pub fn stage_change_pipe(ctx: &mut RunContext, change_stage_id: &str, position: Vec3) -> StageObject {
    StageObject::new(ctx, params::STAGE_CHANGE_PIPE, params::STAGE_CHANGE_PIPE, position)
        .with_component(Component::StageChange { change_stage_id: change_stage_id.to_owned() })
}

/// Spawn point.
pub fn player_start(ctx: &mut RunContext, position: Vec3) -> StageObject {
    StageObject::new(ctx, params::PLAYER_START, params::PLAYER_START, position)
}
