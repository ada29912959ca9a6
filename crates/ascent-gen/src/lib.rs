// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![doc = r"Procedural vertical-platforming level generator.

A level is grown one placement at a time. The active segment picks an
object and a recorded jump; the generator lands the jump on a standable
surface of the object, rejects it if either actor's path touches earlier
geometry (or the object blocks an earlier jump), and backtracks when a
placement keeps failing.

Pieces:
- `Trajectory` and the jump/world datasets.
- `Segment`, the closed set of placement policies.
- `Generator`, the sample/validate/commit/revert loop.
- `Level`, its zones and stage objects, streamed into any `SceneSink`.
- `Level::finish`, the warps and exits chaining stages together.

Determinism: a run draws every random value from the `Prng` it is given,
so a seed and identical datasets reproduce the same level.
"]

pub mod config;
pub mod dataset;
pub mod error;
mod finish;
pub mod generator;
pub mod level;
pub mod segment;
pub mod sink;
pub mod stage;
pub mod trajectory;

pub use config::{ConfigError, CountRange, GeneratorConfig, SegmentCounts};
pub use dataset::{load_jump_dir, JumpData, JumpMetadata, JumpSource, MemoryJumpSource, WorldDataset};
pub use error::{DatasetError, GenerateError};
pub use finish::StageLinks;
pub use generator::{stage_seed, Generator};
pub use level::{GenerationStats, JumpSummary, Level, PlacedObject, Zone};
pub use segment::{Segment, SegmentKind};
pub use sink::{SceneEvent, SceneSink};
pub use stage::{Area, AreaKind, Component, Links, ObjectId, RunContext, StageObject};
pub use trajectory::Trajectory;
