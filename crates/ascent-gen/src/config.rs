// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Generator tuning loaded from JSON.
//!
//! Every field has a default, so a partial document only overrides what it
//! names:
//!
//! ```
//! use ascent_gen::GeneratorConfig;
//! let cfg = GeneratorConfig::from_json_slice(br#"{ "max_attempts": 20 }"#).unwrap();
//! assert_eq!(cfg.max_attempts, 20);
//! assert_eq!(cfg.leading_radius, 180.0);
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for config operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error while reading/writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization/deserialization failure.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    /// The document parsed but a value is out of range.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Inclusive integer range a segment draws its object count from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRange {
    /// Smallest count.
    pub min: u32,
    /// Largest count.
    pub max: u32,
}

impl CountRange {
    /// Creates a range; bounds are used as given.
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }
}

/// Object counts per segment kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentCounts {
    /// Static or moving platforms from the world palette.
    pub default: CountRange,
    /// Timed reveal challenge.
    pub timer: CountRange,
    /// Binocular capture section.
    pub binocular: CountRange,
    /// Lava bubble capture section.
    pub bubble: CountRange,
    /// Wall-poking capture section.
    pub poke: CountRange,
}

impl Default for SegmentCounts {
    fn default() -> Self {
        Self {
            default: CountRange::new(7, 11),
            timer: CountRange::new(4, 6),
            binocular: CountRange::new(5, 6),
            bubble: CountRange::new(7, 9),
            poke: CountRange::new(3, 4),
        }
    }
}

/// Tuning knobs for a generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Collision radius of the jumping player.
    pub leading_radius: f32,
    /// Collision radius of the thrown companion.
    pub following_radius: f32,
    /// Height added to a jump's start before its trajectory is tested.
    pub trajectory_lift: f32,
    /// Candidates tried before the revert protocol kicks in.
    pub max_attempts: u32,
    /// Planar distance from the start at which every candidate is rejected.
    pub distance_falloff: f32,
    /// Trials when searching a model for a standable surface.
    pub standable_trials: usize,
    /// Cone half-angle, in degrees, around the target normal.
    pub standable_angle_deg: f32,
    /// Chance a default platform becomes a moving one.
    pub moving_platform_chance: f32,
    /// Objects at least this large never move.
    pub moving_platform_max_extent: f32,
    /// Object forced as the final platform of a run.
    pub final_object: String,
    /// Worlds where timer segments are disabled.
    pub timer_excluded_worlds: Vec<String>,
    /// Duration of a timer challenge in frames.
    pub timer_frames: u32,
    /// Object counts per segment kind.
    pub segment_counts: SegmentCounts,
    /// Reverts (single-step and zone) a run may perform before giving up.
    /// `None` never gives up.
    pub max_reverts: Option<u32>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            leading_radius: 180.0,
            following_radius: 90.0,
            trajectory_lift: 582.0,
            max_attempts: 100,
            distance_falloff: 35_000.0,
            standable_trials: 10_000,
            standable_angle_deg: 45.0,
            moving_platform_chance: 0.4,
            moving_platform_max_extent: 1000.0,
            final_object: "LavaWorldWireStep000".to_owned(),
            timer_excluded_worlds: vec!["WaterfallWorld".to_owned(), "SeaWorld".to_owned()],
            timer_frames: 30 * 60,
            segment_counts: SegmentCounts::default(),
            max_reverts: None,
        }
    }
}

impl GeneratorConfig {
    /// Parses and validates a JSON document; missing fields keep defaults.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_slice(bytes)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reads a JSON config file. An empty file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let bytes = fs::read(path)?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        Self::from_json_slice(&bytes)
    }

    /// Serializes to pretty JSON.
    pub fn to_json_pretty(&self) -> Result<Vec<u8>, ConfigError> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    /// Checks ranges that would otherwise stall or break a run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("leading_radius", self.leading_radius),
            ("following_radius", self.following_radius),
            ("distance_falloff", self.distance_falloff),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!("{name} must be positive, got {value}")));
            }
        }
        if !(0.0..=180.0).contains(&self.standable_angle_deg) {
            return Err(ConfigError::Invalid(format!(
                "standable_angle_deg must be within 0..=180, got {}",
                self.standable_angle_deg
            )));
        }
        if !(0.0..=1.0).contains(&self.moving_platform_chance) {
            return Err(ConfigError::Invalid(format!(
                "moving_platform_chance must be within 0..=1, got {}",
                self.moving_platform_chance
            )));
        }
        if self.max_attempts == 0 || self.standable_trials == 0 {
            return Err(ConfigError::Invalid("attempt and trial counts must be non-zero".into()));
        }
        let counts = &self.segment_counts;
        for (name, range) in [
            ("default", counts.default),
            ("timer", counts.timer),
            ("binocular", counts.binocular),
            ("bubble", counts.bubble),
            ("poke", counts.poke),
        ] {
            if range.min == 0 || range.min > range.max {
                return Err(ConfigError::Invalid(format!(
                    "segment_counts.{name} must satisfy 1 <= min <= max, got {}..={}",
                    range.min, range.max
                )));
            }
        }
        Ok(())
    }
}
