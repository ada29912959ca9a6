// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Jump and world datasets.
//!
//! Jumps live on disk as one directory per jump:
//!
//! ```text
//! <root>/<category>/<jump>/metadata.json
//! <root>/<category>/<jump>/leading.obj
//! <root>/<category>/<jump>/following.obj
//! ```
//!
//! Only `v x y z` lines of the OBJ files are read.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ascent_geom::Vec3;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::config::GeneratorConfig;
use crate::error::DatasetError;
use crate::segment::SegmentKind;
use crate::trajectory::Trajectory;

/// Descriptive metadata attached to a recorded jump.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JumpMetadata {
    /// Free-form description of the move.
    pub description: String,
    /// Relative difficulty; higher is harder.
    pub difficulty: u32,
}

/// One recorded jump: paths of both actors plus metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JumpData {
    /// Directory name of the jump.
    pub name: String,
    /// Description and difficulty.
    #[serde(default)]
    pub metadata: JumpMetadata,
    /// Path of the jumping player.
    pub leading: Trajectory,
    /// Path of the thrown companion. Clearance sweeps both actors along
    /// `leading`; this path is carried for tooling.
    pub following: Trajectory,
}

/// Provider of recorded jumps grouped by category.
pub trait JumpSource {
    /// All jumps of `category`, in a stable order.
    fn jumps(&self, category: &str) -> Result<Arc<[JumpData]>, DatasetError>;
}

/// In-memory jump catalogue.
#[derive(Debug, Clone, Default)]
pub struct MemoryJumpSource {
    categories: FxHashMap<String, Arc<[JumpData]>>,
}

impl MemoryJumpSource {
    /// Creates an empty catalogue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the jumps of `category`.
    pub fn insert(&mut self, category: impl Into<String>, jumps: Vec<JumpData>) -> &mut Self {
        self.categories.insert(category.into(), jumps.into());
        self
    }

    /// Builder form of [`MemoryJumpSource::insert`].
    #[must_use]
    pub fn with(mut self, category: impl Into<String>, jumps: Vec<JumpData>) -> Self {
        self.insert(category, jumps);
        self
    }

    /// Category names, sorted.
    pub fn categories(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.categories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl JumpSource for MemoryJumpSource {
    fn jumps(&self, category: &str) -> Result<Arc<[JumpData]>, DatasetError> {
        self.categories
            .get(category)
            .filter(|jumps| !jumps.is_empty())
            .cloned()
            .ok_or_else(|| DatasetError::MissingCategory(category.to_owned()))
    }
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> DatasetError + '_ {
    move |source| DatasetError::Io { path: path.to_path_buf(), source }
}

fn sorted_subdirs(dir: &Path) -> Result<Vec<PathBuf>, DatasetError> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err(dir))? {
        let entry = entry.map_err(io_err(dir))?;
        if entry.file_type().map_err(io_err(dir))?.is_dir() {
            dirs.push(entry.path());
        }
    }
    // read_dir order is platform dependent.
    dirs.sort();
    Ok(dirs)
}

/// Extracts vertex positions from Wavefront OBJ text.
pub fn parse_obj_points(text: &str, path: &Path) -> Result<Vec<Vec3>, DatasetError> {
    let mut points = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let mut fields = line.split_whitespace();
        if fields.next() != Some("v") {
            continue;
        }
        let mut coord = || -> Result<f32, DatasetError> {
            let field = fields.next().ok_or_else(|| DatasetError::Obj {
                path: path.to_path_buf(),
                line: idx + 1,
                detail: "vertex needs three coordinates".to_owned(),
            })?;
            field.parse().map_err(|_| DatasetError::Obj {
                path: path.to_path_buf(),
                line: idx + 1,
                detail: format!("bad coordinate {field:?}"),
            })
        };
        let (x, y, z) = (coord()?, coord()?, coord()?);
        points.push(Vec3::new(x, y, z));
    }
    Ok(points)
}

fn read_trajectory(path: &Path, jump: &str) -> Result<Trajectory, DatasetError> {
    let text = fs::read_to_string(path).map_err(io_err(path))?;
    Trajectory::new(parse_obj_points(&text, path)?).ok_or_else(|| DatasetError::EmptyTrajectory(jump.to_owned()))
}

/// Loads one jump directory.
pub fn load_jump(dir: &Path) -> Result<JumpData, DatasetError> {
    let name = dir.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    let meta_path = dir.join("metadata.json");
    let metadata = match fs::read(&meta_path) {
        Ok(bytes) => serde_json::from_slice(&bytes)
            .map_err(|source| DatasetError::Json { path: meta_path.clone(), source })?,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => JumpMetadata::default(),
        Err(source) => return Err(DatasetError::Io { path: meta_path, source }),
    };
    let leading = read_trajectory(&dir.join("leading.obj"), &name)?;
    let following = read_trajectory(&dir.join("following.obj"), &name)?;
    Ok(JumpData { name, metadata, leading, following })
}

/// Loads every category under `root` into memory.
pub fn load_jump_dir(root: impl AsRef<Path>) -> Result<MemoryJumpSource, DatasetError> {
    let mut source = MemoryJumpSource::new();
    for category_dir in sorted_subdirs(root.as_ref())? {
        let category = category_dir.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        let jumps = sorted_subdirs(&category_dir)?
            .iter()
            .map(|dir| load_jump(dir))
            .collect::<Result<Vec<_>, _>>()?;
        source.insert(category, jumps);
    }
    Ok(source)
}

/// Palette and settings of one world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldDataset {
    /// World name, also used in zone names.
    pub name: String,
    /// Sky model shown above the stage.
    #[serde(default)]
    pub sky: String,
    /// Platform objects default segments draw from.
    pub objects: Vec<String>,
    /// Capturable actors native to this world.
    #[serde(default)]
    pub captures: Vec<String>,
    /// Objects that only make sense next to a capture.
    #[serde(default)]
    pub capture_specific_objects: Vec<String>,
    /// Placements (start platform included) a run stops at.
    #[serde(default = "default_target")]
    pub target_object_count: usize,
    /// Object placed under the player start.
    #[serde(default = "default_start_object")]
    pub start_object: String,
    /// Capture segments enabled in this world, on top of default and timer.
    #[serde(default)]
    pub special_segments: Vec<SegmentKind>,
}

const fn default_target() -> usize {
    55
}

fn default_start_object() -> String {
    "CapWorldHomeGround001".to_owned()
}

impl WorldDataset {
    /// Creates a world with defaults for everything but its name and palette.
    pub fn new(name: impl Into<String>, objects: Vec<String>) -> Self {
        Self {
            name: name.into(),
            sky: String::new(),
            objects,
            captures: Vec::new(),
            capture_specific_objects: Vec::new(),
            target_object_count: default_target(),
            start_object: default_start_object(),
            special_segments: Vec::new(),
        }
    }

    /// Parses a world from JSON.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, DatasetError> {
        serde_json::from_slice(bytes).map_err(|source| DatasetError::Json { path: PathBuf::from("<memory>"), source })
    }

    /// Reads a world JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(io_err(path))?;
        serde_json::from_slice(&bytes).map_err(|source| DatasetError::Json { path: path.to_path_buf(), source })
    }

    /// Segment kinds a run in this world may draw, without duplicates:
    /// default always, timer unless the world is excluded, then the
    /// world's special kinds in listed order.
    pub fn segment_kinds(&self, config: &GeneratorConfig) -> Vec<SegmentKind> {
        let mut kinds = vec![SegmentKind::Default];
        if !config.timer_excluded_worlds.iter().any(|w| w == &self.name) {
            kinds.push(SegmentKind::Timer);
        }
        for kind in &self.special_segments {
            if !kinds.contains(kind) {
                kinds.push(*kind);
            }
        }
        kinds
    }
}
