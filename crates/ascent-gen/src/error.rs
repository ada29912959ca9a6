// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Error types for datasets and generation runs.

use std::path::PathBuf;

use ascent_geom::MeshError;
use thiserror::Error;

use crate::level::GenerationStats;
use crate::segment::SegmentKind;

/// Failure to load jump or world data.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// Reading a dataset file failed.
    #[error("io error reading {path}: {source}")]
    Io {
        /// File or directory being read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// A JSON document did not match its schema.
    #[error("invalid json in {path}: {source}")]
    Json {
        /// Offending file, or `<memory>` for in-memory input.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
    /// A trajectory file had an unparsable vertex line.
    #[error("{path}:{line}: {detail}")]
    Obj {
        /// Offending file.
        path: PathBuf,
        /// 1-based line number.
        line: usize,
        /// What was wrong with the line.
        detail: String,
    },
    /// A jump has no trajectory points.
    #[error("jump {0} has an empty trajectory")]
    EmptyTrajectory(String),
    /// No jumps are registered under a category a segment needs.
    #[error("no jumps in category {0}")]
    MissingCategory(String),
}

/// Fatal failure of a generation run.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Collision data for an object exists but is malformed.
    #[error("collision for {object_type}: {source}")]
    Mesh {
        /// Object whose collision failed to load.
        object_type: String,
        /// Decode failure.
        #[source]
        source: MeshError,
    },
    /// Jump data could not be provided.
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    /// The revert protocol tried to rewind past the first zone.
    #[error("cannot revert zone {zone}: stuck on object {object_index} ({object_type})")]
    RevertUnderflow {
        /// Zone index that was being reverted.
        zone: usize,
        /// Index of the last placed object.
        object_index: usize,
        /// Type of the last placed object.
        object_type: String,
    },
    /// The configured revert budget ran out.
    #[error("gave up after {limit} reverts ({} attempts)", stats.attempts)]
    RevertLimit {
        /// Configured budget.
        limit: u32,
        /// Counters at the time the run gave up.
        stats: GenerationStats,
    },
    /// The start platform has no collision, so nothing can jump off it.
    #[error("start object {0} has no collision data")]
    StartWithoutCollision(String),
    /// A segment has nothing to place.
    #[error("{kind:?} segment has an empty object palette")]
    EmptyPalette {
        /// Segment that was drawn.
        kind: SegmentKind,
    },
    /// The world enables no segment kinds at all.
    #[error("world {0} allows no segment kinds")]
    NoSegments(String),
    /// Writing debug output failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl GenerateError {
    pub(crate) fn mesh(object_type: &str, source: MeshError) -> Self {
        Self::Mesh { object_type: object_type.to_owned(), source }
    }
}
