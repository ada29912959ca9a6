// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Errors raised while decoding or loading collision geometry.

use thiserror::Error;

/// Failure to turn stored collision data into a usable mesh.
///
/// Every variant is fatal for the object being loaded: a partially decoded
/// mesh is never returned.
#[derive(Debug, Error)]
pub enum MeshError {
    /// The container does not start with the collision magic number.
    #[error("bad magic: expected 0x02020000, found {0:#010x}")]
    BadMagic(u32),
    /// A read ran past the end of the buffer.
    #[error("truncated data: need {needed} bytes at offset {offset:#x}, buffer is {len:#x} bytes")]
    Truncated {
        /// Byte offset of the failed read.
        offset: usize,
        /// Bytes the read required.
        needed: usize,
        /// Total buffer length.
        len: usize,
    },
    /// Section offsets inside a model header are out of order or out of bounds.
    #[error("model {model}: inconsistent layout ({detail})")]
    BadLayout {
        /// Model index within the container.
        model: usize,
        /// What was inconsistent.
        detail: &'static str,
    },
    /// A triangle record references a vertex or normal that does not exist.
    #[error("model {model} triangle {triangle}: {table} index {index} out of range (len {len})")]
    IndexOutOfRange {
        /// Model index within the container.
        model: usize,
        /// Triangle index within the model.
        triangle: usize,
        /// `"vertex"` or `"normal"`.
        table: &'static str,
        /// The offending index.
        index: usize,
        /// Length of the referenced table.
        len: usize,
    },
    /// Reconstruction produced a NaN or infinite vertex.
    #[error("model {model} triangle {triangle}: reconstructed vertex is not finite")]
    NonFinite {
        /// Model index within the container.
        model: usize,
        /// Triangle index within the model.
        triangle: usize,
    },
    /// A triangle handed to the encoder has zero area.
    #[error("triangle {0} is degenerate and cannot be encoded")]
    Degenerate(usize),
    /// The encoder ran out of 16-bit table indices.
    #[error("model {model} needs {count} table entries; the format addresses at most 65536")]
    TooLarge {
        /// Model index within the container.
        model: usize,
        /// Entries required.
        count: usize,
    },
    /// The data decoded fine but holds no triangles at all.
    #[error("collision data contains no triangles")]
    Empty,
    /// Reading the backing store failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
