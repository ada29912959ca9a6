// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Where collision bytes come from.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;

use crate::error::MeshError;

/// Abstract byte store for encoded collision containers.
///
/// Implementations only fetch bytes; decoding happens in the cache.
pub trait MeshSource {
    /// Loads the primary collision file for `object_type`.
    ///
    /// `Ok(None)` means the object has no collision data at all.
    fn load_raw(&self, object_type: &str) -> Result<Option<Vec<u8>>, MeshError>;

    /// Loads every collision file belonging to `object_type`, primary first.
    ///
    /// The default returns the primary file only. Parts are unioned into one
    /// model by the cache.
    fn load_parts(&self, object_type: &str) -> Result<Vec<Vec<u8>>, MeshError> {
        Ok(self.load_raw(object_type)?.into_iter().collect())
    }
}

/// Reads `<root>/<object_type>.kcl` plus optional `<object_type>.<n>.kcl`
/// parts numbered from 1.
#[derive(Debug, Clone)]
pub struct FsMeshSource {
    root: PathBuf,
}

impl FsMeshSource {
    /// Creates a source rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory searched for collision files.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read_optional(path: &Path) -> Result<Option<Vec<u8>>, MeshError> {
        match fs::read(path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(MeshError::Io(err)),
        }
    }
}

impl MeshSource for FsMeshSource {
    fn load_raw(&self, object_type: &str) -> Result<Option<Vec<u8>>, MeshError> {
        Self::read_optional(&self.root.join(format!("{object_type}.kcl")))
    }

    fn load_parts(&self, object_type: &str) -> Result<Vec<Vec<u8>>, MeshError> {
        let mut parts: Vec<Vec<u8>> = self.load_raw(object_type)?.into_iter().collect();
        for n in 1.. {
            match Self::read_optional(&self.root.join(format!("{object_type}.{n}.kcl")))? {
                Some(bytes) => parts.push(bytes),
                None => break,
            }
        }
        Ok(parts)
    }
}

/// In-memory source keyed by object type.
#[derive(Debug, Clone, Default)]
pub struct MemoryMeshSource {
    files: FxHashMap<String, Vec<Vec<u8>>>,
}

impl MemoryMeshSource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one collision file for `object_type`; repeated calls add parts.
    pub fn insert(&mut self, object_type: impl Into<String>, bytes: impl Into<Vec<u8>>) -> &mut Self {
        self.files.entry(object_type.into()).or_default().push(bytes.into());
        self
    }

    /// Builder form of [`MemoryMeshSource::insert`].
    #[must_use]
    pub fn with(mut self, object_type: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(object_type, bytes);
        self
    }
}

impl MeshSource for MemoryMeshSource {
    fn load_raw(&self, object_type: &str) -> Result<Option<Vec<u8>>, MeshError> {
        Ok(self.files.get(object_type).and_then(|parts| parts.first().cloned()))
    }

    fn load_parts(&self, object_type: &str) -> Result<Vec<Vec<u8>>, MeshError> {
        Ok(self.files.get(object_type).cloned().unwrap_or_default())
    }
}
