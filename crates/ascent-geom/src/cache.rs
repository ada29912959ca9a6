// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Read-through cache of decoded collision models.
//!
//! Entries are keyed by object type, filled on first request and never
//! invalidated. Absence of collision data is cached too, so a missing object
//! hits the source once.

use std::sync::{Arc, PoisonError, RwLock};

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::error::MeshError;
use crate::model::CollisionModel;
use crate::source::MeshSource;

type Entry = Option<Arc<CollisionModel>>;

/// Shared, lazily populated map from object type to [`CollisionModel`].
///
/// Safe to share across generation runs behind an `Arc`; lookups take a read
/// lock and only a miss takes the write lock.
pub struct CollisionCache {
    source: Box<dyn MeshSource + Send + Sync>,
    entries: RwLock<FxHashMap<String, Entry>>,
}

impl CollisionCache {
    /// Creates an empty cache over `source`.
    pub fn new(source: impl MeshSource + Send + Sync + 'static) -> Self {
        Self { source: Box::new(source), entries: RwLock::new(FxHashMap::default()) }
    }

    /// Returns the model for `object_type`, decoding it on first use.
    ///
    /// `Ok(None)` means the object has no collision data. Decode failures are
    /// not cached; the next call retries the source.
    pub fn get(&self, object_type: &str) -> Result<Entry, MeshError> {
        let cached = self.entries.read().unwrap_or_else(PoisonError::into_inner).get(object_type).cloned();
        if let Some(hit) = cached {
            return Ok(hit);
        }

        let entry = self.load(object_type)?;
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        // Another thread may have won the race; keep its value.
        Ok(entries.entry(object_type.to_owned()).or_insert(entry).clone())
    }

    /// Number of cached object types (including ones without collision).
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// `true` when nothing has been loaded yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn load(&self, object_type: &str) -> Result<Entry, MeshError> {
        let mut model: Option<CollisionModel> = None;
        for bytes in self.source.load_parts(object_type)? {
            let part = CollisionModel::from_kcl(&bytes)?;
            model = Some(match model {
                Some(m) => m.union(&part),
                None => part,
            });
        }
        debug!(object_type, found = model.is_some(), "loaded collision");
        Ok(model.map(Arc::new))
    }
}

impl core::fmt::Debug for CollisionCache {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CollisionCache").field("entries", &self.len()).finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::kcl::encode_kcl;
    use crate::math::Vec3;
    use crate::source::MemoryMeshSource;
    use crate::types::Triangle;

    fn plate(y: f32) -> Vec<u8> {
        let tri = Triangle::new(Vec3::new(0.0, y, 0.0), Vec3::new(0.0, y, 10.0), Vec3::new(10.0, y, 0.0));
        encode_kcl(&[vec![tri]]).unwrap().to_vec()
    }

    #[test]
    fn parts_are_unioned_and_shared() {
        let src = MemoryMeshSource::new().with("Step", plate(0.0)).with("Step", plate(30.0));
        let cache = CollisionCache::new(src);
        let a = cache.get("Step").unwrap().unwrap();
        let b = cache.get("Step").unwrap().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.meshes().len(), 2);
        assert!(a.intersects(Vec3::new(2.0, 31.0, 2.0), 1.5));
    }

    #[test]
    fn missing_collision_is_cached_as_none() {
        let cache = CollisionCache::new(MemoryMeshSource::new());
        assert!(cache.get("Ghost").unwrap().is_none());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn decode_errors_surface_and_are_not_cached() {
        let cache = CollisionCache::new(MemoryMeshSource::new().with("Bad", vec![0u8; 8]));
        assert!(matches!(cache.get("Bad"), Err(MeshError::BadMagic(0))));
        assert!(cache.is_empty());
    }
}
