//! # Converted Code Cache
//!
//! Process-wide map from code hash to converted code.
//!
//! ## Concurrency
//!
//! The lock guards map access only. Conversion runs outside it, so two
//! callers racing on the same new hash may both convert; both produce equal
//! results and the later insert simply replaces the earlier one.
//!
//! The zero hash means "unknown identity" and is never stored.

use crate::domain::entities::ConvertedCode;
use crate::domain::value_objects::Hash;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Shared, internally synchronized cache of converted code.
#[derive(Debug, Default)]
pub struct CodeCache {
    entries: Mutex<HashMap<Hash, Arc<ConvertedCode>>>,
}

impl CodeCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up `hash`. Always a miss for the zero hash.
    pub fn get(&self, hash: &Hash) -> Option<Arc<ConvertedCode>> {
        if hash.is_zero() {
            return None;
        }
        self.entries.lock().get(hash).cloned()
    }

    /// Store `converted` under `hash`, replacing any previous entry.
    ///
    /// Returns false (and stores nothing) for the zero hash.
    pub fn insert(&self, hash: Hash, converted: Arc<ConvertedCode>) -> bool {
        if hash.is_zero() {
            return false;
        }
        self.entries.lock().insert(hash, converted);
        true
    }

    /// Return the cached entry for `hash`, or run `convert` without holding the
    /// lock and store its result.
    ///
    /// The boolean is true on a cache hit. Errors are returned as-is and
    /// leave the cache untouched.
    pub fn get_or_convert<E, F>(
        &self,
        hash: Hash,
        convert: F,
    ) -> Result<(Arc<ConvertedCode>, bool), E>
    where
        F: FnOnce() -> Result<ConvertedCode, E>,
    {
        if let Some(hit) = self.get(&hash) {
            return Ok((hit, true));
        }
        let converted = Arc::new(convert()?);
        self.insert(hash, Arc::clone(&converted));
        Ok((converted, false))
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns true if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

// =============================================================================
// TESTS
// =============================================================================
