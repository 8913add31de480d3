use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use tracing::{debug, info};

use crate::error::Result;

/// Deterministic cache key built from a payload's significant fields.
pub trait CacheKey {
    fn cache_key(&self) -> String;
}

/// Memoized serialized responses keyed by payload signature.
///
/// Entries are never evicted or expired. A key that is present is served
/// verbatim without re-serializing.
#[derive(Default)]
pub struct MemoCache {
    entries: Mutex<HashMap<String, Arc<str>>>,
}

impl MemoCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize `value` once per distinct cache key.
    pub fn memoize<T>(&self, value: &T) -> Result<Arc<str>>
    where
        T: Serialize + CacheKey,
    {
        self.get_or_insert_with(value.cache_key(), || serde_json::to_string(value))
    }

    /// Return the entry for `key`, or run `serialize` and store its output.
    /// A failed `serialize` leaves the cache untouched.
    pub fn get_or_insert_with<F>(&self, key: String, serialize: F) -> Result<Arc<str>>
    where
        F: FnOnce() -> serde_json::Result<String>,
    {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(cached) = entries.get(&key) {
            debug!("Cache hit for '{}'", key);
            return Ok(Arc::clone(cached));
        }

        let serialized: Arc<str> = Arc::from(serialize()?);
        entries.insert(key.clone(), Arc::clone(&serialized));
        info!("Cached response for '{}' ({} entries)", key, entries.len());
        Ok(serialized)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
