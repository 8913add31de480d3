use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info};

use crate::error::Result;

type Producer = Box<dyn Fn() -> serde_json::Result<String> + Send + Sync>;

/// Serialized listings refreshed together behind one TTL gate.
///
/// Every tracked blob shares a single refresh timestamp. When a read finds the
/// gate stale, all blobs are recomputed under the lock before any is served,
/// so the listings always come from the same refresh.
pub struct SnapshotCache {
    ttl: Duration,
    sources: Vec<(String, Producer)>,
    state: Mutex<SnapshotState>,
}

#[derive(Default)]
struct SnapshotState {
    refreshed_at: Option<Instant>,
    blobs: HashMap<String, Arc<str>>,
}

impl SnapshotCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sources: Vec::new(),
            state: Mutex::new(SnapshotState::default()),
        }
    }

    /// Track a blob produced by serializing whatever `source` returns.
    pub fn track<T, F>(mut self, name: impl Into<String>, source: F) -> Self
    where
        T: Serialize,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.sources.push((
            name.into(),
            Box::new(move || serde_json::to_string(&source())),
        ));
        self
    }

    /// Track a blob with a producer that does its own encoding.
    pub fn track_raw<F>(mut self, name: impl Into<String>, producer: F) -> Self
    where
        F: Fn() -> serde_json::Result<String> + Send + Sync + 'static,
    {
        self.sources.push((name.into(), Box::new(producer)));
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Serve the named blob, refreshing every blob first if the gate is stale.
    /// Returns `None` for a name that was never tracked.
    pub fn get(&self, name: &str) -> Result<Option<Arc<str>>> {
        self.get_at(name, Instant::now())
    }

    /// Same as [`get`](Self::get) with an explicit clock reading.
    pub fn get_at(&self, name: &str, now: Instant) -> Result<Option<Arc<str>>> {
        if !self.sources.iter().any(|(n, _)| n == name) {
            return Ok(None);
        }

        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let stale = state
            .refreshed_at
            .map_or(true, |at| now.saturating_duration_since(at) > self.ttl);

        if stale {
            let mut blobs = HashMap::with_capacity(self.sources.len());
            for (blob_name, producer) in &self.sources {
                blobs.insert(blob_name.clone(), Arc::from(producer()?));
            }
            state.blobs = blobs;
            state.refreshed_at = Some(now);
            info!("Refreshed {} cached listings", self.sources.len());
        } else {
            debug!("Serving cached listing '{}'", name);
        }

        Ok(state.blobs.get(name).cloned())
    }
}
