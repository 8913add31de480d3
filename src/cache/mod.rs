//! In-process response caches.
//!
//! Two independent shapes, each instance with its own lock:
//!
//! - [`SnapshotCache`]: listing blobs recomputed together at most once per TTL
//! - [`MemoCache`]: serialized submission echoes keyed by payload, never evicted

mod memo;
mod snapshot;

pub use memo::{CacheKey, MemoCache};
pub use snapshot::SnapshotCache;
