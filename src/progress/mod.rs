//! Per-user workout history.
//!
//! - **Types**: exercises, plans and per-user progress records (JSON wire format)
//! - **Store**: the lock-guarded in-memory collection, flushed after every mutation
//! - **Persistence**: whole-file JSON snapshot written via temp file + rename

pub mod persistence;
mod store;
mod types;

pub use store::ProgressStore;
pub use types::*;
