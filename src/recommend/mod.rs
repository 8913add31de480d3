//! Next-workout recommendations.
//!
//! Stateless functions over a user's most recent plan. Nothing here writes
//! to the progress store; a suggestion is only persisted if the caller logs it.

mod engine;

pub use engine::{add_variation_tag, escalate_intensity, suggest, suggest_for_user, VARIATION_SUFFIX};
