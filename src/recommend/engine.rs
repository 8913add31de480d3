//! Follow-on plan derivation.
//!
//! Progression is on intensity tier only. Sets and reps are carried over as-is.

use chrono::Utc;
use tracing::debug;

use crate::progress::{Exercise, ProgressStore, WorkoutPlan};

/// Appended to every suggested exercise name.
pub const VARIATION_SUFFIX: &str = " Variation";

/// Derive the next plan from the last one.
///
/// The new id is `"{id}-new"`, the date is now, and the goal is kept. Every
/// exercise is escalated and tagged as a variation.
pub fn suggest(last_plan: &WorkoutPlan) -> WorkoutPlan {
    let exercises = last_plan
        .exercises
        .iter()
        .cloned()
        .map(escalate_intensity)
        .map(add_variation_tag)
        .collect();

    WorkoutPlan {
        id: format!("{}-new", last_plan.id),
        date: Utc::now(),
        exercises,
        goal: last_plan.goal.clone(),
    }
}

/// Bump the intensity one tier, stopping at `High`.
pub fn escalate_intensity(mut exercise: Exercise) -> Exercise {
    exercise.intensity = exercise.intensity.escalate();
    exercise
}

/// Mark the exercise as a suggested variant. The variant has not been
/// performed yet, so feedback carried over from the source exercise is dropped.
pub fn add_variation_tag(mut exercise: Exercise) -> Exercise {
    exercise.name.push_str(VARIATION_SUFFIX);
    exercise.feedback = None;
    exercise
}

/// Suggest a plan from the user's most recent log.
///
/// Returns `None` when the user has no history; that is not an error.
pub fn suggest_for_user(store: &ProgressStore, user_id: &str) -> Option<WorkoutPlan> {
    let last_plan = store.get_last_plan(user_id)?;
    let suggested = suggest(&last_plan);
    debug!(
        "Suggested plan {} for user {} from {}",
        suggested.id, user_id, last_plan.id
    );
    Some(suggested)
}
