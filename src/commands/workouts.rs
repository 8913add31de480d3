//! Commands over a user's workout logs.
//!
//! Mutations go straight to the progress store; reads return fresh data
//! rather than the cached listings.

use tracing::info;

use super::AppState;
use crate::error::Result;
use crate::progress::{Exercise, WorkoutPlan};
use crate::recommend::suggest_for_user;

/// Log a workout plan for a user. Echoes the stored plan.
pub fn add_workout_log(state: &AppState, user_id: &str, plan: WorkoutPlan) -> Result<String> {
    info!("add_workout_log called for user {}", user_id);
    let body = serde_json::to_string(&plan)?;
    state.store.add_log(user_id, plan)?;
    Ok(body)
}

/// Replace the exercises of a logged plan.
pub fn update_workout_log(
    state: &AppState,
    user_id: &str,
    plan_id: &str,
    exercises: Vec<Exercise>,
) -> Result<String> {
    info!("update_workout_log called for user {}, plan {}", user_id, plan_id);
    state.store.update_log(user_id, plan_id, exercises)?;
    Ok(serde_json::json!({ "updated": plan_id }).to_string())
}

/// Add one exercise to a logged plan.
pub fn append_exercise(
    state: &AppState,
    user_id: &str,
    plan_id: &str,
    exercise: Exercise,
) -> Result<String> {
    info!("append_exercise called for user {}, plan {}", user_id, plan_id);
    state.store.append_exercise(user_id, plan_id, exercise)?;
    Ok(serde_json::json!({ "updated": plan_id }).to_string())
}

/// Remove a logged plan.
pub fn delete_workout_log(state: &AppState, user_id: &str, plan_id: &str) -> Result<String> {
    info!("delete_workout_log called for user {}, plan {}", user_id, plan_id);
    state.store.delete_log(user_id, plan_id)?;
    Ok(serde_json::json!({ "deleted": plan_id }).to_string())
}

/// The user's most recent plan, or `null`.
pub fn get_last_plan(state: &AppState, user_id: &str) -> Result<String> {
    Ok(serde_json::to_string(&state.store.get_last_plan(user_id))?)
}

/// The user's full history in submission order.
pub fn get_history(state: &AppState, user_id: &str) -> Result<String> {
    let plans = state.store.plans_for(user_id);
    info!("Listed {} workout logs for user {}", plans.len(), user_id);
    Ok(serde_json::to_string(&plans)?)
}

/// A suggested follow-on plan, or `null` when the user has no history.
pub fn suggest_workout_plan(state: &AppState, user_id: &str) -> Result<String> {
    let suggestion = suggest_for_user(&state.store, user_id);
    if suggestion.is_none() {
        info!("No history to suggest from for user {}", user_id);
    }
    Ok(serde_json::to_string(&suggestion)?)
}
