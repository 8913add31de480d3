//! Idempotent submission commands.
//!
//! Identical payloads are answered from the memo caches with the exact
//! bytes produced the first time.

use super::AppState;
use crate::error::Result;
use crate::submissions::{GoalsDetails, WorkoutDetails};

pub fn submit_workout_data(state: &AppState, payload: &WorkoutDetails) -> Result<String> {
    state.metrics.record_workout();
    Ok(state.workout_submissions.memoize(payload)?.to_string())
}

pub fn submit_user_goals(state: &AppState, payload: &GoalsDetails) -> Result<String> {
    state.metrics.record_goals();
    Ok(state.goal_submissions.memoize(payload)?.to_string())
}

pub fn get_metrics(state: &AppState) -> Result<String> {
    Ok(serde_json::to_string(&state.metrics.snapshot())?)
}
