//! Idempotent submission payloads and their counters.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::cache::CacheKey;

/// A completed-workout summary posted by a client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkoutDetails {
    pub duration: f64,
    pub intensity: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl CacheKey for WorkoutDetails {
    fn cache_key(&self) -> String {
        format!("{:.6}{}{}", self.duration, self.intensity, self.kind)
    }
}

/// Weekly targets posted by a client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GoalsDetails {
    pub weekly_duration_goal: f64,
    pub type_goal: String,
}

impl CacheKey for GoalsDetails {
    fn cache_key(&self) -> String {
        format!("{:.6}{}", self.weekly_duration_goal, self.type_goal)
    }
}

/// Counts of decoded submissions, cache hits included.
#[derive(Debug, Default)]
pub struct SubmissionMetrics {
    workout_submissions: AtomicU64,
    goals_submissions: AtomicU64,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub workout_submissions: u64,
    pub goals_submissions: u64,
}

impl SubmissionMetrics {
    pub fn record_workout(&self) {
        self.workout_submissions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_goals(&self) {
        self.goals_submissions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            workout_submissions: self.workout_submissions.load(Ordering::Relaxed),
            goals_submissions: self.goals_submissions.load(Ordering::Relaxed),
        }
    }
}
