use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// Training intensity tier of an exercise.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Intensity {
    Low,
    Medium,
    High,
}

impl Intensity {
    /// One step up the ladder. `High` is the ceiling and stays `High`.
    pub fn escalate(self) -> Self {
        match self {
            Intensity::Low => Intensity::Medium,
            Intensity::Medium | Intensity::High => Intensity::High,
        }
    }
}

/// How hard an exercise felt.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    JustRight,
    Hard,
}

/// How useful an exercise felt.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Effectiveness {
    Low,
    Medium,
    High,
}

/// Post-workout feedback attached to an exercise.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Feedback {
    pub difficulty: Difficulty,
    pub effectiveness: Effectiveness,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Exercise {
    pub name: String,
    #[serde(deserialize_with = "positive")]
    pub sets: u32,
    #[serde(deserialize_with = "positive")]
    pub reps: u32,
    pub intensity: Intensity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<Feedback>,
}

impl Exercise {
    pub fn new(name: impl Into<String>, sets: u32, reps: u32, intensity: Intensity) -> Self {
        Self {
            name: name.into(),
            sets,
            reps,
            intensity,
            feedback: None,
        }
    }
}

/// Sets and reps are targets, so zero is rejected on decode.
fn positive<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    match u32::deserialize(deserializer)? {
        0 => Err(D::Error::custom("expected a positive integer, got 0")),
        n => Ok(n),
    }
}

/// A logged workout. `id` is only unique within one user's history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkoutPlan {
    pub id: String,
    #[serde(default = "Utc::now")]
    pub date: DateTime<Utc>,
    pub exercises: Vec<Exercise>,
    pub goal: String,
}

/// All plans logged by one user, in submission order.
///
/// The last element is the most recent plan regardless of its `date`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProgress {
    pub user_id: String,
    pub workout_plans: Vec<WorkoutPlan>,
}

impl UserProgress {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            workout_plans: Vec::new(),
        }
    }

    /// First plan with the given id. Later duplicates are shadowed.
    pub fn plan_mut(&mut self, plan_id: &str) -> Option<&mut WorkoutPlan> {
        self.workout_plans.iter_mut().find(|p| p.id == plan_id)
    }

    /// Remove the first plan with the given id, keeping the order of the rest.
    pub fn remove_plan(&mut self, plan_id: &str) -> Option<WorkoutPlan> {
        let index = self.workout_plans.iter().position(|p| p.id == plan_id)?;
        Some(self.workout_plans.remove(index))
    }

    pub fn last_plan(&self) -> Option<&WorkoutPlan> {
        self.workout_plans.last()
    }
}
