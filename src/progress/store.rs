use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{info, warn};

use super::persistence::{load_progress, save_progress};
use super::types::{Exercise, UserProgress, WorkoutPlan};
use crate::error::{Result, TrackerError};

/// In-memory owner of every user's workout history, flushed to a JSON file
/// after each mutation.
///
/// Writers hold the exclusive lock across both the edit and the flush, so
/// file writes never interleave and readers never see a half-applied change.
/// A failed flush is reported but the in-memory edit stays applied.
pub struct ProgressStore {
    path: PathBuf,
    users: RwLock<Vec<UserProgress>>,
}

impl ProgressStore {
    /// Open the store backed by `path`, loading existing history if the file exists.
    pub fn open(path: &Path) -> Result<Self> {
        let users = load_progress(path).map_err(TrackerError::Persist)?;
        info!("Opened progress store at {:?} with {} users", path, users.len());
        Ok(Self::with_users(path, users))
    }

    /// Build a store from an already loaded collection without touching disk.
    pub fn with_users(path: &Path, users: Vec<UserProgress>) -> Self {
        Self {
            path: path.to_path_buf(),
            users: RwLock::new(users),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a plan to the user's history, creating the user on first use.
    /// Duplicate plan ids are appended as-is.
    pub fn add_log(&self, user_id: &str, plan: WorkoutPlan) -> Result<()> {
        let mut users = self.write();
        let plan_id = plan.id.clone();

        match users.iter_mut().find(|u| u.user_id == user_id) {
            Some(user) => user.workout_plans.push(plan),
            None => {
                let mut user = UserProgress::new(user_id);
                user.workout_plans.push(plan);
                users.push(user);
                info!("Created progress record for user {}", user_id);
            }
        }

        info!("Added workout log {} for user {}", plan_id, user_id);
        self.flush(&users)
    }

    /// Replace the exercises of the first plan matching `plan_id`.
    pub fn update_log(&self, user_id: &str, plan_id: &str, exercises: Vec<Exercise>) -> Result<()> {
        let mut users = self.write();
        let plan = users
            .iter_mut()
            .find(|u| u.user_id == user_id)
            .and_then(|u| u.plan_mut(plan_id))
            .ok_or_else(|| TrackerError::not_found(user_id, plan_id))?;

        plan.exercises = exercises;
        info!("Updated workout log {} for user {}", plan_id, user_id);
        self.flush(&users)
    }

    /// Append one exercise to the first plan matching `plan_id`.
    pub fn append_exercise(&self, user_id: &str, plan_id: &str, exercise: Exercise) -> Result<()> {
        let mut users = self.write();
        let plan = users
            .iter_mut()
            .find(|u| u.user_id == user_id)
            .and_then(|u| u.plan_mut(plan_id))
            .ok_or_else(|| TrackerError::not_found(user_id, plan_id))?;

        info!(
            "Appending exercise '{}' to workout log {} for user {}",
            exercise.name, plan_id, user_id
        );
        plan.exercises.push(exercise);
        self.flush(&users)
    }

    /// Remove the first plan matching `plan_id`. The user record itself is kept
    /// even when its history becomes empty.
    pub fn delete_log(&self, user_id: &str, plan_id: &str) -> Result<()> {
        let mut users = self.write();
        users
            .iter_mut()
            .find(|u| u.user_id == user_id)
            .and_then(|u| u.remove_plan(plan_id))
            .ok_or_else(|| TrackerError::not_found(user_id, plan_id))?;

        info!("Deleted workout log {} for user {}", plan_id, user_id);
        self.flush(&users)
    }

    /// The most recently submitted plan, by position rather than date.
    pub fn get_last_plan(&self, user_id: &str) -> Option<WorkoutPlan> {
        self.read()
            .iter()
            .find(|u| u.user_id == user_id)
            .and_then(|u| u.last_plan())
            .cloned()
    }

    /// Copy of one user's history in submission order.
    pub fn plans_for(&self, user_id: &str) -> Vec<WorkoutPlan> {
        self.read()
            .iter()
            .find(|u| u.user_id == user_id)
            .map(|u| u.workout_plans.clone())
            .unwrap_or_default()
    }

    /// Point-in-time copy of the whole collection.
    pub fn snapshot(&self) -> Vec<UserProgress> {
        self.read().clone()
    }

    pub fn user_count(&self) -> usize {
        self.read().len()
    }

    fn flush(&self, users: &[UserProgress]) -> Result<()> {
        save_progress(users, &self.path).map_err(|e| {
            warn!("Failed to persist progress to {:?}: {:#}", self.path, e);
            TrackerError::Persist(e)
        })
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<UserProgress>> {
        self.users.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<UserProgress>> {
        self.users.write().unwrap_or_else(PoisonError::into_inner)
    }
}
