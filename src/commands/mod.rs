//! Request dispatch.
//!
//! Each request names exactly one core operation. Commands return the JSON
//! body on success; [`dispatch`] maps the outcome onto an HTTP-style status.

pub mod listings;
pub mod submissions;
pub mod workouts;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tracing::{info, warn};

use crate::cache::{MemoCache, SnapshotCache};
use crate::catalog::{default_catalog, load_catalog, Catalog};
use crate::config::Settings;
use crate::error::{Result, TrackerError};
use crate::progress::{Exercise, ProgressStore, WorkoutPlan};
use crate::submissions::{GoalsDetails, SubmissionMetrics, WorkoutDetails};

pub const PROGRESS_LISTING: &str = "progress";
pub const WORKOUTS_LISTING: &str = "workouts";
pub const GOALS_LISTING: &str = "goals";
pub const TRAINERS_LISTING: &str = "personal_trainers";

/// Shared state handed to every command.
pub struct AppState {
    pub store: Arc<ProgressStore>,
    pub listings: SnapshotCache,
    pub workout_submissions: MemoCache,
    pub goal_submissions: MemoCache,
    pub metrics: SubmissionMetrics,
}

impl AppState {
    /// Open the store and catalog named by `settings`.
    pub fn open(settings: &Settings) -> Result<Self> {
        let store = ProgressStore::open(&settings.data_file)?;
        let catalog = match &settings.catalog_file {
            Some(path) => load_catalog(path)
                .map_err(|e| TrackerError::Config(format!("Failed to load catalog {:?}: {:#}", path, e)))?,
            None => default_catalog(),
        };
        Ok(Self::new(store, catalog, settings.listing_ttl()))
    }

    pub fn new(store: ProgressStore, catalog: Catalog, listing_ttl: Duration) -> Self {
        let store = Arc::new(store);
        let catalog = Arc::new(catalog);

        let progress_source = Arc::clone(&store);
        let (workouts, goals, trainers) = (Arc::clone(&catalog), Arc::clone(&catalog), catalog);
        let listings = SnapshotCache::new(listing_ttl)
            .track(PROGRESS_LISTING, move || progress_source.snapshot())
            .track(WORKOUTS_LISTING, move || workouts.workouts.clone())
            .track(GOALS_LISTING, move || goals.goals.clone())
            .track(TRAINERS_LISTING, move || trainers.personal_trainers.clone());

        Self {
            store,
            listings,
            workout_submissions: MemoCache::new(),
            goal_submissions: MemoCache::new(),
            metrics: SubmissionMetrics::default(),
        }
    }

    pub fn data_file(&self) -> &Path {
        self.store.path()
    }
}

/// A decoded request.
#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    AddLog { user_id: String, plan: WorkoutPlan },
    UpdateLog { user_id: String, plan_id: String, exercises: Vec<Exercise> },
    AppendExercise { user_id: String, plan_id: String, exercise: Exercise },
    DeleteLog { user_id: String, plan_id: String },
    LastPlan { user_id: String },
    History { user_id: String },
    Suggest { user_id: String },
    ListProgress,
    ListWorkouts,
    ListGoals,
    ListPersonalTrainers,
    SubmitWorkoutData { payload: WorkoutDetails },
    SubmitUserGoals { payload: GoalsDetails },
    Metrics,
}

/// Outcome of one request. `body` is always valid JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

impl Response {
    pub fn ok(body: String) -> Self {
        Self { status: 200, body }
    }

    pub fn error(status: u16, message: &str) -> Self {
        Self {
            status,
            body: serde_json::json!({ "error": message }).to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == 200
    }

    /// One-line JSON envelope with the body embedded verbatim.
    pub fn to_line(&self) -> String {
        format!("{{\"status\":{},\"body\":{}}}", self.status, self.body)
    }
}

impl From<TrackerError> for Response {
    fn from(err: TrackerError) -> Self {
        let status = match err {
            TrackerError::NotFound { .. } => 404,
            TrackerError::Persist(_)
            | TrackerError::Serialization(_)
            | TrackerError::Config(_)
            | TrackerError::UnknownListing(_) => 500,
        };
        Response::error(status, &err.to_string())
    }
}

/// Decode one raw request and run it. Malformed input is a 400.
pub fn handle_line(state: &AppState, line: &str) -> Response {
    match serde_json::from_str::<Request>(line) {
        Ok(request) => dispatch(state, request),
        Err(e) => {
            warn!("Rejected malformed request: {}", e);
            Response::error(400, &format!("Invalid request: {}", e))
        }
    }
}

/// Run a decoded request against the core.
pub fn dispatch(state: &AppState, request: Request) -> Response {
    let result = match request {
        Request::AddLog { user_id, plan } => workouts::add_workout_log(state, &user_id, plan),
        Request::UpdateLog { user_id, plan_id, exercises } => {
            workouts::update_workout_log(state, &user_id, &plan_id, exercises)
        }
        Request::AppendExercise { user_id, plan_id, exercise } => {
            workouts::append_exercise(state, &user_id, &plan_id, exercise)
        }
        Request::DeleteLog { user_id, plan_id } => {
            workouts::delete_workout_log(state, &user_id, &plan_id)
        }
        Request::LastPlan { user_id } => workouts::get_last_plan(state, &user_id),
        Request::History { user_id } => workouts::get_history(state, &user_id),
        Request::Suggest { user_id } => workouts::suggest_workout_plan(state, &user_id),
        Request::ListProgress => listings::get_listing(state, PROGRESS_LISTING),
        Request::ListWorkouts => listings::get_listing(state, WORKOUTS_LISTING),
        Request::ListGoals => listings::get_listing(state, GOALS_LISTING),
        Request::ListPersonalTrainers => listings::get_listing(state, TRAINERS_LISTING),
        Request::SubmitWorkoutData { payload } => submissions::submit_workout_data(state, &payload),
        Request::SubmitUserGoals { payload } => submissions::submit_user_goals(state, &payload),
        Request::Metrics => submissions::get_metrics(state),
    };

    match result {
        Ok(body) => Response::ok(body),
        Err(e) => {
            info!("Request failed: {}", e);
            Response::from(e)
        }
    }
}
