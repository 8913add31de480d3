use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Workout log not found: user '{user_id}', plan '{plan_id}'")]
    NotFound { user_id: String, plan_id: String },

    #[error("Persistence error: {0:#}")]
    Persist(anyhow::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Unknown listing: {0}")]
    UnknownListing(String),
}

impl TrackerError {
    pub(crate) fn not_found(user_id: &str, plan_id: &str) -> Self {
        Self::NotFound {
            user_id: user_id.to_string(),
            plan_id: plan_id.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TrackerError>;
