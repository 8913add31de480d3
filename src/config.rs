use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{Result, TrackerError};

pub const CONFIG_ENV: &str = "WORKOUT_TRACKER_CONFIG";
pub const DATA_FILE_ENV: &str = "WORKOUT_TRACKER_DATA_FILE";
pub const LISTING_TTL_ENV: &str = "WORKOUT_TRACKER_LISTING_TTL_SECS";

const DEFAULT_LISTING_TTL_SECS: u64 = 30;

/// Runtime settings. Every field has a default, so an empty TOML file is valid.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// JSON file holding every user's workout history
    pub data_file: PathBuf,
    /// Seconds a listing snapshot is served before being recomputed
    pub listing_ttl_secs: u64,
    /// Optional TOML catalog replacing the embedded one
    pub catalog_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            listing_ttl_secs: DEFAULT_LISTING_TTL_SECS,
            catalog_file: None,
        }
    }
}

impl Settings {
    /// Resolve settings from the process environment.
    pub fn load() -> Result<Self> {
        Self::resolve(|key| std::env::var(key).ok())
    }

    /// Resolve settings using `lookup` for environment values.
    pub fn resolve<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = match lookup(CONFIG_ENV) {
            Some(path) if Path::new(&path).exists() => Self::from_file(Path::new(&path))?,
            Some(path) => {
                warn!("Config file {} not found, using defaults", path);
                Self::default()
            }
            None => Self::default(),
        };
        settings.apply_overrides(lookup)?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| TrackerError::Config(format!("Failed to read {:?}: {}", path, e)))?;
        let settings: Settings = toml::from_str(&content)
            .map_err(|e| TrackerError::Config(format!("Invalid config {:?}: {}", path, e)))?;
        info!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(DATA_FILE_ENV).filter(|s| !s.is_empty()) {
            self.data_file = PathBuf::from(path);
        }
        if let Some(raw) = lookup(LISTING_TTL_ENV) {
            self.listing_ttl_secs = raw.trim().parse().map_err(|e| {
                TrackerError::Config(format!("{} must be a number of seconds: {}", LISTING_TTL_ENV, e))
            })?;
        }
        Ok(())
    }

    pub fn listing_ttl(&self) -> Duration {
        Duration::from_secs(self.listing_ttl_secs)
    }
}

fn default_data_file() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("workout-tracker").join("user_progress.json"))
        .unwrap_or_else(|| PathBuf::from("userProgress.json"))
}
