//! Read-only catalog of workouts, goals and personal trainers.
//!
//! Provides two loading methods:
//! - `default_catalog()` - Seed data embedded in the binary
//! - `load_catalog(path)` - Replacement data from a TOML file

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Seed catalog embedded at compile time from `config/catalog.toml`.
const DEFAULT_CATALOG: &str = include_str!("../config/catalog.toml");

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub workouts: Vec<Workout>,
    #[serde(default)]
    pub goals: Vec<Goal>,
    #[serde(default)]
    pub personal_trainers: Vec<PersonalTrainer>,
}

/// A template routine, distinct from a user's logged `WorkoutPlan`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Workout {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub exercises: Vec<CatalogExercise>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogExercise {
    pub name: String,
    pub description: String,
    pub reps: u32,
    pub sets: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Goal {
    pub id: String,
    #[serde(rename = "userId", alias = "user_id")]
    pub user_id: String,
    pub details: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersonalTrainer {
    pub id: String,
    pub name: String,
    pub speciality: String,
}

/// Load a catalog from a TOML file.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let content = std::fs::read_to_string(path)?;
    let catalog: Catalog = toml::from_str(&content)?;
    Ok(catalog)
}

/// The catalog embedded in the binary.
///
/// # Panics
/// Panics if the embedded TOML is invalid (a build-time bug).
pub fn default_catalog() -> Catalog {
    toml::from_str(DEFAULT_CATALOG).expect("embedded catalog.toml must be valid TOML")
}
