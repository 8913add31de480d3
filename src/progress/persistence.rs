use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use super::types::UserProgress;

/// Read the whole progress collection from disk.
///
/// A missing file is not an error: it means nothing has been logged yet,
/// so an empty collection is returned.
pub fn load_progress(path: &Path) -> Result<Vec<UserProgress>> {
    if !path.exists() {
        info!("No progress file at {:?}, starting empty", path);
        return Ok(Vec::new());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read progress file {:?}", path))?;
    let users: Vec<UserProgress> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to decode progress file {:?}", path))?;

    debug!("Loaded {} user records from {:?}", users.len(), path);
    Ok(users)
}

/// Write the whole progress collection to disk atomically.
///
/// The JSON is written to a temp file in the target's directory and then
/// renamed over the target, so an interrupted write never leaves a partial file.
pub fn save_progress(users: &[UserProgress], path: &Path) -> Result<()> {
    let json = serde_json::to_vec(users).context("Failed to encode progress")?;

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)
        .with_context(|| format!("Failed to create data dir {:?}", parent))?;

    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(&json)?;
    temp.flush()?;
    temp.persist(path)
        .with_context(|| format!("Failed to replace progress file {:?}", path))?;

    debug!("Flushed {} user records to {:?}", users.len(), path);
    Ok(())
}
