use super::AppState;
use crate::error::{Result, TrackerError};

/// Serve a cached listing blob verbatim.
pub fn get_listing(state: &AppState, name: &str) -> Result<String> {
    state
        .listings
        .get(name)?
        .map(|blob| blob.to_string())
        .ok_or_else(|| TrackerError::UnknownListing(name.to_string()))
}
