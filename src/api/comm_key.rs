//! Discovery of the communication key the game writes on startup.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::api::error::ApiError;
use crate::config::home_dir;
use crate::constants::{COMM_KEY_RELATIVE_PATHS, ERROR_COMM_KEY_NOT_FOUND};

/// Files that may hold the key, in lookup order.
///
/// An explicitly configured path comes first, followed by the game's
/// default locations under the user's home directory.
pub fn candidate_paths(explicit: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(path) = explicit {
        candidates.push(path.to_path_buf());
    }
    if let Some(home) = home_dir() {
        candidates.extend(COMM_KEY_RELATIVE_PATHS.iter().map(|rel| home.join(rel)));
    }
    candidates
}

/// Read the key from the first candidate file that exists.
pub fn read_comm_key_from(candidates: &[PathBuf]) -> Result<String, ApiError> {
    for path in candidates {
        match fs::read_to_string(path) {
            Ok(content) => {
                let key = content.trim();
                if key.is_empty() {
                    warn!("Communication key file {} is empty, skipping", path.display());
                    continue;
                }
                debug!("Using communication key from {}", path.display());
                return Ok(key.to_string());
            }
            Err(e) if e.kind() == ErrorKind::NotFound => continue,
            Err(e) if e.kind() == ErrorKind::PermissionDenied => {
                return Err(ApiError::CommKey(format!(
                    "Permission denied for {}: {}",
                    path.display(),
                    e
                )));
            }
            Err(e) => {
                return Err(ApiError::CommKey(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )));
            }
        }
    }

    Err(ApiError::CommKey(ERROR_COMM_KEY_NOT_FOUND.to_string()))
}

pub fn read_comm_key(explicit: Option<&Path>) -> Result<String, ApiError> {
    read_comm_key_from(&candidate_paths(explicit))
}
