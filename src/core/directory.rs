//! Directory existence checks with optional creation

use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Outcome of checking (and possibly creating) a directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DirectoryStatus {
    /// The directory was already there
    Exists,
    /// The directory was missing and has been created
    Created,
    /// The directory is missing and creation was not requested
    Missing,
    /// Creation was requested but failed
    CreateFailed { reason: String },
}

impl DirectoryStatus {
    /// `true` when the directory is usable after the call
    pub fn is_ok(&self) -> bool {
        matches!(self, DirectoryStatus::Exists | DirectoryStatus::Created)
    }

    /// Human-readable description for the given path
    pub fn message(&self, path: &Path) -> String {
        match self {
            DirectoryStatus::Exists => format!("Directory exists: {}", path.display()),
            DirectoryStatus::Created => format!("Created directory: {}", path.display()),
            DirectoryStatus::Missing => format!("Directory does not exist: {}", path.display()),
            DirectoryStatus::CreateFailed { reason } => {
                format!("Error creating directory {}: {}", path.display(), reason)
            }
        }
    }
}

/// Check that `path` is a directory, creating it (and any missing parents)
/// when `create_if_missing` is set.
///
/// Filesystem errors never escape; they are folded into
/// [`DirectoryStatus::CreateFailed`].
pub fn ensure_directory(path: &Path, create_if_missing: bool) -> DirectoryStatus {
    if path.is_dir() {
        debug!(path = %path.display(), "directory exists");
        return DirectoryStatus::Exists;
    }

    if !create_if_missing {
        let status = DirectoryStatus::Missing;
        warn!("{}", status.message(path));
        return status;
    }

    info!("Directory does not exist: {}. Creating it.", path.display());
    let status = match fs::create_dir_all(path) {
        Ok(()) => DirectoryStatus::Created,
        Err(e) => DirectoryStatus::CreateFailed { reason: e.to_string() },
    };

    match &status {
        DirectoryStatus::Created => info!("{}", status.message(path)),
        _ => warn!("{}", status.message(path)),
    }
    status
}

/// Boolean form of [`ensure_directory`]
///
/// # Returns
/// `true` if the directory exists or was created, `false` otherwise
pub fn check_directory_exists(path: &Path, create_if_missing: bool) -> bool {
    ensure_directory(path, create_if_missing).is_ok()
}
