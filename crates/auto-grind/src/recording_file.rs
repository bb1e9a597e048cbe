//! Recording persistence.
//!
//! Recordings are stored one per TOML file under the data directory's
//! `recordings/` folder and written with the same temp-file-and-rename
//! pattern as the config.

use crate::{AppError, AppResult};

use auto_grind_core::Recording;

use std::{
    fs,
    io::Write,
    panic::Location,
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

const FORMAT_VERSION: u32 = 1;
const FILE_PREFIX: &str = "recording-";
const FILE_EXTENSION: &str = "toml";

/// On-disk envelope around a [`Recording`].
#[derive(Debug, Serialize, Deserialize)]
struct RecordingDocument {
    format_version: u32,
    id: Uuid,
    recording: Recording,
}

/// Reads and writes recordings in one directory.
#[derive(Debug, Clone)]
pub struct RecordingFile {
    dir: PathBuf,
}

impl RecordingFile {
    /// Store rooted at `dir`. The directory must exist.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory recordings are written to.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `recording` to a new file and return its path.
    #[track_caller]
    #[instrument(skip(self, recording), fields(event_count = recording.len()))]
    pub fn save(&self, recording: &Recording) -> AppResult<PathBuf> {
        let document = RecordingDocument {
            format_version: FORMAT_VERSION,
            id: Uuid::new_v4(),
            recording: recording.clone(),
        };

        let contents =
            toml::to_string(&document).map_err(|e| AppError::PersistenceError {
                reason: format!("Failed to serialize recording: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        let path = self.dir.join(format!(
            "{FILE_PREFIX}{secs}-{}.{FILE_EXTENSION}",
            document.id
        ));
        let temp_path = path.with_extension("toml.tmp");

        let mut temp_file = fs::File::create(&temp_path).map_err(|e| AppError::PersistenceError {
            reason: format!("Failed to create temp recording file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        temp_file
            .write_all(contents.as_bytes())
            .map_err(|e| AppError::PersistenceError {
                reason: format!("Failed to write temp recording file: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        temp_file.sync_all().map_err(|e| AppError::PersistenceError {
            reason: format!("Failed to sync temp recording file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        fs::rename(&temp_path, &path).map_err(|e| AppError::PersistenceError {
            reason: format!("Failed to rename temp recording to final: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(path = ?path, id = %document.id, "Recording saved (atomic write)");

        Ok(path)
    }

    /// Read a recording file.
    ///
    /// Files whose events are out of order are rejected rather than replayed.
    #[track_caller]
    #[instrument]
    pub fn load(path: &Path) -> AppResult<Recording> {
        let contents = fs::read_to_string(path).map_err(|e| AppError::PersistenceError {
            reason: format!("Failed to read recording {:?}: {}", path, e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let document: RecordingDocument =
            toml::from_str(&contents).map_err(|e| AppError::PersistenceError {
                reason: format!("Failed to parse recording {:?}: {}", path, e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        if document.format_version != FORMAT_VERSION {
            return Err(AppError::PersistenceError {
                reason: format!(
                    "Unsupported recording format version {} in {:?}",
                    document.format_version, path
                ),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if !document.recording.is_ordered() {
            return Err(AppError::PersistenceError {
                reason: format!("Recording {:?} has out-of-order timestamps", path),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        debug!(id = %document.id, event_count = document.recording.len(), "Recording loaded");

        Ok(document.recording)
    }

    /// Newest recording file in the directory, by modification time.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn latest(&self) -> AppResult<Option<PathBuf>> {
        let mut newest: Option<(SystemTime, PathBuf)> = None;

        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();
            if !is_recording_file(&path) {
                continue;
            }

            let modified = match entry.metadata().and_then(|m| m.modified()) {
                Ok(modified) => modified,
                Err(e) => {
                    warn!(path = ?path, error = %e, "Skipping recording without mtime");
                    continue;
                }
            };

            if newest.as_ref().is_none_or(|(t, _)| modified > *t) {
                newest = Some((modified, path));
            }
        }

        Ok(newest.map(|(_, path)| path))
    }
}

fn is_recording_file(path: &Path) -> bool {
    let named = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with(FILE_PREFIX));
    let toml = path.extension().is_some_and(|e| e == FILE_EXTENSION);
    named && toml
}
