//! File-backed persistence for the daily record.
//!
//! ## Design
//!
//! - **Atomic writes**: temp file in the same directory, then rename.
//! - **Graceful degradation**: missing, corrupt, or stale files load as a
//!   fresh record for today.
//! - **Single writer**: one monitor process owns the file.

use crate::error::{Result, ShameError};
use crate::types::DailyState;
use chrono::NaiveDate;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the record for `today`, or a fresh one if none is usable.
    pub fn load(&self, today: NaiveDate) -> DailyState {
        let content = match fs_err::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return DailyState::new(today);
            }
            Err(err) => {
                tracing::warn!(error = %err, "Failed to read state file; starting fresh");
                return DailyState::new(today);
            }
        };

        let state: DailyState = match serde_json::from_str(&content) {
            Ok(state) => state,
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    path = %self.path.display(),
                    "State file malformed; starting fresh"
                );
                return DailyState::new(today);
            }
        };

        if !state.is_for(today) {
            tracing::debug!(stored = %state.date, %today, "Stored state is from another day");
            return DailyState::new(today);
        }

        state
    }

    /// Persists `state` atomically.
    pub fn save(&self, state: &DailyState) -> Result<()> {
        let content = serde_json::to_string(state).map_err(|e| ShameError::Json {
            context: "serializing daily state".to_string(),
            source: e,
        })?;

        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        fs_err::create_dir_all(dir).map_err(|e| ShameError::Io {
            context: format!("creating {}", dir.display()),
            source: e,
        })?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| ShameError::Io {
            context: "creating temp state file".to_string(),
            source: e,
        })?;

        tmp.write_all(content.as_bytes())
            .and_then(|_| tmp.flush())
            .map_err(|e| ShameError::Io {
                context: "writing temp state file".to_string(),
                source: e,
            })?;

        tmp.persist(&self.path).map_err(|e| ShameError::Io {
            context: format!("persisting {}", self.path.display()),
            source: e.error,
        })?;

        Ok(())
    }
}
