//! Storage configuration and path management for screen-shame.
//!
//! Production code uses `StorageConfig::from_home()`, which points at
//! `~/.screen-shame/`. Tests use `StorageConfig::with_root(temp_dir)`.

use crate::error::{Result, ShameError};
use std::path::{Path, PathBuf};

const ROOT_DIR: &str = ".screen-shame";

/// Central configuration for all screen-shame storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    root: PathBuf,
}

impl StorageConfig {
    /// Resolves `~/.screen-shame`.
    pub fn from_home() -> Result<Self> {
        let home = dirs::home_dir().ok_or(ShameError::HomeDirNotFound)?;
        Ok(Self {
            root: home.join(ROOT_DIR),
        })
    }

    /// Creates a StorageConfig with a custom root directory.
    pub fn with_root(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path to state.json (today's counters).
    pub fn state_file(&self) -> PathBuf {
        self.root.join("state.json")
    }

    /// Path to config.toml (optional user overrides).
    pub fn config_file(&self) -> PathBuf {
        self.root.join("config.toml")
    }

    /// Path to logs/ directory (rolling log files).
    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }

    /// Ensures the root and logs directories exist.
    pub fn ensure_dirs(&self) -> Result<()> {
        for dir in [self.root.clone(), self.logs_dir()] {
            fs_err::create_dir_all(&dir).map_err(|e| ShameError::Io {
                context: format!("creating {}", dir.display()),
                source: e,
            })?;
        }
        Ok(())
    }
}
