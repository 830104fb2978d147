//! Error types for shame-core operations.

use std::path::PathBuf;

/// All errors that can occur in shame-core operations.
///
/// Configuration variants are fatal at startup. Everything else is recovered
/// by the monitor loop: I/O falls back to fresh state, idle-query failures go
/// through the configured policy, and delivery failures are retried next tick.
#[derive(Debug, thiserror::Error)]
pub enum ShameError {
    // ─────────────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Home directory not found")]
    HomeDirNotFound,

    #[error("Configuration file malformed: {path}: {details}")]
    ConfigMalformed { path: PathBuf, details: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("No webhook configured: pass --webhook URL or set SCREEN_SHAME_WEBHOOK")]
    MissingWebhook,

    #[error("No messages available for the {0}h tier")]
    UnknownThreshold(u32),

    // ─────────────────────────────────────────────────────────────────────
    // I/O Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("I/O error: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    // ─────────────────────────────────────────────────────────────────────
    // Collaborator Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Idle time query failed: {0}")]
    IdleQuery(String),

    #[error("Webhook request failed: {0}")]
    NotifyTransport(String),

    #[error("Webhook returned HTTP {0}")]
    NotifyStatus(u16),
}

impl ShameError {
    /// True for errors that should stop the process before the loop starts.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ShameError::HomeDirNotFound
                | ShameError::ConfigMalformed { .. }
                | ShameError::InvalidConfig(_)
                | ShameError::MissingWebhook
                | ShameError::UnknownThreshold(_)
        )
    }
}

/// Convenience type alias for Results using ShameError.
pub type Result<T> = std::result::Result<T, ShameError>;
