//! Monitor configuration.
//!
//! Defaults match the classic behaviour: poll every 60s, five minutes of
//! no input counts as away, tiers at 2/4/6/8/10/12 hours. An optional
//! `config.toml` overrides any of them; the webhook URL can additionally
//! come from `SCREEN_SHAME_WEBHOOK` or `--webhook`.

use crate::error::{Result, ShameError};
use crate::messages::{default_thresholds, messages_for};
use crate::notify::DEFAULT_REQUEST_TIMEOUT;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const WEBHOOK_ENV: &str = "SCREEN_SHAME_WEBHOOK";

/// How much activity one active tick is worth.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AccrualMode {
    /// Exactly one poll interval per active tick.
    #[default]
    Interval,
    /// Wall-clock time since the previous tick, capped at two poll intervals.
    Elapsed,
}

/// What an idle query failure counts as.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IdleFailurePolicy {
    /// Treat the sample as zero idle seconds.
    #[default]
    AssumeActive,
    /// Treat the sample as exactly the idle cutoff.
    AssumeIdle,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct MonitorConfig {
    pub webhook_url: Option<String>,
    pub poll_interval_secs: u64,
    pub idle_cutoff_secs: f64,
    pub thresholds: Vec<u32>,
    pub request_timeout_secs: u64,
    pub accrual: AccrualMode,
    pub idle_failure: IdleFailurePolicy,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            poll_interval_secs: 60,
            idle_cutoff_secs: 300.0,
            thresholds: default_thresholds(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT.as_secs(),
            accrual: AccrualMode::default(),
            idle_failure: IdleFailurePolicy::default(),
        }
    }
}

impl MonitorConfig {
    /// Reads `path`, falling back to defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs_err::read_to_string(path).map_err(|e| ShameError::Io {
            context: format!("reading {}", path.display()),
            source: e,
        })?;

        let mut config: Self =
            toml::from_str(&content).map_err(|e| ShameError::ConfigMalformed {
                path: path.to_path_buf(),
                details: e.to_string(),
            })?;
        config.thresholds.sort_unstable();
        config.thresholds.dedup();
        Ok(config)
    }

    /// Applies the `--webhook` flag and the environment, flag first.
    pub fn with_webhook_override(mut self, flag: Option<String>, env: Option<String>) -> Self {
        let pick = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
        if let Some(url) = pick(flag).or_else(|| pick(env)) {
            self.webhook_url = Some(url);
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.poll_interval_secs == 0 {
            return Err(ShameError::InvalidConfig(
                "poll_interval_secs must be positive".to_string(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(ShameError::InvalidConfig(
                "request_timeout_secs must be positive".to_string(),
            ));
        }
        if !self.idle_cutoff_secs.is_finite() || self.idle_cutoff_secs <= 0.0 {
            return Err(ShameError::InvalidConfig(
                "idle_cutoff_secs must be a positive number".to_string(),
            ));
        }
        if self.thresholds.is_empty() {
            return Err(ShameError::InvalidConfig(
                "thresholds must not be empty".to_string(),
            ));
        }
        if let Some(&missing) = self
            .thresholds
            .iter()
            .find(|&&t| messages_for(t).is_none())
        {
            return Err(ShameError::UnknownThreshold(missing));
        }
        Ok(())
    }

    /// The webhook URL, required unless running dry.
    pub fn require_webhook(&self) -> Result<&str> {
        self.webhook_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or(ShameError::MissingWebhook)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
