//! Delivery of alert text to the user.
//!
//! The webhook speaks the Slack Incoming Webhook dialect: a JSON body of
//! `{"text": "..."}`, and anything other than HTTP 200 counts as a failure.

use crate::error::{Result, ShameError};
use serde::Serialize;
use std::time::Duration;

/// Upper bound on one webhook request, connect through response.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub trait Notifier {
    fn send(&self, text: &str) -> Result<()>;

    /// True when nothing actually leaves the machine.
    fn is_dry_run(&self) -> bool {
        false
    }
}

#[derive(Serialize)]
struct WebhookPayload<'a> {
    text: &'a str,
}

/// Blocking HTTP client bound to one webhook URL.
pub struct WebhookNotifier {
    client: reqwest::blocking::Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ShameError::MissingWebhook);
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ShameError::InvalidConfig(format!("building HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Notifier for WebhookNotifier {
    fn send(&self, text: &str) -> Result<()> {
        let resp = self
            .client
            .post(&self.url)
            .json(&WebhookPayload { text })
            .send()
            // The webhook URL is the credential; keep it out of logs.
            .map_err(|e| ShameError::NotifyTransport(e.without_url().to_string()))?;

        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            return Err(ShameError::NotifyStatus(status.as_u16()));
        }

        tracing::debug!(bytes = text.len(), "Webhook accepted message");
        Ok(())
    }
}

/// Accepts every message without sending it anywhere.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunNotifier;

impl Notifier for DryRunNotifier {
    fn send(&self, text: &str) -> Result<()> {
        tracing::info!(text, "Dry run: message not sent");
        Ok(())
    }

    fn is_dry_run(&self) -> bool {
        true
    }
}
