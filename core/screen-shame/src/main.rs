//! screen-shame: passive-aggressive screen time monitor.
//!
//! Polls idle time, accumulates active minutes for the day, and sends an
//! escalating webhook message the first time each hour tier is crossed.
//!
//! ## Modes
//!
//! - default: run forever, delivering alerts to the webhook
//! - `--dry-run`: run forever, printing alerts instead of sending them
//! - `--test`: send one test message and exit

mod logging;
mod render;

use clap::Parser;
use shame_core::{
    DryRunNotifier, Monitor, MonitorConfig, Notifier, ShameError, StateStore, StorageConfig,
    SystemClock, SystemIdleSource, WebhookNotifier, TEST_MESSAGE, WEBHOOK_ENV,
};
use std::env;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "screen-shame")]
#[command(about = "Passive-aggressive screen time monitor")]
#[command(version)]
#[command(after_help = "examples:
  screen-shame --dry-run              Run locally, print messages to terminal
  screen-shame --webhook URL          Run with Slack integration
  screen-shame --webhook URL --test   Send a test message and exit")]
struct Cli {
    /// Slack Incoming Webhook URL (falls back to SCREEN_SHAME_WEBHOOK)
    #[arg(long, value_name = "URL")]
    webhook: Option<String>,

    /// Print messages to the terminal instead of sending them
    #[arg(long)]
    dry_run: bool,

    /// Send a single test message and exit
    #[arg(long)]
    test: bool,

    /// Config file (default: ~/.screen-shame/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// State file (default: ~/.screen-shame/state.json)
    #[arg(long, value_name = "PATH")]
    state_file: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    let storage = match StorageConfig::from_home() {
        Ok(storage) => storage,
        Err(err) => {
            render::print_error(&err);
            std::process::exit(1);
        }
    };
    let dirs = storage.ensure_dirs();
    let logs_dir = dirs.is_ok().then(|| storage.logs_dir());
    let _logging_guard = logging::init(logs_dir.as_deref());
    if let Err(err) = dirs {
        tracing::warn!(error = %err, "Failed to create log directory; file logging disabled");
    }

    if let Err(err) = run(cli, &storage) {
        tracing::error!(error = %err, "screen-shame failed");
        render::print_error(&err);
        std::process::exit(1);
    }
}

fn run(cli: Cli, storage: &StorageConfig) -> Result<(), ShameError> {
    let config_path = cli.config.unwrap_or_else(|| storage.config_file());
    let config = load_config(&config_path, cli.webhook, env::var(WEBHOOK_ENV).ok())?;

    if cli.test {
        let notifier = WebhookNotifier::new(config.require_webhook()?, config.request_timeout())?;
        notifier.send(TEST_MESSAGE)?;
        render::print_test_success();
        return Ok(());
    }

    let notifier = build_notifier(&config, cli.dry_run)?;
    let state_path = cli.state_file.unwrap_or_else(|| storage.state_file());
    let mut monitor = Monitor::new(
        config,
        StateStore::new(state_path),
        Box::new(SystemIdleSource::default()),
        notifier,
        Box::new(SystemClock),
    );

    let shutdown = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&shutdown);
    if let Err(err) = ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst)) {
        tracing::warn!(error = %err, "Failed to install Ctrl-C handler");
    }

    render::print_startup(&monitor);
    monitor.run(&shutdown, render::print_tick);
    render::print_shutdown();

    Ok(())
}

/// Loads the config file, applies webhook overrides, and validates the result.
fn load_config(
    path: &Path,
    webhook_flag: Option<String>,
    webhook_env: Option<String>,
) -> Result<MonitorConfig, ShameError> {
    let config = MonitorConfig::load(path)?.with_webhook_override(webhook_flag, webhook_env);
    config.validate()?;
    Ok(config)
}

/// Dry runs never need a webhook; live runs fail without one.
fn build_notifier(config: &MonitorConfig, dry_run: bool) -> Result<Box<dyn Notifier>, ShameError> {
    if dry_run {
        return Ok(Box::new(DryRunNotifier));
    }
    Ok(Box::new(WebhookNotifier::new(
        config.require_webhook()?,
        config.request_timeout(),
    )?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn with_webhook(url: &str) -> MonitorConfig {
        MonitorConfig {
            webhook_url: Some(url.to_string()),
            ..MonitorConfig::default()
        }
    }

    #[test]
    fn live_run_without_webhook_is_a_startup_error() {
        let err = build_notifier(&MonitorConfig::default(), false)
            .err()
            .expect("missing webhook must fail");
        assert!(matches!(err, ShameError::MissingWebhook));
        assert!(err.is_config_error());
    }

    #[test]
    fn dry_run_needs_no_webhook() {
        let notifier = build_notifier(&MonitorConfig::default(), true).unwrap();
        assert!(notifier.is_dry_run());
    }

    #[test]
    fn dry_run_wins_over_configured_webhook() {
        let notifier = build_notifier(&with_webhook("https://hooks.example/x"), true).unwrap();
        assert!(notifier.is_dry_run());
    }

    #[test]
    fn live_run_with_webhook_sends_for_real() {
        let notifier = build_notifier(&with_webhook("https://hooks.example/x"), false).unwrap();
        assert!(!notifier.is_dry_run());
    }

    #[test]
    fn load_config_applies_flag_then_validates() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs_err::write(&path, "webhook_url = \"https://file\"\n").unwrap();

        let config = load_config(&path, Some("https://flag".into()), Some("https://env".into()))
            .unwrap();
        assert_eq!(config.webhook_url.as_deref(), Some("https://flag"));
    }

    #[test]
    fn load_config_rejects_zero_request_timeout() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs_err::write(&path, "request_timeout_secs = 0\n").unwrap();

        let err = load_config(&path, None, None).unwrap_err();
        assert!(matches!(err, ShameError::InvalidConfig(_)));
        assert!(err.is_config_error());
    }

    #[test]
    fn cli_parses_flags() {
        let cli = Cli::try_parse_from(["screen-shame", "--dry-run", "--webhook", "https://x"]).unwrap();
        assert!(cli.dry_run);
        assert!(!cli.test);
        assert_eq!(cli.webhook.as_deref(), Some("https://x"));
    }
}
