//! Plain terminal output: startup block, status line, tier alerts.

use chrono::Local;
use shame_core::{format_active_time, progress, wrap_words, Monitor, ShameError, TickReport};
use std::io::{self, Write};

const RULE_WIDTH: usize = 43;
const BAR_WIDTH: usize = 24;
const ALERT_WRAP: usize = 39;

pub fn print_startup(monitor: &Monitor) {
    let state = monitor.state();
    let config = monitor.config();
    let mode = if monitor.is_dry_run() {
        "dry run"
    } else {
        "live -> webhook"
    };
    let fired = if state.fired_tiers.is_empty() {
        "none".to_string()
    } else {
        state
            .fired_tiers
            .iter()
            .map(|t| format!("{t}h"))
            .collect::<Vec<_>>()
            .join(", ")
    };

    println!();
    println!("  screen-shame");
    println!("  passive-aggressive screen monitor");
    println!("  {}", "-".repeat(RULE_WIDTH));
    println!("  mode      {mode}");
    println!("  active    {}", format_active_time(state.active_minutes));
    println!("  fired     {fired}");
    println!("  polling   every {}s", config.poll_interval_secs);
    println!("  idle >=   {}s counts as away", config.idle_cutoff_secs);
    println!("  {}", "-".repeat(RULE_WIDTH));
    println!();
}

pub fn print_tick(monitor: &Monitor, report: &TickReport) {
    if report.rolled_over {
        println!();
        log_line("New day - resetting counters");
    }

    for delivery in &report.deliveries {
        for line in tier_alert_lines(delivery.threshold, delivery.message, monitor.is_dry_run()) {
            println!("{line}");
        }
    }

    for threshold in &report.failed_tiers {
        println!();
        log_line(&format!("Failed to send tier {threshold}h - will retry"));
    }

    let line = status_line(monitor, report);
    print!("{line}\r");
    let _ = io::stdout().flush();
}

pub fn print_test_success() {
    println!();
    println!("  {}", "=".repeat(RULE_WIDTH));
    println!("    Test message sent!");
    println!("    Check your Slack DMs.");
    println!("  {}", "=".repeat(RULE_WIDTH));
    println!();
}

pub fn print_shutdown() {
    println!();
    println!("  {}", "-".repeat(RULE_WIDTH));
    println!("  screen-shame stopped.");
    println!("  Your eyes thank you.");
    println!("  {}", "-".repeat(RULE_WIDTH));
}

pub fn print_error(err: &ShameError) {
    eprintln!();
    eprintln!("  Error: {err}");
    if matches!(err, ShameError::MissingWebhook) {
        eprintln!("  Or use --dry-run to test without a webhook.");
    }
    eprintln!();
}

fn log_line(msg: &str) {
    println!("  {}  {}", Local::now().format("%H:%M:%S"), msg);
}

fn status_line(monitor: &Monitor, report: &TickReport) -> String {
    let minutes = monitor.state().active_minutes;
    let bar = progress_bar(minutes, monitor.tracker().thresholds(), BAR_WIDTH);
    let status = if report.active { "active" } else { "idle" };
    format!(
        "  {:>7}  {}  * {:<6}  idle {:.0}s",
        format_active_time(minutes),
        bar,
        status,
        report.idle_secs
    )
}

fn progress_bar(active_minutes: u64, thresholds: &[u32], width: usize) -> String {
    let p = progress(active_minutes, thresholds);
    match p.next {
        None => format!("{} MAX", "█".repeat(width)),
        Some(next) => {
            let filled = ((p.fraction * width as f64) as usize).min(width);
            format!(
                "{}{} {next}h",
                "█".repeat(filled),
                "░".repeat(width - filled)
            )
        }
    }
}

fn tier_alert_lines(threshold: u32, message: &str, dry_run: bool) -> Vec<String> {
    let label = if dry_run { "DRY RUN" } else { "SENT" };
    let mut lines = vec![
        String::new(),
        format!("  {}", "━".repeat(RULE_WIDTH)),
        format!("    TIER {threshold}h  [{label}]"),
        format!("  {}", "─".repeat(RULE_WIDTH)),
    ];
    lines.extend(
        wrap_words(message, ALERT_WRAP)
            .into_iter()
            .map(|line| format!("    {line}")),
    );
    lines.push(format!("  {}", "━".repeat(RULE_WIDTH)));
    lines.push(String::new());
    lines
}
