//! Text helpers: active-time labels, alert payloads, progress, wrapping.

use chrono::NaiveTime;

/// Sent by `--test` to confirm the webhook works.
pub const TEST_MESSAGE: &str =
    ":wave: *screen-shame test* - If you're reading this, the roasting pipeline is operational.";

/// `2h 5m`, `3h`, or `45m`.
pub fn format_active_time(minutes: u64) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    match (hours, mins) {
        (0, m) => format!("{m}m"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h {m}m"),
    }
}

/// Slack-flavoured alert body for a tier crossing.
pub fn alert_text(active_minutes: u64, message: &str, sent_at: NaiveTime) -> String {
    format!(
        ":eyes: *Screen Time Alert - {}*\n\n{}\n\n_sent at {} by screen-shame_",
        format_active_time(active_minutes),
        message,
        sent_at.format("%I:%M %p")
    )
}

/// Where today's activity sits between two tiers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    /// The next tier to reach, or `None` once past the last one.
    pub next: Option<u32>,
    /// 0.0..=1.0 of the way from the previous tier to `next`.
    pub fraction: f64,
}

pub fn progress(active_minutes: u64, thresholds: &[u32]) -> Progress {
    let hours = active_minutes as f64 / 60.0;
    let Some(next) = thresholds.iter().copied().find(|&t| hours < f64::from(t)) else {
        return Progress {
            next: None,
            fraction: 1.0,
        };
    };

    let prev = thresholds
        .iter()
        .copied()
        .filter(|&t| t < next)
        .max()
        .unwrap_or(0);
    let span = f64::from(next - prev);
    let fraction = ((hours - f64::from(prev)) / span).clamp(0.0, 1.0);

    Progress {
        next: Some(next),
        fraction,
    }
}

/// Greedy word wrap; words longer than `width` get a line of their own.
pub fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if current.len() + 1 + word.len() <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    lines
}
