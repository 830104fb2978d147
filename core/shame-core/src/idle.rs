//! Seconds since the last keyboard or mouse input.
//!
//! Each platform answers through a system command; parsing is separated from
//! process spawning so it can be tested without the platform present.
//!
//! | Platform | Command                          | Unit         |
//! |----------|----------------------------------|--------------|
//! | macOS    | `ioreg -c IOHIDSystem -d 4`      | nanoseconds  |
//! | Linux    | `xprintidle`                     | milliseconds |

use crate::error::{Result, ShameError};
use std::process::Command;

pub trait IdleSource {
    fn idle_seconds(&self) -> Result<f64>;
}

/// Reads `HIDIdleTime` from the IOKit registry.
#[derive(Debug, Default, Clone, Copy)]
pub struct IoregIdleSource;

impl IdleSource for IoregIdleSource {
    fn idle_seconds(&self) -> Result<f64> {
        let output = run_command("ioreg", &["-c", "IOHIDSystem", "-d", "4"])?;
        parse_ioreg(&output)
            .ok_or_else(|| ShameError::IdleQuery("HIDIdleTime not found in ioreg output".into()))
    }
}

/// Reads idle milliseconds from the X11 screensaver extension via `xprintidle`.
#[derive(Debug, Default, Clone, Copy)]
pub struct XprintidleSource;

impl IdleSource for XprintidleSource {
    fn idle_seconds(&self) -> Result<f64> {
        let output = run_command("xprintidle", &[])?;
        parse_xprintidle(&output)
            .ok_or_else(|| ShameError::IdleQuery(format!("unexpected xprintidle output: {output:?}")))
    }
}

/// Platforms with no idle query; every sample is an error.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedIdleSource;

impl IdleSource for UnsupportedIdleSource {
    fn idle_seconds(&self) -> Result<f64> {
        Err(ShameError::IdleQuery(format!(
            "idle detection is not supported on {}",
            std::env::consts::OS
        )))
    }
}

#[cfg(target_os = "macos")]
pub type SystemIdleSource = IoregIdleSource;

#[cfg(target_os = "linux")]
pub type SystemIdleSource = XprintidleSource;

#[cfg(not(any(target_os = "macos", target_os = "linux")))]
pub type SystemIdleSource = UnsupportedIdleSource;

fn run_command(program: &str, args: &[&str]) -> Result<String> {
    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|e| ShameError::IdleQuery(format!("{program}: {e}")))?;

    if !output.status.success() {
        return Err(ShameError::IdleQuery(format!(
            "{program} exited with {}",
            output.status
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Extracts `"HIDIdleTime" = <ns>` and converts to seconds.
///
/// Sibling keys such as `HIDIdleTimeDelta` are ignored.
pub fn parse_ioreg(output: &str) -> Option<f64> {
    output
        .lines()
        .find_map(|line| {
            let (key, value) = line.split_once('=')?;
            if !key.trim_end().ends_with("\"HIDIdleTime\"") {
                return None;
            }
            value.trim().parse::<u64>().ok()
        })
        .map(|nanos| nanos as f64 / 1_000_000_000.0)
}

pub fn parse_xprintidle(output: &str) -> Option<f64> {
    let millis: u64 = output.trim().parse().ok()?;
    Some(millis as f64 / 1_000.0)
}
