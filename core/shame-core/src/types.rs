//! The persisted daily record.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Accumulated activity for one local calendar day.
///
/// `fired_tiers` is append-only and `active_minutes` only grows while `date`
/// stays the same. A new day never merges with the old one: callers replace
/// the whole record with [`DailyState::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyState {
    pub date: NaiveDate,
    #[serde(default)]
    pub active_minutes: u64,
    #[serde(default)]
    pub fired_tiers: Vec<u32>,
    /// Activity credit below one minute, carried into the next tick.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub carry_seconds: u64,
}

fn is_zero(value: &u64) -> bool {
    *value == 0
}

impl DailyState {
    /// A zeroed record for `date`.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            active_minutes: 0,
            fired_tiers: Vec::new(),
            carry_seconds: 0,
        }
    }

    pub fn is_for(&self, date: NaiveDate) -> bool {
        self.date == date
    }

    pub fn has_fired(&self, threshold: u32) -> bool {
        self.fired_tiers.contains(&threshold)
    }

    /// Active time in fractional hours.
    pub fn active_hours(&self) -> f64 {
        self.active_minutes as f64 / 60.0
    }
}
