//! Converts idle samples into activity and tier crossings.
//!
//! The tracker is pure: it takes a [`DailyState`] and a sample and hands
//! back the new state plus the thresholds crossed on this tick. Persistence
//! and delivery belong to the caller.
//!
//! ```text
//! idle < cutoff  ->  credit seconds  ->  whole minutes into active_minutes
//! active_minutes >= tier * 60 && tier not fired  ->  newly crossed
//! ```

use crate::types::DailyState;

/// Seconds of credit per poll at the default one-minute interval.
pub const SECONDS_PER_MINUTE: u64 = 60;

#[derive(Debug, Clone)]
pub struct ThresholdTracker {
    thresholds: Vec<u32>,
    idle_cutoff_secs: f64,
}

impl ThresholdTracker {
    /// Thresholds are stored ascending and deduplicated regardless of input order.
    pub fn new(thresholds: &[u32], idle_cutoff_secs: f64) -> Self {
        let mut thresholds = thresholds.to_vec();
        thresholds.sort_unstable();
        thresholds.dedup();
        Self {
            thresholds,
            idle_cutoff_secs,
        }
    }

    pub fn thresholds(&self) -> &[u32] {
        &self.thresholds
    }

    pub fn idle_cutoff_secs(&self) -> f64 {
        self.idle_cutoff_secs
    }

    pub fn is_active(&self, idle_secs: f64) -> bool {
        idle_secs < self.idle_cutoff_secs
    }

    /// Credits `credit_secs` of activity when the sample counts as active.
    ///
    /// Returns whether the sample was active.
    pub fn accrue(&self, state: &mut DailyState, idle_secs: f64, credit_secs: u64) -> bool {
        if !self.is_active(idle_secs) {
            return false;
        }

        let total = state.carry_seconds.saturating_add(credit_secs);
        state.active_minutes = state
            .active_minutes
            .saturating_add(total / SECONDS_PER_MINUTE);
        state.carry_seconds = total % SECONDS_PER_MINUTE;
        true
    }

    /// Thresholds already reached but not yet fired, ascending.
    pub fn pending(&self, state: &DailyState) -> Vec<u32> {
        self.thresholds
            .iter()
            .copied()
            .filter(|&t| reached(state, t) && !state.has_fired(t))
            .collect()
    }

    pub fn mark_fired(&self, state: &mut DailyState, threshold: u32) {
        if !state.has_fired(threshold) {
            state.fired_tiers.push(threshold);
        }
    }

    /// One full tick: accrue, then fire every pending threshold.
    pub fn tick(
        &self,
        mut state: DailyState,
        idle_secs: f64,
        credit_secs: u64,
    ) -> (DailyState, Vec<u32>) {
        self.accrue(&mut state, idle_secs, credit_secs);
        let crossed = self.pending(&state);
        for &threshold in &crossed {
            self.mark_fired(&mut state, threshold);
        }
        (state, crossed)
    }

    /// The lowest threshold not yet reached, if any.
    pub fn next_threshold(&self, state: &DailyState) -> Option<u32> {
        self.thresholds.iter().copied().find(|&t| !reached(state, t))
    }
}

fn reached(state: &DailyState, threshold: u32) -> bool {
    state.active_minutes >= u64::from(threshold) * SECONDS_PER_MINUTE
}
