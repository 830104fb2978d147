//! The poll loop tying idle samples, the tracker, the store and delivery together.
//!
//! ## Per-tick protocol
//!
//! ```text
//! 1. date changed?        -> replace state with a fresh record for today
//! 2. sample idle time     -> on failure, apply IdleFailurePolicy
//! 3. accrue activity      -> AccrualMode decides the credit
//! 4. each pending tier    -> pick message, send; mark fired only on success
//! 5. persist              -> always, failures logged
//! ```
//!
//! A tier whose delivery failed stays pending and is retried on every later
//! tick until it goes through.

use crate::clock::Clock;
use crate::config::{AccrualMode, IdleFailurePolicy, MonitorConfig};
use crate::format::alert_text;
use crate::idle::IdleSource;
use crate::messages::MessagePicker;
use crate::notify::Notifier;
use crate::store::StateStore;
use crate::tracker::ThresholdTracker;
use crate::types::DailyState;
use chrono::NaiveDateTime;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

const SLEEP_SLICE: Duration = Duration::from_millis(200);

/// A tier alert that was accepted by the notifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    pub threshold: u32,
    pub message: &'static str,
    pub text: String,
}

/// What happened during one tick; drives the status line.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub idle_secs: f64,
    pub idle_query_failed: bool,
    pub active: bool,
    pub rolled_over: bool,
    pub deliveries: Vec<Delivery>,
    pub failed_tiers: Vec<u32>,
    pub saved: bool,
}

pub struct Monitor {
    config: MonitorConfig,
    tracker: ThresholdTracker,
    store: StateStore,
    idle: Box<dyn IdleSource>,
    notifier: Box<dyn Notifier>,
    clock: Box<dyn Clock>,
    picker: MessagePicker,
    state: DailyState,
    last_tick: Option<NaiveDateTime>,
}

impl Monitor {
    /// Builds a monitor and loads today's state from `store`.
    pub fn new(
        config: MonitorConfig,
        store: StateStore,
        idle: Box<dyn IdleSource>,
        notifier: Box<dyn Notifier>,
        clock: Box<dyn Clock>,
    ) -> Self {
        let tracker = ThresholdTracker::new(&config.thresholds, config.idle_cutoff_secs);
        let state = store.load(clock.today());
        debug!(
            active_minutes = state.active_minutes,
            fired = ?state.fired_tiers,
            "Loaded daily state"
        );

        Self {
            config,
            tracker,
            store,
            idle,
            notifier,
            clock,
            picker: MessagePicker::new(),
            state,
            last_tick: None,
        }
    }

    pub fn with_picker(mut self, picker: MessagePicker) -> Self {
        self.picker = picker;
        self
    }

    pub fn state(&self) -> &DailyState {
        &self.state
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn tracker(&self) -> &ThresholdTracker {
        &self.tracker
    }

    pub fn is_dry_run(&self) -> bool {
        self.notifier.is_dry_run()
    }

    /// Runs a single iteration of the loop, without sleeping.
    pub fn run_once(&mut self) -> TickReport {
        let now = self.clock.now();
        let today = now.date();

        let rolled_over = !self.state.is_for(today);
        if rolled_over {
            info!(previous = %self.state.date, %today, "New day, resetting counters");
            self.state = DailyState::new(today);
        }

        let (idle_secs, idle_query_failed) = self.sample_idle();
        let credit = self.credit_for(now);
        let active = self.tracker.accrue(&mut self.state, idle_secs, credit);

        let mut deliveries = Vec::new();
        let mut failed_tiers = Vec::new();
        for threshold in self.tracker.pending(&self.state) {
            let Some(message) = self.picker.pick(threshold) else {
                warn!(threshold, "No message for tier; leaving it unfired");
                failed_tiers.push(threshold);
                continue;
            };

            let text = alert_text(self.state.active_minutes, message, now.time());
            match self.notifier.send(&text) {
                Ok(()) => {
                    self.tracker.mark_fired(&mut self.state, threshold);
                    info!(
                        threshold,
                        active_minutes = self.state.active_minutes,
                        "Tier alert delivered"
                    );
                    deliveries.push(Delivery {
                        threshold,
                        message,
                        text,
                    });
                }
                Err(err) => {
                    warn!(threshold, error = %err, "Failed to send tier alert; will retry");
                    failed_tiers.push(threshold);
                }
            }
        }

        let saved = match self.store.save(&self.state) {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "Failed to persist state; will retry next tick");
                false
            }
        };

        self.last_tick = Some(now);

        TickReport {
            idle_secs,
            idle_query_failed,
            active,
            rolled_over,
            deliveries,
            failed_tiers,
            saved,
        }
    }

    /// Loops until `shutdown` is set, calling `on_tick` after every iteration.
    pub fn run<F>(&mut self, shutdown: &AtomicBool, mut on_tick: F)
    where
        F: FnMut(&Monitor, &TickReport),
    {
        info!(
            poll_secs = self.config.poll_interval_secs,
            idle_cutoff_secs = self.config.idle_cutoff_secs,
            dry_run = self.is_dry_run(),
            "Monitor started"
        );

        while !shutdown.load(Ordering::SeqCst) {
            let report = self.run_once();
            on_tick(self, &report);
            sleep_unless_shutdown(self.config.poll_interval(), shutdown);
        }

        info!(
            active_minutes = self.state.active_minutes,
            "Monitor stopped"
        );
    }

    fn sample_idle(&self) -> (f64, bool) {
        match self.idle.idle_seconds() {
            Ok(secs) => (secs, false),
            Err(err) => {
                let fallback = match self.config.idle_failure {
                    IdleFailurePolicy::AssumeActive => 0.0,
                    IdleFailurePolicy::AssumeIdle => self.config.idle_cutoff_secs,
                };
                warn!(
                    error = %err,
                    policy = ?self.config.idle_failure,
                    fallback,
                    "Idle query failed"
                );
                (fallback, true)
            }
        }
    }

    fn credit_for(&self, now: NaiveDateTime) -> u64 {
        let interval = self.config.poll_interval_secs;
        match (self.config.accrual, self.last_tick) {
            (AccrualMode::Interval, _) | (AccrualMode::Elapsed, None) => interval,
            (AccrualMode::Elapsed, Some(prev)) => {
                let elapsed = now.signed_duration_since(prev).num_seconds().max(0) as u64;
                elapsed.min(interval.saturating_mul(2))
            }
        }
    }
}

fn sleep_unless_shutdown(total: Duration, shutdown: &AtomicBool) {
    let mut remaining = total;
    while !remaining.is_zero() && !shutdown.load(Ordering::SeqCst) {
        let step = remaining.min(SLEEP_SLICE);
        thread::sleep(step);
        remaining = remaining.saturating_sub(step);
    }
}
