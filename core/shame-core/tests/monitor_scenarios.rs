//! End-to-end scenarios for the poll loop: tier firing, retries, rollover and restarts.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use shame_core::{
    DailyState, IdleSource, ManualClock, MessagePicker, Monitor, MonitorConfig, Notifier, Result,
    ShameError, StateStore,
};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

// ─────────────────────────────────────────────────────────────────────────────
// Fakes
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
struct SettableIdle(Arc<Mutex<f64>>);

impl SettableIdle {
    fn new(secs: f64) -> Self {
        Self(Arc::new(Mutex::new(secs)))
    }

    fn set(&self, secs: f64) {
        *self.0.lock().unwrap() = secs;
    }
}

impl IdleSource for SettableIdle {
    fn idle_seconds(&self) -> Result<f64> {
        Ok(*self.0.lock().unwrap())
    }
}

#[derive(Clone, Default)]
struct FlakyNotifier {
    failures_left: Arc<Mutex<u32>>,
    sent: Arc<Mutex<Vec<String>>>,
}

impl FlakyNotifier {
    fn fail_next(&self, n: u32) {
        *self.failures_left.lock().unwrap() = n;
    }

    fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

impl Notifier for FlakyNotifier {
    fn send(&self, text: &str) -> Result<()> {
        let mut left = self.failures_left.lock().unwrap();
        if *left > 0 {
            *left -= 1;
            return Err(ShameError::NotifyStatus(503));
        }
        self.sent.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

struct Harness {
    _temp: TempDir,
    store: StateStore,
    clock: Arc<ManualClock>,
    idle: SettableIdle,
    notifier: FlakyNotifier,
}

impl Harness {
    fn new(start: NaiveDateTime) -> Self {
        let temp = TempDir::new().unwrap();
        let store = StateStore::new(temp.path().join("state.json"));
        Self {
            _temp: temp,
            store,
            clock: Arc::new(ManualClock::new(start)),
            idle: SettableIdle::new(0.0),
            notifier: FlakyNotifier::default(),
        }
    }

    fn monitor(&self) -> Monitor {
        Monitor::new(
            MonitorConfig::default(),
            self.store.clone(),
            Box::new(self.idle.clone()),
            Box::new(self.notifier.clone()),
            Box::new(Arc::clone(&self.clock)),
        )
        .with_picker(MessagePicker::with_seed(99))
    }
}

fn at(day: u32, hour: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, day)
        .unwrap()
        .and_hms_opt(hour, min, 0)
        .unwrap()
}

// ─────────────────────────────────────────────────────────────────────────────
// Scenarios
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn two_hours_active_fires_first_tier_on_the_120th_tick() {
    let h = Harness::new(at(18, 8, 0));
    let mut monitor = h.monitor();

    for tick in 1..=120 {
        let report = monitor.run_once();
        let fired: Vec<u32> = report.deliveries.iter().map(|d| d.threshold).collect();
        if tick == 120 {
            assert_eq!(fired, vec![2]);
        } else {
            assert!(fired.is_empty(), "tick {tick} fired {fired:?}");
        }
    }

    assert_eq!(monitor.state().active_minutes, 120);
    assert_eq!(monitor.state().fired_tiers, vec![2]);
    assert_eq!(h.notifier.sent_count(), 1);
}

#[test]
fn idle_tick_keeps_count_below_first_tier() {
    let h = Harness::new(at(18, 8, 0));
    let mut monitor = h.monitor();

    for _ in 0..119 {
        monitor.run_once();
    }
    h.idle.set(400.0);
    let report = monitor.run_once();

    assert!(!report.active);
    assert!(report.deliveries.is_empty());
    assert_eq!(monitor.state().active_minutes, 119);
    assert!(monitor.state().fired_tiers.is_empty());
}

#[test]
fn failed_delivery_is_retried_next_tick() {
    let h = Harness::new(at(18, 13, 0));
    let mut seeded = DailyState::new(at(18, 0, 0).date());
    seeded.active_minutes = 239;
    seeded.fired_tiers = vec![2];
    h.store.save(&seeded).unwrap();

    let mut monitor = h.monitor();
    h.notifier.fail_next(1);

    let first = monitor.run_once();
    assert_eq!(first.failed_tiers, vec![4]);
    assert!(first.deliveries.is_empty());
    assert_eq!(monitor.state().fired_tiers, vec![2]);
    assert_eq!(h.store.load(at(18, 0, 0).date()).fired_tiers, vec![2]);

    let second = monitor.run_once();
    assert!(second.failed_tiers.is_empty());
    assert_eq!(second.deliveries.len(), 1);
    assert_eq!(second.deliveries[0].threshold, 4);
    assert_eq!(monitor.state().fired_tiers, vec![2, 4]);
    assert_eq!(h.store.load(at(18, 0, 0).date()).fired_tiers, vec![2, 4]);
}

#[test]
fn one_failure_does_not_block_later_tiers() {
    let h = Harness::new(at(18, 20, 0));
    let mut seeded = DailyState::new(at(18, 0, 0).date());
    seeded.active_minutes = 6 * 60;
    h.store.save(&seeded).unwrap();

    let mut monitor = h.monitor();
    h.notifier.fail_next(1);
    let report = monitor.run_once();

    assert_eq!(report.failed_tiers, vec![2]);
    let fired: Vec<u32> = report.deliveries.iter().map(|d| d.threshold).collect();
    assert_eq!(fired, vec![4, 6]);
    assert_eq!(monitor.state().fired_tiers, vec![4, 6]);

    let retry = monitor.run_once();
    assert_eq!(retry.deliveries[0].threshold, 2);
    assert_eq!(monitor.state().fired_tiers, vec![4, 6, 2]);
}

#[test]
fn date_change_resets_before_sampling() {
    let h = Harness::new(at(18, 23, 59));
    let mut seeded = DailyState::new(at(18, 0, 0).date());
    seeded.active_minutes = 500;
    seeded.fired_tiers = vec![2, 4, 6, 8];
    h.store.save(&seeded).unwrap();

    let mut monitor = h.monitor();
    assert_eq!(monitor.state().active_minutes, 500);

    h.clock.advance(Duration::minutes(1));
    h.idle.set(1000.0);
    let report = monitor.run_once();

    assert!(report.rolled_over);
    assert_eq!(*monitor.state(), DailyState::new(at(19, 0, 0).date()));
    assert_eq!(h.store.load(at(19, 0, 0).date()), *monitor.state());
}

#[test]
fn tier_fires_again_after_rollover() {
    let h = Harness::new(at(18, 8, 0));
    let mut monitor = h.monitor();

    for _ in 0..120 {
        monitor.run_once();
    }
    assert_eq!(h.notifier.sent_count(), 1);

    h.clock.set(at(19, 8, 0));
    for _ in 0..120 {
        monitor.run_once();
    }

    assert_eq!(monitor.state().date, at(19, 0, 0).date());
    assert_eq!(monitor.state().fired_tiers, vec![2]);
    assert_eq!(h.notifier.sent_count(), 2);
}

#[test]
fn restart_resumes_counters_and_fires_passed_tiers_together() {
    let h = Harness::new(at(18, 18, 0));
    let mut seeded = DailyState::new(at(18, 0, 0).date());
    seeded.active_minutes = 5 * 60 + 59;
    h.store.save(&seeded).unwrap();

    let mut monitor = h.monitor();
    let report = monitor.run_once();

    let fired: Vec<u32> = report.deliveries.iter().map(|d| d.threshold).collect();
    assert_eq!(fired, vec![2, 4, 6]);
    assert_eq!(monitor.state().active_minutes, 6 * 60);

    drop(monitor);
    let resumed = h.monitor();
    assert_eq!(resumed.state().active_minutes, 6 * 60);
    assert_eq!(resumed.state().fired_tiers, vec![2, 4, 6]);
}

#[test]
fn yesterdays_file_is_ignored_on_startup() {
    let h = Harness::new(at(18, 9, 0));
    let mut stale = DailyState::new(at(17, 0, 0).date());
    stale.active_minutes = 700;
    stale.fired_tiers = vec![2, 4, 6, 8, 10];
    h.store.save(&stale).unwrap();

    let monitor = h.monitor();

    assert_eq!(*monitor.state(), DailyState::new(at(18, 0, 0).date()));
}
