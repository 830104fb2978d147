//! # shame-core
//!
//! Core library for screen-shame: counts active minutes over a local day and
//! sends an escalating alert the first time each hour tier is reached.
//!
//! ## Design Principles
//!
//! - **Synchronous**: No async runtime. One tick finishes before the next starts.
//! - **Pure core**: [`ThresholdTracker`] never touches disk or network.
//! - **Graceful degradation**: Missing or corrupt state loads as a fresh day.
//! - **Seams as traits**: [`IdleSource`], [`Notifier`] and [`Clock`] are
//!   injected so the loop can be driven deterministically in tests.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use shame_core::*;
//!
//! let storage = StorageConfig::from_home()?;
//! let config = MonitorConfig::load(&storage.config_file())?;
//! let mut monitor = Monitor::new(
//!     config,
//!     StateStore::new(storage.state_file()),
//!     Box::new(SystemIdleSource::default()),
//!     Box::new(DryRunNotifier),
//!     Box::new(SystemClock),
//! );
//! let report = monitor.run_once();
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod format;
pub mod idle;
pub mod messages;
pub mod monitor;
pub mod notify;
pub mod storage;
pub mod store;
pub mod tracker;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{AccrualMode, IdleFailurePolicy, MonitorConfig, WEBHOOK_ENV};
pub use error::{Result, ShameError};
pub use format::{alert_text, format_active_time, progress, wrap_words, Progress, TEST_MESSAGE};
pub use idle::{IdleSource, IoregIdleSource, SystemIdleSource, UnsupportedIdleSource, XprintidleSource};
pub use messages::{default_thresholds, messages_for, MessagePicker, MESSAGE_BANK};
pub use monitor::{Delivery, Monitor, TickReport};
pub use notify::{DryRunNotifier, Notifier, WebhookNotifier, DEFAULT_REQUEST_TIMEOUT};
pub use storage::StorageConfig;
pub use store::StateStore;
pub use tracker::ThresholdTracker;
pub use types::DailyState;
