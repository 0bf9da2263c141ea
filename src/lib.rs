//! # dayline
//!
//! Core library for a single-user daily activity tracker: log short-text
//! activities for the current day, mark them complete, and browse a read-only
//! history grouped by local calendar day.
//!
//! Two components cooperate over one durable record store:
//! - [`DayClock`] owns the notion of "current local day", detects midnight
//!   rollovers (platform signals, resume-from-suspend, a periodic backstop),
//!   and emits a transient refresh pulse consumers key off of.
//! - [`ActivityStore`] holds the activity records over a [`RecordStore`]
//!   backend and answers the two query shapes: today's active list and the
//!   full history bucketed by creation day.
//!
//! The presentation layer re-runs `query_today`/`query_history` after any
//! mutation commits and after any day clock pulse; there is no implicit live
//! binding.
//!
//! ## Example
//!
//! ```rust
//! use dayline::{ActivityStore, DayClock, MemoryStore};
//!
//! let mut store = ActivityStore::open(MemoryStore::new()).expect("open store");
//! let mut day_clock = DayClock::new();
//!
//! let milk = store.add("Buy milk").expect("add");
//! store.toggle_completion(milk.id).expect("toggle");
//! store.clear_completed(day_clock.current_day()).expect("clear");
//!
//! assert!(store.query_today(day_clock.current_day()).is_empty());
//! assert_eq!(store.query_history().len(), 1);
//! day_clock.shutdown();
//! ```

pub use day_clock::{DayClock, DayClockEvent, SubscriptionId, SystemClock, WallClock};
pub use domain::{day_label, Activity, DayDetail, DaySummary};
pub use error::{Error, Result};
pub use persistence::{JsonFileStore, MemoryStore, RecordStore};
pub use store::ActivityStore;

pub mod day_clock;
pub mod domain;
pub mod error;
pub mod logging;
pub mod persistence;
pub mod store;
