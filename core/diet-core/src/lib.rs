//! # diet-core
//!
//! Core library for dietwatch, providing the meal store and the reminder
//! engine shared by the CLI client and the background daemon.
//!
//! ## Design Principles
//!
//! - **Synchronous**: No async runtime dependency. Hosting contexts own their
//!   threads; the reminder loop is a single dedicated thread per context.
//! - **One evaluator, two contexts**: the foreground client and the daemon
//!   instantiate the same [`evaluator::ReminderEvaluator`], differing only in
//!   delivery channels and snapshot source.
//! - **Graceful degradation**: a missing daemon, notification agent, or config
//!   file never breaks the toast path or the store.

pub mod clock;
pub mod config;
pub mod dedup;
pub mod delivery;
pub mod error;
pub mod evaluator;
pub mod matcher;
pub mod permission;
pub mod store;
pub mod types;

pub use clock::{Clock, SystemClock, WallInstant};
pub use config::{load_config, save_config, ClientConfig};
pub use dedup::{DedupTracker, ReminderKey};
pub use delivery::{
    ClickHandler, DeliveryChannel, MealReminder, NotificationAction, NotificationRequest,
    Notifier, NotifySendNotifier, SystemChannel, ToastChannel,
};
pub use error::{DietError, Result};
pub use evaluator::{ReminderEvaluator, ReminderLoop, TickSummary, POLL_INTERVAL};
pub use matcher::{format_time, is_due};
pub use permission::{AgentProbe, PermissionGate, PermissionProbe, PermissionState};
pub use store::{CheckInToggle, DayAdherence, MealStore};
pub use types::{CheckIn, Meal, MealItem, DAYS_OF_WEEK};
