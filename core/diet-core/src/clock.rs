//! Local-time reads behind a trait so tests can pin the instant.
//!
//! The reminder engine only ever looks at the host's local clock; there is no
//! timezone handling beyond that.

use chrono::{Datelike, Local, NaiveDateTime, Timelike};

/// Source of "now" for an evaluator instance.
pub trait Clock: Send {
    fn now_local(&self) -> NaiveDateTime;
}

/// Production clock reading the host's local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_local(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A single observation of the wall clock, pre-formatted the way the matcher
/// compares it: minute-granularity time string, weekday index, and the literal
/// calendar-day string used in reminder keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WallInstant {
    /// `HH:MM`, zero-padded.
    pub hhmm: String,
    /// 0 = Sunday .. 6 = Saturday.
    pub weekday: u8,
    /// `YYYY-MM-DD`.
    pub date_key: String,
}

impl WallInstant {
    pub fn of(now: NaiveDateTime) -> Self {
        Self {
            hhmm: format!("{:02}:{:02}", now.hour(), now.minute()),
            weekday: now.weekday().num_days_from_sunday() as u8,
            date_key: now.date().format("%Y-%m-%d").to_string(),
        }
    }
}
