//! Once-per-meal-per-day delivery guard.

use std::collections::HashSet;

/// Composite identity of one reminder occurrence: a meal on a calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReminderKey {
    meal_id: String,
    date_key: String,
}

impl ReminderKey {
    pub fn new(meal_id: &str, date_key: &str) -> Self {
        Self {
            meal_id: meal_id.to_string(),
            date_key: date_key.to_string(),
        }
    }

    /// Deterministic platform-coalescing tag for this occurrence. Platforms
    /// that collapse notifications by tag treat a resend as a no-op, which is
    /// a second dedup layer beneath the tracker.
    pub fn tag(&self) -> String {
        let digest = md5::compute(format!("{}-{}", self.meal_id, self.date_key));
        format!("meal-{:x}", digest)
    }
}

/// Tracks which reminder occurrences have already been notified through this
/// evaluator instance. Membership is the sole guard: once marked, a key is
/// never unmarked for the lifetime of the tracker. The tracker is
/// process-scoped and rebuilt empty on restart, so a restart can repeat a
/// same-day reminder if the match window recurs; accepted limitation.
#[derive(Debug, Default)]
pub struct DedupTracker {
    notified: HashSet<ReminderKey>,
}

impl DedupTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn should_notify(&self, key: &ReminderKey) -> bool {
        !self.notified.contains(key)
    }

    pub fn mark_notified(&mut self, key: ReminderKey) {
        self.notified.insert(key);
    }

    pub fn len(&self) -> usize {
        self.notified.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notified.is_empty()
    }
}
