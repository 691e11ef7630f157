//! Time matcher: decides whether a meal reminder is due this minute.

use crate::clock::WallInstant;
use dietwatch_daemon_protocol::SnapshotMeal;

/// Truncates a stored `HH:MM[:SS]` time to minute granularity.
pub fn format_time(time: &str) -> &str {
    time.get(..5).unwrap_or(time)
}

/// A meal is due exactly when its weekday matches and its scheduled time,
/// seconds dropped, string-equals the current minute. The match window is the
/// single poll tick that observes that minute; a missed tick silently skips
/// the occurrence, with no catch-up.
pub fn is_due(now: &WallInstant, meal: &SnapshotMeal) -> bool {
    meal.day_of_week == now.weekday && format_time(&meal.scheduled_time) == now.hhmm
}
