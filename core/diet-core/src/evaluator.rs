//! The reminder evaluator and its poll loop.
//!
//! One evaluator per hosting context (foreground client, background daemon),
//! each owning its private snapshot, dedup tracker, and delivery channels.
//! The two contexts differ only in how they are composed; they are never
//! mutually deduplicated, so both may fire for the same due meal on their
//! respective channels.

use crate::clock::{Clock, WallInstant};
use crate::dedup::{DedupTracker, ReminderKey};
use crate::delivery::{DeliveryChannel, MealReminder};
use crate::matcher::{format_time, is_due};
use dietwatch_daemon_protocol::SnapshotMeal;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{debug, warn};

pub const POLL_INTERVAL: Duration = Duration::from_secs(30);

/// What one tick did, for logging and health reporting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickSummary {
    pub checked: usize,
    pub due: usize,
    pub delivered: usize,
    pub deduped: usize,
    pub failures: usize,
}

pub struct ReminderEvaluator {
    meals: Vec<SnapshotMeal>,
    dedup: DedupTracker,
    channels: Vec<Box<dyn DeliveryChannel>>,
    clock: Box<dyn Clock>,
}

impl ReminderEvaluator {
    pub fn new(channels: Vec<Box<dyn DeliveryChannel>>, clock: Box<dyn Clock>) -> Self {
        Self {
            meals: Vec::new(),
            dedup: DedupTracker::new(),
            channels,
            clock,
        }
    }

    /// Replaces the meal snapshot wholesale. Accumulated dedup state survives
    /// replacement; only a process restart resets it.
    pub fn replace_snapshot(&mut self, meals: Vec<SnapshotMeal>) {
        self.meals = meals;
    }

    pub fn meal_count(&self) -> usize {
        self.meals.len()
    }

    pub fn notified_count(&self) -> usize {
        self.dedup.len()
    }

    /// One evaluation pass: match every meal against the current minute and
    /// deliver each newly-due occurrence through every channel. Channel
    /// failures are caught here and never propagate to the timer.
    pub fn tick(&mut self) -> TickSummary {
        let now = WallInstant::of(self.clock.now_local());
        let mut summary = TickSummary {
            checked: self.meals.len(),
            ..TickSummary::default()
        };

        for meal in &self.meals {
            if !is_due(&now, meal) {
                continue;
            }
            summary.due += 1;

            let key = ReminderKey::new(&meal.id, &now.date_key);
            if !self.dedup.should_notify(&key) {
                summary.deduped += 1;
                continue;
            }

            let reminder = MealReminder {
                meal_id: meal.id.clone(),
                name: meal.name.clone(),
                time: format_time(&meal.scheduled_time).to_string(),
                tag: key.tag(),
            };
            // Mark before dispatch: a failed delivery is not retried.
            self.dedup.mark_notified(key);

            for channel in &mut self.channels {
                match channel.deliver(&reminder) {
                    Ok(()) => summary.delivered += 1,
                    Err(err) => {
                        summary.failures += 1;
                        warn!(
                            channel = channel.name(),
                            meal = %reminder.meal_id,
                            error = %err,
                            "Reminder delivery failed"
                        );
                    }
                }
            }
        }

        summary
    }
}

enum LoopCommand {
    ReplaceSnapshot(Vec<SnapshotMeal>),
    Shutdown,
}

/// Fixed-cadence poll loop hosting one evaluator on a dedicated thread.
///
/// The thread blocks on a command channel with the poll interval as timeout:
/// a timeout is a tick, a command is handled between ticks. Ticks are
/// strictly sequential by construction. Dropping the handle shuts the thread
/// down; no orphaned timers.
pub struct ReminderLoop {
    tx: Sender<LoopCommand>,
    handle: Option<JoinHandle<()>>,
}

impl ReminderLoop {
    pub fn spawn(evaluator: ReminderEvaluator) -> Self {
        Self::spawn_with_interval(evaluator, POLL_INTERVAL)
    }

    pub fn spawn_with_interval(mut evaluator: ReminderEvaluator, interval: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        let handle = std::thread::spawn(move || loop {
            match rx.recv_timeout(interval) {
                Ok(LoopCommand::ReplaceSnapshot(meals)) => {
                    debug!(meals = meals.len(), "Reminder snapshot replaced");
                    evaluator.replace_snapshot(meals);
                }
                Ok(LoopCommand::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
                Err(RecvTimeoutError::Timeout) => {
                    let summary = evaluator.tick();
                    if summary.due > 0 {
                        debug!(
                            due = summary.due,
                            delivered = summary.delivered,
                            deduped = summary.deduped,
                            failures = summary.failures,
                            "Reminder tick"
                        );
                    }
                }
            }
        });

        Self {
            tx,
            handle: Some(handle),
        }
    }

    /// Last-write-wins snapshot replacement; dedup state is untouched.
    pub fn replace_snapshot(&self, meals: Vec<SnapshotMeal>) {
        let _ = self.tx.send(LoopCommand::ReplaceSnapshot(meals));
    }
}

impl Drop for ReminderLoop {
    fn drop(&mut self) {
        let _ = self.tx.send(LoopCommand::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
