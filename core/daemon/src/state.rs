//! Relay-side evaluator state.
//!
//! The daemon owns exactly one reminder evaluator, armed with the system
//! notification channel only; the foreground client owns its toasts. The
//! evaluator's dedup tracker lives inside the loop thread and survives every
//! snapshot replacement; only a daemon restart resets it.

use crate::launcher::AppLauncher;
use crate::options::RelayOptions;
use chrono::Utc;
use diet_core::{
    AgentProbe, NotifySendNotifier, PermissionGate, ReminderEvaluator, ReminderLoop,
    SystemChannel, SystemClock,
};
use dietwatch_daemon_protocol::SnapshotMeal;
use serde::Serialize;
use std::sync::{Arc, Mutex};

pub struct RelayState {
    reminder_loop: ReminderLoop,
    armed_meals: Mutex<usize>,
    started_at: String,
}

#[derive(Debug, Serialize)]
pub struct RelayHealth {
    pub armed_meals: usize,
    pub started_at: String,
}

impl RelayState {
    pub fn new(opts: &RelayOptions) -> Self {
        let gate = PermissionGate::new(Box::new(AgentProbe {
            enabled_in_config: opts.notifications_enabled,
            agent_binary: opts.notify_binary.clone(),
        }));
        let notifier = NotifySendNotifier::new(opts.notify_binary.clone())
            .with_click_handler(Arc::new(AppLauncher::new(opts.open_command.clone())));
        let channel = SystemChannel::new(gate, notifier, opts.icon_path.clone());

        let evaluator =
            ReminderEvaluator::new(vec![Box::new(channel)], Box::new(SystemClock));

        Self {
            reminder_loop: ReminderLoop::spawn(evaluator),
            armed_meals: Mutex::new(0),
            started_at: Utc::now().to_rfc3339(),
        }
    }

    /// Last-write-wins snapshot replacement. An empty snapshot keeps the loop
    /// running; it simply finds nothing to match.
    pub fn apply_snapshot(&self, meals: Vec<SnapshotMeal>) {
        if let Ok(mut armed) = self.armed_meals.lock() {
            *armed = meals.len();
        }
        self.reminder_loop.replace_snapshot(meals);
    }

    pub fn health(&self) -> RelayHealth {
        RelayHealth {
            armed_meals: self.armed_meals.lock().map(|count| *count).unwrap_or(0),
            started_at: self.started_at.clone(),
        }
    }
}
