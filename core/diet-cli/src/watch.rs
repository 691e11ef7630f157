//! Foreground reminder watcher.
//!
//! Mirrors the daemon's evaluator with the in-app toast channel added: toasts
//! always fire, system notifications only with permission. The meal snapshot
//! is re-read from the store on a fixed cadence; when it changed, both the
//! local loop and the daemon receive the replacement. Dedup state survives
//! every replacement.

use crate::daemon_client;
use diet_core::{
    config, AgentProbe, ClientConfig, DeliveryChannel, MealStore, NotifySendNotifier,
    PermissionGate, ReminderEvaluator, ReminderLoop, Result, SystemChannel, SystemClock,
    ToastChannel,
};
use std::thread;
use std::time::Duration;

const STORE_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

pub fn run(user_id: &str, client_config: &ClientConfig) -> Result<()> {
    let store = MealStore::new(config::store_path()?)?;
    let mut snapshot = store.reminder_snapshot(user_id)?;

    if daemon_client::relay_enabled() {
        if let Err(err) = daemon_client::send_snapshot(&snapshot) {
            tracing::warn!(error = %err, "Daemon relay unavailable; reminders stay foreground-only");
        }
    }

    let gate = PermissionGate::new(Box::new(AgentProbe {
        enabled_in_config: client_config.notifications_enabled,
        agent_binary: client_config.notify_binary.clone(),
    }));
    let notifier = NotifySendNotifier::new(client_config.notify_binary.clone());
    let channels: Vec<Box<dyn DeliveryChannel>> = vec![
        Box::new(ToastChannel::stdout()),
        Box::new(SystemChannel::new(
            gate,
            notifier,
            client_config.icon_path.clone(),
        )),
    ];

    let mut evaluator = ReminderEvaluator::new(channels, Box::new(SystemClock));
    evaluator.replace_snapshot(snapshot.clone());
    let reminder_loop = ReminderLoop::spawn(evaluator);

    println!(
        "Watching {} meal(s) for {} - Ctrl-C to stop.",
        snapshot.len(),
        user_id
    );

    loop {
        thread::sleep(STORE_REFRESH_INTERVAL);
        match store.reminder_snapshot(user_id) {
            Ok(fresh) if fresh != snapshot => {
                println!("Meal list changed: now watching {} meal(s).", fresh.len());
                snapshot = fresh;
                reminder_loop.replace_snapshot(snapshot.clone());
                if daemon_client::relay_enabled() {
                    if let Err(err) = daemon_client::send_snapshot(&snapshot) {
                        tracing::warn!(error = %err, "Failed to relay updated snapshot to daemon");
                    }
                }
            }
            Ok(_) => {}
            Err(err) => tracing::warn!(error = %err, "Failed to refresh meal snapshot"),
        }
    }
}
