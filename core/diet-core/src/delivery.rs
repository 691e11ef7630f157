//! Delivery channels: in-app toast and system notification.
//!
//! Channels are independent; a failure in one never blocks the other. Every
//! failure is reported to the caller, caught at the tick boundary, and never
//! retried.

use crate::error::{DietError, Result};
use crate::permission::{PermissionGate, PermissionState};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::Arc;
use std::thread;
use tracing::{debug, warn};

/// One reminder occurrence ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MealReminder {
    pub meal_id: String,
    pub name: String,
    /// Scheduled time truncated to `HH:MM`.
    pub time: String,
    /// Deterministic coalescing tag derived from the reminder key.
    pub tag: String,
}

pub trait DeliveryChannel: Send {
    fn name(&self) -> &'static str;
    fn deliver(&mut self, reminder: &MealReminder) -> Result<()>;
}

/// Fire-and-forget in-app toast written to a line sink. Always attempted,
/// never gated; a failed write is dropped by the evaluator.
pub struct ToastChannel {
    sink: Box<dyn Write + Send>,
}

impl ToastChannel {
    pub fn new(sink: Box<dyn Write + Send>) -> Self {
        Self { sink }
    }

    pub fn stdout() -> Self {
        Self::new(Box::new(std::io::stdout()))
    }
}

impl DeliveryChannel for ToastChannel {
    fn name(&self) -> &'static str {
        "toast"
    }

    fn deliver(&mut self, reminder: &MealReminder) -> Result<()> {
        writeln!(
            self.sink,
            "[{}] Time for {}! Don't forget to check it off.",
            reminder.time, reminder.name
        )
        .map_err(DietError::ToastFailed)?;
        self.sink.flush().map_err(DietError::ToastFailed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationAction {
    pub id: String,
    pub label: String,
}

/// Payload handed to the platform notifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    pub title: String,
    pub body: String,
    pub tag: String,
    pub icon: Option<PathBuf>,
    pub require_interaction: bool,
    pub actions: Vec<NotificationAction>,
}

pub trait Notifier: Send {
    fn show(&self, request: &NotificationRequest) -> Result<()>;
}

/// Invoked when the platform reports an interaction with a notification
/// action (e.g. the user clicked "Open app").
pub trait ClickHandler: Send + Sync {
    fn handle(&self, action_id: &str);
}

/// Platform notifier shelling out to a `notify-send`-compatible agent.
///
/// Dispatch spawns the agent and returns immediately; a reaper thread waits
/// for the child so the poll loop is never blocked. When a click handler is
/// configured, the agent is asked to report the chosen action on stdout.
pub struct NotifySendNotifier {
    binary: String,
    click_handler: Option<Arc<dyn ClickHandler>>,
}

impl NotifySendNotifier {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            click_handler: None,
        }
    }

    pub fn with_click_handler(mut self, handler: Arc<dyn ClickHandler>) -> Self {
        self.click_handler = Some(handler);
        self
    }
}

impl Notifier for NotifySendNotifier {
    fn show(&self, request: &NotificationRequest) -> Result<()> {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("--app-name").arg("dietwatch");
        if request.require_interaction {
            cmd.arg("--urgency").arg("critical");
        }
        if let Some(icon) = &request.icon {
            cmd.arg("--icon").arg(icon);
        }
        // Replace-by-tag so platforms coalesce a resend of the same occurrence.
        cmd.arg("--hint").arg(format!(
            "string:x-canonical-private-synchronous:{}",
            request.tag
        ));
        let watch_actions = self.click_handler.is_some() && !request.actions.is_empty();
        if watch_actions {
            cmd.arg("--wait");
            for action in &request.actions {
                cmd.arg(format!("--action={}={}", action.id, action.label));
            }
        }
        cmd.arg(&request.title).arg(&request.body);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());

        let child = cmd.spawn().map_err(|err| DietError::DispatchFailed {
            command: self.binary.clone(),
            details: err.to_string(),
        })?;

        debug!(tag = %request.tag, "System notification dispatched");

        let handler = self.click_handler.clone();
        thread::spawn(move || match child.wait_with_output() {
            Ok(output) => {
                let action = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if let (Some(handler), false) = (handler, action.is_empty()) {
                    handler.handle(&action);
                }
            }
            Err(err) => warn!(error = %err, "Failed to reap notification agent"),
        });

        Ok(())
    }
}

/// System notification channel, gated on notification permission. A gated
/// delivery is a successful no-op, not a failure.
pub struct SystemChannel<N: Notifier> {
    gate: PermissionGate,
    notifier: N,
    icon: Option<PathBuf>,
}

impl<N: Notifier> SystemChannel<N> {
    pub fn new(gate: PermissionGate, notifier: N, icon: Option<PathBuf>) -> Self {
        Self {
            gate,
            notifier,
            icon,
        }
    }
}

impl<N: Notifier> DeliveryChannel for SystemChannel<N> {
    fn name(&self) -> &'static str {
        "system"
    }

    fn deliver(&mut self, reminder: &MealReminder) -> Result<()> {
        if self.gate.ensure() != PermissionState::Granted {
            debug!(meal = %reminder.meal_id, "System channel gated; skipping");
            return Ok(());
        }

        let request = NotificationRequest {
            title: format!("Time for {}!", reminder.name),
            body: format!("It's {} - time to have your meal.", reminder.time),
            tag: reminder.tag.clone(),
            icon: self.icon.clone(),
            require_interaction: true,
            actions: vec![NotificationAction {
                id: "open".to_string(),
                label: "Open app".to_string(),
            }],
        };
        self.notifier.show(&request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permission::PermissionProbe;
    use std::sync::Mutex;

    struct FixedProbe(PermissionState);

    impl PermissionProbe for FixedProbe {
        fn request(&self) -> PermissionState {
            self.0
        }
    }

    #[derive(Clone, Default)]
    struct RecordingNotifier {
        shown: Arc<Mutex<Vec<NotificationRequest>>>,
    }

    impl Notifier for RecordingNotifier {
        fn show(&self, request: &NotificationRequest) -> Result<()> {
            self.shown.lock().expect("lock shown").push(request.clone());
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    struct SharedSink(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedSink {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().expect("lock sink").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn reminder() -> MealReminder {
        MealReminder {
            meal_id: "m1".to_string(),
            name: "Lunch".to_string(),
            time: "12:30".to_string(),
            tag: "meal-abc".to_string(),
        }
    }

    #[test]
    fn toast_carries_name_and_time() {
        let sink = SharedSink::default();
        let mut channel = ToastChannel::new(Box::new(sink.clone()));
        channel.deliver(&reminder()).expect("deliver toast");

        let written = String::from_utf8(sink.0.lock().expect("lock sink").clone()).expect("utf8");
        assert!(written.contains("Lunch"));
        assert!(written.contains("12:30"));
    }

    #[test]
    fn system_channel_fires_when_granted() {
        let notifier = RecordingNotifier::default();
        let gate = PermissionGate::new(Box::new(FixedProbe(PermissionState::Granted)));
        let mut channel = SystemChannel::new(gate, notifier.clone(), None);

        channel.deliver(&reminder()).expect("deliver");

        let shown = notifier.shown.lock().expect("lock shown");
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].tag, "meal-abc");
        assert!(shown[0].require_interaction);
        assert_eq!(shown[0].actions.len(), 1);
        assert_eq!(shown[0].actions[0].id, "open");
    }

    #[test]
    fn system_channel_is_a_no_op_when_denied() {
        let notifier = RecordingNotifier::default();
        let gate = PermissionGate::new(Box::new(FixedProbe(PermissionState::Denied)));
        let mut channel = SystemChannel::new(gate, notifier.clone(), None);

        for _ in 0..3 {
            channel.deliver(&reminder()).expect("gated deliver is ok");
        }

        assert!(notifier.shown.lock().expect("lock shown").is_empty());
    }
}
