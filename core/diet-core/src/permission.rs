//! Notification permission gate.
//!
//! The system channel is gated on an authorization probe that runs at most
//! once per process lifetime; the toast channel is never gated.

use std::process::Command;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionState {
    Granted,
    Denied,
    Undetermined,
}

/// One-shot authorization request. Implementations may block on external
/// input; the gate guarantees they are invoked at most once.
pub trait PermissionProbe: Send {
    fn request(&self) -> PermissionState;
}

/// Default probe: user consent from configuration, plus a working
/// notification agent on the host. Either missing means Denied.
#[derive(Debug, Clone)]
pub struct AgentProbe {
    pub enabled_in_config: bool,
    pub agent_binary: String,
}

impl PermissionProbe for AgentProbe {
    fn request(&self) -> PermissionState {
        if !self.enabled_in_config {
            debug!("Notifications disabled in config");
            return PermissionState::Denied;
        }
        match Command::new(&self.agent_binary).arg("--version").output() {
            Ok(output) if output.status.success() => PermissionState::Granted,
            Ok(_) | Err(_) => {
                debug!(agent = %self.agent_binary, "Notification agent unavailable");
                PermissionState::Denied
            }
        }
    }
}

/// Caches the probe result for the remainder of the process. Transitions only
/// Undetermined -> Granted or Undetermined -> Denied; `ensure` never probes a
/// second time.
pub struct PermissionGate {
    probed: bool,
    state: PermissionState,
    probe: Box<dyn PermissionProbe>,
}

impl PermissionGate {
    pub fn new(probe: Box<dyn PermissionProbe>) -> Self {
        Self {
            probed: false,
            state: PermissionState::Undetermined,
            probe,
        }
    }

    /// Idempotent: probes on first call, returns the cached state afterwards.
    pub fn ensure(&mut self) -> PermissionState {
        if !self.probed {
            self.probed = true;
            self.state = self.probe.request();
        }
        self.state
    }

    pub fn state(&self) -> PermissionState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingProbe {
        result: PermissionState,
        calls: Arc<AtomicUsize>,
    }

    impl PermissionProbe for CountingProbe {
        fn request(&self) -> PermissionState {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result
        }
    }

    #[test]
    fn probes_exactly_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut gate = PermissionGate::new(Box::new(CountingProbe {
            result: PermissionState::Granted,
            calls: Arc::clone(&calls),
        }));

        assert_eq!(gate.state(), PermissionState::Undetermined);
        assert_eq!(gate.ensure(), PermissionState::Granted);
        assert_eq!(gate.ensure(), PermissionState::Granted);
        assert_eq!(gate.ensure(), PermissionState::Granted);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn denial_is_terminal_for_the_process() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut gate = PermissionGate::new(Box::new(CountingProbe {
            result: PermissionState::Denied,
            calls: Arc::clone(&calls),
        }));

        assert_eq!(gate.ensure(), PermissionState::Denied);
        assert_eq!(gate.ensure(), PermissionState::Denied);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn config_disabled_denies_without_probing_agent() {
        let probe = AgentProbe {
            enabled_in_config: false,
            agent_binary: "definitely-not-a-binary".to_string(),
        };
        assert_eq!(probe.request(), PermissionState::Denied);
    }

    #[test]
    fn missing_agent_denies() {
        let probe = AgentProbe {
            enabled_in_config: true,
            agent_binary: "dietwatch-no-such-agent".to_string(),
        };
        assert_eq!(probe.request(), PermissionState::Denied);
    }
}
