//! Focus-or-launch handling for notification clicks.
//!
//! When the user interacts with a reminder's "open" action we bring an
//! existing client to the front if one is running, and spawn a new one
//! otherwise. Everything here is best-effort: a failure is logged and
//! swallowed, never surfaced to the delivery path.

use diet_core::ClickHandler;
use std::process::{Command, Stdio};
use sysinfo::{ProcessRefreshKind, RefreshKind, System};
use tracing::{debug, warn};

const CLIENT_PROCESS_NAME: &str = "dietwatch";

pub struct AppLauncher {
    open_command: Vec<String>,
}

impl AppLauncher {
    pub fn new(open_command: Vec<String>) -> Self {
        Self { open_command }
    }

    fn client_running(&self) -> bool {
        let system = System::new_with_specifics(
            RefreshKind::new().with_processes(ProcessRefreshKind::new()),
        );
        system
            .processes()
            .values()
            .any(|process| process.name() == CLIENT_PROCESS_NAME)
    }

    fn focus_existing(&self) {
        // Window managers that honor wmctrl raise the client; elsewhere this
        // is a silent no-op and the running client keeps its terminal.
        match Command::new("wmctrl")
            .arg("-a")
            .arg(CLIENT_PROCESS_NAME)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
        {
            Ok(status) if status.success() => debug!("Focused running client"),
            Ok(_) | Err(_) => debug!("Could not focus running client; leaving it be"),
        }
    }

    fn spawn_client(&self) {
        let Some((program, args)) = self.open_command.split_first() else {
            warn!("No open command configured; ignoring notification click");
            return;
        };
        match Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(_) => debug!(program = %program, "Launched client from notification"),
            Err(err) => warn!(program = %program, error = %err, "Failed to launch client"),
        }
    }
}

impl ClickHandler for AppLauncher {
    fn handle(&self, action_id: &str) {
        if action_id != "open" {
            debug!(action = %action_id, "Ignoring unknown notification action");
            return;
        }
        if self.client_running() {
            self.focus_existing();
        } else {
            self.spawn_client();
        }
    }
}
