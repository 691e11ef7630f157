//! Startup backoff for a crash-looping daemon.
//!
//! Supervisors (or an eager client) may respawn the daemon immediately after
//! a crash. We persist recent start times and sleep before binding when too
//! many starts land inside the window, so a broken install cannot spin on the
//! socket.

use chrono::{DateTime, Utc};
use fs_err as fs;
use serde::{Deserialize, Serialize};
use std::cmp;
use std::path::Path;
use std::thread;
use std::time::Duration as StdDuration;
use tracing::warn;

const WINDOW_SECS: i64 = 120;
const MAX_STARTS: usize = 3;
const BACKOFF_STEP_SECS: u64 = 10;
const BACKOFF_MAX_SECS: u64 = 60;

#[derive(Default, Serialize, Deserialize)]
struct BackoffState {
    starts: Vec<String>,
}

pub fn apply_startup_backoff(path: &Path) {
    let now = Utc::now();
    let mut state = load_state(path).unwrap_or_default();
    let backoff_secs = compute_backoff(now, &mut state);

    if let Err(err) = save_state(path, &state) {
        warn!(error = %err, "Failed to persist daemon backoff state");
    }

    if let Some(secs) = backoff_secs {
        warn!(
            count = state.starts.len(),
            backoff_secs = secs,
            "Daemon start backoff engaged"
        );
        thread::sleep(StdDuration::from_secs(secs));
    }
}

fn compute_backoff(now: DateTime<Utc>, state: &mut BackoffState) -> Option<u64> {
    state.starts.retain(|value| {
        parse_timestamp(value)
            .map(|timestamp| now.signed_duration_since(timestamp).num_seconds() <= WINDOW_SECS)
            .unwrap_or(false)
    });

    state.starts.push(now.to_rfc3339());

    if state.starts.len() <= MAX_STARTS {
        return None;
    }

    let extra = state.starts.len().saturating_sub(MAX_STARTS) as u64;
    Some(cmp::min(
        BACKOFF_STEP_SECS.saturating_mul(extra),
        BACKOFF_MAX_SECS,
    ))
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn load_state(path: &Path) -> Option<BackoffState> {
    let contents = fs::read_to_string(path).ok()?;
    serde_json::from_str(&contents).ok()
}

fn save_state(path: &Path, state: &BackoffState) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|err| format!("Failed to create backoff directory: {}", err))?;
    }
    let contents = serde_json::to_string(state)
        .map_err(|err| format!("Failed to serialize backoff state: {}", err))?;
    fs::write(path, contents).map_err(|err| format!("Failed to write backoff state: {}", err))
}
