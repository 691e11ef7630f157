//! Client helper for relaying meal snapshots to the background daemon.
//!
//! The daemon is optional: when it is absent or disabled, failures are
//! reported to the caller and the foreground watcher carries on alone.

use chrono::Utc;
use dietwatch_daemon_protocol::{
    MealSnapshot, Method, Request, Response, SnapshotMeal, MAX_REQUEST_BYTES, PROTOCOL_VERSION,
};
use rand::RngCore;
use std::env;
use std::io::{Read, Write};
use std::os::unix::net::UnixStream;
use std::path::PathBuf;
use std::time::Duration;

const ENABLE_ENV: &str = "DIETWATCH_RELAY_ENABLED";
const SOCKET_ENV: &str = "DIETWATCH_DAEMON_SOCKET";
const SOCKET_NAME: &str = "daemon.sock";
const READ_TIMEOUT_MS: u64 = 600;
const WRITE_TIMEOUT_MS: u64 = 600;
const RETRY_DELAY_MS: u64 = 50;

pub fn relay_enabled() -> bool {
    match env::var(ENABLE_ENV) {
        Ok(value) => matches!(value.as_str(), "1" | "true" | "TRUE" | "yes" | "YES"),
        Err(_) => true,
    }
}

/// Sends the full meal snapshot to the daemon (last-write-wins replacement).
/// One retry with the same request id; after that the caller degrades
/// gracefully.
pub fn send_snapshot(meals: &[SnapshotMeal]) -> Result<(), String> {
    if !relay_enabled() {
        return Err("Relay disabled".to_string());
    }

    let snapshot = MealSnapshot {
        meals: meals.to_vec(),
    };
    let params = serde_json::to_value(&snapshot)
        .map_err(|err| format!("Failed to serialize snapshot: {}", err))?;
    let request_id = make_request_id();

    let build_request = || Request {
        protocol_version: PROTOCOL_VERSION,
        method: Method::ScheduleCheck,
        id: Some(request_id.clone()),
        params: Some(params.clone()),
    };

    match send_expecting_ok(build_request()) {
        Ok(()) => Ok(()),
        Err(err) => {
            tracing::warn!(error = %err, "Failed to relay snapshot to daemon; retrying");
            std::thread::sleep(Duration::from_millis(RETRY_DELAY_MS));
            send_expecting_ok(build_request()).map_err(|retry_err| {
                tracing::warn!(error = %retry_err, "Retry failed relaying snapshot to daemon");
                retry_err
            })
        }
    }
}

pub fn daemon_health() -> Result<serde_json::Value, String> {
    let request = Request {
        protocol_version: PROTOCOL_VERSION,
        method: Method::GetHealth,
        id: Some("health-check".to_string()),
        params: None,
    };

    let response = send_request(request)?;
    if response.ok {
        response
            .data
            .ok_or_else(|| "Daemon health response had no data".to_string())
    } else {
        Err(response
            .error
            .map(|err| format!("{}: {}", err.code, err.message))
            .unwrap_or_else(|| "Unknown daemon error".to_string()))
    }
}

fn send_expecting_ok(request: Request) -> Result<(), String> {
    let response = send_request(request)?;
    if response.ok {
        Ok(())
    } else {
        Err(response
            .error
            .map(|err| format!("{}: {}", err.code, err.message))
            .unwrap_or_else(|| "Unknown daemon error".to_string()))
    }
}

fn socket_path() -> Result<PathBuf, String> {
    if let Ok(path) = env::var(SOCKET_ENV) {
        return Ok(PathBuf::from(path));
    }
    let home = dirs::home_dir().ok_or_else(|| "Home directory not found".to_string())?;
    Ok(home.join(".dietwatch").join(SOCKET_NAME))
}

fn send_request(request: Request) -> Result<Response, String> {
    let socket = socket_path()?;
    let mut stream = UnixStream::connect(&socket)
        .map_err(|err| format!("Failed to connect to daemon socket: {}", err))?;
    let _ = stream.set_read_timeout(Some(Duration::from_millis(READ_TIMEOUT_MS)));
    let _ = stream.set_write_timeout(Some(Duration::from_millis(WRITE_TIMEOUT_MS)));

    serde_json::to_writer(&mut stream, &request)
        .map_err(|err| format!("Failed to write request: {}", err))?;
    stream
        .write_all(b"\n")
        .map_err(|err| format!("Failed to flush request: {}", err))?;
    stream.flush().ok();

    read_response(&mut stream)
}

fn read_response(stream: &mut UnixStream) -> Result<Response, String> {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        match stream.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => {
                buffer.extend_from_slice(&chunk[..n]);
                if buffer.len() > MAX_REQUEST_BYTES {
                    return Err("Response exceeded maximum size".to_string());
                }
                if chunk[..n].contains(&b'\n') {
                    break;
                }
            }
            Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                return Err("Timed out waiting for daemon response".to_string());
            }
            Err(err) => return Err(format!("Failed to read response: {}", err)),
        }
    }

    let newline_index = buffer.iter().position(|b| *b == b'\n');
    let response_bytes = match newline_index {
        Some(index) => &buffer[..index],
        None => buffer.as_slice(),
    };

    if response_bytes.is_empty() {
        return Err("Daemon response was empty".to_string());
    }

    serde_json::from_slice(response_bytes)
        .map_err(|err| format!("Failed to parse response JSON: {}", err))
}

fn make_request_id() -> String {
    let mut random = rand::thread_rng();
    format!(
        "snap-{}-{:x}",
        Utc::now().timestamp_millis(),
        random.next_u64()
    )
}
