//! Daemon runtime options.
//!
//! Loaded from `~/.dietwatch/daemon/config.toml`. A missing file means
//! defaults; a malformed file logs a warning and falls back to defaults so a
//! bad edit never keeps reminders from firing.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RelayOptions {
    /// Consent for the system notification channel.
    pub notifications_enabled: bool,
    /// Notification agent the system channel shells out to.
    pub notify_binary: String,
    /// Optional icon passed to the agent.
    pub icon_path: Option<PathBuf>,
    /// Command spawned when a notification's "open" action fires and no
    /// client is already running. First element is the program.
    pub open_command: Vec<String>,
}

impl Default for RelayOptions {
    fn default() -> Self {
        Self {
            notifications_enabled: true,
            notify_binary: "notify-send".to_string(),
            icon_path: None,
            open_command: vec!["dietwatch".to_string(), "watch".to_string()],
        }
    }
}

pub fn load(path: &Path) -> RelayOptions {
    let contents = match fs_err::read_to_string(path) {
        Ok(contents) => contents,
        Err(_) => return RelayOptions::default(),
    };
    match toml::from_str(&contents) {
        Ok(opts) => opts,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "Malformed daemon config; using defaults");
            RelayOptions::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let opts = load(Path::new("/nonexistent/dietwatch/config.toml"));
        assert!(opts.notifications_enabled);
        assert_eq!(opts.notify_binary, "notify-send");
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let opts: RelayOptions =
            toml::from_str("notifications_enabled = false").expect("parse");
        assert!(!opts.notifications_enabled);
        assert_eq!(opts.open_command, vec!["dietwatch", "watch"]);
    }

    #[test]
    fn full_toml_parses() {
        let opts: RelayOptions = toml::from_str(
            r#"
            notifications_enabled = true
            notify_binary = "dunstify"
            icon_path = "/usr/share/icons/dietwatch.png"
            open_command = ["alacritty", "-e", "dietwatch", "watch"]
            "#,
        )
        .expect("parse");
        assert_eq!(opts.notify_binary, "dunstify");
        assert_eq!(
            opts.icon_path.as_deref(),
            Some(Path::new("/usr/share/icons/dietwatch.png"))
        );
        assert_eq!(opts.open_command.len(), 4);
    }

    #[test]
    fn malformed_toml_falls_back_to_defaults() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let path = dir.path().join("config.toml");
        fs_err::write(&path, "notifications_enabled = [broken").expect("write");
        let opts = load(&path);
        assert!(opts.notifications_enabled);
    }
}
