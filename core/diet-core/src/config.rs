//! Client configuration loading and saving.
//!
//! Lives at `~/.dietwatch/config.json`. Missing or malformed files fall back
//! to defaults; only writes surface errors.

use crate::error::{DietError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Owner of the local store. Single-user installs keep the default.
    pub user_id: String,
    /// Consent for the system notification channel. The toast channel is
    /// never gated on this.
    pub notifications_enabled: bool,
    /// Notification agent binary the system channel shells out to.
    pub notify_binary: String,
    /// Optional icon for system notifications.
    pub icon_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_id: "local".to_string(),
            notifications_enabled: true,
            notify_binary: "notify-send".to_string(),
            icon_path: None,
        }
    }
}

/// Returns the dietwatch data directory (~/.dietwatch).
pub fn dietwatch_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(".dietwatch"))
        .ok_or(DietError::HomeDirNotFound)
}

pub fn config_path() -> Result<PathBuf> {
    Ok(dietwatch_dir()?.join("config.json"))
}

pub fn store_path() -> Result<PathBuf> {
    Ok(dietwatch_dir()?.join("meals.db"))
}

/// Loads the client configuration, returning defaults if absent or unreadable.
pub fn load_config() -> ClientConfig {
    config_path()
        .ok()
        .and_then(|path| fs_err::read_to_string(path).ok())
        .and_then(|contents| serde_json::from_str(&contents).ok())
        .unwrap_or_default()
}

/// Saves the client configuration to disk.
pub fn save_config(config: &ClientConfig) -> Result<()> {
    let path = config_path()?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent).map_err(|err| DietError::Io {
            context: "create config directory".to_string(),
            source: err,
        })?;
    }
    let contents = serde_json::to_string_pretty(config).map_err(|err| DietError::Json {
        context: "serialize config".to_string(),
        source: err,
    })?;
    fs_err::write(&path, contents).map_err(|err| DietError::ConfigWriteFailed {
        path,
        source: err,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = ClientConfig::default();
        assert_eq!(config.user_id, "local");
        assert!(config.notifications_enabled);
        assert_eq!(config.notify_binary, "notify-send");
        assert!(config.icon_path.is_none());
    }

    #[test]
    fn partial_config_fills_defaults() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"notifications_enabled": false}"#).expect("parse");
        assert!(!config.notifications_enabled);
        assert_eq!(config.user_id, "local");
    }

    #[test]
    fn config_round_trips() {
        let config = ClientConfig {
            user_id: "ana".to_string(),
            notifications_enabled: false,
            notify_binary: "dunstify".to_string(),
            icon_path: Some(PathBuf::from("/usr/share/icons/dietwatch.png")),
        };
        let json = serde_json::to_string(&config).expect("serialize");
        let parsed: ClientConfig = serde_json::from_str(&json).expect("parse");
        assert_eq!(parsed, config);
    }
}
