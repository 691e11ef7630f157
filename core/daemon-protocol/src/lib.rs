//! IPC protocol types and validation for dietwatch-daemon.
//!
//! This crate is shared by the daemon and its clients to prevent schema drift.
//! The daemon remains the authority on validation, but clients can reuse the
//! same types to construct valid requests.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const PROTOCOL_VERSION: u32 = 1;
pub const MAX_REQUEST_BYTES: usize = 1024 * 1024; // 1MB

pub const MAX_MEAL_ID_LEN: usize = 128;
pub const MAX_MEAL_NAME_LEN: usize = 256;

static SCHEDULED_TIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([01]\d|2[0-3]):[0-5]\d(:[0-5]\d)?$").expect("scheduled time regex")
});

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum Method {
    GetHealth,
    ScheduleCheck,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Request {
    pub protocol_version: u32,
    pub method: Method,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub params: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Response {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ErrorInfo {
    pub code: String,
    pub message: String,
}

impl ErrorInfo {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
        }
    }
}

impl Response {
    pub fn ok(id: Option<String>, data: Value) -> Self {
        Self {
            ok: true,
            id,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(id: Option<String>, code: &str, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            id,
            data: None,
            error: Some(ErrorInfo::new(code, message)),
        }
    }

    pub fn error_with_info(id: Option<String>, error: ErrorInfo) -> Self {
        Self {
            ok: false,
            id,
            data: None,
            error: Some(error),
        }
    }
}

/// One meal as carried in a `schedule_check` snapshot. The daemon never sees
/// meal items or check-ins; the foreground sends only what the matcher needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SnapshotMeal {
    pub id: String,
    pub name: String,
    pub scheduled_time: String,
    pub day_of_week: u8,
}

/// Full snapshot payload. Replaces the daemon's prior snapshot wholesale;
/// there is no incremental merge.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MealSnapshot {
    pub meals: Vec<SnapshotMeal>,
}

impl SnapshotMeal {
    pub fn validate(&self) -> Result<(), ErrorInfo> {
        if self.id.trim().is_empty() {
            return Err(ErrorInfo::new("invalid_meal_id", "meal id is required"));
        }
        if self.id.len() > MAX_MEAL_ID_LEN {
            return Err(ErrorInfo::new(
                "invalid_meal_id",
                format!("meal id must be {} characters or fewer", MAX_MEAL_ID_LEN),
            ));
        }
        if self.name.trim().is_empty() {
            return Err(ErrorInfo::new("invalid_meal_name", "meal name is required"));
        }
        if self.name.len() > MAX_MEAL_NAME_LEN {
            return Err(ErrorInfo::new(
                "invalid_meal_name",
                format!(
                    "meal name must be {} characters or fewer",
                    MAX_MEAL_NAME_LEN
                ),
            ));
        }
        if !SCHEDULED_TIME_RE.is_match(&self.scheduled_time) {
            return Err(ErrorInfo::new(
                "invalid_scheduled_time",
                format!(
                    "scheduled_time must be HH:MM or HH:MM:SS, got {:?}",
                    self.scheduled_time
                ),
            ));
        }
        if self.day_of_week > 6 {
            return Err(ErrorInfo::new(
                "invalid_day_of_week",
                "day_of_week must be 0 (Sunday) through 6 (Saturday)",
            ));
        }
        Ok(())
    }
}

impl MealSnapshot {
    pub fn validate(&self) -> Result<(), ErrorInfo> {
        for meal in &self.meals {
            meal.validate()?;
        }
        Ok(())
    }
}

pub fn parse_schedule_check(params: Value) -> Result<MealSnapshot, ErrorInfo> {
    let snapshot: MealSnapshot = serde_json::from_value(params).map_err(|err| {
        ErrorInfo::new(
            "invalid_params",
            format!("snapshot payload is invalid JSON: {}", err),
        )
    })?;
    snapshot.validate()?;
    Ok(snapshot)
}
