//! Error types for diet-core operations.

use std::path::PathBuf;

/// All errors that can occur in diet-core operations.
#[derive(Debug, thiserror::Error)]
pub enum DietError {
    #[error("Home directory not found")]
    HomeDirNotFound,

    #[error("Configuration write failed: {path}: {source}")]
    ConfigWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Meal not found: {0}")]
    MealNotFound(String),

    #[error("Meal item not found: {0}")]
    MealItemNotFound(String),

    #[error("Invalid meal: {0}")]
    InvalidMeal(String),

    #[error("Database error: {context}: {source}")]
    Db {
        context: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("I/O error: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Toast write failed: {0}")]
    ToastFailed(#[source] std::io::Error),

    #[error("Notification dispatch failed: {command}: {details}")]
    DispatchFailed { command: String, details: String },
}

/// Convenience type alias for Results using DietError.
pub type Result<T> = std::result::Result<T, DietError>;
