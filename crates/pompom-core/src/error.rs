//! Core error types for pompom-core.
//!
//! The timer itself never fails: persistence problems are logged and masked.
//! These types surface where a caller asked for a fallible operation, such as
//! the scripting CLI editing settings.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for pompom-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Settings file errors
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Settings-file errors.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// The home directory could not be determined
    #[error("Cannot determine home directory")]
    NoHomeDir,

    /// Failed to read or parse the settings file
    #[error("Failed to load settings from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to write the settings file
    #[error("Failed to save settings to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Failed to parse the TOML app config
    #[error("Failed to parse config {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },
}

/// Validation errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Unknown settings key
    #[error("Unknown settings key: {0}")]
    UnknownKey(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
