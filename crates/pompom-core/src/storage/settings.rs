//! JSON-backed user settings.
//!
//! Stores the state that survives a restart:
//! - Duration per mode
//! - Auto-switch flag
//! - Completed focus sessions
//! - Last-used timestamp
//!
//! Settings are stored at `~/.pompom/settings.json`. Reads never fail:
//! a missing or malformed file yields [`PersistedSettings::default`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};

use super::data_dir;
use crate::error::{CoreError, SettingsError, ValidationError};
use crate::timer::{DurationConfig, Mode, MIN_DURATION_MIN};

const SETTINGS_FILE: &str = "settings.json";

/// The persisted preferences record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSettings {
    #[serde(default)]
    pub durations: DurationConfig,
    #[serde(default = "default_true")]
    pub auto_switch: bool,
    #[serde(default)]
    pub completed_focus: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}

impl Default for PersistedSettings {
    fn default() -> Self {
        Self {
            durations: DurationConfig::default(),
            auto_switch: true,
            completed_focus: 0,
            last_used: None,
        }
    }
}

impl PersistedSettings {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), CoreError> {
        let unknown = || ValidationError::UnknownKey(key.to_string());
        let invalid = |message: String| ValidationError::InvalidValue {
            field: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() || key.is_empty() {
            return Err(unknown().into());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => {
                        let b = value.parse::<bool>().map_err(|_| {
                            invalid(format!("expected true or false, got '{value}'"))
                        })?;
                        serde_json::Value::Bool(b)
                    }
                    serde_json::Value::Number(_) => {
                        let n = value.parse::<u32>().map_err(|_| {
                            invalid(format!("expected a whole number, got '{value}'"))
                        })?;
                        serde_json::Value::Number(n.into())
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown().into())
    }

    /// Get a value as string by dot-separated key, e.g. `durations.FOCUS`.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a value by dot-separated key. Does not persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value has the wrong type,
    /// or a duration would drop below one minute.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: PersistedSettings =
            serde_json::from_value(json).map_err(|e| ValidationError::InvalidValue {
                field: key.to_string(),
                message: e.to_string(),
            })?;

        for mode in Mode::ALL {
            if updated.durations.get(mode) < MIN_DURATION_MIN {
                return Err(ValidationError::InvalidValue {
                    field: format!("durations.{}", mode.key()),
                    message: format!("must be at least {MIN_DURATION_MIN} minute"),
                }
                .into());
            }
        }

        *self = updated;
        Ok(())
    }
}

/// Owns the on-disk settings file.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<data_dir>/settings.json`.
    pub fn open_default() -> Result<Self, SettingsError> {
        Ok(Self::new(data_dir()?.join(SETTINGS_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the settings, falling back to defaults on any failure.
    pub fn load(&self) -> PersistedSettings {
        match self.try_load() {
            Ok(Some(settings)) => settings,
            Ok(None) => {
                debug!(path = %self.path.display(), "no settings file, using defaults");
                PersistedSettings::default()
            }
            Err(e) => {
                warn!(error = %e, "using default settings");
                PersistedSettings::default()
            }
        }
    }

    /// Read the settings. `Ok(None)` when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn try_load(&self) -> Result<Option<PersistedSettings>, SettingsError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.load_failed(e)),
        };

        let mut settings: PersistedSettings =
            serde_json::from_str(&content).map_err(|e| self.load_failed(e))?;
        settings.durations = settings.durations.normalized();
        Ok(Some(settings))
    }

    /// Stamp `last_used` and write the record. Failures are logged and
    /// reported as `false`; the caller keeps its in-memory copy.
    pub fn save(&self, record: &mut PersistedSettings) -> bool {
        match self.try_save(record) {
            Ok(()) => true,
            Err(e) => {
                error!(error = %e, "settings not saved");
                false
            }
        }
    }

    /// Stamp `last_used` and write the record through a temp file + rename.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the file
    /// cannot be written.
    pub fn try_save(&self, record: &mut PersistedSettings) -> Result<(), SettingsError> {
        record.last_used = Some(Utc::now());

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.save_failed(e))?;
        }

        let content = serde_json::to_string_pretty(record).map_err(|e| self.save_failed(e))?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content).map_err(|e| self.save_failed(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            self.save_failed(e)
        })?;

        debug!(path = %self.path.display(), "settings saved");
        Ok(())
    }

    fn load_failed(&self, e: impl std::fmt::Display) -> SettingsError {
        SettingsError::LoadFailed {
            path: self.path.clone(),
            message: e.to_string(),
        }
    }

    fn save_failed(&self, e: impl std::fmt::Display) -> SettingsError {
        SettingsError::SaveFailed {
            path: self.path.clone(),
            message: e.to_string(),
        }
    }
}
