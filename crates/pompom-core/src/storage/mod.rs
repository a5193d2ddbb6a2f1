mod config;
mod settings;

pub use config::{AppConfig, LoggingConfig, NotificationsConfig};
pub use settings::{PersistedSettings, SettingsStore};

use std::path::PathBuf;

use crate::error::SettingsError;

/// Returns `~/.pompom[-dev]/`.
///
/// `POMPOM_HOME` overrides the location entirely; otherwise
/// `POMPOM_ENV=dev` selects the development directory.
/// The directory is not created here; writers create it on demand.
///
/// # Errors
/// Returns an error if the home directory cannot be determined.
pub fn data_dir() -> Result<PathBuf, SettingsError> {
    if let Some(home) = std::env::var_os("POMPOM_HOME").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(home));
    }

    let base_dir = dirs::home_dir().ok_or(SettingsError::NoHomeDir)?;

    let env = std::env::var("POMPOM_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join(".pompom-dev")
    } else {
        base_dir.join(".pompom")
    };

    Ok(dir)
}
