use clap::Subcommand;
use pompom_core::{PersistedSettings, SettingsStore};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a settings value
    Get {
        /// Settings key (e.g. "autoSwitch", "durations.FOCUS")
        key: String,
    },
    /// Set a settings value
    Set {
        /// Settings key
        key: String,
        /// New value
        value: String,
    },
    /// List all settings
    List,
    /// Reset settings to defaults
    Reset,
    /// Print the settings file location
    Path,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = SettingsStore::open_default()?;

    match action {
        ConfigAction::Get { key } => {
            let settings = store.load();
            match settings.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(format!("unknown key: {key}").into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut settings = store.load();
            settings.set(&key, &value)?;
            store.try_save(&mut settings)?;
            println!("ok");
        }
        ConfigAction::List => {
            let settings = store.load();
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        ConfigAction::Reset => {
            let mut settings = PersistedSettings::default();
            store.try_save(&mut settings)?;
            println!("settings reset to defaults");
        }
        ConfigAction::Path => {
            println!("{}", store.path().display());
        }
    }
    Ok(())
}
