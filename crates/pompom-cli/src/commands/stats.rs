use clap::Subcommand;
use pompom_core::SettingsStore;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Show completed focus sessions
    Show {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Reset the completed focus counter
    Clear,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = SettingsStore::open_default()?;
    let mut settings = store.load();

    match action {
        StatsAction::Show { json } => {
            if json {
                let value = serde_json::json!({
                    "completedFocus": settings.completed_focus,
                    "lastUsed": settings.last_used,
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                println!("{} focus sessions completed", settings.completed_focus);
                if let Some(last_used) = settings.last_used {
                    println!("last used {}", last_used.format("%Y-%m-%d %H:%M UTC"));
                }
            }
        }
        StatsAction::Clear => {
            settings.completed_focus = 0;
            store.try_save(&mut settings)?;
            println!("statistics cleared");
        }
    }
    Ok(())
}
