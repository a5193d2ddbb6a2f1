use clap::Args;
use pompom_core::storage::{data_dir, AppConfig, SettingsStore};
use pompom_core::{runtime, BellNotifier, Notifier, SoundNotifier, TimerEngine};
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing::info;

use crate::input;
use crate::view::TerminalView;

#[derive(Args, Default)]
pub struct RunArgs {
    /// Ring the terminal bell instead of playing a sound
    #[arg(long)]
    no_sound: bool,
    /// Settings file to use instead of ~/.pompom/settings.json
    #[arg(long, value_name = "PATH")]
    settings: Option<PathBuf>,
}

fn notifier(args: &RunArgs, config: &AppConfig) -> Box<dyn Notifier> {
    if args.no_sound || !config.notifications.sound {
        return Box::new(BellNotifier);
    }
    let dir = data_dir().ok();
    Box::new(SoundNotifier::discover(
        config.notifications.custom_sound.clone(),
        dir.as_deref(),
    ))
}

pub fn run(args: RunArgs, config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store = match &args.settings {
        Some(path) => SettingsStore::new(path),
        None => SettingsStore::open_default()?,
    };
    info!(settings = %store.path().display(), "starting timer");
    let engine = TimerEngine::with_store(store, notifier(&args, config));

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;

    let mut view = TerminalView::enter()?;
    let (tx, rx) = mpsc::unbounded_channel();
    input::spawn(tx, view.help_flag());

    let engine = rt.block_on(runtime::run(engine, rx, &mut view));
    view.leave()?;

    info!(completed_focus = engine.completed_focus(), "timer closed");
    Ok(())
}
