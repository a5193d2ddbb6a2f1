//! Tracing subscriber setup.
//!
//! The interactive timer owns the terminal, so it logs to
//! `~/.pompom/pompom.log`; every other subcommand logs to stderr.
//! `POMPOM_LOG` takes precedence over the configured level.

use std::fs::{self, File, OpenOptions};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

use pompom_core::storage::data_dir;

const LOG_FILE: &str = "pompom.log";

pub enum LogTarget {
    File,
    Stderr,
}

pub fn init(target: LogTarget, default_level: &str) {
    let filter =
        EnvFilter::try_from_env("POMPOM_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));

    match target {
        LogTarget::Stderr => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
        LogTarget::File => {
            // Without a writable log file the timer simply runs unlogged.
            if let Some(file) = open_log_file() {
                tracing_subscriber::fmt()
                    .with_env_filter(filter)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .init();
            }
        }
    }
}

fn open_log_file() -> Option<File> {
    let dir = data_dir().ok()?;
    fs::create_dir_all(&dir).ok()?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE))
        .ok()
}
