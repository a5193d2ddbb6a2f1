//! # PomPom Core Library
//!
//! Core logic for the PomPom terminal Pomodoro timer. The terminal front end
//! in `pompom-cli` is a thin layer that renders engine state and forwards key
//! presses as [`Command`]s.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a tick-driven state machine over FOCUS / SHORT BREAK /
//!   LONG BREAK modes. It owns the handles of its tick source and of the
//!   deferred auto-start, but never sleeps itself.
//! - **Runtime**: a tokio driver that turns those handles into real timers and
//!   feeds firings and user commands back into the engine.
//! - **Storage**: JSON settings (durations, auto-switch, completed count) and
//!   an optional TOML app config.
//! - **Notify**: completion sink (sound file, falling back to the terminal bell).
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: timer state machine
//! - [`SettingsStore`]: write-through persistence of [`PersistedSettings`]
//! - [`runtime::run`]: event loop binding the engine to a [`Presenter`]

pub mod error;
pub mod events;
pub mod notify;
pub mod runtime;
pub mod storage;
pub mod timer;

pub use error::{CoreError, SettingsError, ValidationError};
pub use events::Event;
pub use notify::{BellNotifier, Notifier, SoundNotifier};
pub use runtime::{Presenter, Signal};
pub use storage::{AppConfig, PersistedSettings, SettingsStore};
pub use timer::{Command, DurationConfig, Mode, Snapshot, TimerEngine, TimerState};
