//! Keyboard input.
//!
//! Keys are read on a dedicated blocking thread and forwarded to the event
//! loop as [`Signal`]s. Letters also match their position on a Russian
//! keyboard layout so the bindings work without switching layouts.

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use pompom_core::{Command, Mode, Signal};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tokio::sync::mpsc::UnboundedSender;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Command(Command),
    ToggleHelp,
}

pub fn map_key(key: KeyEvent) -> Option<Input> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Input::Command(Command::Quit)),
            _ => None,
        };
    }

    let command = match key.code {
        KeyCode::Char(' ') => Command::ToggleStart,
        KeyCode::Char('r' | 'к') => Command::Reset,
        KeyCode::Char('d' | 'в') => Command::ResetToDefault,
        KeyCode::Char('1') => Command::Switch(Mode::Focus),
        KeyCode::Char('2') => Command::Switch(Mode::ShortBreak),
        KeyCode::Char('3') => Command::Switch(Mode::LongBreak),
        KeyCode::Char('+' | '=') => Command::IncreaseDuration,
        KeyCode::Char('-' | '_') => Command::DecreaseDuration,
        KeyCode::Char('a' | 'ф') => Command::ToggleAutoSwitch,
        KeyCode::Char('c' | 'с') => Command::ClearStats,
        KeyCode::Char('q' | 'й') => Command::Quit,
        KeyCode::Char('?' | '/') => return Some(Input::ToggleHelp),
        _ => return None,
    };
    Some(Input::Command(command))
}

/// Turn a terminal event into a loop signal. While `show_help` is set, any
/// key only closes the help overlay.
pub fn route(event: Event, show_help: &AtomicBool) -> Option<Signal> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            if show_help.swap(false, Ordering::SeqCst) {
                return Some(Signal::Redraw);
            }
            match map_key(key)? {
                Input::ToggleHelp => {
                    show_help.store(true, Ordering::SeqCst);
                    Some(Signal::Redraw)
                }
                Input::Command(command) => Some(Signal::Command(command)),
            }
        }
        Event::Resize(..) => Some(Signal::Redraw),
        _ => None,
    }
}

/// Spawn the key reader.
pub fn spawn(tx: UnboundedSender<Signal>, show_help: Arc<AtomicBool>) -> JoinHandle<()> {
    thread::spawn(move || loop {
        let signal = match event::read() {
            Ok(event) => match route(event, &show_help) {
                Some(signal) => signal,
                None => continue,
            },
            Err(e) => {
                warn!(error = %e, "keyboard input failed");
                Signal::Command(Command::Quit)
            }
        };

        let quit = signal == Signal::Command(Command::Quit);
        if tx.send(signal).is_err() || quit {
            break;
        }
    })
}
