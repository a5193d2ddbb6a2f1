use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use pompom_core::{Event, Presenter, TimerEngine};
use ratatui::prelude::*;
use std::io::{self, Stdout};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Once};
use tracing::warn;

use crate::ui;

/// Full-screen terminal presenter.
pub struct TerminalView {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    show_help: Arc<AtomicBool>,
    restored: bool,
}

impl TerminalView {
    /// Switch the terminal to raw mode on the alternate screen.
    ///
    /// Also installs a panic hook that restores the terminal. Release builds
    /// abort on panic, so `Drop` alone is not enough.
    pub fn enter() -> io::Result<Self> {
        install_panic_hook();
        enable_raw_mode()?;
        let terminal = match setup(io::stdout()) {
            Ok(terminal) => terminal,
            Err(e) => {
                let _ = reset_terminal();
                return Err(e);
            }
        };
        Ok(Self {
            terminal,
            show_help: Arc::new(AtomicBool::new(false)),
            restored: false,
        })
    }

    /// Flag shared with the input thread.
    pub fn help_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.show_help)
    }

    /// Restore the terminal.
    pub fn leave(mut self) -> io::Result<()> {
        self.restore()
    }

    fn restore(&mut self) -> io::Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen, Show)?;
        Ok(())
    }
}

fn setup(mut stdout: Stdout) -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    execute!(stdout, EnterAlternateScreen, Hide)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

/// Leave raw mode and the alternate screen without a `TerminalView`.
fn reset_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, Show)
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = reset_terminal();
            previous(info);
        }));
    });
}

impl Presenter for TerminalView {
    fn render(&mut self, engine: &TimerEngine, _event: Option<&Event>) {
        let snapshot = engine.snapshot();
        let show_help = self.show_help.load(Ordering::SeqCst);
        if let Err(e) = self
            .terminal
            .draw(|f| ui::draw(f, &snapshot, show_help))
        {
            warn!(error = %e, "render failed");
        }
    }
}

impl Drop for TerminalView {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}
