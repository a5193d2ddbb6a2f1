//! Completion notifications.
//!
//! The engine calls [`Notifier::notify`] once per expired interval and does
//! not wait for it. Sound playback is delegated to whatever system player is
//! installed; when nothing can be played the terminal bell is rung instead so
//! a completion is never silent.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, warn};

/// Sink signalled when an interval runs out.
pub trait Notifier: Send {
    fn notify(&self);
}

/// Writes BEL to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct BellNotifier;

impl Notifier for BellNotifier {
    fn notify(&self) {
        ring_bell();
    }
}

fn ring_bell() {
    let mut stdout = std::io::stdout();
    if let Err(e) = stdout.write_all(b"\x07").and_then(|_| stdout.flush()) {
        warn!(error = %e, "terminal bell failed");
    }
}

/// Plays the first sound file found, falling back to the bell.
#[derive(Debug, Clone)]
pub struct SoundNotifier {
    candidates: Vec<PathBuf>,
    players: Vec<&'static str>,
}

impl SoundNotifier {
    /// Try `custom` first, then `<data_dir>/sound.wav`, then `sound.wav`
    /// next to the executable.
    pub fn discover(custom: Option<PathBuf>, data_dir: Option<&Path>) -> Self {
        let mut candidates = Vec::new();
        candidates.extend(custom);
        if let Some(dir) = data_dir {
            candidates.push(dir.join("sound.wav"));
        }
        if let Some(exe_dir) = std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(Path::to_path_buf))
        {
            candidates.push(exe_dir.join("sound.wav"));
        }
        Self::with_candidates(candidates)
    }

    pub fn with_candidates(candidates: Vec<PathBuf>) -> Self {
        Self::with_players(candidates, default_players())
    }

    /// Use `players` in order instead of the platform's default players.
    pub fn with_players(candidates: Vec<PathBuf>, players: Vec<&'static str>) -> Self {
        Self {
            candidates,
            players,
        }
    }

    /// First candidate that exists on disk.
    pub fn sound_file(&self) -> Option<&Path> {
        self.candidates
            .iter()
            .map(PathBuf::as_path)
            .find(|p| p.is_file())
    }

    fn play(&self, file: &Path) -> bool {
        for player in &self.players {
            let spawned = Command::new(player)
                .arg(file)
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn();
            match spawned {
                Ok(mut child) => {
                    debug!(player, file = %file.display(), "playing completion sound");
                    // Reap the player in the background.
                    std::thread::spawn(move || {
                        let _ = child.wait();
                    });
                    return true;
                }
                Err(e) => debug!(player, error = %e, "sound player unavailable"),
            }
        }
        false
    }

    /// Start playback of the sound file. `false` means the bell is needed.
    fn try_play(&self) -> bool {
        let Some(file) = self.sound_file() else {
            debug!("no sound file found");
            return false;
        };
        if self.play(file) {
            return true;
        }
        warn!(file = %file.display(), "no sound player could be started");
        false
    }
}

impl Notifier for SoundNotifier {
    fn notify(&self) {
        if !self.try_play() {
            ring_bell();
        }
    }
}

fn default_players() -> Vec<&'static str> {
    if cfg!(target_os = "macos") {
        vec!["afplay"]
    } else {
        vec!["paplay", "aplay"]
    }
}
