//! Timer engine implementation.
//!
//! The timer engine is a tick-driven state machine. It does not use internal
//! threads or sleeps: it records which tick source and which deferred start
//! should exist, and the driver (see [`crate::runtime`]) calls back through
//! [`TimerEngine::on_tick`] and [`TimerEngine::on_deferred_start`].
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> (Paused -> Running)* -> Idle (completed)
//!                 \-> Idle (switch / reset)
//! ```
//!
//! Completion with auto-switch enabled switches to the next mode and arms a
//! one-shot deferred start, so the next interval begins without user input.
//!
//! ## Usage
//!
//! ```ignore
//! let store = SettingsStore::open_default()?;
//! let mut engine = TimerEngine::with_store(store, Box::new(BellNotifier));
//! engine.start();
//! // Once per second while a tick source is armed:
//! engine.tick(); // Returns Some(Event::TimerCompleted) when the interval ends
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

use super::command::Command;
use super::mode::{DurationConfig, Mode};
use super::tick::{DeferredStart, SourceId, SourceIds, TickSource, AUTO_START_DELAY, TICK_PERIOD};
use crate::events::Event;
use crate::notify::Notifier;
use crate::storage::{PersistedSettings, SettingsStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
}

/// Read model handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub mode: Mode,
    pub state: TimerState,
    pub running: bool,
    pub remaining_secs: u64,
    /// `remaining_secs` as `MM:SS`.
    pub clock: String,
    pub completed_focus: u32,
    pub auto_switch: bool,
    pub durations: DurationConfig,
    pub status: String,
}

/// Core timer engine.
///
/// Owns the in-memory authoritative settings and writes them through to the
/// [`SettingsStore`] after every change that should survive a restart.
pub struct TimerEngine {
    mode: Mode,
    state: TimerState,
    remaining_secs: u64,
    settings: PersistedSettings,
    status: String,
    tick_source: Option<TickSource>,
    deferred_start: Option<DeferredStart>,
    scheduled: Option<Event>,
    ids: SourceIds,
    store: SettingsStore,
    notifier: Box<dyn Notifier>,
}

impl fmt::Debug for TimerEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerEngine")
            .field("mode", &self.mode)
            .field("state", &self.state)
            .field("remaining_secs", &self.remaining_secs)
            .field("settings", &self.settings)
            .field("tick_source", &self.tick_source)
            .field("deferred_start", &self.deferred_start)
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

impl TimerEngine {
    /// Create an engine from already loaded settings.
    ///
    /// Starts `Idle` in FOCUS with the full focus duration on the clock.
    pub fn new(
        store: SettingsStore,
        settings: PersistedSettings,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        let mut settings = settings;
        settings.durations = settings.durations.normalized();
        let mode = Mode::Focus;
        Self {
            mode,
            state: TimerState::Idle,
            remaining_secs: settings.durations.seconds(mode),
            status: format!("{} - Ready", mode.label()),
            settings,
            tick_source: None,
            deferred_start: None,
            scheduled: None,
            ids: SourceIds::default(),
            store,
            notifier,
        }
    }

    /// Create an engine from whatever `store` currently holds.
    pub fn with_store(store: SettingsStore, notifier: Box<dyn Notifier>) -> Self {
        let settings = store.load();
        Self::new(store, settings, notifier)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn durations(&self) -> &DurationConfig {
        &self.settings.durations
    }

    pub fn auto_switch(&self) -> bool {
        self.settings.auto_switch
    }

    pub fn completed_focus(&self) -> u32 {
        self.settings.completed_focus
    }

    pub fn settings(&self) -> &PersistedSettings {
        &self.settings
    }

    /// Latest status line.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// The armed tick source, if any. At most one exists at a time.
    pub fn tick_source(&self) -> Option<TickSource> {
        self.tick_source
    }

    /// The armed deferred start, if any.
    pub fn deferred_start(&self) -> Option<DeferredStart> {
        self.deferred_start
    }

    /// Take the [`Event::AutoStartScheduled`] queued by the last completion.
    /// Returns `None` once the deferred start has been cancelled.
    pub fn take_scheduled(&mut self) -> Option<Event> {
        self.scheduled.take()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            mode: self.mode,
            state: self.state,
            running: self.is_running(),
            remaining_secs: self.remaining_secs,
            clock: format_clock(self.remaining_secs),
            completed_focus: self.settings.completed_focus,
            auto_switch: self.settings.auto_switch,
            durations: self.settings.durations,
            status: self.status.clone(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn apply(&mut self, command: Command) -> Option<Event> {
        debug!(?command, "command");
        match command {
            Command::ToggleStart => self.toggle(),
            Command::Reset => self.reset_timer(),
            Command::ResetToDefault => self.reset_to_default(),
            Command::Switch(mode) => self.switch_mode(mode, true),
            Command::IncreaseDuration => self.change_duration(1),
            Command::DecreaseDuration => self.change_duration(-1),
            Command::ToggleAutoSwitch => self.toggle_auto_switch(),
            Command::ClearStats => self.clear_stats(),
            Command::Quit => self.quit(),
        }
    }

    pub fn toggle(&mut self) -> Option<Event> {
        if self.is_running() {
            self.pause()
        } else {
            self.start()
        }
    }

    pub fn start(&mut self) -> Option<Event> {
        // An explicit start supersedes a pending automatic one.
        self.cancel_deferred_start();
        if self.is_running() {
            return None;
        }
        if self.remaining_secs == 0 {
            self.remaining_secs = self.full_secs();
        }

        self.state = TimerState::Running;
        let source = TickSource {
            id: self.ids.allocate(),
            period: TICK_PERIOD,
        };
        self.tick_source = Some(source);
        debug!(mode = ?self.mode, source = source.id.get(), "tick source armed");

        self.emit(Event::TimerStarted {
            mode: self.mode,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        // Pausing inside the auto-chain window keeps the next interval stopped.
        self.cancel_deferred_start();
        if !self.is_running() {
            return None;
        }

        self.cancel_tick_source();
        self.state = TimerState::Paused;
        self.emit(Event::TimerPaused {
            mode: self.mode,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Advance the clock by one second. Returns `Some(Event::TimerCompleted)`
    /// when the interval runs out.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.is_running() {
            return None;
        }

        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs > 0 {
            return None;
        }
        self.complete()
    }

    /// Driver entry point for a tick-source firing.
    pub fn on_tick(&mut self, source: SourceId) -> Option<Event> {
        if self.tick_source.map(|t| t.id) != Some(source) {
            debug!(source = source.get(), "stale tick ignored");
            return None;
        }
        self.tick()
    }

    /// Driver entry point for the deferred start firing.
    pub fn on_deferred_start(&mut self, source: SourceId) -> Option<Event> {
        if self.deferred_start.map(|d| d.id) != Some(source) {
            debug!(source = source.get(), "stale deferred start ignored");
            return None;
        }
        self.deferred_start = None;
        self.scheduled = None;
        self.start()
    }

    pub fn switch_mode(&mut self, mode: Mode, reset_timer: bool) -> Option<Event> {
        self.cancel_tick_source();
        self.cancel_deferred_start();
        self.state = TimerState::Idle;
        self.mode = mode;
        if reset_timer {
            self.remaining_secs = self.full_secs();
        }
        self.persist();

        self.emit(Event::ModeSwitched {
            mode,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    pub fn reset_timer(&mut self) -> Option<Event> {
        self.cancel_tick_source();
        self.cancel_deferred_start();
        self.state = TimerState::Idle;
        self.remaining_secs = self.full_secs();

        self.emit(Event::TimerReset {
            mode: self.mode,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Restore the current mode's built-in duration.
    pub fn reset_to_default(&mut self) -> Option<Event> {
        let minutes = self
            .settings
            .durations
            .set(self.mode, self.mode.default_minutes());
        self.remaining_secs = self.full_secs();
        self.persist();

        self.emit(Event::DurationRestored {
            mode: self.mode,
            minutes,
            at: Utc::now(),
        })
    }

    /// Adjust the current mode's duration. The clock jumps to the new full
    /// duration, also while running.
    pub fn change_duration(&mut self, delta_minutes: i64) -> Option<Event> {
        let minutes = self.settings.durations.adjust(self.mode, delta_minutes);
        self.remaining_secs = self.full_secs();
        self.persist();

        self.emit(Event::DurationChanged {
            mode: self.mode,
            minutes,
            at: Utc::now(),
        })
    }

    pub fn toggle_auto_switch(&mut self) -> Option<Event> {
        self.settings.auto_switch = !self.settings.auto_switch;
        self.persist();

        self.emit(Event::AutoSwitchToggled {
            enabled: self.settings.auto_switch,
            at: Utc::now(),
        })
    }

    pub fn clear_stats(&mut self) -> Option<Event> {
        self.settings.completed_focus = 0;
        self.persist();
        self.emit(Event::StatsCleared { at: Utc::now() })
    }

    /// Stop everything and flush settings.
    pub fn quit(&mut self) -> Option<Event> {
        self.cancel_tick_source();
        self.cancel_deferred_start();
        if self.is_running() {
            self.state = TimerState::Paused;
        }
        self.persist();
        info!(completed_focus = self.settings.completed_focus, "quitting");

        self.emit(Event::Quit {
            completed_focus: self.settings.completed_focus,
            at: Utc::now(),
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn complete(&mut self) -> Option<Event> {
        let finished = self.mode;
        self.notifier.notify();
        self.cancel_tick_source();
        self.state = TimerState::Idle;

        if finished == Mode::Focus {
            self.settings.completed_focus = self.settings.completed_focus.saturating_add(1);
            self.persist();
        }
        let completed_focus = self.settings.completed_focus;
        info!(mode = ?finished, completed_focus, "interval completed");

        self.status = format!(
            "{} completed! Focus sessions: {}",
            finished.label(),
            completed_focus
        );

        let next = if self.settings.auto_switch {
            let next = finished.next_after(completed_focus);
            self.switch_mode(next, true);
            let deferred = DeferredStart {
                id: self.ids.allocate(),
                delay: AUTO_START_DELAY,
            };
            self.deferred_start = Some(deferred);
            self.scheduled = Some(Event::AutoStartScheduled {
                mode: next,
                delay_secs: AUTO_START_DELAY.as_secs(),
                at: Utc::now(),
            });
            debug!(mode = ?next, source = deferred.id.get(), "auto start scheduled");
            Some(next)
        } else {
            None
        };

        Some(Event::TimerCompleted {
            mode: finished,
            completed_focus,
            next,
            at: Utc::now(),
        })
    }

    fn full_secs(&self) -> u64 {
        self.settings.durations.seconds(self.mode)
    }

    fn cancel_tick_source(&mut self) {
        if let Some(source) = self.tick_source.take() {
            debug!(source = source.id.get(), "tick source cancelled");
        }
    }

    fn cancel_deferred_start(&mut self) {
        self.scheduled = None;
        if let Some(deferred) = self.deferred_start.take() {
            debug!(source = deferred.id.get(), "deferred start cancelled");
        }
    }

    fn persist(&mut self) {
        if !self.store.save(&mut self.settings) {
            debug!("continuing with in-memory settings");
        }
    }

    fn emit(&mut self, event: Event) -> Option<Event> {
        self.status = event.status();
        Some(event)
    }
}

/// Format seconds as `MM:SS`. Minutes are not wrapped at 60.
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tempfile::TempDir;

    #[derive(Clone, Default)]
    struct CountingNotifier(Arc<AtomicUsize>);

    impl Notifier for CountingNotifier {
        fn notify(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct Harness {
        _dir: TempDir,
        store: SettingsStore,
        rings: Arc<AtomicUsize>,
        engine: TimerEngine,
    }

    fn harness(settings: PersistedSettings) -> Harness {
        let dir = TempDir::new().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json"));
        let notifier = CountingNotifier::default();
        let rings = notifier.0.clone();
        let engine = TimerEngine::new(store.clone(), settings, Box::new(notifier));
        Harness {
            _dir: dir,
            store,
            rings,
            engine,
        }
    }

    fn manual() -> PersistedSettings {
        PersistedSettings {
            auto_switch: false,
            ..PersistedSettings::default()
        }
    }

    fn run_out(engine: &mut TimerEngine) -> Option<Event> {
        let mut last = None;
        while engine.is_running() {
            last = engine.tick();
        }
        last
    }

    #[test]
    fn starts_idle_in_focus() {
        let h = harness(PersistedSettings::default());
        let snap = h.engine.snapshot();
        assert_eq!(snap.mode, Mode::Focus);
        assert_eq!(snap.state, TimerState::Idle);
        assert_eq!(snap.remaining_secs, 1500);
        assert_eq!(snap.clock, "25:00");
        assert_eq!(snap.completed_focus, 0);
        assert!(snap.auto_switch);
        assert_eq!(snap.status, "FOCUS - Ready");
        assert!(h.engine.tick_source().is_none());
    }

    #[test]
    fn restores_count_and_auto_switch() {
        let h = harness(PersistedSettings {
            completed_focus: 7,
            auto_switch: false,
            ..PersistedSettings::default()
        });
        assert_eq!(h.engine.completed_focus(), 7);
        assert!(!h.engine.auto_switch());
    }

    #[test]
    fn start_twice_keeps_single_tick_source() {
        let mut h = harness(PersistedSettings::default());
        assert!(h.engine.start().is_some());
        let first = h.engine.tick_source().unwrap();
        assert!(h.engine.start().is_none());
        assert_eq!(h.engine.tick_source(), Some(first));
        assert_eq!(first.period, TICK_PERIOD);
        assert_eq!(h.engine.status(), "FOCUS - Running");
    }

    #[test]
    fn pause_and_resume() {
        let mut h = harness(PersistedSettings::default());
        assert!(h.engine.pause().is_none());

        h.engine.start();
        let first = h.engine.tick_source().unwrap();
        h.engine.tick();
        h.engine.tick();
        assert!(h.engine.pause().is_some());
        assert_eq!(h.engine.state(), TimerState::Paused);
        assert!(h.engine.tick_source().is_none());
        assert_eq!(h.engine.status(), "FOCUS - Paused");

        // Ticks are ignored while paused.
        assert!(h.engine.tick().is_none());
        assert_eq!(h.engine.remaining_secs(), 1498);

        h.engine.start();
        let second = h.engine.tick_source().unwrap();
        assert_ne!(first.id, second.id);
        assert!(h.engine.on_tick(first.id).is_none());
        assert_eq!(h.engine.remaining_secs(), 1498);
        h.engine.on_tick(second.id);
        assert_eq!(h.engine.remaining_secs(), 1497);
    }

    #[test]
    fn toggle_flips_between_running_and_paused() {
        let mut h = harness(PersistedSettings::default());
        h.engine.apply(Command::ToggleStart);
        assert!(h.engine.is_running());
        h.engine.apply(Command::ToggleStart);
        assert_eq!(h.engine.state(), TimerState::Paused);
    }

    #[test]
    fn focus_runs_out_without_auto_switch() {
        let mut h = harness(manual());
        h.engine.start();
        let mut completed = None;
        for _ in 0..1500 {
            if let Some(event) = h.engine.tick() {
                completed = Some(event);
            }
        }

        assert_eq!(h.engine.remaining_secs(), 0);
        assert!(!h.engine.is_running());
        assert_eq!(h.engine.completed_focus(), 1);
        assert_eq!(h.engine.mode(), Mode::Focus);
        assert!(h.engine.tick_source().is_none());
        assert!(h.engine.deferred_start().is_none());
        assert_eq!(h.rings.load(Ordering::SeqCst), 1);
        assert_eq!(h.engine.status(), "FOCUS completed! Focus sessions: 1");
        match completed {
            Some(Event::TimerCompleted {
                mode,
                completed_focus,
                next,
                ..
            }) => {
                assert_eq!(mode, Mode::Focus);
                assert_eq!(completed_focus, 1);
                assert_eq!(next, None);
            }
            other => panic!("Expected TimerCompleted, got {other:?}"),
        }
        assert_eq!(h.store.load().completed_focus, 1);

        // Further ticks do nothing and never ring twice.
        assert!(h.engine.tick().is_none());
        assert_eq!(h.rings.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn restarting_after_completion_reloads_full_duration() {
        let mut h = harness(manual());
        h.engine.change_duration(-24);
        h.engine.start();
        run_out(&mut h.engine);
        assert_eq!(h.engine.remaining_secs(), 0);

        h.engine.start();
        assert_eq!(h.engine.remaining_secs(), 60);
        assert_eq!(h.engine.completed_focus(), 1);
    }

    #[test]
    fn focus_chains_into_short_break() {
        let mut h = harness(PersistedSettings::default());
        h.engine.start();
        let event = run_out(&mut h.engine);

        assert!(matches!(
            event,
            Some(Event::TimerCompleted {
                next: Some(Mode::ShortBreak),
                ..
            })
        ));
        assert_eq!(h.engine.mode(), Mode::ShortBreak);
        assert_eq!(h.engine.remaining_secs(), 300);
        assert_eq!(h.engine.state(), TimerState::Idle);
        assert_eq!(h.engine.status(), "SHORT BREAK - Ready");

        let deferred = h.engine.deferred_start().unwrap();
        assert_eq!(deferred.delay, AUTO_START_DELAY);
        assert!(h.engine.on_deferred_start(deferred.id).is_some());
        assert!(h.engine.is_running());
        assert!(h.engine.deferred_start().is_none());
    }

    #[test]
    fn fourth_focus_chains_into_long_break() {
        let mut h = harness(PersistedSettings {
            completed_focus: 3,
            ..PersistedSettings::default()
        });
        h.engine.start();
        run_out(&mut h.engine);

        assert_eq!(h.engine.completed_focus(), 4);
        assert_eq!(h.engine.mode(), Mode::LongBreak);
        assert_eq!(h.engine.remaining_secs(), 15 * 60);

        let deferred = h.engine.deferred_start().unwrap();
        h.engine.on_deferred_start(deferred.id);
        assert!(h.engine.is_running());
        assert_eq!(h.engine.mode(), Mode::LongBreak);
    }

    #[test]
    fn breaks_never_count() {
        for mode in [Mode::ShortBreak, Mode::LongBreak] {
            let mut h = harness(PersistedSettings {
                completed_focus: 4,
                ..PersistedSettings::default()
            });
            h.engine.switch_mode(mode, true);
            h.engine.start();
            run_out(&mut h.engine);

            assert_eq!(h.engine.completed_focus(), 4);
            assert_eq!(h.engine.mode(), Mode::Focus);
            assert_eq!(h.rings.load(Ordering::SeqCst), 1);
        }
    }

    #[test]
    fn completion_queues_auto_start_event() {
        let mut h = harness(PersistedSettings::default());
        h.engine.start();
        run_out(&mut h.engine);

        match h.engine.take_scheduled() {
            Some(Event::AutoStartScheduled {
                mode, delay_secs, ..
            }) => {
                assert_eq!(mode, Mode::ShortBreak);
                assert_eq!(delay_secs, AUTO_START_DELAY.as_secs());
            }
            other => panic!("Expected AutoStartScheduled, got {other:?}"),
        }
        assert!(h.engine.take_scheduled().is_none());
        // Taking the event does not cancel the start itself.
        assert!(h.engine.deferred_start().is_some());
    }

    #[test]
    fn cancelled_auto_start_is_not_reported() {
        let mut h = harness(PersistedSettings::default());
        h.engine.start();
        run_out(&mut h.engine);
        h.engine.pause();
        assert!(h.engine.take_scheduled().is_none());

        let mut h = harness(manual());
        h.engine.start();
        run_out(&mut h.engine);
        assert!(h.engine.take_scheduled().is_none());
    }

    #[test]
    fn pause_during_auto_start_window_wins() {
        let mut h = harness(PersistedSettings::default());
        h.engine.start();
        run_out(&mut h.engine);
        let deferred = h.engine.deferred_start().unwrap();

        assert!(h.engine.pause().is_none());
        assert!(h.engine.deferred_start().is_none());
        assert!(h.engine.on_deferred_start(deferred.id).is_none());
        assert!(!h.engine.is_running());
        assert_eq!(h.engine.mode(), Mode::ShortBreak);
    }

    #[test]
    fn manual_switch_during_auto_start_window_cancels_it() {
        let mut h = harness(PersistedSettings::default());
        h.engine.start();
        run_out(&mut h.engine);
        let deferred = h.engine.deferred_start().unwrap();

        h.engine.apply(Command::Switch(Mode::LongBreak));
        assert!(h.engine.on_deferred_start(deferred.id).is_none());
        assert!(!h.engine.is_running());
        assert_eq!(h.engine.mode(), Mode::LongBreak);

        h.engine.start();
        h.engine.apply(Command::Reset);
        assert!(h.engine.tick_source().is_none());
        assert_eq!(h.engine.state(), TimerState::Idle);
    }

    #[test]
    fn switch_cancels_tick_source_and_persists() {
        let mut h = harness(PersistedSettings::default());
        h.engine.start();
        let source = h.engine.tick_source().unwrap();
        h.engine.tick();

        assert!(h.engine.switch_mode(Mode::ShortBreak, true).is_some());
        assert!(!h.engine.is_running());
        assert!(h.engine.tick_source().is_none());
        assert_eq!(h.engine.remaining_secs(), 300);
        assert!(h.engine.on_tick(source.id).is_none());
        assert_eq!(h.engine.remaining_secs(), 300);
        assert!(h.store.load().last_used.is_some());
    }

    #[test]
    fn switch_without_reset_keeps_remaining() {
        let mut h = harness(PersistedSettings::default());
        h.engine.start();
        h.engine.tick();
        h.engine.switch_mode(Mode::LongBreak, false);
        assert_eq!(h.engine.remaining_secs(), 1499);
        assert_eq!(h.engine.mode(), Mode::LongBreak);
    }

    #[test]
    fn reset_restores_full_duration_without_saving() {
        let mut h = harness(PersistedSettings::default());
        h.engine.start();
        for _ in 0..10 {
            h.engine.tick();
        }
        h.engine.reset_timer();
        assert_eq!(h.engine.remaining_secs(), 1500);
        assert_eq!(h.engine.state(), TimerState::Idle);
        assert_eq!(h.engine.status(), "FOCUS - Reset");
        assert!(h.store.try_load().unwrap().is_none());
    }

    #[test]
    fn reset_to_default_restores_builtin_duration() {
        let mut h = harness(PersistedSettings::default());
        for delta in [10, -30, 7] {
            h.engine.change_duration(delta);
            h.engine.reset_to_default();
            assert_eq!(h.engine.durations().focus, 25);
            assert_eq!(h.engine.remaining_secs(), 1500);
        }
        assert_eq!(
            h.engine.status(),
            "FOCUS reset to default duration (25 minutes)"
        );
        assert_eq!(h.store.load().durations.focus, 25);

        h.engine.switch_mode(Mode::ShortBreak, true);
        h.engine.change_duration(4);
        h.engine.reset_to_default();
        assert_eq!(h.engine.durations().short_break, 5);
    }

    #[test]
    fn change_duration_while_running_restarts_clock() {
        let mut h = harness(PersistedSettings::default());
        h.engine.start();
        for _ in 0..30 {
            h.engine.tick();
        }
        h.engine.change_duration(5);
        assert_eq!(h.engine.durations().focus, 30);
        assert_eq!(h.engine.remaining_secs(), 1800);
        assert!(h.engine.is_running());
        assert_eq!(h.engine.status(), "FOCUS duration changed to 30 minutes");
        assert_eq!(h.store.load().durations.focus, 30);

        h.engine.change_duration(-100);
        assert_eq!(h.engine.durations().focus, 1);
        assert_eq!(h.engine.remaining_secs(), 60);
    }

    #[test]
    fn toggle_auto_switch_persists() {
        let mut h = harness(PersistedSettings::default());
        h.engine.apply(Command::ToggleAutoSwitch);
        assert!(!h.engine.auto_switch());
        assert_eq!(h.engine.status(), "Auto-switch disabled");
        assert!(!h.store.load().auto_switch);

        h.engine.apply(Command::ToggleAutoSwitch);
        assert!(h.store.load().auto_switch);
    }

    #[test]
    fn clear_stats_leaves_clock_alone() {
        let mut h = harness(PersistedSettings {
            completed_focus: 6,
            ..PersistedSettings::default()
        });
        h.engine.switch_mode(Mode::LongBreak, true);
        h.engine.start();
        h.engine.tick();

        h.engine.apply(Command::ClearStats);
        assert_eq!(h.engine.completed_focus(), 0);
        assert_eq!(h.engine.mode(), Mode::LongBreak);
        assert_eq!(h.engine.remaining_secs(), 899);
        assert!(h.engine.is_running());
        assert_eq!(h.store.load().completed_focus, 0);
    }

    #[test]
    fn quit_flushes_and_stops() {
        let mut h = harness(PersistedSettings::default());
        h.engine.change_duration(5);
        h.engine.start();
        assert!(matches!(
            h.engine.apply(Command::Quit),
            Some(Event::Quit { .. })
        ));
        assert!(!h.engine.is_running());
        assert!(h.engine.tick_source().is_none());

        let saved = h.store.load();
        assert_eq!(saved.durations.focus, 30);
        assert!(saved.last_used.is_some());
    }

    #[test]
    fn unwritable_store_keeps_memory_state() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let store = SettingsStore::new(blocker.join("settings.json"));
        let mut engine = TimerEngine::new(
            store,
            PersistedSettings::default(),
            Box::new(CountingNotifier::default()),
        );

        engine.change_duration(3);
        engine.toggle_auto_switch();
        assert_eq!(engine.durations().focus, 28);
        assert!(!engine.auto_switch());
    }

    #[test]
    fn clock_format() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(59), "00:59");
        assert_eq!(format_clock(1500), "25:00");
        assert_eq!(format_clock(125 * 60 + 7), "125:07");
    }

    proptest! {
        #[test]
        fn duration_never_drops_below_one_minute(
            deltas in prop::collection::vec(-120i64..120, 1..12),
            mode in prop::sample::select(Mode::ALL.to_vec()),
        ) {
            let mut h = harness(PersistedSettings::default());
            h.engine.switch_mode(mode, true);
            for delta in deltas {
                h.engine.change_duration(delta);
                prop_assert!(h.engine.durations().get(mode) >= 1);
                prop_assert_eq!(
                    h.engine.remaining_secs(),
                    u64::from(h.engine.durations().get(mode)) * 60
                );
            }
        }
    }
}
