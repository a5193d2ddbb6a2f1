use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::Mode;

/// Every state change of the engine produces an Event.
/// The presenter receives it alongside the engine after each step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        mode: Mode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        mode: Mode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// An interval ran out. `next` is the mode auto-switch chained into.
    TimerCompleted {
        mode: Mode,
        completed_focus: u32,
        next: Option<Mode>,
        at: DateTime<Utc>,
    },
    /// `mode` starts by itself after `delay_secs`.
    AutoStartScheduled {
        mode: Mode,
        delay_secs: u64,
        at: DateTime<Utc>,
    },
    ModeSwitched {
        mode: Mode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        mode: Mode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    DurationChanged {
        mode: Mode,
        minutes: u32,
        at: DateTime<Utc>,
    },
    DurationRestored {
        mode: Mode,
        minutes: u32,
        at: DateTime<Utc>,
    },
    AutoSwitchToggled {
        enabled: bool,
        at: DateTime<Utc>,
    },
    StatsCleared {
        at: DateTime<Utc>,
    },
    Quit {
        completed_focus: u32,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Status-bar text for this event.
    pub fn status(&self) -> String {
        match self {
            Event::TimerStarted { mode, .. } => format!("{} - Running", mode.label()),
            Event::TimerPaused { mode, .. } => format!("{} - Paused", mode.label()),
            Event::TimerCompleted {
                mode,
                completed_focus,
                ..
            } => format!("{} completed! Focus sessions: {}", mode.label(), completed_focus),
            Event::AutoStartScheduled {
                mode, delay_secs, ..
            } => format!("{} - Starting in {}s", mode.label(), delay_secs),
            Event::ModeSwitched { mode, .. } => format!("{} - Ready", mode.label()),
            Event::TimerReset { mode, .. } => format!("{} - Reset", mode.label()),
            Event::DurationChanged { mode, minutes, .. } => {
                format!("{} duration changed to {} minutes", mode.label(), minutes)
            }
            Event::DurationRestored { mode, minutes, .. } => format!(
                "{} reset to default duration ({} minutes)",
                mode.label(),
                minutes
            ),
            Event::AutoSwitchToggled { enabled, .. } => format!(
                "Auto-switch {}",
                if *enabled { "enabled" } else { "disabled" }
            ),
            Event::StatsCleared { .. } => "Statistics cleared".to_string(),
            Event::Quit { .. } => "Bye".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_lines() {
        let at = Utc::now();
        assert_eq!(
            Event::TimerStarted {
                mode: Mode::ShortBreak,
                remaining_secs: 300,
                at
            }
            .status(),
            "SHORT BREAK - Running"
        );
        assert_eq!(
            Event::TimerCompleted {
                mode: Mode::Focus,
                completed_focus: 3,
                next: None,
                at
            }
            .status(),
            "FOCUS completed! Focus sessions: 3"
        );
        assert_eq!(
            Event::DurationRestored {
                mode: Mode::LongBreak,
                minutes: 15,
                at
            }
            .status(),
            "LONG BREAK reset to default duration (15 minutes)"
        );
        assert_eq!(
            Event::AutoStartScheduled {
                mode: Mode::ShortBreak,
                delay_secs: 1,
                at
            }
            .status(),
            "SHORT BREAK - Starting in 1s"
        );
        assert_eq!(
            Event::AutoSwitchToggled { enabled: false, at }.status(),
            "Auto-switch disabled"
        );
    }

    #[test]
    fn serializes_with_type_tag() {
        let event = Event::StatsCleared { at: Utc::now() };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "StatsCleared");
    }
}
