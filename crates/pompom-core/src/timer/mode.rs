use serde::{Deserialize, Serialize};

/// Minimum duration any mode can be configured to, in minutes.
pub const MIN_DURATION_MIN: u32 = 1;

/// Every Nth completed focus session is followed by a long break.
pub const LONG_BREAK_EVERY: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Mode {
    Focus,
    ShortBreak,
    LongBreak,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Focus, Mode::ShortBreak, Mode::LongBreak];

    /// Human-readable label shown in the status bar and menu.
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Focus => "FOCUS",
            Mode::ShortBreak => "SHORT BREAK",
            Mode::LongBreak => "LONG BREAK",
        }
    }

    /// Key used in the settings file.
    pub fn key(&self) -> &'static str {
        match self {
            Mode::Focus => "FOCUS",
            Mode::ShortBreak => "SHORT_BREAK",
            Mode::LongBreak => "LONG_BREAK",
        }
    }

    pub fn from_key(s: &str) -> Option<Self> {
        Mode::ALL.into_iter().find(|m| m.key().eq_ignore_ascii_case(s))
    }

    /// Nominal next mode when auto-switch chains intervals.
    ///
    /// Focus is routed to a long break every [`LONG_BREAK_EVERY`] sessions;
    /// see [`Mode::next_after`].
    pub fn successor(&self) -> Mode {
        match self {
            Mode::Focus => Mode::ShortBreak,
            Mode::ShortBreak | Mode::LongBreak => Mode::Focus,
        }
    }

    /// Mode to chain into once this mode completes, given the completed-focus
    /// count *after* the completion was counted.
    pub fn next_after(&self, completed_focus: u32) -> Mode {
        if *self == Mode::Focus && completed_focus > 0 && completed_focus % LONG_BREAK_EVERY == 0 {
            Mode::LongBreak
        } else {
            self.successor()
        }
    }

    /// Built-in duration in minutes.
    pub fn default_minutes(&self) -> u32 {
        match self {
            Mode::Focus => 25,
            Mode::ShortBreak => 5,
            Mode::LongBreak => 15,
        }
    }
}

/// Configured duration per mode, in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationConfig {
    #[serde(rename = "FOCUS", default = "default_focus")]
    pub focus: u32,
    #[serde(rename = "SHORT_BREAK", default = "default_short_break")]
    pub short_break: u32,
    #[serde(rename = "LONG_BREAK", default = "default_long_break")]
    pub long_break: u32,
}

fn default_focus() -> u32 {
    Mode::Focus.default_minutes()
}
fn default_short_break() -> u32 {
    Mode::ShortBreak.default_minutes()
}
fn default_long_break() -> u32 {
    Mode::LongBreak.default_minutes()
}

impl Default for DurationConfig {
    fn default() -> Self {
        Self {
            focus: default_focus(),
            short_break: default_short_break(),
            long_break: default_long_break(),
        }
    }
}

impl DurationConfig {
    pub fn get(&self, mode: Mode) -> u32 {
        match mode {
            Mode::Focus => self.focus,
            Mode::ShortBreak => self.short_break,
            Mode::LongBreak => self.long_break,
        }
    }

    /// Set a duration, raising it to [`MIN_DURATION_MIN`] if needed.
    /// Returns the value actually stored.
    pub fn set(&mut self, mode: Mode, minutes: u32) -> u32 {
        let minutes = minutes.max(MIN_DURATION_MIN);
        match mode {
            Mode::Focus => self.focus = minutes,
            Mode::ShortBreak => self.short_break = minutes,
            Mode::LongBreak => self.long_break = minutes,
        }
        minutes
    }

    /// Add `delta` minutes (may be negative), floored at [`MIN_DURATION_MIN`].
    pub fn adjust(&mut self, mode: Mode, delta: i64) -> u32 {
        let current = i64::from(self.get(mode));
        let next = current
            .saturating_add(delta)
            .clamp(i64::from(MIN_DURATION_MIN), i64::from(u32::MAX));
        self.set(mode, next as u32)
    }

    /// Duration of `mode` in seconds.
    ///
    /// Saturates rather than overflowing for absurd configured values.
    pub fn seconds(&self, mode: Mode) -> u64 {
        u64::from(self.get(mode)).saturating_mul(60)
    }

    /// Raise every entry to the floor. Used on values read from disk.
    pub fn normalized(mut self) -> Self {
        for mode in Mode::ALL {
            let minutes = self.get(mode);
            self.set(mode, minutes);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn successors_chain_back_to_focus() {
        assert_eq!(Mode::Focus.successor(), Mode::ShortBreak);
        assert_eq!(Mode::ShortBreak.successor(), Mode::Focus);
        assert_eq!(Mode::LongBreak.successor(), Mode::Focus);
    }

    #[test]
    fn every_fourth_focus_goes_to_long_break() {
        assert_eq!(Mode::Focus.next_after(1), Mode::ShortBreak);
        assert_eq!(Mode::Focus.next_after(3), Mode::ShortBreak);
        assert_eq!(Mode::Focus.next_after(4), Mode::LongBreak);
        assert_eq!(Mode::Focus.next_after(8), Mode::LongBreak);
        assert_eq!(Mode::Focus.next_after(0), Mode::ShortBreak);
        // Breaks ignore the counter.
        assert_eq!(Mode::ShortBreak.next_after(4), Mode::Focus);
        assert_eq!(Mode::LongBreak.next_after(8), Mode::Focus);
    }

    #[test]
    fn serde_uses_settings_keys() {
        let json = serde_json::to_string(&Mode::ShortBreak).unwrap();
        assert_eq!(json, "\"SHORT_BREAK\"");
        let parsed: Mode = serde_json::from_str("\"LONG_BREAK\"").unwrap();
        assert_eq!(parsed, Mode::LongBreak);
        assert_eq!(Mode::from_key("focus"), Some(Mode::Focus));
        assert_eq!(Mode::from_key("nap"), None);
    }

    #[test]
    fn adjust_is_floored() {
        let mut d = DurationConfig::default();
        assert_eq!(d.adjust(Mode::ShortBreak, -10), 1);
        assert_eq!(d.adjust(Mode::ShortBreak, 2), 3);
        assert_eq!(d.adjust(Mode::Focus, i64::MIN), 1);
        assert_eq!(d.seconds(Mode::ShortBreak), 180);
    }

    #[test]
    fn durations_deserialize_with_missing_entries() {
        let d: DurationConfig = serde_json::from_str(r#"{"FOCUS": 50}"#).unwrap();
        assert_eq!(d.focus, 50);
        assert_eq!(d.short_break, 5);
        assert_eq!(d.long_break, 15);
    }

    #[test]
    fn normalized_raises_zero_durations() {
        let d = DurationConfig {
            focus: 0,
            short_break: 5,
            long_break: 0,
        }
        .normalized();
        assert_eq!(d.focus, 1);
        assert_eq!(d.long_break, 1);
    }
}
