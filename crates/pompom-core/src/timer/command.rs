use serde::{Deserialize, Serialize};

use super::Mode;

/// Discrete user commands forwarded by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    /// Start when stopped, pause when running.
    ToggleStart,
    Reset,
    ResetToDefault,
    Switch(Mode),
    IncreaseDuration,
    DecreaseDuration,
    ToggleAutoSwitch,
    ClearStats,
    Quit,
}
