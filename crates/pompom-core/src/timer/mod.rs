mod command;
mod engine;
mod mode;
mod tick;

pub use command::Command;
pub use engine::{format_clock, Snapshot, TimerEngine, TimerState};
pub use mode::{DurationConfig, Mode, LONG_BREAK_EVERY, MIN_DURATION_MIN};
pub use tick::{DeferredStart, SourceId, TickSource, AUTO_START_DELAY, TICK_PERIOD};
