//! Handles for the engine's scheduled work.
//!
//! The engine never sleeps. It records *what* should be scheduled (a periodic
//! tick source, a one-shot deferred start) under a fresh [`SourceId`], and the
//! runtime driver mirrors whatever the engine currently holds. A firing that
//! carries an id the engine no longer holds is stale and ignored.

use std::time::Duration;

/// Period of the tick source.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Delay between an auto-switch and the automatic start of the next interval.
pub const AUTO_START_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(u64);

impl SourceId {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Allocates ids; never hands out the same id twice for one engine.
#[derive(Debug, Default)]
pub(crate) struct SourceIds {
    next: u64,
}

impl SourceIds {
    pub(crate) fn allocate(&mut self) -> SourceId {
        self.next += 1;
        SourceId(self.next)
    }
}

/// An armed periodic tick source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSource {
    pub id: SourceId,
    pub period: Duration,
}

/// An armed one-shot `start()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeferredStart {
    pub id: SourceId,
    pub delay: Duration,
}
