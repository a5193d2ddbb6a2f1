//! Event loop driving a [`TimerEngine`].
//!
//! One logical timeline: user signals, the periodic tick source and the
//! deferred auto-start are all handled on the task running [`run`]. The loop
//! mirrors the handles the engine currently holds as tokio timers and re-arms
//! them whenever the engine replaces one, so at most one interval exists.

use std::future::pending;
use std::pin::Pin;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::{interval_at, sleep, Instant, Interval, Sleep};
use tracing::debug;

use crate::events::Event;
use crate::timer::{Command, SourceId, TimerEngine};

/// Input to the event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Command(Command),
    /// Re-render without touching the engine (terminal resize, help overlay).
    Redraw,
}

impl From<Command> for Signal {
    fn from(command: Command) -> Self {
        Signal::Command(command)
    }
}

/// Presentation layer: called at startup and after every processed input.
pub trait Presenter {
    fn render(&mut self, engine: &TimerEngine, event: Option<&Event>);
}

impl<F> Presenter for F
where
    F: FnMut(&TimerEngine, Option<&Event>),
{
    fn render(&mut self, engine: &TimerEngine, event: Option<&Event>) {
        self(engine, event)
    }
}

/// Run until [`Command::Quit`] arrives or every sender is dropped.
///
/// The engine is quit (and its settings flushed) before it is handed back.
pub async fn run<P>(
    mut engine: TimerEngine,
    mut signals: UnboundedReceiver<Signal>,
    presenter: &mut P,
) -> TimerEngine
where
    P: Presenter + ?Sized,
{
    let mut ticker: Option<(SourceId, Interval)> = None;
    let mut deferred: Option<(SourceId, Pin<Box<Sleep>>)> = None;

    presenter.render(&engine, None);

    loop {
        sync_ticker(&engine, &mut ticker);
        sync_deferred(&engine, &mut deferred);

        let event = tokio::select! {
            biased;

            signal = signals.recv() => match signal {
                Some(Signal::Command(Command::Quit)) | None => break,
                Some(Signal::Command(command)) => engine.apply(command),
                Some(Signal::Redraw) => None,
            },
            source = next_tick(&mut ticker) => engine.on_tick(source),
            source = next_deferred(&mut deferred) => engine.on_deferred_start(source),
        };

        presenter.render(&engine, event.as_ref());
        if let Some(scheduled) = engine.take_scheduled() {
            presenter.render(&engine, Some(&scheduled));
        }
    }

    let event = engine.quit();
    presenter.render(&engine, event.as_ref());
    engine
}

fn sync_ticker(engine: &TimerEngine, ticker: &mut Option<(SourceId, Interval)>) {
    match (engine.tick_source(), ticker.as_ref()) {
        (Some(source), Some((armed, _))) if source.id == *armed => {}
        (Some(source), _) => {
            debug!(source = source.id.get(), "arming interval");
            let interval = interval_at(Instant::now() + source.period, source.period);
            *ticker = Some((source.id, interval));
        }
        (None, _) => *ticker = None,
    }
}

fn sync_deferred(engine: &TimerEngine, deferred: &mut Option<(SourceId, Pin<Box<Sleep>>)>) {
    match (engine.deferred_start(), deferred.as_ref()) {
        (Some(start), Some((armed, _))) if start.id == *armed => {}
        (Some(start), _) => {
            debug!(source = start.id.get(), "arming deferred start");
            *deferred = Some((start.id, Box::pin(sleep(start.delay))));
        }
        (None, _) => *deferred = None,
    }
}

async fn next_tick(ticker: &mut Option<(SourceId, Interval)>) -> SourceId {
    match ticker {
        Some((id, interval)) => {
            interval.tick().await;
            *id
        }
        None => pending().await,
    }
}

async fn next_deferred(deferred: &mut Option<(SourceId, Pin<Box<Sleep>>)>) -> SourceId {
    match deferred {
        Some((id, delay)) => {
            delay.as_mut().await;
            *id
        }
        None => pending().await,
    }
}
