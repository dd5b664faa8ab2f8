//! Tokio-backed repeating tick for the countdown controller

use std::time::Duration;
use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::debug;

use crate::controller::{RunId, TickHandle, TickScheduler};

/// One periodic tick, measured against the tokio clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub run: RunId,
    pub elapsed: Duration,
}

/// Schedules ticks as interval tasks that report over an mpsc channel
#[derive(Debug, Clone)]
pub struct TokioTickScheduler {
    tick_tx: mpsc::UnboundedSender<Tick>,
}

impl TokioTickScheduler {
    /// Create a scheduler and the receiving end its ticks arrive on
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Tick>) {
        let (tick_tx, tick_rx) = mpsc::unbounded_channel();
        (Self { tick_tx }, tick_rx)
    }
}

/// Aborts the interval task of one run
#[derive(Debug)]
pub struct TokioTickHandle {
    task: JoinHandle<()>,
}

impl TickScheduler for TokioTickScheduler {
    type Handle = TokioTickHandle;

    fn schedule(&mut self, period: Duration, run: RunId) -> TokioTickHandle {
        let tick_tx = self.tick_tx.clone();
        let mut last = Instant::now();

        let task = tokio::spawn(async move {
            // First tick lands one full period after the start
            let mut interval = interval_at(last + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;
                let now = Instant::now();
                let elapsed = now.duration_since(last);
                last = now;

                if tick_tx.send(Tick { run, elapsed }).is_err() {
                    debug!("Tick receiver dropped, ending {:?}", run);
                    break;
                }
            }
        });

        debug!("Scheduled {:?} every {:?}", run, period);
        TokioTickHandle { task }
    }
}

impl TickHandle for TokioTickHandle {
    fn cancel(self) {
        self.task.abort();
    }
}
