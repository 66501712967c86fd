//! Periodic pulse source for driving the scheduler.
//!
//! `ClockTick` wraps a spawned tokio interval task. It is owned by whoever
//! owns the scheduler; the scheduler never sees the clock, only the ticks
//! the owner forwards to it.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// One elapsed period. `seq` counts from 1 each time the clock is started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pulse {
    pub seq: u64,
}

/// Cancelable repeating pulse.
pub struct ClockTick {
    period: Duration,
    task: Option<JoinHandle<()>>,
    rx: Option<mpsc::Receiver<Pulse>>,
}

impl ClockTick {
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(Duration::from_millis(1)),
            task: None,
            rx: None,
        }
    }

    pub fn every_second() -> Self {
        Self::new(Duration::from_secs(1))
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_active(&self) -> bool {
        self.task.is_some()
    }

    /// Begin pulsing. The first pulse arrives one full period from now.
    ///
    /// Must be called from inside a tokio runtime. No-op when already active.
    pub fn start(&mut self) {
        if self.is_active() {
            return;
        }
        // Capacity 1: a slow consumer delays the clock instead of letting
        // pulses pile up.
        let (tx, rx) = mpsc::channel(1);
        let period = self.period;
        let task = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut seq = 0u64;
            loop {
                interval.tick().await;
                seq += 1;
                if tx.send(Pulse { seq }).await.is_err() {
                    break;
                }
            }
        });
        self.task = Some(task);
        self.rx = Some(rx);
        tracing::debug!(?period, "clock started");
    }

    /// Cancel the pulse task and drop any pulse not yet received.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            tracing::debug!("clock stopped");
        }
        self.rx = None;
    }

    /// Wait for the next pulse. Returns `None` immediately when stopped.
    pub async fn next(&mut self) -> Option<Pulse> {
        match self.rx.as_mut() {
            Some(rx) => rx.recv().await,
            None => None,
        }
    }
}

impl Drop for ClockTick {
    fn drop(&mut self) {
        self.stop();
    }
}
