//! Phase scheduler implementation.
//!
//! The scheduler is a tick-count-driven state machine. It does not own a
//! clock or any thread: the caller feeds it one `tick()` per elapsed second
//! while it is running, and is responsible for stopping the pulse source when
//! it is not.
//!
//! ## State Transitions
//!
//! ```text
//! (Focus, idle) <-> (Focus, running) -- 0s --> (Break, idle)
//! (Break, idle) <-> (Break, running) -- 0s --> (Focus, idle)
//! ```
//!
//! Reaching zero always stops the timer. Resuming into the next phase needs
//! an explicit `start()`, either from the user or from [`super::AutoCycle`].
//!
//! ## Usage
//!
//! ```ignore
//! let mut scheduler = PhaseScheduler::default();
//! scheduler.start();
//! // Once per second:
//! scheduler.tick(); // Returns Some(Event::PhaseCompleted) at a boundary
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::phase::{format_clock, PhaseDurations, SessionPhase};
use crate::events::Event;

/// Core focus/break state machine.
///
/// Owns the timer state exclusively; every mutation goes through one of the
/// command methods below.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseScheduler {
    durations: PhaseDurations,
    phase: SessionPhase,
    remaining_secs: u64,
    running: bool,
    /// Focus periods finished since construction. Survives `reset()`.
    completed_cycles: u64,
}

impl PhaseScheduler {
    /// Create a scheduler idle at the start of a focus period.
    pub fn new(durations: PhaseDurations) -> Self {
        Self {
            durations,
            phase: SessionPhase::Focus,
            remaining_secs: durations.focus_secs,
            running: false,
            completed_cycles: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn completed_cycles(&self) -> u64 {
        self.completed_cycles
    }

    pub fn durations(&self) -> PhaseDurations {
        self.durations
    }

    /// Full length of the current phase.
    pub fn total_secs(&self) -> u64 {
        self.durations.for_phase(self.phase)
    }

    /// 0.0 .. 1.0 progress within the current phase.
    pub fn progress(&self) -> f64 {
        let total = self.total_secs();
        if total == 0 {
            return 0.0;
        }
        1.0 - (self.remaining_secs as f64 / total as f64)
    }

    /// Remaining time as `MM:SS`.
    pub fn clock(&self) -> String {
        format_clock(self.remaining_secs)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            phase: self.phase,
            running: self.running,
            remaining_secs: self.remaining_secs,
            total_secs: self.total_secs(),
            completed_cycles: self.completed_cycles,
            clock: self.clock(),
            progress: self.progress(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin counting down. Returns `None` when already running, or when the
    /// phase has no time left and must transition first.
    pub fn start(&mut self) -> Option<Event> {
        if self.running || self.remaining_secs == 0 {
            return None;
        }
        self.running = true;
        tracing::debug!(phase = %self.phase, remaining = self.remaining_secs, "timer started");
        Some(Event::TimerStarted {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Stop counting down. Returns `None` when already stopped.
    pub fn pause(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        self.running = false;
        tracing::debug!(phase = %self.phase, remaining = self.remaining_secs, "timer paused");
        Some(Event::TimerPaused {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Start when stopped, pause when running.
    pub fn toggle(&mut self) -> Option<Event> {
        if self.running {
            self.pause()
        } else {
            self.start()
        }
    }

    /// Return to an idle focus period. The cycle counter is kept.
    pub fn reset(&mut self) -> Event {
        self.phase = SessionPhase::Focus;
        self.remaining_secs = self.durations.focus_secs;
        self.running = false;
        tracing::debug!(cycles = self.completed_cycles, "timer reset");
        Event::TimerReset {
            completed_cycles: self.completed_cycles,
            at: Utc::now(),
        }
    }

    /// Consume one second. Returns `Some(Event::PhaseCompleted)` when the
    /// phase runs out.
    ///
    /// Ticks delivered while stopped are ignored. A tick that finds the
    /// counter already at zero (a stale pulse) completes the phase exactly
    /// like the tick that takes it from one to zero; at most one transition
    /// happens per call.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        if self.remaining_secs > 1 {
            self.remaining_secs -= 1;
            return None;
        }

        self.remaining_secs = 0;
        self.running = false;
        let ended = self.phase;
        self.advance();
        tracing::info!(
            ended = %ended,
            next = %self.phase,
            cycles = self.completed_cycles,
            "phase completed"
        );
        Some(Event::PhaseCompleted {
            phase: ended,
            next_phase: self.phase,
            completed_cycles: self.completed_cycles,
            at: Utc::now(),
        })
    }

    /// Swap in new phase lengths and return to an idle focus period.
    pub fn set_durations(&mut self, durations: PhaseDurations) -> Event {
        self.durations = durations;
        self.reset()
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn advance(&mut self) {
        if self.phase == SessionPhase::Focus {
            self.completed_cycles += 1;
        }
        self.phase = self.phase.next();
        self.remaining_secs = self.durations.for_phase(self.phase);
    }
}

impl Default for PhaseScheduler {
    fn default() -> Self {
        Self::new(PhaseDurations::default())
    }
}
