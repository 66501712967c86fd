//! Continuous cycling.
//!
//! The scheduler stops at every phase boundary. `AutoCycle` sits on top of
//! it and restarts the next phase as soon as a completion event comes out,
//! leaving the engine's own behavior untouched.

use super::engine::PhaseScheduler;
use crate::events::Event;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AutoCycle {
    enabled: bool,
}

impl AutoCycle {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// React to an event the scheduler just produced. Returns the
    /// `TimerStarted` event when the next phase was started.
    pub fn apply(&self, scheduler: &mut PhaseScheduler, event: &Event) -> Option<Event> {
        if !self.enabled || event.completed_phase().is_none() {
            return None;
        }
        scheduler.start()
    }
}
