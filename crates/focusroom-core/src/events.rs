use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ambient::AmbientTrack;
use crate::timer::SessionPhase;

/// Every state change in a focus session produces an Event.
/// The UI renders them; the notification dispatcher and ambient
/// controller react to them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerStarted {
        phase: SessionPhase,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        phase: SessionPhase,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        completed_cycles: u64,
        at: DateTime<Utc>,
    },
    /// A phase ran out. `phase` is the one that just ended; the scheduler
    /// has already moved to `next_phase` and stopped running.
    PhaseCompleted {
        phase: SessionPhase,
        next_phase: SessionPhase,
        completed_cycles: u64,
        at: DateTime<Utc>,
    },
    AmbientChanged {
        track: Option<AmbientTrack>,
        at: DateTime<Utc>,
    },
    NoteSaved {
        note_id: String,
        cycle: u64,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        phase: SessionPhase,
        running: bool,
        remaining_secs: u64,
        total_secs: u64,
        completed_cycles: u64,
        clock: String,
        progress: f64,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// The phase that ended, if this is a phase-completion event.
    pub fn completed_phase(&self) -> Option<SessionPhase> {
        match self {
            Event::PhaseCompleted { phase, .. } => Some(*phase),
            _ => None,
        }
    }
}
