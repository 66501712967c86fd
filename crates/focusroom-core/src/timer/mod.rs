mod clock;
mod engine;
mod phase;
mod policy;

pub use clock::{ClockTick, Pulse};
pub use engine::PhaseScheduler;
pub use phase::{
    format_clock, PhaseDurations, SessionPhase, BREAK_DURATION_SECS, FOCUS_DURATION_SECS,
};
pub use policy::AutoCycle;
