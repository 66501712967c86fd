//! # Focusroom Core Library
//!
//! This library provides the focus timer behind Focusroom: a Pomodoro-style
//! work/break cycle with phase-boundary notifications, ambient background
//! audio and a persistent log of session notes. The CLI is a thin host over
//! the same types.
//!
//! ## Architecture
//!
//! - **Timer**: A tick-driven state machine. The owner feeds it one `tick()`
//!   per second from a [`ClockTick`] while it runs
//! - **Notifications**: Best-effort alert and cue delivery on phase boundaries
//! - **Ambient**: One looping background track, playing in step with the timer
//! - **Notes**: Append-only note log in SQLite-backed key-value storage
//!
//! ## Key Components
//!
//! - [`PhaseScheduler`]: Core focus/break state machine
//! - [`FocusSession`]: Scheduler plus dispatcher, ambient audio and notes
//! - [`SessionNoteStore`]: Note persistence
//! - [`Config`]: Application configuration management

pub mod ambient;
pub mod error;
pub mod events;
pub mod notes;
pub mod notify;
pub mod session;
pub mod storage;
pub mod timer;

pub use ambient::{AmbientSoundController, AmbientTrack, AudioChannel, AudioError, NullAudio};
pub use error::{ConfigError, CoreError, StorageError, ValidationError};
pub use events::Event;
pub use notes::{SessionNote, SessionNoteStore, NOTES_KEY};
pub use notify::{
    Alert, AlertChannel, CueChannel, DeliveryError, DispatchOutcome, NotificationDispatcher,
    Permission, Silent,
};
pub use session::FocusSession;
pub use storage::{Config, Database, KvStore, MemoryKv};
pub use timer::{
    format_clock, AutoCycle, ClockTick, PhaseDurations, PhaseScheduler, Pulse, SessionPhase,
};
