//! Phase-boundary notifications.
//!
//! The dispatcher turns `PhaseCompleted` events into an out-of-band alert
//! and a one-shot audible cue. Delivery is best-effort: a denied permission
//! or a failing backend is logged and swallowed, never reported back to the
//! scheduler.

use thiserror::Error;

use crate::events::Event;
use crate::timer::SessionPhase;

/// Host permission for out-of-band alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    /// Not asked yet.
    Unknown,
    Granted,
    Denied,
}

/// Title and body shown when a phase ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub body: String,
}

impl Alert {
    /// The fixed message pair for the phase that just ended.
    pub fn for_completed(phase: SessionPhase) -> Self {
        match phase {
            SessionPhase::Focus => Self {
                title: "Focus session complete".into(),
                body: "Nice work. Your break is starting now.".into(),
            },
            SessionPhase::Break => Self {
                title: "Break is over".into(),
                body: "Time to start your next focus session.".into(),
            },
        }
    }
}

#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("notification backend unavailable: {0}")]
    Unavailable(String),

    #[error("notification delivery failed: {0}")]
    Failed(String),
}

/// Out-of-band alert backend (desktop notification, push, ...).
pub trait AlertChannel {
    /// Ask the host for permission. Called at most once per dispatcher.
    fn request_permission(&mut self) -> Permission;

    fn show(&mut self, alert: &Alert) -> Result<(), DeliveryError>;
}

/// One-shot completion sound.
pub trait CueChannel {
    fn play_cue(&mut self) -> Result<(), DeliveryError>;
}

/// Backend that delivers nothing. Alerts are always denied.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl AlertChannel for Silent {
    fn request_permission(&mut self) -> Permission {
        Permission::Denied
    }

    fn show(&mut self, _alert: &Alert) -> Result<(), DeliveryError> {
        Ok(())
    }
}

impl CueChannel for Silent {
    fn play_cue(&mut self) -> Result<(), DeliveryError> {
        Ok(())
    }
}

/// What actually reached the user for one event.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub alert_shown: bool,
    pub cue_played: bool,
}

pub struct NotificationDispatcher {
    alerts: Box<dyn AlertChannel>,
    cue: Box<dyn CueChannel>,
    sound_enabled: bool,
    permission: Permission,
}

impl NotificationDispatcher {
    pub fn new(alerts: Box<dyn AlertChannel>, cue: Box<dyn CueChannel>) -> Self {
        Self {
            alerts,
            cue,
            sound_enabled: true,
            permission: Permission::Unknown,
        }
    }

    /// Dispatcher with no backends at all.
    pub fn silent() -> Self {
        Self::new(Box::new(Silent), Box::new(Silent))
    }

    pub fn with_sound(mut self, enabled: bool) -> Self {
        self.sound_enabled = enabled;
        self
    }

    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    /// Flip the cue preference, returning the new value.
    pub fn toggle_sound(&mut self) -> bool {
        self.sound_enabled = !self.sound_enabled;
        self.sound_enabled
    }

    pub fn permission(&self) -> Permission {
        self.permission
    }

    /// Ask for alert permission now instead of on the first boundary.
    pub fn request_permission(&mut self) -> Permission {
        if self.permission == Permission::Unknown {
            self.permission = self.alerts.request_permission();
            tracing::debug!(permission = ?self.permission, "alert permission resolved");
        }
        self.permission
    }

    /// Notify the user about a finished phase. Other events are ignored.
    pub fn dispatch(&mut self, event: &Event) -> DispatchOutcome {
        let Some(phase) = event.completed_phase() else {
            return DispatchOutcome::default();
        };
        let mut outcome = DispatchOutcome::default();

        if self.request_permission() == Permission::Granted {
            let alert = Alert::for_completed(phase);
            match self.alerts.show(&alert) {
                Ok(()) => outcome.alert_shown = true,
                Err(e) => tracing::warn!(error = %e, "alert not delivered"),
            }
        } else {
            tracing::debug!(phase = %phase, "alerts not permitted; skipping");
        }

        if self.sound_enabled {
            match self.cue.play_cue() {
                Ok(()) => outcome.cue_played = true,
                Err(e) => tracing::warn!(error = %e, "completion cue not played"),
            }
        }

        outcome
    }
}

impl std::fmt::Debug for NotificationDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationDispatcher")
            .field("sound_enabled", &self.sound_enabled)
            .field("permission", &self.permission)
            .finish_non_exhaustive()
    }
}
