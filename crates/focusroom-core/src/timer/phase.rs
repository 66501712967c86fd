use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Default focus period: 25 minutes.
pub const FOCUS_DURATION_SECS: u64 = 25 * 60;
/// Default break period: 5 minutes.
pub const BREAK_DURATION_SECS: u64 = 5 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    Focus,
    Break,
}

impl SessionPhase {
    /// The phase that follows this one.
    pub fn next(self) -> Self {
        match self {
            SessionPhase::Focus => SessionPhase::Break,
            SessionPhase::Break => SessionPhase::Focus,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SessionPhase::Focus => "Focus",
            SessionPhase::Break => "Break",
        }
    }
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Length of each phase, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseDurations {
    pub focus_secs: u64,
    pub break_secs: u64,
}

impl PhaseDurations {
    /// Build durations from whole minutes.
    ///
    /// Uses saturating arithmetic so absurd configuration values cannot
    /// overflow. Zero-length phases are rejected: a phase must last at least
    /// one tick.
    pub fn from_minutes(focus_min: u64, break_min: u64) -> Result<Self, ValidationError> {
        Self::from_secs(focus_min.saturating_mul(60), break_min.saturating_mul(60))
    }

    pub fn from_secs(focus_secs: u64, break_secs: u64) -> Result<Self, ValidationError> {
        if focus_secs == 0 {
            return Err(ValidationError::InvalidValue {
                field: "focus".into(),
                message: "duration must be at least one second".into(),
            });
        }
        if break_secs == 0 {
            return Err(ValidationError::InvalidValue {
                field: "break".into(),
                message: "duration must be at least one second".into(),
            });
        }
        Ok(Self {
            focus_secs,
            break_secs,
        })
    }

    pub fn for_phase(&self, phase: SessionPhase) -> u64 {
        match phase {
            SessionPhase::Focus => self.focus_secs,
            SessionPhase::Break => self.break_secs,
        }
    }
}

impl Default for PhaseDurations {
    fn default() -> Self {
        Self {
            focus_secs: FOCUS_DURATION_SECS,
            break_secs: BREAK_DURATION_SECS,
        }
    }
}

/// Render seconds as a zero-padded `MM:SS` clock face.
///
/// Minutes are not wrapped into hours, so a 90 minute phase reads `90:00`.
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
