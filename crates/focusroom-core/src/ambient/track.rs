use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Background loops the user can pick from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmbientTrack {
    Rain,
    Forest,
    Cafe,
    Ocean,
}

impl AmbientTrack {
    pub const ALL: [AmbientTrack; 4] = [
        AmbientTrack::Rain,
        AmbientTrack::Forest,
        AmbientTrack::Cafe,
        AmbientTrack::Ocean,
    ];

    /// Lowercase identifier, also used as the sound file stem.
    pub fn id(self) -> &'static str {
        match self {
            AmbientTrack::Rain => "rain",
            AmbientTrack::Forest => "forest",
            AmbientTrack::Cafe => "cafe",
            AmbientTrack::Ocean => "ocean",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AmbientTrack::Rain => "Rain",
            AmbientTrack::Forest => "Forest",
            AmbientTrack::Cafe => "Cafe",
            AmbientTrack::Ocean => "Ocean",
        }
    }
}

impl std::fmt::Display for AmbientTrack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AmbientTrack {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        AmbientTrack::ALL
            .into_iter()
            .find(|t| t.id().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ValidationError::UnknownTrack(s.to_string()))
    }
}
