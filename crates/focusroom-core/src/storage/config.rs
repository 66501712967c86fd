//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Focus and break lengths, and whether phases chain automatically
//! - Notification and completion-cue preferences
//! - Ambient audio defaults and the external player to use
//!
//! Configuration is stored at `<data dir>/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::ambient::AmbientTrack;
use crate::error::ConfigError;
use crate::timer::PhaseDurations;

/// Timer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_focus_minutes")]
    pub focus_minutes: u64,
    #[serde(default = "default_break_minutes")]
    pub break_minutes: u64,
    /// Start the next phase as soon as the previous one ends.
    #[serde(default)]
    pub auto_cycle: bool,
}

/// Notification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_true")]
    pub sound_enabled: bool,
}

/// Ambient audio configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmbientConfig {
    #[serde(default)]
    pub default_track: Option<AmbientTrack>,
    /// External program used to loop ambient tracks.
    #[serde(default = "default_player")]
    pub player: String,
    /// Directory containing `<track>.ogg` files.
    #[serde(default)]
    pub sound_dir: Option<String>,
    #[serde(default = "default_volume")]
    pub volume: u32,
}

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
    #[serde(default)]
    pub ambient: AmbientConfig,
}

// Default functions
fn default_focus_minutes() -> u64 {
    25
}
fn default_break_minutes() -> u64 {
    5
}
fn default_true() -> bool {
    true
}
fn default_player() -> String {
    "ffplay".into()
}
fn default_volume() -> u32 {
    50
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            focus_minutes: default_focus_minutes(),
            break_minutes: default_break_minutes(),
            auto_cycle: false,
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sound_enabled: true,
        }
    }
}

impl Default for AmbientConfig {
    fn default() -> Self {
        Self {
            default_track: None,
            player: default_player(),
            sound_dir: None,
            volume: default_volume(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        if key.is_empty() {
            return Err(unknown());
        }
        let mut parts = key.split('.').peekable();

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let clears = value.is_empty() || value.eq_ignore_ascii_case("none");
                let new_value = match existing {
                    // Optional fields deserialize `null` as unset; required ones reject it.
                    serde_json::Value::Null | serde_json::Value::String(_) if clears => {
                        serde_json::Value::Null
                    }
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => value
                        .parse::<u64>()
                        .map(|n| serde_json::Value::Number(n.into()))
                        .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?,
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// `<data dir>/config.toml`.
    pub fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("config.toml"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from disk or write and return the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config =
                    toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the result fails validation.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Set a config value by key and save.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.apply(key, value)?;
        self.save()
    }

    /// Phase lengths derived from the timer section.
    pub fn durations(&self) -> Result<PhaseDurations, ConfigError> {
        PhaseDurations::from_minutes(self.timer.focus_minutes, self.timer.break_minutes).map_err(
            |e| ConfigError::InvalidValue {
                key: "timer".into(),
                message: e.to_string(),
            },
        )
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.durations()?;
        if self.ambient.volume > 100 {
            return Err(ConfigError::InvalidValue {
                key: "ambient.volume".into(),
                message: "must be between 0 and 100".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.timer.focus_minutes, 25);
        assert_eq!(parsed.timer.break_minutes, 5);
        assert!(!parsed.timer.auto_cycle);
        assert!(parsed.notifications.sound_enabled);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let cfg: Config = toml::from_str("[timer]\nfocus_minutes = 50\n").unwrap();
        assert_eq!(cfg.timer.focus_minutes, 50);
        assert_eq!(cfg.timer.break_minutes, 5);
        assert_eq!(cfg.ambient.player, "ffplay");
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("timer.focus_minutes").as_deref(), Some("25"));
        assert_eq!(cfg.get("notifications.enabled").as_deref(), Some("true"));
        assert_eq!(cfg.get("ambient.player").as_deref(), Some("ffplay"));
        assert!(cfg.get("timer.missing_key").is_none());
    }

    #[test]
    fn apply_updates_nested_values() {
        let mut cfg = Config::default();
        cfg.apply("timer.auto_cycle", "true").unwrap();
        cfg.apply("timer.break_minutes", "10").unwrap();
        cfg.apply("ambient.default_track", "rain").unwrap();
        assert!(cfg.timer.auto_cycle);
        assert_eq!(cfg.timer.break_minutes, 10);
        assert_eq!(cfg.ambient.default_track, Some(AmbientTrack::Rain));
    }

    #[test]
    fn apply_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.apply("timer.nonexistent", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(cfg.apply("", "1"), Err(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn apply_rejects_invalid_values() {
        let mut cfg = Config::default();
        assert!(cfg.apply("timer.auto_cycle", "maybe").is_err());
        assert!(cfg.apply("timer.focus_minutes", "zero").is_err());
        assert!(cfg.apply("timer.focus_minutes", "0").is_err());
        assert!(cfg.apply("ambient.default_track", "thunder").is_err());
        assert!(cfg.apply("ambient.volume", "150").is_err());
        assert_eq!(cfg.timer.focus_minutes, 25);
    }

    #[test]
    fn apply_clears_optional_values() {
        let mut cfg = Config::default();
        cfg.apply("ambient.default_track", "ocean").unwrap();
        cfg.apply("ambient.sound_dir", "/tmp/sounds").unwrap();

        cfg.apply("ambient.default_track", "none").unwrap();
        cfg.apply("ambient.sound_dir", "").unwrap();
        assert_eq!(cfg.ambient.default_track, None);
        assert_eq!(cfg.ambient.sound_dir, None);

        assert!(cfg.apply("ambient.player", "").is_err());
        assert_eq!(cfg.ambient.player, "ffplay");
    }

    #[test]
    fn durations_follow_timer_section() {
        let mut cfg = Config::default();
        cfg.timer.focus_minutes = 45;
        cfg.timer.break_minutes = 15;
        let d = cfg.durations().unwrap();
        assert_eq!(d.focus_secs, 2700);
        assert_eq!(d.break_secs, 900);
    }

    #[test]
    fn load_from_writes_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.timer.focus_minutes, 25);
        assert!(path.exists());
    }

    #[test]
    fn load_from_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "timer = [").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::ParseFailed(_))
        ));
    }

    #[test]
    fn save_and_reload_preserves_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.apply("ambient.sound_dir", "/tmp/sounds").unwrap();
        cfg.save_to(&path).unwrap();

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.ambient.sound_dir.as_deref(), Some("/tmp/sounds"));
    }
}
