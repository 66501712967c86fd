//! Host backends for alerts, the completion cue and ambient playback.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};

use focusroom_core::storage::AmbientConfig;
use focusroom_core::{
    Alert, AlertChannel, AmbientTrack, AudioChannel, AudioError, CueChannel, DeliveryError,
    Permission,
};

/// Desktop notifications through the session's notification daemon.
pub struct DesktopAlerts {
    enabled: bool,
}

impl DesktopAlerts {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl AlertChannel for DesktopAlerts {
    fn request_permission(&mut self) -> Permission {
        if self.enabled {
            Permission::Granted
        } else {
            Permission::Denied
        }
    }

    fn show(&mut self, alert: &Alert) -> Result<(), DeliveryError> {
        notify_rust::Notification::new()
            .summary(&alert.title)
            .body(&alert.body)
            .appname("focusroom")
            .show()
            .map(|_| ())
            .map_err(|e| DeliveryError::Unavailable(e.to_string()))
    }
}

/// Rings the terminal bell.
pub struct TerminalBell;

impl CueChannel for TerminalBell {
    fn play_cue(&mut self) -> Result<(), DeliveryError> {
        let mut err = std::io::stderr();
        err.write_all(b"\x07")
            .and_then(|_| err.flush())
            .map_err(|e| DeliveryError::Failed(e.to_string()))
    }
}

/// Loops `<sound_dir>/<track>.ogg` through an ffplay-compatible player.
///
/// A child process cannot hold its position, so pausing kills it and the
/// next play starts the loop from the top.
pub struct PlayerProcess {
    program: String,
    sound_dir: Option<PathBuf>,
    volume: u32,
    child: Option<Child>,
}

impl PlayerProcess {
    pub fn from_config(config: &AmbientConfig) -> Self {
        Self {
            program: config.player.clone(),
            sound_dir: config.sound_dir.as_ref().map(PathBuf::from),
            volume: config.volume,
            child: None,
        }
    }

    fn kill(&mut self) {
        if let Some(mut child) = self.child.take() {
            if let Err(e) = child.kill() {
                tracing::debug!(error = %e, "player already exited");
            }
            let _ = child.wait();
        }
    }
}

impl AudioChannel for PlayerProcess {
    fn play(&mut self, track: AmbientTrack) -> Result<(), AudioError> {
        self.kill();
        let source = self
            .sound_dir
            .as_ref()
            .map(|dir| dir.join(format!("{}.ogg", track.id())))
            .filter(|path| path.exists())
            .ok_or(AudioError::MissingSource(track))?;

        let child = Command::new(&self.program)
            .args(["-nodisp", "-loop", "0", "-loglevel", "quiet", "-volume"])
            .arg(self.volume.to_string())
            .arg(&source)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| AudioError::Backend(format!("{}: {e}", self.program)))?;
        tracing::debug!(track = %track, source = %source.display(), "ambient player spawned");
        self.child = Some(child);
        Ok(())
    }

    fn pause(&mut self) {
        self.kill();
    }

    fn rewind(&mut self) {
        self.kill();
    }

    fn stop(&mut self) {
        self.kill();
    }
}

impl Drop for PlayerProcess {
    fn drop(&mut self) {
        self.kill();
    }
}
