//! Ambient background audio.
//!
//! One looping track at a time, chosen by the user and played only while the
//! timer runs. The controller is the only code that touches the audio
//! channel; the session forwards scheduler start/pause/reset to its hooks.

mod track;

pub use track::AmbientTrack;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AudioError {
    #[error("no sound source for track '{0}'")]
    MissingSource(AmbientTrack),

    #[error("audio backend error: {0}")]
    Backend(String),
}

/// Single looping audio output.
pub trait AudioChannel {
    /// Start or resume looping `track`.
    fn play(&mut self, track: AmbientTrack) -> Result<(), AudioError>;

    /// Hold the current position.
    fn pause(&mut self);

    /// Seek the loaded track back to its beginning.
    fn rewind(&mut self);

    /// Stop and unload the current track.
    fn stop(&mut self);
}

/// Channel that plays nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioChannel for NullAudio {
    fn play(&mut self, _track: AmbientTrack) -> Result<(), AudioError> {
        Ok(())
    }

    fn pause(&mut self) {}

    fn rewind(&mut self) {}

    fn stop(&mut self) {}
}

pub struct AmbientSoundController {
    channel: Box<dyn AudioChannel>,
    selection: Option<AmbientTrack>,
    muted: bool,
    /// Mirrors the scheduler's running flag.
    engaged: bool,
    /// Track held by the channel, playing or paused.
    loaded: Option<AmbientTrack>,
    playing: Option<AmbientTrack>,
}

impl AmbientSoundController {
    pub fn new(channel: Box<dyn AudioChannel>) -> Self {
        Self {
            channel,
            selection: None,
            muted: false,
            engaged: false,
            loaded: None,
            playing: None,
        }
    }

    pub fn selection(&self) -> Option<AmbientTrack> {
        self.selection
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn playing(&self) -> Option<AmbientTrack> {
        self.playing
    }

    pub fn loaded(&self) -> Option<AmbientTrack> {
        self.loaded
    }

    /// Pick a track, or clear the selection when `track` is already picked.
    /// Returns the resulting selection.
    ///
    /// Selecting alone never starts audio; it only plays immediately when
    /// the timer is already running.
    pub fn select(&mut self, track: AmbientTrack) -> Option<AmbientTrack> {
        if self.selection == Some(track) {
            self.unload();
            self.selection = None;
            tracing::debug!(track = %track, "ambient selection cleared");
            return None;
        }

        self.unload();
        self.selection = Some(track);
        tracing::debug!(track = %track, "ambient track selected");
        self.resume();
        self.selection
    }

    /// Flip mute, returning the new value. The selection is kept.
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        if self.muted {
            self.hold();
        } else {
            self.resume();
        }
        self.muted
    }

    // ── Scheduler hooks ──────────────────────────────────────────────

    pub fn on_start(&mut self) {
        self.engaged = true;
        self.resume();
    }

    pub fn on_pause(&mut self) {
        self.engaged = false;
        self.hold();
    }

    pub fn on_reset(&mut self) {
        self.on_pause();
        if self.loaded.is_some() {
            self.channel.rewind();
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn resume(&mut self) {
        if self.muted || !self.engaged || self.playing.is_some() {
            return;
        }
        let Some(track) = self.selection else {
            return;
        };
        match self.channel.play(track) {
            Ok(()) => {
                self.loaded = Some(track);
                self.playing = Some(track);
            }
            Err(e) => tracing::warn!(track = %track, error = %e, "ambient playback failed"),
        }
    }

    fn hold(&mut self) {
        if self.playing.take().is_some() {
            self.channel.pause();
        }
    }

    fn unload(&mut self) {
        self.playing = None;
        if self.loaded.take().is_some() {
            self.channel.stop();
        }
    }
}

impl std::fmt::Debug for AmbientSoundController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AmbientSoundController")
            .field("selection", &self.selection)
            .field("muted", &self.muted)
            .field("engaged", &self.engaged)
            .field("loaded", &self.loaded)
            .field("playing", &self.playing)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Play(AmbientTrack),
        Pause,
        Rewind,
        Stop,
    }

    struct Recording(Rc<RefCell<Vec<Call>>>);

    impl AudioChannel for Recording {
        fn play(&mut self, track: AmbientTrack) -> Result<(), AudioError> {
            self.0.borrow_mut().push(Call::Play(track));
            Ok(())
        }
        fn pause(&mut self) {
            self.0.borrow_mut().push(Call::Pause);
        }
        fn rewind(&mut self) {
            self.0.borrow_mut().push(Call::Rewind);
        }
        fn stop(&mut self) {
            self.0.borrow_mut().push(Call::Stop);
        }
    }

    fn controller() -> (AmbientSoundController, Rc<RefCell<Vec<Call>>>) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        (
            AmbientSoundController::new(Box::new(Recording(calls.clone()))),
            calls,
        )
    }

    #[test]
    fn selecting_same_track_twice_clears_selection() {
        let (mut ambient, _) = controller();
        assert_eq!(ambient.select(AmbientTrack::Rain), Some(AmbientTrack::Rain));
        assert_eq!(ambient.select(AmbientTrack::Rain), None);
        assert_eq!(ambient.selection(), None);
    }

    #[test]
    fn selection_alone_does_not_play() {
        let (mut ambient, calls) = controller();
        ambient.select(AmbientTrack::Forest);
        assert!(calls.borrow().is_empty());
        assert_eq!(ambient.playing(), None);

        ambient.on_start();
        assert_eq!(*calls.borrow(), vec![Call::Play(AmbientTrack::Forest)]);
    }

    #[test]
    fn hooks_without_selection_touch_nothing() {
        let (mut ambient, calls) = controller();
        ambient.on_start();
        ambient.on_pause();
        ambient.on_reset();
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn switching_while_playing_stops_previous_first() {
        let (mut ambient, calls) = controller();
        ambient.select(AmbientTrack::Rain);
        ambient.on_start();
        ambient.select(AmbientTrack::Ocean);

        assert_eq!(
            *calls.borrow(),
            vec![
                Call::Play(AmbientTrack::Rain),
                Call::Stop,
                Call::Play(AmbientTrack::Ocean)
            ]
        );
        assert_eq!(ambient.playing(), Some(AmbientTrack::Ocean));
    }

    #[test]
    fn deselecting_while_playing_stops() {
        let (mut ambient, calls) = controller();
        ambient.select(AmbientTrack::Cafe);
        ambient.on_start();
        ambient.select(AmbientTrack::Cafe);
        assert_eq!(calls.borrow().last(), Some(&Call::Stop));
        assert_eq!(ambient.playing(), None);
    }

    #[test]
    fn deselecting_paused_track_unloads_it() {
        let (mut ambient, calls) = controller();
        ambient.select(AmbientTrack::Rain);
        ambient.on_start();
        ambient.on_pause();
        ambient.select(AmbientTrack::Rain);
        assert_eq!(ambient.loaded(), None);

        ambient.select(AmbientTrack::Ocean);
        ambient.on_reset();

        assert_eq!(
            *calls.borrow(),
            vec![Call::Play(AmbientTrack::Rain), Call::Pause, Call::Stop]
        );
    }

    #[test]
    fn switching_muted_track_unloads_previous() {
        let (mut ambient, calls) = controller();
        ambient.select(AmbientTrack::Forest);
        ambient.on_start();
        ambient.toggle_mute();
        ambient.select(AmbientTrack::Cafe);

        assert_eq!(
            *calls.borrow(),
            vec![Call::Play(AmbientTrack::Forest), Call::Pause, Call::Stop]
        );
        assert_eq!(ambient.loaded(), None);

        ambient.toggle_mute();
        assert_eq!(calls.borrow().last(), Some(&Call::Play(AmbientTrack::Cafe)));
        assert_eq!(ambient.loaded(), Some(AmbientTrack::Cafe));
    }

    #[test]
    fn pause_and_reset_follow_the_timer() {
        let (mut ambient, calls) = controller();
        ambient.select(AmbientTrack::Rain);
        ambient.on_start();
        ambient.on_pause();
        ambient.on_start();
        ambient.on_reset();

        assert_eq!(
            *calls.borrow(),
            vec![
                Call::Play(AmbientTrack::Rain),
                Call::Pause,
                Call::Play(AmbientTrack::Rain),
                Call::Pause,
                Call::Rewind,
            ]
        );
    }

    #[test]
    fn mute_holds_playback_and_unmute_resumes() {
        let (mut ambient, calls) = controller();
        ambient.select(AmbientTrack::Rain);
        ambient.on_start();

        assert!(ambient.toggle_mute());
        assert_eq!(ambient.playing(), None);
        assert_eq!(ambient.selection(), Some(AmbientTrack::Rain));

        assert!(!ambient.toggle_mute());
        assert_eq!(ambient.playing(), Some(AmbientTrack::Rain));
        assert_eq!(calls.borrow().len(), 3);
    }

    #[test]
    fn muted_start_stays_silent() {
        let (mut ambient, calls) = controller();
        ambient.toggle_mute();
        ambient.select(AmbientTrack::Ocean);
        ambient.on_start();
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn failed_playback_is_not_marked_playing() {
        struct Broken;
        impl AudioChannel for Broken {
            fn play(&mut self, track: AmbientTrack) -> Result<(), AudioError> {
                Err(AudioError::MissingSource(track))
            }
            fn pause(&mut self) {}
            fn rewind(&mut self) {}
            fn stop(&mut self) {}
        }

        let mut ambient = AmbientSoundController::new(Box::new(Broken));
        ambient.select(AmbientTrack::Rain);
        ambient.on_start();
        assert_eq!(ambient.playing(), None);
        assert_eq!(ambient.selection(), Some(AmbientTrack::Rain));
    }
}
