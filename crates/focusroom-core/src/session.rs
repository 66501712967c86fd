//! A focus session: the scheduler plus everything that reacts to it.
//!
//! `FocusSession` owns one [`PhaseScheduler`] and fans its events out to the
//! notification dispatcher and the ambient controller, in the order the
//! scheduler produced them. It also holds the note draft and stamps saved
//! notes with the live cycle count. Driving the clock is left to the owner.

use chrono::Utc;

use crate::ambient::{AmbientSoundController, AmbientTrack};
use crate::error::{CoreError, StorageError};
use crate::events::Event;
use crate::notes::{SessionNote, SessionNoteStore};
use crate::notify::NotificationDispatcher;
use crate::storage::KvStore;
use crate::timer::{AutoCycle, PhaseScheduler};

pub struct FocusSession<S: KvStore> {
    scheduler: PhaseScheduler,
    auto_cycle: AutoCycle,
    dispatcher: NotificationDispatcher,
    ambient: AmbientSoundController,
    notes: SessionNoteStore<S>,
    draft: String,
}

impl<S: KvStore> FocusSession<S> {
    pub fn new(
        scheduler: PhaseScheduler,
        dispatcher: NotificationDispatcher,
        ambient: AmbientSoundController,
        notes: SessionNoteStore<S>,
    ) -> Self {
        Self {
            scheduler,
            auto_cycle: AutoCycle::default(),
            dispatcher,
            ambient,
            notes,
            draft: String::new(),
        }
    }

    pub fn with_auto_cycle(mut self, enabled: bool) -> Self {
        self.auto_cycle.set_enabled(enabled);
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn scheduler(&self) -> &PhaseScheduler {
        &self.scheduler
    }

    pub fn ambient(&self) -> &AmbientSoundController {
        &self.ambient
    }

    pub fn auto_cycle(&self) -> bool {
        self.auto_cycle.is_enabled()
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn snapshot(&self) -> Event {
        self.scheduler.snapshot()
    }

    /// The stored note log. An unreadable log comes back empty, with the
    /// error alongside.
    pub fn notes(&self) -> (Vec<SessionNote>, Option<StorageError>) {
        self.notes.load_all_or_empty()
    }

    // ── Timer commands ───────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        let event = self.scheduler.start();
        if self.scheduler.is_running() {
            self.ambient.on_start();
        }
        event
    }

    pub fn pause(&mut self) -> Option<Event> {
        let event = self.scheduler.pause();
        self.ambient.on_pause();
        event
    }

    pub fn toggle(&mut self) -> Option<Event> {
        if self.scheduler.is_running() {
            self.pause()
        } else {
            self.start()
        }
    }

    pub fn reset(&mut self) -> Event {
        let event = self.scheduler.reset();
        self.ambient.on_reset();
        event
    }

    /// Forward one clock pulse. Returns the completion event, followed by
    /// the restart event when auto-cycling is on.
    pub fn tick(&mut self) -> Vec<Event> {
        let Some(completed) = self.scheduler.tick() else {
            return Vec::new();
        };

        self.ambient.on_pause();
        self.dispatcher.dispatch(&completed);

        let mut events = vec![completed];
        if let Some(started) = self.auto_cycle.apply(&mut self.scheduler, &events[0]) {
            self.ambient.on_start();
            events.push(started);
        }
        events
    }

    // ── Preferences ──────────────────────────────────────────────────

    /// Select `track`, or clear it when it is already selected.
    pub fn select_ambient(&mut self, track: AmbientTrack) -> Event {
        let track = self.ambient.select(track);
        Event::AmbientChanged {
            track,
            at: Utc::now(),
        }
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.ambient.toggle_mute()
    }

    pub fn toggle_sound(&mut self) -> bool {
        self.dispatcher.toggle_sound()
    }

    // ── Notes ────────────────────────────────────────────────────────

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Save the draft as a note tagged with the current cycle count. The
    /// draft is cleared only on success.
    pub fn save_note(&mut self) -> Result<SessionNote, CoreError> {
        let cycle = self.scheduler.completed_cycles();
        self.notes.save(&mut self.draft, cycle)
    }
}

impl<S: KvStore> std::fmt::Debug for FocusSession<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FocusSession")
            .field("scheduler", &self.scheduler)
            .field("auto_cycle", &self.auto_cycle)
            .field("dispatcher", &self.dispatcher)
            .field("ambient", &self.ambient)
            .finish_non_exhaustive()
    }
}
