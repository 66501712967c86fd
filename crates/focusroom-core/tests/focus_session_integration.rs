//! Integration tests for a full focus session: clock, scheduler,
//! notifications, ambient audio and persisted notes working together.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use focusroom_core::{
    Alert, AlertChannel, AmbientSoundController, AmbientTrack, AudioChannel, AudioError,
    ClockTick, CueChannel, Database, DeliveryError, Event, FocusSession, KvStore,
    NotificationDispatcher, NullAudio, Permission, PhaseDurations, PhaseScheduler, SessionPhase,
    SessionNoteStore, NOTES_KEY,
};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Seen {
    Alert(String),
    Cue,
    Play(AmbientTrack),
    Pause,
    Rewind,
    Stop,
}

type Log = Rc<RefCell<Vec<Seen>>>;

struct Alerts(Log, Permission);

impl AlertChannel for Alerts {
    fn request_permission(&mut self) -> Permission {
        self.1
    }

    fn show(&mut self, alert: &Alert) -> Result<(), DeliveryError> {
        self.0.borrow_mut().push(Seen::Alert(alert.title.clone()));
        Ok(())
    }
}

struct Cue(Log);

impl CueChannel for Cue {
    fn play_cue(&mut self) -> Result<(), DeliveryError> {
        self.0.borrow_mut().push(Seen::Cue);
        Ok(())
    }
}

struct Audio(Log);

impl AudioChannel for Audio {
    fn play(&mut self, track: AmbientTrack) -> Result<(), AudioError> {
        self.0.borrow_mut().push(Seen::Play(track));
        Ok(())
    }
    fn pause(&mut self) {
        self.0.borrow_mut().push(Seen::Pause);
    }
    fn rewind(&mut self) {
        self.0.borrow_mut().push(Seen::Rewind);
    }
    fn stop(&mut self) {
        self.0.borrow_mut().push(Seen::Stop);
    }
}

fn recorded_session(
    durations: PhaseDurations,
    permission: Permission,
) -> (FocusSession<Database>, Log) {
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let session = FocusSession::new(
        PhaseScheduler::new(durations),
        NotificationDispatcher::new(
            Box::new(Alerts(log.clone(), permission)),
            Box::new(Cue(log.clone())),
        ),
        AmbientSoundController::new(Box::new(Audio(log.clone()))),
        SessionNoteStore::new(Database::open_memory().unwrap()),
    );
    (session, log)
}

#[test]
fn boundaries_pause_audio_then_notify() {
    let (mut session, log) =
        recorded_session(PhaseDurations::from_secs(2, 1).unwrap(), Permission::Granted);
    session.select_ambient(AmbientTrack::Rain);
    session.start();
    session.tick();
    let events = session.tick();

    assert_eq!(events.len(), 1);
    assert_eq!(
        *log.borrow(),
        vec![
            Seen::Play(AmbientTrack::Rain),
            Seen::Pause,
            Seen::Alert("Focus session complete".into()),
            Seen::Cue,
        ]
    );

    log.borrow_mut().clear();
    session.start();
    session.tick();
    assert_eq!(
        *log.borrow(),
        vec![
            Seen::Play(AmbientTrack::Rain),
            Seen::Pause,
            Seen::Alert("Break is over".into()),
            Seen::Cue,
        ]
    );
    assert_eq!(session.scheduler().phase(), SessionPhase::Focus);
    assert_eq!(session.scheduler().completed_cycles(), 1);
}

#[test]
fn denied_alerts_do_not_stop_the_timer() {
    let (mut session, log) =
        recorded_session(PhaseDurations::from_secs(1, 1).unwrap(), Permission::Denied);
    session.start();
    let events = session.tick();

    assert_eq!(events[0].completed_phase(), Some(SessionPhase::Focus));
    assert_eq!(*log.borrow(), vec![Seen::Cue]);
    assert!(session.start().is_some());
}

#[test]
fn reset_stops_and_rewinds_selected_track() {
    let (mut session, log) =
        recorded_session(PhaseDurations::default(), Permission::Granted);
    session.select_ambient(AmbientTrack::Forest);
    session.start();
    session.reset();

    assert_eq!(
        *log.borrow(),
        vec![Seen::Play(AmbientTrack::Forest), Seen::Pause, Seen::Rewind]
    );
}

#[test]
fn selecting_same_track_twice_clears_it() {
    let (mut session, _log) = recorded_session(PhaseDurations::default(), Permission::Granted);
    let first = session.select_ambient(AmbientTrack::Rain);
    let second = session.select_ambient(AmbientTrack::Rain);

    assert!(matches!(
        first,
        Event::AmbientChanged {
            track: Some(AmbientTrack::Rain),
            ..
        }
    ));
    assert!(matches!(second, Event::AmbientChanged { track: None, .. }));
    assert_eq!(session.ambient().selection(), None);
}

#[test]
fn notes_persist_across_store_instances() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("focusroom.db");

    {
        let mut session = FocusSession::new(
            PhaseScheduler::new(PhaseDurations::from_secs(1, 1).unwrap()),
            NotificationDispatcher::silent(),
            AmbientSoundController::new(Box::new(NullAudio)),
            SessionNoteStore::new(Database::open_at(&path).unwrap()),
        );
        session.set_draft("before any cycle");
        session.save_note().unwrap();
        session.start();
        session.tick();
        session.set_draft("  after one  ");
        session.save_note().unwrap();
    }

    let store = SessionNoteStore::new(Database::open_at(&path).unwrap());
    let notes = store.load_all().unwrap();
    assert_eq!(notes.len(), 2);
    assert_eq!(notes[0].content, "before any cycle");
    assert_eq!(notes[0].cycle, 0);
    assert_eq!(notes[1].content, "after one");
    assert_eq!(notes[1].cycle, 1);
}

#[test]
fn corrupted_database_value_surfaces_empty_log() {
    let db = Database::open_memory().unwrap();
    db.kv_set(NOTES_KEY, "[{\"id\": 1").unwrap();
    let session = FocusSession::new(
        PhaseScheduler::default(),
        NotificationDispatcher::silent(),
        AmbientSoundController::new(Box::new(NullAudio)),
        SessionNoteStore::new(db),
    );

    let (notes, err) = session.notes();
    assert!(notes.is_empty());
    assert!(err.is_some());
}

#[tokio::test(start_paused = true)]
async fn clock_drives_session_to_break() {
    let (mut session, _log) =
        recorded_session(PhaseDurations::from_secs(3, 2).unwrap(), Permission::Granted);
    let mut clock = ClockTick::new(Duration::from_secs(1));

    session.start();
    clock.start();
    let mut completed = Vec::new();
    while clock.is_active() {
        let Some(_pulse) = clock.next().await else {
            break;
        };
        completed.extend(session.tick());
        if !session.is_running() {
            clock.stop();
        }
    }

    assert_eq!(completed.len(), 1);
    assert_eq!(session.scheduler().phase(), SessionPhase::Break);
    assert_eq!(session.scheduler().remaining_secs(), 2);
    assert!(!clock.is_active());
}
