use std::io::Write;
use std::time::Duration;

use clap::{Args, Subcommand};
use focusroom_core::{
    AmbientSoundController, AmbientTrack, AudioChannel, ClockTick, Config, Database, Event,
    FocusSession, KvStore, MemoryKv, NotificationDispatcher, NullAudio, PhaseScheduler,
    SessionNoteStore,
};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::backends::{DesktopAlerts, PlayerProcess, TerminalBell};

#[derive(Subcommand)]
pub enum FocusAction {
    /// Run a live focus session in this terminal
    Run(RunArgs),
}

#[derive(Args)]
pub struct RunArgs {
    /// Start the next phase automatically when one ends
    #[arg(long)]
    auto_cycle: bool,
    /// Exit after this many completed focus cycles
    #[arg(long)]
    cycles: Option<u64>,
    /// Ambient track to loop while the timer runs (rain, forest, cafe, ocean)
    #[arg(long)]
    ambient: Option<AmbientTrack>,
    /// Focus length in minutes (overrides config)
    #[arg(long)]
    focus_min: Option<u64>,
    /// Break length in minutes (overrides config)
    #[arg(long)]
    break_min: Option<u64>,
    /// No alerts, cue or ambient audio
    #[arg(long)]
    silent: bool,
    /// Print events as JSON lines
    #[arg(long)]
    json: bool,
    /// Clock period in milliseconds
    #[arg(long, default_value_t = 1000, hide = true)]
    tick_ms: u64,
}

const HELP: &str = "commands: s start | p pause | t toggle | r reset | a <track> ambient | \
m mute | c cue on/off | n <text> note | status | q quit";

pub fn run(action: FocusAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        FocusAction::Run(args) => {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            let result = rt.block_on(run_session(args));
            // A pending stdin read must not hold the process open.
            rt.shutdown_background();
            result
        }
    }
}

type Session = FocusSession<Box<dyn KvStore>>;

fn build_session(args: &RunArgs, config: &Config) -> Result<Session, Box<dyn std::error::Error>> {
    let durations = config.durations()?;

    let kv: Box<dyn KvStore> = match Database::open() {
        Ok(db) => Box::new(db),
        Err(e) => {
            tracing::warn!(error = %e, "notes will not be persisted this session");
            Box::new(MemoryKv::new())
        }
    };

    let (dispatcher, audio): (NotificationDispatcher, Box<dyn AudioChannel>) = if args.silent {
        (NotificationDispatcher::silent().with_sound(false), Box::new(NullAudio))
    } else {
        (
            NotificationDispatcher::new(
                Box::new(DesktopAlerts::new(config.notifications.enabled)),
                Box::new(TerminalBell),
            )
            .with_sound(config.notifications.sound_enabled),
            Box::new(PlayerProcess::from_config(&config.ambient)),
        )
    };

    let mut session = FocusSession::new(
        PhaseScheduler::new(durations),
        dispatcher,
        AmbientSoundController::new(audio),
        SessionNoteStore::new(kv),
    )
    .with_auto_cycle(args.auto_cycle || config.timer.auto_cycle);

    if let Some(track) = args.ambient.or(config.ambient.default_track) {
        session.select_ambient(track);
    }
    Ok(session)
}

async fn run_session(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::load()?;
    if let Some(m) = args.focus_min {
        config.timer.focus_minutes = m;
    }
    if let Some(m) = args.break_min {
        config.timer.break_minutes = m;
    }

    let mut session = build_session(&args, &config)?;
    let out = Printer { json: args.json };
    let mut clock = ClockTick::new(Duration::from_millis(args.tick_ms));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    if !args.json {
        eprintln!("{HELP}");
        if session.auto_cycle() {
            eprintln!("auto-cycle on");
        }
    }
    if let Some(event) = session.start() {
        out.event(&event);
    }

    loop {
        // The pulse only runs while the timer does.
        if session.is_running() {
            clock.start();
        } else {
            clock.stop();
        }
        if !stdin_open && !session.is_running() {
            break;
        }

        tokio::select! {
            pulse = clock.next(), if clock.is_active() => {
                if pulse.is_none() {
                    continue;
                }
                let events = session.tick();
                if events.is_empty() {
                    out.status(&session);
                }
                for event in &events {
                    out.event(event);
                }
                if let Some(target) = args.cycles {
                    if session.scheduler().completed_cycles() >= target {
                        break;
                    }
                }
            }
            line = lines.next_line(), if stdin_open => {
                match line {
                    Ok(Some(line)) => {
                        if handle_command(&mut session, line.trim(), &out) == Flow::Quit {
                            break;
                        }
                    }
                    Ok(None) => stdin_open = false,
                    Err(e) => {
                        tracing::warn!(error = %e, "stdin closed");
                        stdin_open = false;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    clock.stop();
    if let Some(event) = session.pause() {
        out.event(&event);
    }
    out.event(&session.snapshot());
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

fn handle_command(session: &mut Session, line: &str, out: &Printer) -> Flow {
    let (cmd, rest) = match line.split_once(char::is_whitespace) {
        Some((cmd, rest)) => (cmd, rest.trim()),
        None => (line, ""),
    };

    match cmd {
        "" => {}
        "s" | "start" => {
            if let Some(event) = session.start() {
                out.event(&event);
            }
        }
        "p" | "pause" => {
            if let Some(event) = session.pause() {
                out.event(&event);
            }
        }
        "t" | "toggle" => {
            if let Some(event) = session.toggle() {
                out.event(&event);
            }
        }
        "r" | "reset" => out.event(&session.reset()),
        "a" | "ambient" => match rest.parse::<AmbientTrack>() {
            Ok(track) => out.event(&session.select_ambient(track)),
            Err(e) => eprintln!("error: {e}"),
        },
        "m" | "mute" => {
            let muted = session.toggle_mute();
            eprintln!("ambient {}", if muted { "muted" } else { "unmuted" });
        }
        "c" | "cue" => {
            let on = session.toggle_sound();
            eprintln!("completion cue {}", if on { "on" } else { "off" });
        }
        "n" | "note" => {
            session.set_draft(rest);
            match session.save_note() {
                Ok(note) => out.event(&Event::NoteSaved {
                    note_id: note.id,
                    cycle: note.cycle,
                    at: note.created_at,
                }),
                Err(e) => eprintln!("error: {e}"),
            }
        }
        "status" => out.event(&session.snapshot()),
        "q" | "quit" => return Flow::Quit,
        "h" | "help" => eprintln!("{HELP}"),
        other => eprintln!("unknown command '{other}'. {HELP}"),
    }
    Flow::Continue
}

struct Printer {
    json: bool,
}

impl Printer {
    fn event(&self, event: &Event) {
        if self.json {
            match serde_json::to_string(event) {
                Ok(line) => println!("{line}"),
                Err(e) => tracing::warn!(error = %e, "event not serializable"),
            }
            return;
        }

        match event {
            Event::TimerStarted {
                phase,
                remaining_secs,
                ..
            } => println!("\n{phase} started, {} left", focusroom_core::format_clock(*remaining_secs)),
            Event::TimerPaused {
                phase,
                remaining_secs,
                ..
            } => println!("\n{phase} paused at {}", focusroom_core::format_clock(*remaining_secs)),
            Event::TimerReset { .. } => println!("\ntimer reset"),
            Event::PhaseCompleted {
                phase,
                next_phase,
                completed_cycles,
                ..
            } => println!("\n{phase} complete. Up next: {next_phase} (cycles: {completed_cycles})"),
            Event::AmbientChanged { track, .. } => match track {
                Some(track) => println!("ambient: {track}"),
                None => println!("ambient: off"),
            },
            Event::NoteSaved { cycle, .. } => println!("note saved (cycle {cycle})"),
            Event::StateSnapshot {
                phase,
                running,
                clock,
                completed_cycles,
                ..
            } => println!(
                "{phase} {clock} {} | cycles: {completed_cycles}",
                if *running { "running" } else { "paused" }
            ),
        }
    }

    fn status(&self, session: &Session) {
        if self.json {
            return;
        }
        let scheduler = session.scheduler();
        print!(
            "\r{} {}  cycles: {}   ",
            scheduler.phase(),
            scheduler.clock(),
            scheduler.completed_cycles()
        );
        let _ = std::io::stdout().flush();
    }
}
