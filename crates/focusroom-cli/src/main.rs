use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod backends;
mod commands;

#[derive(Parser)]
#[command(name = "focusroom-cli", version, about = "Focusroom CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Focus timer
    Focus {
        #[command(subcommand)]
        action: commands::focus::FocusAction,
    },
    /// Session notes
    Note {
        #[command(subcommand)]
        action: commands::note::NoteAction,
    },
    /// Ambient tracks
    Ambient {
        #[command(subcommand)]
        action: commands::ambient::AmbientAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

/// Logs go to stderr, filtered by `FOCUSROOM_LOG` (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_env("FOCUSROOM_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Focus { action } => commands::focus::run(action),
        Commands::Note { action } => commands::note::run(action),
        Commands::Ambient { action } => commands::ambient::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
