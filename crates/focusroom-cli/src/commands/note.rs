use clap::Subcommand;
use focusroom_core::{Database, SessionNoteStore};

#[derive(Subcommand)]
pub enum NoteAction {
    /// Save a session note
    Add {
        /// Note text
        content: String,
        /// Completed focus cycles to tag the note with
        #[arg(long, default_value_t = 0)]
        cycle: u64,
    },
    /// List saved notes, oldest first
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: NoteAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = SessionNoteStore::new(Database::open()?);

    match action {
        NoteAction::Add { content, cycle } => {
            let mut buffer = content;
            let note = store.save(&mut buffer, cycle)?;
            println!("{}", serde_json::to_string_pretty(&note)?);
        }
        NoteAction::List { json } => {
            let (notes, err) = store.load_all_or_empty();
            if let Some(e) = err {
                eprintln!("warning: {e}");
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&notes)?);
            } else if notes.is_empty() {
                println!("No notes yet.");
            } else {
                for note in &notes {
                    println!(
                        "[cycle {}] {}  {}",
                        note.cycle,
                        note.created_at.format("%Y-%m-%d %H:%M"),
                        note.content
                    );
                }
            }
        }
    }
    Ok(())
}
