use clap::Subcommand;
use focusroom_core::AmbientTrack;

#[derive(Subcommand)]
pub enum AmbientAction {
    /// List available ambient tracks
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: AmbientAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        AmbientAction::List { json } => {
            if json {
                println!("{}", serde_json::to_string(&AmbientTrack::ALL)?);
            } else {
                for track in AmbientTrack::ALL {
                    println!("{:<8} {}", track.id(), track.label());
                }
            }
        }
    }
    Ok(())
}
