use clap::Subcommand;
use dayplay_core::game::{GameCommand, GameSession};
use dayplay_core::storage::Database;
use dayplay_core::Config;

use super::{confirm, CmdResult};

#[derive(Subcommand)]
pub enum ScoresAction {
    /// Show the persisted leaderboard
    Show {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Clear every stored win
    Reset {
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
}

pub fn run(action: ScoresAction, config: &Config) -> CmdResult {
    let mut session = GameSession::open(Database::open()?, config.game.clone())?;

    match action {
        ScoresAction::Show { json } => {
            let scores = session.scores();
            if json {
                println!("{}", serde_json::to_string_pretty(scores)?);
            } else if scores.players.is_empty() {
                println!("No games won yet.");
            } else {
                println!("High score: {}", scores.high_score);
                for (rank, (name, wins)) in scores.leaderboard().into_iter().enumerate() {
                    println!("{:>3}. {name}  {wins}", rank + 1);
                }
            }
        }
        ScoresAction::Reset { yes } => {
            if !confirm("Clear all stored scores?", yes)? {
                return Ok(());
            }
            session.dispatch(GameCommand::ResetScores)?;
            println!("scores reset");
        }
    }
    Ok(())
}
