//! Interactive tic-tac-toe on the terminal.
//!
//! Reads one command per line from stdin: a cell number 0-8, `r` for a new
//! board, `q` to return to the menu. Session counters live only as long as
//! this process.

use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Duration;

use clap::{Args, ValueEnum};
use dayplay_core::game::{GameCommand, GameSession, Mode, CELLS};
use dayplay_core::storage::Database;
use dayplay_core::{Config, Event, KvStore, ValidationError};

#[derive(Clone, Copy, ValueEnum)]
pub enum ModeArg {
    /// Play against the computer
    Single,
    /// Two players on one keyboard
    Two,
}

impl From<ModeArg> for Mode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Single => Mode::Single,
            ModeArg::Two => Mode::TwoPlayer,
        }
    }
}

#[derive(Args)]
pub struct GameArgs {
    /// Game mode
    #[arg(long, value_enum, default_value = "single")]
    pub mode: ModeArg,
    /// Name for X (defaults to the registered user)
    #[arg(long)]
    pub x: Option<String>,
    /// Name for O in two-player mode
    #[arg(long)]
    pub o: Option<String>,
}

#[derive(Debug)]
enum Input {
    Cell(usize),
    Reset,
    Quit,
}

fn parse_input(line: &str) -> Result<Input, String> {
    match line.trim() {
        "r" | "reset" => Ok(Input::Reset),
        "q" | "quit" | "menu" => Ok(Input::Quit),
        other => {
            let index: usize = other
                .parse()
                .map_err(|_| format!("expected a cell 0-{}, 'r' or 'q'", CELLS - 1))?;
            if index >= CELLS {
                return Err(ValidationError::CellOutOfBounds { index }.to_string());
            }
            Ok(Input::Cell(index))
        }
    }
}

pub fn run(args: GameArgs, config: &Config) -> super::CmdResult {
    let db = Database::open()?;
    let registered = dayplay_core::storage::load_json::<dayplay_core::User>(
        &db,
        dayplay_core::storage::USER_KEY,
    )?
    .map(|u| u.name);
    let mut session = GameSession::open(db, config.game.clone())?;

    let events = session.dispatch(GameCommand::StartMatch {
        mode: args.mode.into(),
        player_x: args.x.or(registered).unwrap_or_default(),
        player_o: args.o.unwrap_or_default(),
    })?;
    render(&session, &events);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        let command = match parse_input(&line?) {
            Ok(Input::Cell(cell)) => GameCommand::Play { cell },
            Ok(Input::Reset) => GameCommand::Reset,
            Ok(Input::Quit) => break,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };
        let mut events = session.dispatch(command)?;
        render(&session, &events);

        while let Some(delay_ms) = events.iter().find_map(|e| match e {
            Event::OpponentScheduled { delay_ms } => Some(*delay_ms),
            _ => None,
        }) {
            thread::sleep(Duration::from_millis(delay_ms));
            events = session.dispatch(GameCommand::OpponentMove)?;
            render(&session, &events);
        }
    }

    session.dispatch(GameCommand::Menu)?;
    Ok(())
}

fn render<S: KvStore>(session: &GameSession<S>, events: &[Event]) {
    for event in events {
        match event {
            Event::BoardChanged { board, status, .. } => {
                println!();
                print!("{board}");
                println!("{status}");
            }
            Event::OpponentScheduled { .. } => {
                let name = session.players().map(|p| p.o.as_str()).unwrap_or("Computer");
                println!("{name} is thinking...");
            }
            Event::GameWon { name, line, .. } => {
                println!("*** {name} wins! (cells {line:?}) ***");
                println!("Press 'r' for a new board or 'q' to quit.");
            }
            Event::GameDrawn { .. } => {
                println!("It's a draw! Press 'r' for a new board or 'q' to quit.");
            }
            Event::ScoresChanged { session: counters, stored } => {
                if let Some(players) = session.players() {
                    println!(
                        "Session  {}: {}  {}: {}  Draws: {}  |  High score: {}",
                        players.x,
                        counters.x_wins,
                        players.o,
                        counters.o_wins,
                        counters.draws,
                        stored.high_score
                    );
                }
            }
            _ => {}
        }
    }
}
