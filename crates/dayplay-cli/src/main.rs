use std::io;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use dayplay_core::Config;

mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "dayplay", version, about = "Daily timetables and a tic-tac-toe break")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Registration and greeting
    User {
        #[command(subcommand)]
        action: commands::user::UserAction,
    },
    /// Timetable management
    Timetable {
        #[command(subcommand)]
        action: commands::timetable::TimetableAction,
    },
    /// Task management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Play tic-tac-toe
    Game(commands::game::GameArgs),
    /// Persisted win counts
    Scores {
        #[command(subcommand)]
        action: commands::scores::ScoresAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print a shell completion script
    Completions {
        /// Target shell
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();
    if let Commands::Completions { shell } = cli.command {
        clap_complete::generate(shell, &mut Cli::command(), "dayplay", &mut io::stdout());
        return;
    }

    let (config, load_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    logging::init(&config.log);
    if let Some(e) = load_error {
        tracing::warn!(error = %e, "config unreadable, using defaults");
    }

    let result = match cli.command {
        Commands::User { action } => commands::user::run(action),
        Commands::Timetable { action } => commands::timetable::run(action, &config),
        Commands::Task { action } => commands::task::run(action),
        Commands::Game(args) => commands::game::run(args, &config),
        Commands::Scores { action } => commands::scores::run(action, &config),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { .. } => Ok(()),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
