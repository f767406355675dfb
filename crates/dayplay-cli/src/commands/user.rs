//! Registration commands.

use clap::Subcommand;
use dayplay_core::PlannerCommand;

use super::{confirm, open_planner, print_events, CmdResult};

#[derive(Subcommand)]
pub enum UserAction {
    /// Register a display name
    Register {
        /// Your name
        name: String,
    },
    /// Continue without a name
    Guest,
    /// Forget the local name (timetables are kept)
    Logout {
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
    /// Show the current user
    Show,
}

pub fn run(action: UserAction) -> CmdResult {
    let mut planner = open_planner()?;

    match action {
        UserAction::Register { name } => {
            let events = planner.dispatch(PlannerCommand::Register { name })?;
            print_events(&events);
        }
        UserAction::Guest => {
            let events = planner.dispatch(PlannerCommand::ContinueAsGuest)?;
            print_events(&events);
        }
        UserAction::Logout { yes } => {
            if !confirm("Log out (this will only remove your name locally)?", yes)? {
                return Ok(());
            }
            let events = planner.dispatch(PlannerCommand::Logout)?;
            print_events(&events);
        }
        UserAction::Show => match &planner.state().user {
            Some(user) => println!("{}", serde_json::to_string_pretty(user)?),
            None => println!("{} (not registered)", planner.state().greeting()),
        },
    }
    Ok(())
}
