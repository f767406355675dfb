//! Timetable management commands.

use std::path::PathBuf;

use clap::Subcommand;
use dayplay_core::events::TimetableSummary;
use dayplay_core::{Config, PlannerCommand};

use super::{confirm, open_planner, print_events, resolve_timetable, short_id, CmdResult};

#[derive(Subcommand)]
pub enum TimetableAction {
    /// Create a timetable (becomes active)
    Create {
        /// Title, e.g. "Monday" or "Exam Day"; defaults to "Timetable N"
        title: Option<String>,
    },
    /// List timetables
    List {
        /// Case-insensitive title filter
        #[arg(long)]
        search: Option<String>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Rename a timetable
    Rename {
        /// Timetable ID (or unique prefix)
        id: String,
        /// New title
        title: String,
    },
    /// Delete a timetable and its tasks
    Delete {
        /// Timetable ID (or unique prefix); defaults to the active one
        id: Option<String>,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
    /// Show a timetable and its tasks
    Show {
        /// Timetable ID (or unique prefix); defaults to the active one
        id: Option<String>,
    },
    /// Write a timetable to a JSON file
    Export {
        /// Timetable ID (or unique prefix); defaults to the active one
        id: Option<String>,
        /// Output directory
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
}

pub fn run(action: TimetableAction, config: &Config) -> CmdResult {
    let mut planner = open_planner()?;

    match action {
        TimetableAction::Create { title } => {
            let title = title.unwrap_or_else(|| {
                planner
                    .state()
                    .suggested_title(&config.planner.default_title_prefix)
            });
            let events = planner.dispatch(PlannerCommand::CreateTimetable { title })?;
            if let Some(id) = &planner.state().active_id {
                println!("Timetable created: {id}");
            }
            print_events(&events);
        }
        TimetableAction::List { search, json } => {
            let state = planner.state();
            let visible = state.search(search.as_deref().unwrap_or(""));
            if json {
                let rows: Vec<TimetableSummary> = visible
                    .iter()
                    .map(|t| TimetableSummary::of(t, state.active_id.as_deref()))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else if visible.is_empty() {
                println!("No timetables yet.");
            } else {
                for tt in visible {
                    let marker = if state.active_id.as_deref() == Some(tt.id.as_str()) {
                        "*"
                    } else {
                        " "
                    };
                    println!(
                        "{marker} {}  {}  {}  {}/{} done",
                        short_id(&tt.id),
                        tt.title,
                        tt.created_at.format("%Y-%m-%d %H:%M"),
                        tt.done_count(),
                        tt.tasks.len()
                    );
                }
            }
        }
        TimetableAction::Rename { id, title } => {
            let id = resolve_timetable(planner.state(), Some(id.as_str()))?;
            let events = planner.dispatch(PlannerCommand::RenameTimetable { id, title })?;
            if events.is_empty() {
                println!("Title unchanged.");
            }
            print_events(&events);
        }
        TimetableAction::Delete { id, yes } => {
            let id = resolve_timetable(planner.state(), id.as_deref())?;
            let title = planner
                .state()
                .timetable(&id)
                .map(|t| t.title.clone())
                .unwrap_or_default();
            if !confirm(
                &format!("Delete timetable \"{title}\"? This cannot be undone."),
                yes,
            )? {
                return Ok(());
            }
            planner.dispatch(PlannerCommand::DeleteTimetable { id: id.clone() })?;
            println!("Timetable deleted: {id}");
        }
        TimetableAction::Show { id } => {
            let id = resolve_timetable(planner.state(), id.as_deref())?;
            let events = planner.dispatch(PlannerCommand::SelectTimetable { id: id.clone() })?;
            if let Some(tt) = planner.state().timetable(&id) {
                println!(
                    "Created: {} · {} tasks",
                    tt.created_at.format("%Y-%m-%d %H:%M"),
                    tt.tasks.len()
                );
            }
            // skip the sidebar list
            print_events(events.get(1..).unwrap_or_default());
        }
        TimetableAction::Export { id, out } => {
            let explicit = id.is_some();
            let id = resolve_timetable(planner.state(), id.as_deref())?;
            let tt = planner
                .state()
                .timetable(&id)
                .ok_or_else(|| format!("timetable not found: {id}"))?;
            let file_name = if explicit {
                tt.export_file_name()
            } else {
                tt.active_export_file_name()
            };
            let path = out.join(file_name);
            std::fs::write(&path, tt.to_export_json()?)?;
            tracing::info!(path = %path.display(), "timetable exported");
            println!("Exported: {}", path.display());
        }
    }
    Ok(())
}
