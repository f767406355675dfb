//! Task management commands for CLI.

use clap::Subcommand;
use dayplay_core::{PlannerCommand, TaskDraft};

use super::{confirm, open_planner, print_events, resolve_task, resolve_timetable, CmdResult};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task to a timetable
    Add {
        /// Task title
        title: String,
        /// Start time (HH:MM)
        #[arg(long, default_value = "")]
        time: String,
        /// Free-form note
        #[arg(long, default_value = "")]
        note: String,
        /// Timetable ID (or unique prefix); defaults to the active one
        #[arg(long)]
        timetable: Option<String>,
    },
    /// List tasks in display order
    List {
        /// Timetable ID (or unique prefix); defaults to the active one
        #[arg(long)]
        timetable: Option<String>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Edit a task; omitted fields keep their current value
    Edit {
        /// Task ID (or unique prefix)
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New time (HH:MM, or "" to clear)
        #[arg(long)]
        time: Option<String>,
        /// New note
        #[arg(long)]
        note: Option<String>,
    },
    /// Mark a task done, or undo
    Toggle {
        /// Task ID (or unique prefix)
        id: String,
    },
    /// Delete a task
    Delete {
        /// Task ID (or unique prefix)
        id: String,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
}

pub fn run(action: TaskAction) -> CmdResult {
    let mut planner = open_planner()?;

    match action {
        TaskAction::Add {
            title,
            time,
            note,
            timetable,
        } => {
            let timetable_id = resolve_timetable(planner.state(), timetable.as_deref())?;
            let events = planner.dispatch(PlannerCommand::AddTask {
                timetable_id,
                draft: TaskDraft::new(time, title, note),
            })?;
            print_events(&events);
        }
        TaskAction::List { timetable, json } => {
            let id = resolve_timetable(planner.state(), timetable.as_deref())?;
            let tt = planner
                .state()
                .timetable(&id)
                .ok_or_else(|| format!("timetable not found: {id}"))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&tt.sorted_tasks())?);
            } else {
                print_events(&[dayplay_core::Event::TasksChanged {
                    timetable_id: tt.id.clone(),
                    title: tt.title.clone(),
                    tasks: tt.sorted_tasks(),
                }]);
            }
        }
        TaskAction::Edit {
            id,
            title,
            time,
            note,
        } => {
            let task_id = resolve_task(planner.state(), &id)?;
            let current = planner
                .state()
                .timetables
                .iter()
                .find_map(|t| t.task(&task_id))
                .ok_or_else(|| format!("task not found: {id}"))?;
            let draft = TaskDraft::new(
                time.unwrap_or_else(|| current.time.clone()),
                title.unwrap_or_else(|| current.title.clone()),
                note.unwrap_or_else(|| current.note.clone()),
            );
            let events = planner.dispatch(PlannerCommand::EditTask { task_id, draft })?;
            print_events(&events);
        }
        TaskAction::Toggle { id } => {
            let task_id = resolve_task(planner.state(), &id)?;
            let events = planner.dispatch(PlannerCommand::ToggleTask { task_id })?;
            print_events(&events);
        }
        TaskAction::Delete { id, yes } => {
            let task_id = resolve_task(planner.state(), &id)?;
            if !confirm("Delete this task?", yes)? {
                return Ok(());
            }
            let events = planner.dispatch(PlannerCommand::DeleteTask { task_id })?;
            print_events(&events);
        }
    }
    Ok(())
}
