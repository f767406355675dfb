pub mod config;
pub mod game;
pub mod scores;
pub mod task;
pub mod timetable;
pub mod user;

use std::io::{self, BufRead, Write};

use dayplay_core::planner::{Planner, PlannerState};
use dayplay_core::storage::Database;
use dayplay_core::Event;

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

pub fn open_planner() -> Result<Planner<Database>, Box<dyn std::error::Error>> {
    Ok(Planner::load(Database::open()?)?)
}

/// Resolve a full timetable id or a unique prefix of one. `None` picks the
/// active timetable.
pub fn resolve_timetable(state: &PlannerState, id: Option<&str>) -> Result<String, String> {
    match id {
        Some(id) => resolve_prefix(state.timetables.iter().map(|t| t.id.as_str()), id, "timetable"),
        None => state
            .active_id
            .clone()
            .ok_or_else(|| "Select or create a timetable first.".to_string()),
    }
}

/// Resolve a full task id or a unique prefix across all timetables.
pub fn resolve_task(state: &PlannerState, id: &str) -> Result<String, String> {
    let ids = state
        .timetables
        .iter()
        .flat_map(|t| t.tasks.iter().map(|task| task.id.as_str()));
    resolve_prefix(ids, id, "task")
}

fn resolve_prefix<'a>(
    ids: impl Iterator<Item = &'a str>,
    needle: &str,
    kind: &str,
) -> Result<String, String> {
    let matches: Vec<&str> = ids.filter(|id| id.starts_with(needle)).collect();
    if let Some(exact) = matches.iter().find(|id| **id == needle) {
        return Ok(exact.to_string());
    }
    match matches.as_slice() {
        [one] => Ok(one.to_string()),
        [] => Err(format!("{kind} not found: {needle}")),
        _ => Err(format!("{kind} id '{needle}' is ambiguous")),
    }
}

/// Ask a yes/no question on stdin unless `assume_yes` is set.
pub fn confirm(prompt: &str, assume_yes: bool) -> io::Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

/// Print planner events in a compact human form.
pub fn print_events(events: &[Event]) {
    for event in events {
        match event {
            Event::UserChanged { user: Some(user) } => println!("Hello, {}", user.name),
            Event::UserChanged { user: None } => println!("Logged out"),
            Event::TimetablesChanged { timetables, .. } => {
                for tt in timetables {
                    let marker = if tt.active { "*" } else { " " };
                    println!(
                        "{marker} {}  {}  ({} tasks)",
                        short_id(&tt.id),
                        tt.title,
                        tt.task_count
                    );
                }
            }
            Event::TasksChanged { title, tasks, .. } => {
                println!("{title}:");
                if tasks.is_empty() {
                    println!("  No tasks yet.");
                }
                for task in tasks {
                    let check = if task.done { "x" } else { " " };
                    let time = if task.time.is_empty() { "--:--" } else { task.time.as_str() };
                    let note = if task.note.is_empty() {
                        String::new()
                    } else {
                        format!("  ({})", task.note)
                    };
                    println!(
                        "  [{check}] {time}  {}  {}{note}",
                        short_id(&task.id),
                        task.title
                    );
                }
            }
            Event::SelectionCleared => println!("No timetable selected."),
            _ => {}
        }
    }
}

/// First eight characters of an id.
pub fn short_id(id: &str) -> &str {
    id.char_indices().nth(8).map_or(id, |(end, _)| &id[..end])
}
