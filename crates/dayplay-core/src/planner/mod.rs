//! Timetable planner: registration, timetables and their tasks.

mod model;
mod state;

pub use model::{new_id, task_order, Task, TaskDraft, Timetable, User};
pub use state::{Outcome, Planner, PlannerCommand, PlannerState, Write};
