use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::game::{Board, Line, Mark, ScoreStore, SessionCounters};
use crate::planner::{Task, Timetable, User};

/// Sidebar row for one timetable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimetableSummary {
    pub id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub task_count: usize,
    pub active: bool,
}

impl TimetableSummary {
    pub fn of(tt: &Timetable, active_id: Option<&str>) -> Self {
        Self {
            id: tt.id.clone(),
            title: tt.title.clone(),
            created_at: tt.created_at,
            task_count: tt.tasks.len(),
            active: active_id == Some(tt.id.as_str()),
        }
    }
}

/// Every state change in the system produces an Event.
/// Presentation renders from these; the core never draws anything itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// Registration changed. `None` after logout.
    UserChanged { user: Option<User> },
    /// Full timetable list, in stored order.
    TimetablesChanged {
        timetables: Vec<TimetableSummary>,
        active_id: Option<String>,
    },
    /// Task list of one timetable, in display order.
    TasksChanged {
        timetable_id: String,
        title: String,
        tasks: Vec<Task>,
    },
    /// No timetable is selected any more.
    SelectionCleared,
    /// Board re-render.
    BoardChanged {
        board: Board,
        current: Mark,
        active: bool,
        status: String,
        winning_line: Option<Line>,
    },
    /// The computer should answer after `delay_ms`.
    OpponentScheduled { delay_ms: u64 },
    /// A line was completed; presentation celebrates.
    GameWon {
        winner: Mark,
        name: String,
        line: Line,
        at: DateTime<Utc>,
    },
    /// Board filled with no line.
    GameDrawn { at: DateTime<Utc> },
    /// Scoreboard numbers.
    ScoresChanged {
        session: SessionCounters,
        stored: ScoreStore,
    },
}
