//! Timetable, task and user records.
//!
//! Field names serialize in camelCase so stored documents and exports keep
//! the `createdAt` shape consumers already read.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Collision-resistant opaque identifier.
pub fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// The person the planner greets. Only one user exists at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub name: String,
    #[serde(default)]
    pub guest: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub const GUEST_NAME: &'static str = "Guest";

    /// A registered user. The name is trimmed and must not be empty.
    pub fn named(name: &str) -> Result<Self, ValidationError> {
        let name = non_empty(name, "Name")?;
        Ok(Self {
            name,
            guest: false,
            created_at: Utc::now(),
        })
    }

    pub fn guest() -> Self {
        Self {
            name: Self::GUEST_NAME.to_string(),
            guest: true,
            created_at: Utc::now(),
        }
    }
}

/// A single schedulable item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    /// "HH:MM" or empty when the task is untimed.
    #[serde(default)]
    pub time: String,
    pub title: String,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub done: bool,
    pub created_at: DateTime<Utc>,
}

/// Editable task fields, as entered by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub time: String,
    pub title: String,
    pub note: String,
}

impl TaskDraft {
    pub fn new(time: impl Into<String>, title: impl Into<String>, note: impl Into<String>) -> Self {
        Self {
            time: time.into(),
            title: title.into(),
            note: note.into(),
        }
    }

    /// Trim and check the draft. Returns `(time, title, note)`.
    fn validate(&self) -> Result<(String, String, String), ValidationError> {
        let title = non_empty(&self.title, "Task title")?;
        let time = normalize_time(&self.time)?;
        Ok((time, title, self.note.trim().to_string()))
    }
}

impl Task {
    pub fn from_draft(draft: &TaskDraft) -> Result<Self, ValidationError> {
        let (time, title, note) = draft.validate()?;
        Ok(Self {
            id: new_id(),
            time,
            title,
            note,
            done: false,
            created_at: Utc::now(),
        })
    }

    /// Overwrite the editable fields. Leaves the task untouched on error.
    pub fn apply_draft(&mut self, draft: &TaskDraft) -> Result<(), ValidationError> {
        let (time, title, note) = draft.validate()?;
        self.time = time;
        self.title = title;
        self.note = note;
        Ok(())
    }

    pub fn is_timed(&self) -> bool {
        !self.time.is_empty()
    }
}

/// Display order: timed tasks by "HH:MM", then untimed tasks oldest first.
pub fn task_order(a: &Task, b: &Task) -> Ordering {
    match (a.is_timed(), b.is_timed()) {
        (true, true) => a.time.cmp(&b.time),
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.created_at.cmp(&b.created_at),
    }
}

/// A named, ordered collection of tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timetable {
    pub id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Timetable {
    pub fn new(title: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            id: new_id(),
            title: non_empty(title, "Timetable title")?,
            created_at: Utc::now(),
            tasks: Vec::new(),
        })
    }

    /// Tasks in display order. Storage order is left untouched.
    pub fn sorted_tasks(&self) -> Vec<Task> {
        let mut tasks = self.tasks.clone();
        tasks.sort_by(task_order);
        tasks
    }

    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    pub fn task_mut(&mut self, task_id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == task_id)
    }

    pub fn done_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.done).count()
    }

    /// Pretty-printed JSON document (2-space indent).
    pub fn to_export_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// `<title>.json`; whitespace runs and path-unsafe characters become `_`.
    pub fn export_file_name(&self) -> String {
        format!("{}.json", underscored(&self.title))
    }

    /// `<title>_timetable.json`, used when exporting the active timetable.
    pub fn active_export_file_name(&self) -> String {
        format!("{}_timetable.json", underscored(&self.title))
    }
}

/// Whitespace runs become one `_`; any character that is not alphanumeric
/// or one of `-_.` becomes `_`, so the result never contains a path
/// separator.
fn underscored(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut in_space = false;
    for c in title.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push('_');
            }
            in_space = true;
            continue;
        }
        in_space = false;
        if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') {
            out.push(c);
        } else {
            out.push('_');
        }
    }
    out
}

fn non_empty(value: &str, field: &'static str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::empty(field));
    }
    Ok(trimmed.to_string())
}

/// Accepts "" or a 24-hour "HH:MM"; "9:05" is padded to "09:05" so the
/// lexicographic sort stays chronological.
fn normalize_time(value: &str) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(String::new());
    }
    let invalid = || ValidationError::InvalidTime {
        value: value.to_string(),
    };
    let (h, m) = value.split_once(':').ok_or_else(invalid)?;
    let digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if h.is_empty() || h.len() > 2 || m.len() != 2 || !digits(h) || !digits(m) {
        return Err(invalid());
    }
    let hours: u8 = h.parse().map_err(|_| invalid())?;
    let minutes: u8 = m.parse().map_err(|_| invalid())?;
    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }
    Ok(format!("{hours:02}:{minutes:02}"))
}
