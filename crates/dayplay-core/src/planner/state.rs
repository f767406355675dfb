//! Planner state and command dispatch.
//!
//! `apply` is pure over [`PlannerState`]: it mutates the in-memory model and
//! reports which keys need rewriting plus the events to render. The
//! [`Planner`] controller owns a store and performs those writes.
//!
//! Operations that reference an id no longer present are silent no-ops:
//! no events, no writes.

use tracing::debug;

use super::model::{Task, TaskDraft, Timetable, User};
use crate::error::{Result, ValidationError};
use crate::events::{Event, TimetableSummary};
use crate::storage::{load_json, save_json, KvStore, TIMETABLES_KEY, USER_KEY};

/// A user action against the planner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannerCommand {
    Register { name: String },
    ContinueAsGuest,
    Logout,
    CreateTimetable { title: String },
    RenameTimetable { id: String, title: String },
    DeleteTimetable { id: String },
    SelectTimetable { id: String },
    AddTask { timetable_id: String, draft: TaskDraft },
    EditTask { task_id: String, draft: TaskDraft },
    ToggleTask { task_id: String },
    DeleteTask { task_id: String },
}

/// A key the controller must rewrite after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Write {
    Timetables,
    User,
    ClearUser,
}

/// Result of applying one command.
#[derive(Debug, Default, PartialEq)]
pub struct Outcome {
    pub writes: Vec<Write>,
    pub events: Vec<Event>,
}

impl Outcome {
    fn none() -> Self {
        Self::default()
    }

    pub fn is_noop(&self) -> bool {
        self.writes.is_empty() && self.events.is_empty()
    }
}

/// In-memory planner model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlannerState {
    pub user: Option<User>,
    pub timetables: Vec<Timetable>,
    pub active_id: Option<String>,
}

impl PlannerState {
    pub fn new(user: Option<User>, timetables: Vec<Timetable>) -> Self {
        let mut state = Self {
            user,
            timetables,
            active_id: None,
        };
        state.active_id = state.timetables.first().map(|t| t.id.clone());
        state
    }

    pub fn timetable(&self, id: &str) -> Option<&Timetable> {
        self.timetables.iter().find(|t| t.id == id)
    }

    pub fn greeting(&self) -> String {
        match &self.user {
            Some(user) => format!("Hello, {}", user.name),
            None => "Hello".to_string(),
        }
    }

    /// Case-insensitive title filter, stored order preserved.
    pub fn search(&self, filter: &str) -> Vec<&Timetable> {
        let needle = filter.to_lowercase();
        self.timetables
            .iter()
            .filter(|t| t.title.to_lowercase().contains(&needle))
            .collect()
    }

    /// Title suggested for the next new timetable.
    pub fn suggested_title(&self, prefix: &str) -> String {
        format!("{prefix} {}", self.timetables.len() + 1)
    }

    fn list_event(&self) -> Event {
        Event::TimetablesChanged {
            timetables: self
                .timetables
                .iter()
                .map(|t| TimetableSummary::of(t, self.active_id.as_deref()))
                .collect(),
            active_id: self.active_id.clone(),
        }
    }

    fn locate_task(&self, task_id: &str) -> Option<usize> {
        self.timetables
            .iter()
            .position(|tt| tt.task(task_id).is_some())
    }

    /// Apply one command to the model.
    ///
    /// # Errors
    /// Returns a [`ValidationError`] for empty names/titles or malformed
    /// times; the model is unchanged in that case.
    pub fn apply(&mut self, command: PlannerCommand) -> Result<Outcome, ValidationError> {
        let outcome = match command {
            PlannerCommand::Register { name } => {
                let user = User::named(&name)?;
                self.user = Some(user);
                Outcome {
                    writes: vec![Write::User],
                    events: vec![Event::UserChanged {
                        user: self.user.clone(),
                    }],
                }
            }
            PlannerCommand::ContinueAsGuest => {
                self.user = Some(User::guest());
                Outcome {
                    writes: vec![Write::User],
                    events: vec![Event::UserChanged {
                        user: self.user.clone(),
                    }],
                }
            }
            PlannerCommand::Logout => {
                self.user = None;
                Outcome {
                    writes: vec![Write::ClearUser],
                    events: vec![Event::UserChanged { user: None }],
                }
            }
            PlannerCommand::CreateTimetable { title } => {
                let tt = Timetable::new(&title)?;
                self.active_id = Some(tt.id.clone());
                let tasks = tasks_event(&tt);
                self.timetables.insert(0, tt);
                Outcome {
                    writes: vec![Write::Timetables],
                    events: vec![self.list_event(), tasks],
                }
            }
            PlannerCommand::RenameTimetable { id, title } => {
                let title = title.trim();
                if title.is_empty() {
                    return Ok(Outcome::none());
                }
                let Some(tt) = self.timetables.iter_mut().find(|t| t.id == id) else {
                    return Ok(Outcome::none());
                };
                tt.title = title.to_string();
                let mut events = Vec::new();
                if self.active_id.as_deref() == Some(id.as_str()) {
                    events.push(tasks_event(tt));
                }
                events.insert(0, self.list_event());
                Outcome {
                    writes: vec![Write::Timetables],
                    events,
                }
            }
            PlannerCommand::DeleteTimetable { id } => {
                let before = self.timetables.len();
                self.timetables.retain(|t| t.id != id);
                if self.timetables.len() == before {
                    return Ok(Outcome::none());
                }
                let mut events = Vec::new();
                if self.active_id.as_deref() == Some(id.as_str()) {
                    self.active_id = None;
                    events.push(Event::SelectionCleared);
                }
                events.insert(0, self.list_event());
                Outcome {
                    writes: vec![Write::Timetables],
                    events,
                }
            }
            PlannerCommand::SelectTimetable { id } => {
                let Some(tt) = self.timetable(&id) else {
                    return Ok(Outcome::none());
                };
                let tasks = tasks_event(tt);
                self.active_id = Some(id);
                Outcome {
                    writes: Vec::new(),
                    events: vec![self.list_event(), tasks],
                }
            }
            PlannerCommand::AddTask {
                timetable_id,
                draft,
            } => {
                let Some(tt) = self.timetables.iter_mut().find(|t| t.id == timetable_id) else {
                    return Ok(Outcome::none());
                };
                tt.tasks.push(Task::from_draft(&draft)?);
                Outcome {
                    writes: vec![Write::Timetables],
                    events: vec![tasks_event(tt)],
                }
            }
            PlannerCommand::EditTask { task_id, draft } => {
                self.with_task(&task_id, |task| task.apply_draft(&draft))?
            }
            PlannerCommand::ToggleTask { task_id } => self.with_task(&task_id, |task| {
                task.done = !task.done;
                Ok(())
            })?,
            PlannerCommand::DeleteTask { task_id } => {
                let Some(idx) = self.locate_task(&task_id) else {
                    return Ok(Outcome::none());
                };
                let tt = &mut self.timetables[idx];
                tt.tasks.retain(|t| t.id != task_id);
                Outcome {
                    writes: vec![Write::Timetables],
                    events: vec![tasks_event(tt)],
                }
            }
        };
        debug!(writes = outcome.writes.len(), "planner command applied");
        Ok(outcome)
    }

    fn with_task(
        &mut self,
        task_id: &str,
        f: impl FnOnce(&mut Task) -> Result<(), ValidationError>,
    ) -> Result<Outcome, ValidationError> {
        let Some(idx) = self.locate_task(task_id) else {
            return Ok(Outcome::none());
        };
        let tt = &mut self.timetables[idx];
        if let Some(task) = tt.task_mut(task_id) {
            f(task)?;
        }
        Ok(Outcome {
            writes: vec![Write::Timetables],
            events: vec![tasks_event(tt)],
        })
    }
}

fn tasks_event(tt: &Timetable) -> Event {
    Event::TasksChanged {
        timetable_id: tt.id.clone(),
        title: tt.title.clone(),
        tasks: tt.sorted_tasks(),
    }
}

/// Planner controller: one model, one store.
pub struct Planner<S: KvStore> {
    store: S,
    state: PlannerState,
}

impl<S: KvStore> Planner<S> {
    /// Load user and timetables from the store. The first timetable, if
    /// any, becomes active.
    pub fn load(store: S) -> Result<Self> {
        let user: Option<User> = load_json(&store, USER_KEY)?;
        let timetables: Vec<Timetable> = load_json(&store, TIMETABLES_KEY)?.unwrap_or_default();
        debug!(
            registered = user.is_some(),
            timetables = timetables.len(),
            "planner loaded"
        );
        Ok(Self {
            store,
            state: PlannerState::new(user, timetables),
        })
    }

    pub fn state(&self) -> &PlannerState {
        &self.state
    }

    /// Apply a command and persist whatever it touched.
    ///
    /// # Errors
    /// Validation errors leave model and store untouched. A storage error
    /// is returned after the in-memory change has been applied.
    pub fn dispatch(&mut self, command: PlannerCommand) -> Result<Vec<Event>> {
        let outcome = self.state.apply(command)?;
        for write in &outcome.writes {
            match write {
                Write::Timetables => save_json(&self.store, TIMETABLES_KEY, &self.state.timetables)?,
                Write::User => {
                    if let Some(user) = &self.state.user {
                        save_json(&self.store, USER_KEY, user)?;
                    }
                }
                Write::ClearUser => self.store.remove(USER_KEY)?,
            }
        }
        Ok(outcome.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn create(state: &mut PlannerState, title: &str) -> String {
        state
            .apply(PlannerCommand::CreateTimetable {
                title: title.to_string(),
            })
            .unwrap();
        state.active_id.clone().unwrap()
    }

    #[test]
    fn create_prepends_and_activates() {
        let mut state = PlannerState::default();
        let first = create(&mut state, "Monday");
        let second = create(&mut state, "Tuesday");
        assert_eq!(state.timetables[0].id, second);
        assert_eq!(state.timetables[1].id, first);
        assert_eq!(state.active_id.as_deref(), Some(second.as_str()));
    }

    #[test]
    fn whitespace_title_is_rejected() {
        let mut state = PlannerState::default();
        let err = state
            .apply(PlannerCommand::CreateTimetable {
                title: "   ".to_string(),
            })
            .unwrap_err();
        assert_eq!(err, ValidationError::empty("Timetable title"));
        assert!(state.timetables.is_empty());
    }

    #[test]
    fn rename_with_empty_title_is_noop() {
        let mut state = PlannerState::default();
        let id = create(&mut state, "Monday");
        let outcome = state
            .apply(PlannerCommand::RenameTimetable {
                id: id.clone(),
                title: "  ".to_string(),
            })
            .unwrap();
        assert!(outcome.is_noop());
        assert_eq!(state.timetables[0].title, "Monday");

        state
            .apply(PlannerCommand::RenameTimetable {
                id,
                title: " Exam Day ".to_string(),
            })
            .unwrap();
        assert_eq!(state.timetables[0].title, "Exam Day");
    }

    #[test]
    fn deleting_active_clears_selection() {
        let mut state = PlannerState::default();
        let id = create(&mut state, "Only");
        let outcome = state.apply(PlannerCommand::DeleteTimetable { id }).unwrap();
        assert!(state.active_id.is_none());
        assert!(state.timetables.is_empty());
        assert!(outcome.events.contains(&Event::SelectionCleared));
    }

    #[test]
    fn deleting_inactive_keeps_selection() {
        let mut state = PlannerState::default();
        let old = create(&mut state, "Old");
        let current = create(&mut state, "Current");
        state.apply(PlannerCommand::DeleteTimetable { id: old }).unwrap();
        assert_eq!(state.active_id, Some(current));
    }

    #[test]
    fn select_switches_active_without_writes() {
        let mut state = PlannerState::default();
        let old = create(&mut state, "Old");
        create(&mut state, "Current");
        let outcome = state
            .apply(PlannerCommand::SelectTimetable { id: old.clone() })
            .unwrap();
        assert_eq!(state.active_id.as_deref(), Some(old.as_str()));
        assert!(outcome.writes.is_empty());
        assert!(matches!(
            &outcome.events[1],
            Event::TasksChanged { timetable_id, .. } if *timetable_id == old
        ));
    }

    #[test]
    fn unknown_ids_are_silent_noops() {
        let mut state = PlannerState::default();
        create(&mut state, "Day");
        for command in [
            PlannerCommand::DeleteTimetable { id: "gone".into() },
            PlannerCommand::SelectTimetable { id: "gone".into() },
            PlannerCommand::ToggleTask { task_id: "gone".into() },
            PlannerCommand::DeleteTask { task_id: "gone".into() },
            PlannerCommand::AddTask {
                timetable_id: "gone".into(),
                draft: TaskDraft::new("", "x", ""),
            },
        ] {
            assert!(state.apply(command).unwrap().is_noop());
        }
    }

    #[test]
    fn task_lifecycle() {
        let mut state = PlannerState::default();
        let tt = create(&mut state, "Day");
        state
            .apply(PlannerCommand::AddTask {
                timetable_id: tt.clone(),
                draft: TaskDraft::new("09:00", "Write", ""),
            })
            .unwrap();
        let task_id = state.timetables[0].tasks[0].id.clone();

        state
            .apply(PlannerCommand::ToggleTask {
                task_id: task_id.clone(),
            })
            .unwrap();
        assert!(state.timetables[0].tasks[0].done);

        let err = state
            .apply(PlannerCommand::EditTask {
                task_id: task_id.clone(),
                draft: TaskDraft::new("", "", ""),
            })
            .unwrap_err();
        assert_eq!(err, ValidationError::empty("Task title"));
        assert_eq!(state.timetables[0].tasks[0].title, "Write");

        state
            .apply(PlannerCommand::EditTask {
                task_id: task_id.clone(),
                draft: TaskDraft::new("", "Write more", "draft 2"),
            })
            .unwrap();
        let task = &state.timetables[0].tasks[0];
        assert_eq!(task.title, "Write more");
        assert_eq!(task.time, "");
        assert!(task.done);

        state.apply(PlannerCommand::DeleteTask { task_id }).unwrap();
        assert!(state.timetables[0].tasks.is_empty());
    }

    #[test]
    fn search_is_case_insensitive() {
        let mut state = PlannerState::default();
        create(&mut state, "Exam Day");
        create(&mut state, "Monday");
        let hits: Vec<_> = state.search("DAY").iter().map(|t| t.title.clone()).collect();
        assert_eq!(hits, vec!["Monday", "Exam Day"]);
        assert_eq!(state.search("exam").len(), 1);
        assert_eq!(state.search("").len(), 2);
    }

    #[test]
    fn greeting_and_suggested_title() {
        let mut state = PlannerState::default();
        assert_eq!(state.greeting(), "Hello");
        assert_eq!(state.suggested_title("Timetable"), "Timetable 1");
        state
            .apply(PlannerCommand::Register {
                name: " Ada ".into(),
            })
            .unwrap();
        assert_eq!(state.greeting(), "Hello, Ada");
    }

    #[test]
    fn validation_failure_skips_persistence() {
        let store = MemoryStore::new();
        let mut planner = Planner::load(&store).unwrap();
        assert!(planner
            .dispatch(PlannerCommand::CreateTimetable { title: "".into() })
            .is_err());
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn logout_removes_user_key_only() {
        let store = MemoryStore::new();
        let mut planner = Planner::load(&store).unwrap();
        planner.dispatch(PlannerCommand::ContinueAsGuest).unwrap();
        planner
            .dispatch(PlannerCommand::CreateTimetable {
                title: "Keep".into(),
            })
            .unwrap();
        planner.dispatch(PlannerCommand::Logout).unwrap();
        assert!(store.get(USER_KEY).unwrap().is_none());
        assert!(store.get(TIMETABLES_KEY).unwrap().is_some());
    }

    #[test]
    fn failed_write_keeps_memory_state() {
        use crate::error::{CoreError, StorageError};
        use crate::storage::kv::LockedStore;

        let mut planner = Planner::load(LockedStore).unwrap();
        let err = planner
            .dispatch(PlannerCommand::CreateTimetable {
                title: "Monday".into(),
            })
            .unwrap_err();
        assert!(matches!(err, CoreError::Storage(StorageError::Locked)));
        assert_eq!(planner.state().timetables.len(), 1);
        assert_eq!(planner.state().timetables[0].title, "Monday");
        assert!(planner.state().active_id.is_some());
    }
}
