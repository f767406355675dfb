//! # dayplay Core Library
//!
//! Business logic for two independent tools that share one key-value store:
//! a timetable planner and a tic-tac-toe game. Presentation layers (the
//! `dayplay` CLI, or anything else) send commands and render the returned
//! [`Event`]s; the core never draws or prompts.
//!
//! ## Architecture
//!
//! - **Planner**: timetables and tasks, persisted whole under `timetables`
//! - **Game**: board state machine, fixed-priority opponent, session
//!   counters and a persisted win tally under `scores`
//! - **Storage**: the [`KvStore`] trait with SQLite and in-memory backends,
//!   plus TOML configuration
//!
//! ## Key Components
//!
//! - [`Planner`]: timetable controller
//! - [`GameSession`]: match controller
//! - [`Database`]: SQLite key-value persistence
//! - [`Config`]: application configuration

pub mod error;
pub mod events;
pub mod game;
pub mod planner;
pub mod storage;

pub use error::{ConfigError, CoreError, StorageError, ValidationError};
pub use events::{Event, TimetableSummary};
pub use game::{check_win, choose_move, Board, GameCommand, GameEngine, GameSession, GameStatus, Mark, Mode};
pub use planner::{Planner, PlannerCommand, PlannerState, Task, TaskDraft, Timetable, User};
pub use storage::{Config, Database, KvStore, MemoryStore};
