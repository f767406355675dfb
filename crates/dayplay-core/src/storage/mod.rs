mod config;
pub mod database;
pub mod kv;

pub use config::{Config, GameConfig, LogConfig, PlannerConfig};
pub use database::Database;
pub use kv::{load_json, save_json, KvStore, MemoryStore};

use std::path::PathBuf;

use crate::error::StorageError;

/// Storage key holding the registered user.
pub const USER_KEY: &str = "user";
/// Storage key holding the JSON array of timetables.
pub const TIMETABLES_KEY: &str = "timetables";
/// Storage key holding the persisted score store.
pub const SCORES_KEY: &str = "scores";

/// Returns `~/.config/dayplay[-dev]/` based on DAYPLAY_ENV.
///
/// Set DAYPLAY_ENV=dev to use the development data directory, or
/// DAYPLAY_DATA_DIR to point at an explicit directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = match std::env::var_os("DAYPLAY_DATA_DIR") {
        Some(explicit) => PathBuf::from(explicit),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("DAYPLAY_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("dayplay-dev")
            } else {
                base_dir.join("dayplay")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| StorageError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
