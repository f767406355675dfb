//! Core error types for dayplay-core.
//!
//! This module defines the error hierarchy using thiserror. Validation
//! failures abort an operation before any mutation; storage failures leave
//! in-memory state intact but not durable.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for dayplay-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Required input was missing or malformed
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The key-value store could not be read or written
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required text field was empty or whitespace-only
    #[error("{field} is required")]
    EmptyField { field: &'static str },

    /// A board cell index outside 0..9
    #[error("Cell index {index} out of bounds (expected 0-8)")]
    CellOutOfBounds { index: usize },

    /// A task time that is not "HH:MM"
    #[error("Invalid time '{value}': expected HH:MM")]
    InvalidTime { value: String },
}

impl ValidationError {
    pub fn empty(field: &'static str) -> Self {
        ValidationError::EmptyField { field }
    }
}

/// Persistence errors. The store is treated as unavailable for the
/// operation that raised it only.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the backing database
    #[error("Failed to open store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked by another process
    #[error("Store is locked")]
    Locked,

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(inner, _msg)
                if inner.code == rusqlite::ErrorCode::DatabaseBusy
                    || inner.code == rusqlite::ErrorCode::DatabaseLocked =>
            {
                StorageError::Locked
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Storage(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_names_field() {
        let err = CoreError::from(ValidationError::empty("Timetable title"));
        assert_eq!(err.to_string(), "Validation error: Timetable title is required");
    }

    #[test]
    fn sqlite_query_errors_map_to_query_failed() {
        let err = StorageError::from(rusqlite::Error::QueryReturnedNoRows);
        assert!(matches!(err, StorageError::QueryFailed(_)));
    }

    #[test]
    fn sqlite_busy_and_locked_map_to_locked() {
        for code in [rusqlite::ffi::SQLITE_BUSY, rusqlite::ffi::SQLITE_LOCKED] {
            let err = rusqlite::Error::SqliteFailure(rusqlite::ffi::Error::new(code), None);
            assert!(matches!(StorageError::from(err), StorageError::Locked));
        }
        let err = CoreError::from(rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_BUSY),
            None,
        ));
        assert!(matches!(err, CoreError::Storage(StorageError::Locked)));
    }
}
