//! Core error types for deskclock-core.
//!
//! Nothing in the timer or drag machines is fatal: the default UI-facing
//! methods absorb these conditions into no-ops. The `try_*` variants and the
//! storage layer surface them through the enums below.

use std::path::PathBuf;
use thiserror::Error;

use crate::timer::TimerPhase;

/// Core error type for deskclock-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Countdown state machine errors
    #[error("Timer error: {0}")]
    Timer(#[from] TimerError),

    /// Timer history errors
    #[error("History error: {0}")]
    History(#[from] HistoryError),

    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Countdown timer errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimerError {
    /// Operation called in a phase that does not accept it.
    #[error("cannot {operation} while {phase:?}")]
    InvalidTransition {
        operation: &'static str,
        phase: TimerPhase,
    },

    /// Duration outside [5s, 3600s] or not a multiple of 5s.
    #[error("invalid countdown duration: {requested_ms} ms")]
    InvalidConfiguration { requested_ms: i64 },
}

/// Timer history errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HistoryError {
    /// No record with the given ID.
    #[error("no timer record with id '{0}'")]
    RecordNotFound(String),

    /// Note exceeds the maximum length.
    #[error("note is {len} characters, maximum is {max}")]
    NoteTooLong { len: usize, max: usize },
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// Stored value could not be decoded
    #[error("Stored value for '{key}' is corrupt: {message}")]
    Corrupt { key: String, message: String },
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

    /// Key does not exist in the configuration tree
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) => {
                if e.code == rusqlite::ErrorCode::DatabaseLocked {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
