/// Emptrack Error Module
///
/// This module defines the error type shared by the gateway, the query
/// library, the prompts and the dispatcher.
use thiserror::Error;

/// Error type for the emptrack application.
///
/// Covers the two failure families an action flow can run into:
/// - store failures (connection, constraint violations, bad SQL)
/// - lookups that no longer resolve to a record
///
/// plus the ambient failures of configuration, terminal I/O and the
/// prompt lifecycle.
#[derive(Error, Debug)]
pub enum EmptrackError {
    /// Errors surfaced by SQLite
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A selected record or a write target does not exist
    #[error("{0} not found")]
    NotFound(String),

    /// A selection prompt had no options to offer
    #[error("Nothing to choose from")]
    NoChoices,

    /// The gateway was used after it was closed
    #[error("Database connection is closed")]
    Closed,

    /// Configuration loading and validation errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File system and terminal I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON rendering errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The input stream ended while a prompt was waiting
    #[error("Input closed")]
    InputClosed,

    /// The user interrupted a prompt
    #[error("Prompt cancelled")]
    Cancelled,
}

/// Type alias for Result to use EmptrackError as the error type.
pub type Result<T> = std::result::Result<T, EmptrackError>;
