//! Error types shared by the interval engine and its storage backends

use crate::models::IntervalId;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid ID: {0}")]
    InvalidId(IntervalId),

    #[error("Interval not found: {0}")]
    NotFound(IntervalId),

    #[error("No intervals")]
    NoIntervals,

    #[error("Interval not running")]
    IntervalNotRunning,

    #[error("Interval is completed or cancelled")]
    IntervalCompleted,

    #[error("Invalid state: {0}")]
    InvalidState(i64),

    #[error("Invalid category: {0}")]
    InvalidCategory(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
