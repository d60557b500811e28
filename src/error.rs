//! Error types for event time handling and calendar sessions.

use thiserror::Error;

/// Conditions raised by the pure date/time conversion functions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EventTimeError {
    /// A drag/drop gesture reported no usable position. The caller must
    /// revert the visual move.
    #[error("Invalid drop geometry: {0}")]
    InvalidDropGeometry(String),

    #[error("Invalid date '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("Invalid time '{0}' (expected HH:MM)")]
    InvalidTime(String),

    #[error("Invalid timestamp '{0}'")]
    InvalidTimestamp(String),
}

/// Errors surfaced by [`crate::services::session::CalendarSession`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error(transparent)]
    Time(#[from] EventTimeError),

    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    /// The event store rejected an insert, update or delete.
    #[error("Persistence failure: {0}")]
    PersistenceFailure(String),

    #[error("Event with id {0} not found")]
    NotFound(String),
}

impl SessionError {
    /// Wraps a store error, keeping the full context chain in the message.
    pub fn persistence(err: anyhow::Error) -> Self {
        Self::PersistenceFailure(format!("{:#}", err))
    }
}

/// Result type alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;
