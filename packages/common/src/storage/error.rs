use std::fmt;

use uuid::Uuid;

use crate::JobStatus;
use crate::job::TransitionError;

/// Errors that can occur during job store operations.
#[derive(Debug)]
pub enum StorageError {
    /// No job with the given id exists.
    NotFound(Uuid),
    /// The requested status change would move the job backwards or out of a terminal state.
    InvalidTransition {
        id: Uuid,
        from: JobStatus,
        to: JobStatus,
    },
    /// The backing database rejected or failed the statement.
    Database(String),
    /// Anything else, such as a row that no longer decodes.
    Internal(String),
}

impl StorageError {
    pub fn transition(id: Uuid, err: TransitionError) -> Self {
        Self::InvalidTransition {
            id,
            from: err.from,
            to: err.to,
        }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "job not found: {id}"),
            Self::InvalidTransition { id, from, to } => {
                write!(f, "job {id} cannot move from {from} to {to}")
            }
            Self::Database(msg) => write!(f, "database error: {msg}"),
            Self::Internal(msg) => write!(f, "storage error: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {}

#[cfg(feature = "sea-orm")]
impl From<sea_orm::DbErr> for StorageError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}
