use thiserror::Error;

use crate::database::DatabaseError;

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("pop from an empty priority queue")]
    EmptyQueue,

    #[error("Invalid date range: {0}")]
    InvalidRange(String),

    #[error("Invalid cycle input: {0}")]
    InvalidCycleInput(String),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

impl PlannerError {
    pub fn task_not_found(id: i64) -> Self {
        PlannerError::NotFound(format!("task {}", id))
    }

    pub fn event_not_found(id: i64) -> Self {
        PlannerError::NotFound(format!("event {}", id))
    }
}

impl From<rusqlite::Error> for PlannerError {
    fn from(err: rusqlite::Error) -> Self {
        PlannerError::Database(DatabaseError::from(err))
    }
}
