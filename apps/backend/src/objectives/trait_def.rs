//! Objective selection trait definition.

use std::fmt;

use crate::errors::domain::DomainError;

/// Errors that can occur while choosing an objective.
#[derive(Debug)]
pub enum ObjectiveError {
    /// The pool has no entries to choose from
    EmptyPool,
    /// Selector state could not be accessed
    Internal(String),
}

impl fmt::Display for ObjectiveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectiveError::EmptyPool => write!(f, "objective pool is empty"),
            ObjectiveError::Internal(msg) => write!(f, "objective selector error: {msg}"),
        }
    }
}

impl std::error::Error for ObjectiveError {}

impl From<ObjectiveError> for DomainError {
    fn from(err: ObjectiveError) -> Self {
        DomainError::precondition(err.to_string())
    }
}

/// Chooses the pose a player must match next.
///
/// Called inside a group's critical section, so implementations must not
/// block. `previous` is the objective the group just played, if any.
pub trait ObjectiveSelector: Send + Sync {
    fn next_objective(&self, previous: Option<&str>) -> Result<String, ObjectiveError>;

    fn pool(&self) -> &[String];
}
