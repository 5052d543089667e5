//! Domain-level error type used across the game engine and services.
//!
//! This error type is HTTP-agnostic. Handlers return
//! `Result<T, crate::error::AppError>` and convert from `DomainError`
//! using the provided `From<DomainError> for AppError` implementation.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Validation failure kinds (malformed or empty input).
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationKind {
    InvalidNames,
    InvalidImage,
    AlreadyInGroup,
    Other,
}

/// Why a turn-scoped command was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TurnViolation {
    /// Caller is not the active player.
    OutOfTurn,
    /// Group is not in the state the command requires.
    PhaseMismatch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotFoundKind {
    Group,
    Player,
}

/// Oracle failure kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum OracleFailureKind {
    Timeout,
    Unavailable,
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Malformed or empty input; no state change
    Validation(ValidationKind, String),
    /// Non-host attempting a host-only action
    Authorization(String),
    /// Command valid in shape but illegal for the current turn/state
    IllegalTurn(TurnViolation, String),
    /// Connection has no group membership
    NotInGroup(String),
    /// Session-level precondition failed
    Precondition(String),
    /// Missing resource in domain terms
    NotFound(NotFoundKind, String),
    /// External scoring call failed after retry
    Oracle(OracleFailureKind, String),
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::Validation(kind, d) => write!(f, "validation error {kind:?}: {d}"),
            DomainError::Authorization(d) => write!(f, "not authorized: {d}"),
            DomainError::IllegalTurn(kind, d) => write!(f, "illegal turn {kind:?}: {d}"),
            DomainError::NotInGroup(d) => write!(f, "not in group: {d}"),
            DomainError::Precondition(d) => write!(f, "precondition failed: {d}"),
            DomainError::NotFound(kind, d) => write!(f, "not found {kind:?}: {d}"),
            DomainError::Oracle(kind, d) => write!(f, "oracle failure {kind:?}: {d}"),
        }
    }
}

impl Error for DomainError {}

impl DomainError {
    pub fn validation(kind: ValidationKind, detail: impl Into<String>) -> Self {
        Self::Validation(kind, detail.into())
    }
    pub fn authorization(detail: impl Into<String>) -> Self {
        Self::Authorization(detail.into())
    }
    pub fn out_of_turn(detail: impl Into<String>) -> Self {
        Self::IllegalTurn(TurnViolation::OutOfTurn, detail.into())
    }
    pub fn phase_mismatch(detail: impl Into<String>) -> Self {
        Self::IllegalTurn(TurnViolation::PhaseMismatch, detail.into())
    }
    pub fn not_in_group(detail: impl Into<String>) -> Self {
        Self::NotInGroup(detail.into())
    }
    pub fn precondition(detail: impl Into<String>) -> Self {
        Self::Precondition(detail.into())
    }
    pub fn not_found(kind: NotFoundKind, detail: impl Into<String>) -> Self {
        Self::NotFound(kind, detail.into())
    }
    pub fn oracle(kind: OracleFailureKind, detail: impl Into<String>) -> Self {
        Self::Oracle(kind, detail.into())
    }

    /// Rejections that should be logged at warn rather than debug.
    pub fn is_illegal_command(&self) -> bool {
        matches!(
            self,
            DomainError::IllegalTurn(..) | DomainError::NotInGroup(_) | DomainError::Authorization(_)
        )
    }
}
