//! Error codes for the Pose Arena API.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//!
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! that appear in HTTP problem responses and websocket `error` frames.

use core::fmt;

/// Centralized error codes for the Pose Arena API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authorization
    /// Caller is not the designated host
    NotHost,
    /// Caller acts on a group it does not own
    Forbidden,

    // Request Validation
    /// General validation error
    ValidationError,
    /// Empty or malformed player name list
    InvalidNames,
    /// Image payload could not be decoded
    InvalidImage,
    /// Connection already owns a group
    AlreadyInGroup,
    /// General bad request error
    BadRequest,
    /// Invalid or missing HTTP header
    InvalidHeader,
    /// Request body exceeds the configured limit
    PayloadTooLarge,

    // Game state
    /// Command issued by someone other than the active player
    OutOfTurn,
    /// Command issued in the wrong group state
    PhaseMismatch,
    /// Connection has no group yet
    NotInGroup,
    /// Session-level precondition failed (no groups, already started, ...)
    PreconditionFailed,

    // Resource Not Found
    /// Group not found
    GroupNotFound,
    /// Player not found in the caller's group
    PlayerNotFound,
    /// General not found error
    NotFound,

    // Pose oracle
    /// Oracle returned an error or garbage
    OracleUnavailable,
    /// Oracle did not answer in time
    OracleTimeout,

    // System Errors
    /// Internal server error
    InternalError,
    /// Configuration error
    ConfigError,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotHost => "NOT_HOST",
            Self::Forbidden => "FORBIDDEN",

            Self::ValidationError => "VALIDATION_ERROR",
            Self::InvalidNames => "INVALID_NAMES",
            Self::InvalidImage => "INVALID_IMAGE",
            Self::AlreadyInGroup => "ALREADY_IN_GROUP",
            Self::BadRequest => "BAD_REQUEST",
            Self::InvalidHeader => "INVALID_HEADER",
            Self::PayloadTooLarge => "PAYLOAD_TOO_LARGE",

            Self::OutOfTurn => "OUT_OF_TURN",
            Self::PhaseMismatch => "PHASE_MISMATCH",
            Self::NotInGroup => "NOT_IN_GROUP",
            Self::PreconditionFailed => "PRECONDITION_FAILED",

            Self::GroupNotFound => "GROUP_NOT_FOUND",
            Self::PlayerNotFound => "PLAYER_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            Self::OracleUnavailable => "ORACLE_UNAVAILABLE",
            Self::OracleTimeout => "ORACLE_TIMEOUT",

            Self::InternalError => "INTERNAL_ERROR",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
