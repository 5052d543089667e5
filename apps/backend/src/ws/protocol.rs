use serde::{Deserialize, Serialize};

use crate::domain::{ConnectionId, SyncSnapshot};
use crate::services::registry::LobbyEntry;

pub const PROTOCOL_VERSION: i32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMsg {
    Hello { protocol: i32 },
    /// Ask for the current snapshot of the caller's group.
    Resync,
}

#[allow(clippy::large_enum_variant)]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMsg {
    Hello {
        protocol: i32,
        connection_id: ConnectionId,
    },

    LobbyUpdate {
        groups: Vec<LobbyEntry>,
    },

    GameStarted,

    /// Same payload the snapshot endpoint returns.
    GameUpdate {
        snapshot: SyncSnapshot,
    },

    SessionReset,

    Error {
        code: ErrorCode,
        message: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    BadProtocol,
    BadRequest,
    NotInGroup,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::BadProtocol => "bad_protocol",
            ErrorCode::BadRequest => "bad_request",
            ErrorCode::NotInGroup => "not_in_group",
        }
    }
}
