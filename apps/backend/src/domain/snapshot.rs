//! Public snapshot API for observing group state without exposing internals.
//!
//! The same [`SyncSnapshot`] is pushed over the websocket and returned by the
//! pull endpoint; both are built from [`GroupView::of`].

use serde::{Deserialize, Serialize};

use crate::domain::ids::{GroupId, PlayerId};
use crate::domain::state::{Group, GroupPhase, Player};

/// Session-wide phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionPhase {
    Lobby,
    GroupStage,
    GameOver,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerPublic {
    pub id: PlayerId,
    pub name: String,
    /// 0..=100, two decimals.
    pub score: f64,
    pub is_eliminated: bool,
}

impl PlayerPublic {
    fn of(player: &Player) -> Self {
        Self {
            id: player.id,
            name: player.display_name.clone(),
            score: (player.score * 100.0).round() / 100.0,
            is_eliminated: player.eliminated,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRef {
    pub id: PlayerId,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupView {
    pub group_id: GroupId,
    pub version: u64,
    pub state: GroupPhase,
    pub objective: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_player: Option<PlayerRef>,
    pub players: Vec<PlayerPublic>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eliminated_player: Option<PlayerRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub champion: Option<PlayerRef>,
    pub round_no: u32,
    pub round_time_left: u32,
}

impl GroupView {
    pub fn of(group: &Group) -> Self {
        let player_ref = |seat: Option<usize>| {
            seat.and_then(|i| group.players.get(i)).map(|p| PlayerRef {
                id: p.id,
                name: p.display_name.clone(),
            })
        };

        Self {
            group_id: group.id,
            version: group.version,
            state: group.phase,
            objective: group.objective.clone(),
            active_player: player_ref(group.active),
            players: group.players.iter().map(PlayerPublic::of).collect(),
            eliminated_player: player_ref(group.eliminated),
            champion: player_ref(group.champion),
            round_no: group.round_no,
            round_time_left: group.round_time_left,
        }
    }
}

/// What one connection sees: its own group plus the shared heartbeat.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncSnapshot {
    pub game_phase: SessionPhase,
    pub time_left: u32,
    pub tick: u64,
    pub my_group_state: GroupView,
}

impl SyncSnapshot {
    /// Ordering key; successive snapshots of one group never decrease.
    pub fn marker(&self) -> (u64, u64) {
        (self.my_group_state.version, self.tick)
    }

    pub fn group_id(&self) -> GroupId {
        self.my_group_state.group_id
    }
}
