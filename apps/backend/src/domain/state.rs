use serde::{Deserialize, Serialize};

use crate::domain::ids::{ConnectionId, GroupId, PlayerId};

/// Per-group lifecycle states, as exchanged with clients.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GroupPhase {
    /// Formed, waiting for the host to start the session.
    Lobby,
    /// Active player chosen; waiting for them to start the turn.
    ReadyForNextTurn,
    /// Active player is being scored; round timer running.
    Playing,
    /// Turn ended and a player was eliminated.
    RoundOver,
    /// Terminal: one non-eliminated player remains.
    ChampionSelected,
}

impl GroupPhase {
    pub const fn as_str(&self) -> &'static str {
        match self {
            GroupPhase::Lobby => "LOBBY",
            GroupPhase::ReadyForNextTurn => "READY_FOR_NEXT_TURN",
            GroupPhase::Playing => "PLAYING",
            GroupPhase::RoundOver => "ROUND_OVER",
            GroupPhase::ChampionSelected => "CHAMPION_SELECTED",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub id: PlayerId,
    pub display_name: String,
    /// Last accepted match quality, 0..=100.
    pub score: f64,
    pub eliminated: bool,
}

impl Player {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            id: PlayerId::new(),
            display_name: display_name.into(),
            score: 0.0,
            eliminated: false,
        }
    }
}

/// One elimination bracket. Mutated only through `domain::lifecycle::apply`.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub id: GroupId,
    pub owner: ConnectionId,
    /// Stable seat order; index is the tie-break key.
    pub players: Vec<Player>,
    pub phase: GroupPhase,
    pub objective: Option<String>,
    pub active: Option<usize>,
    pub round_time_left: u32,
    /// Seat of last round's loser.
    pub eliminated: Option<usize>,
    pub champion: Option<usize>,
    /// 1-based once the session starts.
    pub round_no: u32,
    /// Bumped whenever the group enters or leaves `Playing`; stale oracle
    /// readings carry an older value and are discarded.
    pub turn_no: u64,
    /// Bumped on every committed change.
    pub version: u64,
}

impl Group {
    pub fn new(id: GroupId, owner: ConnectionId, players: Vec<Player>) -> Self {
        Self {
            id,
            owner,
            players,
            phase: GroupPhase::Lobby,
            objective: None,
            active: None,
            round_time_left: 0,
            eliminated: None,
            champion: None,
            round_no: 0,
            turn_no: 0,
            version: 1,
        }
    }

    pub fn seat_of(&self, player: PlayerId) -> Option<usize> {
        self.players.iter().position(|p| p.id == player)
    }

    pub fn active_player(&self) -> Option<&Player> {
        self.active.and_then(|i| self.players.get(i))
    }

    pub fn survivors(&self) -> impl Iterator<Item = (usize, &Player)> {
        self.players.iter().enumerate().filter(|(_, p)| !p.eliminated)
    }

    pub fn survivor_count(&self) -> usize {
        self.survivors().count()
    }

    pub fn display_names(&self) -> Vec<String> {
        self.players.iter().map(|p| p.display_name.clone()).collect()
    }

    pub fn champion_player(&self) -> Option<&Player> {
        self.champion.and_then(|i| self.players.get(i))
    }
}

/// One classifier answer: a label and a confidence fraction in 0..=1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseReading {
    pub label: String,
    pub confidence: f64,
}

impl PoseReading {
    pub fn new(label: impl Into<String>, confidence: f64) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }
}
