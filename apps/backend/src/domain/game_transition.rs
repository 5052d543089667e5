// apps/backend/src/domain/game_transition.rs

use crate::domain::ids::PlayerId;
use crate::domain::state::{Group, GroupPhase};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupLifecycleView {
    pub version: u64,
    pub phase: GroupPhase,
    pub active: Option<PlayerId>,
    pub eliminated: Option<PlayerId>,
    pub champion: Option<PlayerId>,
}

impl GroupLifecycleView {
    pub fn of(group: &Group) -> Self {
        let id_at = |seat: Option<usize>| seat.and_then(|i| group.players.get(i)).map(|p| p.id);
        Self {
            version: group.version,
            phase: group.phase,
            active: id_at(group.active),
            eliminated: id_at(group.eliminated),
            champion: id_at(group.champion),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupTransition {
    /// Edge-triggered: group left the lobby.
    SessionOpened,

    /// Edge-triggered: a player was designated to start the next turn.
    TurnReady { player_id: PlayerId },

    /// Edge-triggered: group entered `Playing`.
    TurnStarted { player_id: PlayerId },

    /// Edge-triggered: a player lost a round.
    PlayerEliminated { player_id: PlayerId },

    /// Edge-triggered: terminal state reached.
    ChampionSelected { player_id: PlayerId },

    /// Edge-triggered: group was put back into the lobby by a reset.
    ReturnedToLobby,
}

/// Derive domain transitions from before/after lifecycle state.
pub fn derive_group_transitions(
    before: &GroupLifecycleView,
    after: &GroupLifecycleView,
) -> Vec<GroupTransition> {
    let mut transitions = Vec::new();

    if before.phase == GroupPhase::Lobby && after.phase != GroupPhase::Lobby {
        transitions.push(GroupTransition::SessionOpened);
    }

    if after.phase == GroupPhase::ReadyForNextTurn
        && (before.phase != GroupPhase::ReadyForNextTurn || before.active != after.active)
    {
        if let Some(player_id) = after.active {
            transitions.push(GroupTransition::TurnReady { player_id });
        }
    }

    if before.phase != GroupPhase::Playing && after.phase == GroupPhase::Playing {
        if let Some(player_id) = after.active {
            transitions.push(GroupTransition::TurnStarted { player_id });
        }
    }

    if let Some(player_id) = after.eliminated {
        if before.eliminated != after.eliminated {
            transitions.push(GroupTransition::PlayerEliminated { player_id });
        }
    }

    if let (None, Some(player_id)) = (before.champion, after.champion) {
        transitions.push(GroupTransition::ChampionSelected { player_id });
    }

    if before.phase != GroupPhase::Lobby && after.phase == GroupPhase::Lobby {
        transitions.push(GroupTransition::ReturnedToLobby);
    }

    transitions
}
