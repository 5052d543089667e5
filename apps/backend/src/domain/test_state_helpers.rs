//! Test-only group builder for domain unit tests.

use crate::domain::ids::{ConnectionId, GroupId};
use crate::domain::lifecycle::{apply, GroupEvent};
use crate::domain::rules::RoundRules;
use crate::domain::state::{Group, GroupPhase, Player};

pub const OBJECTIVE: &str = "Arms Up";

pub fn rules() -> RoundRules {
    RoundRules {
        round_seconds: 3,
        success_threshold: 90.0,
        require_label_match: false,
    }
}

/// A lobby group with the given player names, seated in order.
pub fn lobby_group(names: &[&str]) -> Group {
    Group::new(
        GroupId::new(),
        ConnectionId::new(),
        names.iter().map(|n| Player::new(*n)).collect(),
    )
}

/// A group that has left the lobby and waits for seat 0 to start.
pub fn opened_group(names: &[&str]) -> Group {
    let mut group = lobby_group(names);
    apply(
        &mut group,
        &rules(),
        GroupEvent::Open {
            objective: OBJECTIVE.to_string(),
        },
    )
    .unwrap();
    group
}

/// Force the group into `Playing` for `seat` with the given scores.
pub fn playing_group(names: &[&str], seat: usize, scores: &[f64]) -> Group {
    let mut group = opened_group(names);
    for (player, score) in group.players.iter_mut().zip(scores) {
        player.score = *score;
    }
    group.active = Some(seat);
    group.phase = GroupPhase::Playing;
    group.round_time_left = rules().round_seconds;
    group.turn_no += 1;
    group
}

/// Tick until the round timer expires.
pub fn expire_turn(group: &mut Group) {
    let rules = rules();
    while group.phase == GroupPhase::Playing {
        apply(group, &rules, GroupEvent::Tick).unwrap();
    }
}
