//! The per-group transition function.
//!
//! Every mutation of a [`Group`] (client commands and clock ticks alike) is an
//! [`GroupEvent`] fed through [`apply`]. Callers hold the group's lock for the
//! duration of the call, which makes `apply` the critical section.
//!
//! `apply` validates before it mutates: an `Err` leaves the group untouched.

use crate::domain::elimination::{first_survivor, next_survivor_after, select_loser, sole_survivor};
use crate::domain::game_transition::{derive_group_transitions, GroupLifecycleView, GroupTransition};
use crate::domain::ids::PlayerId;
use crate::domain::rules::{labels_match, score_from_confidence, RoundRules};
use crate::domain::state::{Group, GroupPhase, PoseReading};
use crate::errors::domain::{DomainError, NotFoundKind};

#[derive(Debug, Clone, PartialEq)]
pub enum GroupEvent {
    /// Host started the session.
    Open { objective: String },
    StartTurn { player: PlayerId },
    /// Oracle answered for a frame captured during turn `turn_no`.
    FrameScored {
        player: PlayerId,
        turn_no: u64,
        reading: PoseReading,
    },
    /// One clock tick elapsed.
    Tick,
    NextRound { objective: String },
    /// Session reset: back to the lobby, in-flight readings invalidated.
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnEndCause {
    TimerExpired,
    ObjectiveMet,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FrameEffect {
    /// Not the active player's turn any more, or the label did not count.
    Ignored,
    Scored { score: f64, objective_met: bool },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Applied {
    pub changed: bool,
    pub transitions: Vec<GroupTransition>,
    pub turn_end: Option<TurnEndCause>,
    pub frame: Option<FrameEffect>,
}

pub fn apply(
    group: &mut Group,
    rules: &RoundRules,
    event: GroupEvent,
) -> Result<Applied, DomainError> {
    let before = group.clone();
    let mut turn_end = None;
    let mut frame = None;

    match event {
        GroupEvent::Open { objective } => open(group, objective)?,
        GroupEvent::StartTurn { player } => start_turn(group, rules, player)?,
        GroupEvent::FrameScored {
            player,
            turn_no,
            reading,
        } => {
            let effect = score_frame(group, rules, player, turn_no, &reading);
            if let FrameEffect::Scored {
                objective_met: true,
                ..
            } = effect
            {
                end_turn(group);
                turn_end = Some(TurnEndCause::ObjectiveMet);
            }
            frame = Some(effect);
        }
        GroupEvent::Tick => {
            if tick(group) {
                end_turn(group);
                turn_end = Some(TurnEndCause::TimerExpired);
            }
        }
        GroupEvent::NextRound { objective } => next_round(group, objective)?,
        GroupEvent::Reset => reset(group),
    }

    let changed = *group != before;
    if changed {
        group.version += 1;
    }
    let transitions = derive_group_transitions(
        &GroupLifecycleView::of(&before),
        &GroupLifecycleView::of(group),
    );

    Ok(Applied {
        changed,
        transitions,
        turn_end,
        frame,
    })
}

/// Whether a frame from `player` would currently be scored.
pub fn accepts_frames_from(group: &Group, player: PlayerId) -> bool {
    group.phase == GroupPhase::Playing && group.active_player().map(|p| p.id) == Some(player)
}

fn open(group: &mut Group, objective: String) -> Result<(), DomainError> {
    if group.phase != GroupPhase::Lobby {
        return Err(DomainError::phase_mismatch(format!(
            "group {} already left the lobby ({})",
            group.id,
            group.phase.as_str()
        )));
    }
    let first = first_survivor(group)
        .ok_or_else(|| DomainError::precondition(format!("group {} has no players", group.id)))?;

    group.active = Some(first);
    group.objective = Some(objective);
    group.phase = GroupPhase::ReadyForNextTurn;
    group.round_no = 1;
    group.eliminated = None;
    group.champion = None;
    Ok(())
}

fn start_turn(group: &mut Group, rules: &RoundRules, player: PlayerId) -> Result<(), DomainError> {
    let seat = group.seat_of(player).ok_or_else(|| {
        DomainError::not_found(
            NotFoundKind::Player,
            format!("player {player} is not in group {}", group.id),
        )
    })?;
    if group.phase != GroupPhase::ReadyForNextTurn {
        return Err(DomainError::phase_mismatch(format!(
            "turn cannot start while group is {}",
            group.phase.as_str()
        )));
    }
    if group.active != Some(seat) {
        return Err(DomainError::out_of_turn(format!(
            "player {player} is not the active player"
        )));
    }

    group.phase = GroupPhase::Playing;
    group.round_time_left = rules.round_seconds;
    group.turn_no += 1;
    Ok(())
}

fn score_frame(
    group: &mut Group,
    rules: &RoundRules,
    player: PlayerId,
    turn_no: u64,
    reading: &PoseReading,
) -> FrameEffect {
    if turn_no != group.turn_no || !accepts_frames_from(group, player) {
        return FrameEffect::Ignored;
    }
    let Some(seat) = group.active else {
        return FrameEffect::Ignored;
    };

    let label_ok = group
        .objective
        .as_deref()
        .is_some_and(|objective| labels_match(&reading.label, objective));
    if rules.require_label_match && !label_ok {
        return FrameEffect::Ignored;
    }

    let score = score_from_confidence(reading.confidence);
    group.players[seat].score = score;
    FrameEffect::Scored {
        score,
        objective_met: label_ok && score >= rules.success_threshold,
    }
}

/// Returns true when the round timer just ran out.
fn tick(group: &mut Group) -> bool {
    if group.phase != GroupPhase::Playing {
        return false;
    }
    group.round_time_left = group.round_time_left.saturating_sub(1);
    group.round_time_left == 0
}

fn end_turn(group: &mut Group) {
    group.turn_no += 1;
    group.round_time_left = 0;
    group.active = None;

    if let Some(seat) = sole_survivor(group) {
        group.phase = GroupPhase::ChampionSelected;
        group.champion = Some(seat);
        return;
    }

    if let Some(loser) = select_loser(group) {
        group.players[loser].eliminated = true;
        group.eliminated = Some(loser);
    }
    group.phase = GroupPhase::RoundOver;
}

fn next_round(group: &mut Group, objective: String) -> Result<(), DomainError> {
    match group.phase {
        GroupPhase::ChampionSelected => return Ok(()),
        GroupPhase::RoundOver => {}
        other => {
            return Err(DomainError::phase_mismatch(format!(
                "next round requires ROUND_OVER, group is {}",
                other.as_str()
            )))
        }
    }

    if let Some(seat) = sole_survivor(group) {
        group.phase = GroupPhase::ChampionSelected;
        group.champion = Some(seat);
        group.active = None;
        return Ok(());
    }

    let anchor = group
        .eliminated
        .unwrap_or_else(|| group.players.len().saturating_sub(1));
    let next = next_survivor_after(group, anchor).ok_or_else(|| {
        DomainError::precondition(format!("group {} has no remaining players", group.id))
    })?;

    group.active = Some(next);
    group.objective = Some(objective);
    group.eliminated = None;
    group.round_no += 1;
    group.phase = GroupPhase::ReadyForNextTurn;
    Ok(())
}

fn reset(group: &mut Group) {
    group.phase = GroupPhase::Lobby;
    group.objective = None;
    group.active = None;
    group.round_time_left = 0;
    group.eliminated = None;
    group.champion = None;
    group.round_no = 0;
    group.turn_no += 1;
    for player in &mut group.players {
        player.score = 0.0;
        player.eliminated = false;
    }
}
