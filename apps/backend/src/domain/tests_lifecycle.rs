use crate::domain::game_transition::GroupTransition;
use crate::domain::lifecycle::{apply, FrameEffect, GroupEvent, TurnEndCause};
use crate::domain::rules::RoundRules;
use crate::domain::state::{GroupPhase, PoseReading};
use crate::domain::test_state_helpers::{
    expire_turn, lobby_group, opened_group, playing_group, rules, OBJECTIVE,
};
use crate::errors::domain::{DomainError, NotFoundKind, TurnViolation};

fn frame(group: &crate::domain::state::Group, seat: usize, label: &str, confidence: f64) -> GroupEvent {
    GroupEvent::FrameScored {
        player: group.players[seat].id,
        turn_no: group.turn_no,
        reading: PoseReading::new(label, confidence),
    }
}

fn submit(
    group: &mut crate::domain::state::Group,
    rules: &RoundRules,
    seat: usize,
    label: &str,
    confidence: f64,
) -> crate::domain::lifecycle::Applied {
    let event = frame(group, seat, label, confidence);
    apply(group, rules, event).unwrap()
}

#[test]
fn open_picks_lowest_seat_and_assigns_objective() {
    let mut group = lobby_group(&["A", "B"]);
    let applied = apply(
        &mut group,
        &rules(),
        GroupEvent::Open {
            objective: OBJECTIVE.into(),
        },
    )
    .unwrap();

    assert_eq!(group.phase, GroupPhase::ReadyForNextTurn);
    assert_eq!(group.active, Some(0));
    assert_eq!(group.objective.as_deref(), Some(OBJECTIVE));
    assert_eq!(group.round_no, 1);
    assert!(applied.transitions.contains(&GroupTransition::SessionOpened));
}

#[test]
fn open_twice_is_rejected() {
    let mut group = opened_group(&["A"]);
    let err = apply(
        &mut group,
        &rules(),
        GroupEvent::Open {
            objective: OBJECTIVE.into(),
        },
    )
    .unwrap_err();
    assert!(matches!(err, DomainError::IllegalTurn(TurnViolation::PhaseMismatch, _)));
}

#[test]
fn start_turn_by_active_player_enters_playing() {
    let mut group = opened_group(&["A", "B"]);
    let player = group.players[0].id;
    let turn_before = group.turn_no;

    let applied = apply(&mut group, &rules(), GroupEvent::StartTurn { player }).unwrap();

    assert_eq!(group.phase, GroupPhase::Playing);
    assert_eq!(group.round_time_left, rules().round_seconds);
    assert_eq!(group.turn_no, turn_before + 1);
    assert_eq!(
        applied.transitions,
        vec![GroupTransition::TurnStarted { player_id: player }]
    );
}

#[test]
fn start_turn_out_of_turn_leaves_state_untouched() {
    let mut group = opened_group(&["A", "B"]);
    let before = group.clone();

    let player = group.players[1].id;
    let err = apply(&mut group, &rules(), GroupEvent::StartTurn { player }).unwrap_err();

    assert!(matches!(err, DomainError::IllegalTurn(TurnViolation::OutOfTurn, _)));
    assert_eq!(group, before);
}

#[test]
fn start_turn_repeat_while_playing_is_rejected() {
    let mut group = opened_group(&["A", "B"]);
    let player = group.players[0].id;
    apply(&mut group, &rules(), GroupEvent::StartTurn { player }).unwrap();
    let before = group.clone();

    let err = apply(&mut group, &rules(), GroupEvent::StartTurn { player }).unwrap_err();

    assert!(matches!(err, DomainError::IllegalTurn(TurnViolation::PhaseMismatch, _)));
    assert_eq!(group, before);
}

#[test]
fn start_turn_for_stranger_is_not_found() {
    let mut group = opened_group(&["A"]);
    let err = apply(
        &mut group,
        &rules(),
        GroupEvent::StartTurn {
            player: crate::domain::ids::PlayerId::new(),
        },
    )
    .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(NotFoundKind::Player, _)));
}

#[test]
fn last_reading_overwrites_score() {
    let mut group = playing_group(&["A", "B"], 0, &[0.0, 0.0]);

    submit(&mut group, &rules(), 0, "T Pose", 0.55);
    let applied = submit(&mut group, &rules(), 0, "T Pose", 0.25);

    assert_eq!(group.players[0].score, 25.0);
    assert_eq!(group.phase, GroupPhase::Playing);
    assert_eq!(
        applied.frame,
        Some(FrameEffect::Scored {
            score: 25.0,
            objective_met: false
        })
    );
}

#[test]
fn frame_outside_playing_is_a_no_op() {
    let mut group = opened_group(&["A", "B"]);
    let before = group.clone();

    let applied = submit(&mut group, &rules(), 0, OBJECTIVE, 0.99);

    assert!(!applied.changed);
    assert_eq!(applied.frame, Some(FrameEffect::Ignored));
    assert_eq!(group, before);
}

#[test]
fn frame_from_non_active_player_is_ignored() {
    let mut group = playing_group(&["A", "B"], 0, &[0.0, 0.0]);
    let before = group.clone();

    let applied = submit(&mut group, &rules(), 1, OBJECTIVE, 0.5);

    assert_eq!(applied.frame, Some(FrameEffect::Ignored));
    assert_eq!(group, before);
}

#[test]
fn reading_from_an_earlier_turn_is_discarded() {
    let mut group = playing_group(&["A", "B"], 0, &[0.0, 0.0]);
    let stale = GroupEvent::FrameScored {
        player: group.players[0].id,
        turn_no: group.turn_no - 1,
        reading: PoseReading::new(OBJECTIVE, 0.8),
    };

    let applied = apply(&mut group, &rules(), stale).unwrap();

    assert_eq!(applied.frame, Some(FrameEffect::Ignored));
    assert_eq!(group.players[0].score, 0.0);
}

#[test]
fn matching_high_confidence_ends_the_turn() {
    let mut group = playing_group(&["A", "B", "C"], 1, &[20.0, 0.0, 50.0]);

    let applied = submit(&mut group, &rules(), 1, OBJECTIVE, 0.95);

    assert_eq!(applied.turn_end, Some(TurnEndCause::ObjectiveMet));
    assert_eq!(group.phase, GroupPhase::RoundOver);
    assert_eq!(group.players[1].score, 95.0);
    assert_eq!(group.eliminated, Some(0));
    assert!(group.players[0].eliminated);
}

#[test]
fn high_confidence_for_wrong_label_does_not_end_the_turn() {
    let mut group = playing_group(&["A", "B"], 0, &[0.0, 0.0]);

    let applied = submit(&mut group, &rules(), 0, "Squat", 0.99);

    assert_eq!(applied.turn_end, None);
    assert_eq!(group.phase, GroupPhase::Playing);
    assert_eq!(group.players[0].score, 99.0);
}

#[test]
fn label_match_rule_ignores_other_labels() {
    let strict = RoundRules {
        require_label_match: true,
        ..rules()
    };
    let mut group = playing_group(&["A", "B"], 0, &[12.0, 0.0]);

    let applied = submit(&mut group, &strict, 0, "Squat", 0.7);

    assert_eq!(applied.frame, Some(FrameEffect::Ignored));
    assert_eq!(group.players[0].score, 12.0);
}

#[test]
fn ticks_count_down_then_expire() {
    let mut group = playing_group(&["A", "B"], 0, &[40.0, 10.0]);

    let first = apply(&mut group, &rules(), GroupEvent::Tick).unwrap();
    assert!(first.changed);
    assert_eq!(group.round_time_left, rules().round_seconds - 1);

    expire_turn(&mut group);
    assert_eq!(group.phase, GroupPhase::RoundOver);
    assert_eq!(group.round_time_left, 0);
}

#[test]
fn tick_outside_playing_changes_nothing() {
    let mut group = opened_group(&["A", "B"]);
    let before = group.clone();
    let applied = apply(&mut group, &rules(), GroupEvent::Tick).unwrap();
    assert!(!applied.changed);
    assert_eq!(group, before);
}

#[test]
fn scenario_lowest_score_eliminated_then_rotation_wraps_to_first_seat() {
    // A active with 40, B holds 70, C never submitted.
    let mut group = playing_group(&["A", "B", "C"], 0, &[40.0, 70.0, 0.0]);

    expire_turn(&mut group);

    assert_eq!(group.phase, GroupPhase::RoundOver);
    assert_eq!(group.eliminated, Some(2));
    assert!(group.players[2].eliminated);
    assert_eq!(group.players.iter().filter(|p| p.eliminated).count(), 1);

    apply(
        &mut group,
        &rules(),
        GroupEvent::NextRound {
            objective: "T Pose".into(),
        },
    )
    .unwrap();

    assert_eq!(group.phase, GroupPhase::ReadyForNextTurn);
    assert_eq!(group.active, Some(0));
    assert_eq!(group.objective.as_deref(), Some("T Pose"));
    assert_eq!(group.round_no, 2);
    assert_eq!(group.eliminated, None);
}

#[test]
fn all_tied_eliminates_lowest_index() {
    let mut group = playing_group(&["A", "B", "C"], 2, &[50.0, 50.0, 50.0]);
    expire_turn(&mut group);
    assert_eq!(group.eliminated, Some(0));
}

#[test]
fn rotation_skips_eliminated_players() {
    let mut group = playing_group(&["A", "B", "C", "D"], 0, &[30.0, 0.0, 60.0, 80.0]);
    group.players[2].eliminated = true;

    expire_turn(&mut group);
    assert_eq!(group.eliminated, Some(1));

    apply(
        &mut group,
        &rules(),
        GroupEvent::NextRound {
            objective: OBJECTIVE.into(),
        },
    )
    .unwrap();
    assert_eq!(group.active, Some(3));
}

#[test]
fn single_player_is_champion_after_one_turn_without_round_over() {
    let mut group = opened_group(&["Solo"]);
    let player = group.players[0].id;
    apply(&mut group, &rules(), GroupEvent::StartTurn { player }).unwrap();

    let mut phases = Vec::new();
    while group.phase == GroupPhase::Playing {
        apply(&mut group, &rules(), GroupEvent::Tick).unwrap();
        phases.push(group.phase);
    }

    assert!(!phases.contains(&GroupPhase::RoundOver));
    assert_eq!(group.phase, GroupPhase::ChampionSelected);
    assert_eq!(group.champion, Some(0));
    assert!(!group.players[0].eliminated);

    let before = group.clone();
    let applied = apply(
        &mut group,
        &rules(),
        GroupEvent::NextRound {
            objective: OBJECTIVE.into(),
        },
    )
    .unwrap();
    assert!(!applied.changed);
    assert_eq!(group, before);
}

#[test]
fn two_players_reach_champion_through_next_round() {
    let mut group = playing_group(&["A", "B"], 0, &[80.0, 10.0]);
    expire_turn(&mut group);
    assert_eq!(group.phase, GroupPhase::RoundOver);
    assert_eq!(group.eliminated, Some(1));

    let applied = apply(
        &mut group,
        &rules(),
        GroupEvent::NextRound {
            objective: OBJECTIVE.into(),
        },
    )
    .unwrap();

    assert_eq!(group.phase, GroupPhase::ChampionSelected);
    assert_eq!(group.champion, Some(0));
    assert!(applied.transitions.contains(&GroupTransition::ChampionSelected {
        player_id: group.players[0].id
    }));
}

#[test]
fn next_round_outside_round_over_is_rejected() {
    let mut group = playing_group(&["A", "B"], 0, &[0.0, 0.0]);
    let before = group.clone();
    let err = apply(
        &mut group,
        &rules(),
        GroupEvent::NextRound {
            objective: OBJECTIVE.into(),
        },
    )
    .unwrap_err();
    assert!(matches!(err, DomainError::IllegalTurn(TurnViolation::PhaseMismatch, _)));
    assert_eq!(group, before);
}

#[test]
fn reset_returns_to_lobby_and_invalidates_in_flight_readings() {
    let mut group = playing_group(&["A", "B"], 0, &[30.0, 10.0]);
    let in_flight = frame(&group, 0, OBJECTIVE, 0.5);

    let applied = apply(&mut group, &rules(), GroupEvent::Reset).unwrap();
    assert!(applied.transitions.contains(&GroupTransition::ReturnedToLobby));
    assert_eq!(group.phase, GroupPhase::Lobby);
    assert!(group.players.iter().all(|p| p.score == 0.0 && !p.eliminated));

    let late = apply(&mut group, &rules(), in_flight).unwrap();
    assert_eq!(late.frame, Some(FrameEffect::Ignored));
    assert_eq!(group.players[0].score, 0.0);
}

#[test]
fn version_bumps_once_per_committed_change() {
    let mut group = opened_group(&["A", "B"]);
    let v0 = group.version;
    let player = group.players[0].id;

    apply(&mut group, &rules(), GroupEvent::StartTurn { player }).unwrap();
    assert_eq!(group.version, v0 + 1);

    let _ = apply(&mut group, &rules(), GroupEvent::StartTurn { player });
    assert_eq!(group.version, v0 + 1);
}
