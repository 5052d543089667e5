//! Property tests for the group state machine (pure domain).
//!
//! Properties:
//! - the active player is never eliminated while a turn is pending or running
//! - a round end eliminates at most one player
//! - a group with one survivor always ends as champion, whatever the scores
//! - frames outside `Playing` leave the group byte-identical

use proptest::prelude::*;

use crate::domain::lifecycle::{apply, GroupEvent};
use crate::domain::state::{GroupPhase, PoseReading};
use crate::domain::test_prelude;
use crate::domain::test_state_helpers::{opened_group, rules, OBJECTIVE};

const NAMES: [&str; 6] = ["A", "B", "C", "D", "E", "F"];

#[derive(Debug, Clone)]
enum Step {
    StartTurn { seat: usize },
    Frame { seat: usize, confidence: f64, matching: bool },
    Tick,
    NextRound,
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        (0usize..6).prop_map(|seat| Step::StartTurn { seat }),
        (0usize..6, 0.0f64..=1.0, any::<bool>()).prop_map(|(seat, confidence, matching)| {
            Step::Frame {
                seat,
                confidence,
                matching,
            }
        }),
        Just(Step::Tick),
        Just(Step::Tick),
        Just(Step::NextRound),
    ]
}

fn to_event(group: &crate::domain::state::Group, step: &Step) -> GroupEvent {
    let pick = |seat: usize| group.players[seat % group.players.len()].id;
    match step {
        Step::StartTurn { seat } => GroupEvent::StartTurn { player: pick(*seat) },
        Step::Frame {
            seat,
            confidence,
            matching,
        } => GroupEvent::FrameScored {
            player: pick(*seat),
            turn_no: group.turn_no,
            reading: PoseReading::new(if *matching { OBJECTIVE } else { "Squat" }, *confidence),
        },
        Step::Tick => GroupEvent::Tick,
        Step::NextRound => GroupEvent::NextRound {
            objective: OBJECTIVE.to_string(),
        },
    }
}

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    #[test]
    fn prop_invariants_hold_for_any_command_sequence(
        size in 1usize..=6,
        steps in prop::collection::vec(step_strategy(), 0..120),
    ) {
        let mut group = opened_group(&NAMES[..size]);
        let rules = rules();

        for step in &steps {
            let eliminated_before = group.players.iter().filter(|p| p.eliminated).count();
            let snapshot = group.clone();
            let event = to_event(&group, step);
            let is_frame = matches!(event, GroupEvent::FrameScored { .. });

            match apply(&mut group, &rules, event) {
                Ok(_) => {}
                Err(_) => prop_assert_eq!(&group, &snapshot, "rejected command mutated state"),
            }

            if is_frame && snapshot.phase != GroupPhase::Playing {
                prop_assert_eq!(&group, &snapshot);
            }

            let eliminated_after = group.players.iter().filter(|p| p.eliminated).count();
            prop_assert!(eliminated_after <= eliminated_before + 1);

            if matches!(group.phase, GroupPhase::Playing | GroupPhase::ReadyForNextTurn) {
                let active = group.active_player();
                prop_assert!(active.is_some_and(|p| !p.eliminated));
            }

            if group.phase == GroupPhase::ChampionSelected {
                prop_assert_eq!(group.survivor_count(), 1);
                let champion = group.champion_player();
                prop_assert!(champion.is_some_and(|p| !p.eliminated));
            }

            prop_assert!(group.survivor_count() >= 1);
        }
    }

    #[test]
    fn prop_one_survivor_always_becomes_champion(
        size in 2usize..=6,
        scores in prop::collection::vec(0.0f64..=100.0, 6),
        survivor in 0usize..6,
    ) {
        let mut group = opened_group(&NAMES[..size]);
        let survivor = survivor % size;
        for (i, player) in group.players.iter_mut().enumerate() {
            player.score = scores[i];
            player.eliminated = i != survivor;
        }
        group.phase = GroupPhase::RoundOver;
        group.active = None;
        group.eliminated = Some((survivor + 1) % size);

        apply(&mut group, &rules(), GroupEvent::NextRound { objective: OBJECTIVE.into() }).unwrap();

        prop_assert_eq!(group.phase, GroupPhase::ChampionSelected);
        prop_assert_eq!(group.champion, Some(survivor));
    }
}
