//! Seat selection: who loses a round, who plays next.

use crate::domain::state::Group;

/// Lowest score among non-eliminated players; ties go to the lowest seat.
pub fn select_loser(group: &Group) -> Option<usize> {
    group
        .survivors()
        .min_by(|(ia, a), (ib, b)| a.score.total_cmp(&b.score).then(ia.cmp(ib)))
        .map(|(i, _)| i)
}

/// Lowest-index non-eliminated seat.
pub fn first_survivor(group: &Group) -> Option<usize> {
    group.survivors().next().map(|(i, _)| i)
}

/// Next non-eliminated seat strictly after `after`, wrapping around.
pub fn next_survivor_after(group: &Group, after: usize) -> Option<usize> {
    let n = group.players.len();
    if n == 0 {
        return None;
    }
    (1..=n)
        .map(|offset| (after + offset) % n)
        .find(|&seat| !group.players[seat].eliminated)
}

/// The only remaining non-eliminated seat, if exactly one remains.
pub fn sole_survivor(group: &Group) -> Option<usize> {
    let mut survivors = group.survivors();
    match (survivors.next(), survivors.next()) {
        (Some((i, _)), None) => Some(i),
        _ => None,
    }
}
