//! Domain layer: pure game logic types and helpers.

pub mod elimination;
pub mod game_transition;
pub mod ids;
pub mod lifecycle;
pub mod rules;
pub mod snapshot;
pub mod state;

#[cfg(test)]
mod test_prelude;
#[cfg(test)]
mod test_state_helpers;
#[cfg(test)]
mod tests_lifecycle;
#[cfg(test)]
mod tests_props;

// Re-exports for ergonomics
pub use ids::{ConnectionId, GroupId, PlayerId};
pub use lifecycle::{apply, Applied, FrameEffect, GroupEvent, TurnEndCause};
pub use rules::RoundRules;
pub use snapshot::{GroupView, SessionPhase, SyncSnapshot};
pub use state::{Group, GroupPhase, Player, PoseReading};
