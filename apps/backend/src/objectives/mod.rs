//! Objective pool and selection policies.

mod cycle;
pub mod labels;
mod random;
pub mod registry;
mod trait_def;

pub use cycle::CycleObjectives;
pub use random::RandomObjectives;
pub use trait_def::{ObjectiveError, ObjectiveSelector};
