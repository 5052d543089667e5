//! How to register an objective policy
//!
//! 1) Implement `ObjectiveSelector` for your type in its module.
//! 2) Add an `ObjectiveFactory` entry with a stable `name`.
//! 3) Keep constructors free of side effects.

use super::cycle::CycleObjectives;
use super::random::RandomObjectives;
use super::trait_def::ObjectiveSelector;

/// Factory definition for constructing objective policies.
pub struct ObjectiveFactory {
    pub name: &'static str,
    pub make: fn(pool: Vec<String>, seed: Option<u64>) -> Box<dyn ObjectiveSelector>,
}

static OBJECTIVE_FACTORIES: &[ObjectiveFactory] = &[
    ObjectiveFactory {
        name: RandomObjectives::NAME,
        make: make_random,
    },
    ObjectiveFactory {
        name: CycleObjectives::NAME,
        make: make_cycle,
    },
];

/// Returns the statically registered objective policies.
pub fn registered_policies() -> &'static [ObjectiveFactory] {
    OBJECTIVE_FACTORIES
}

/// Finds a registered policy by name (case-insensitive).
pub fn by_name(name: &str) -> Option<&'static ObjectiveFactory> {
    registered_policies()
        .iter()
        .find(|factory| factory.name.eq_ignore_ascii_case(name.trim()))
}

fn make_random(pool: Vec<String>, seed: Option<u64>) -> Box<dyn ObjectiveSelector> {
    Box::new(RandomObjectives::new(pool, seed))
}

fn make_cycle(pool: Vec<String>, _seed: Option<u64>) -> Box<dyn ObjectiveSelector> {
    Box::new(CycleObjectives::new(pool))
}
