//! Seedable random objective policy.

use std::sync::Mutex;

use rand::prelude::*;

use super::trait_def::{ObjectiveError, ObjectiveSelector};

/// Picks uniformly from the pool, never repeating the previous objective
/// when the pool offers an alternative.
pub struct RandomObjectives {
    pool: Vec<String>,
    rng: Mutex<StdRng>,
}

impl RandomObjectives {
    pub const NAME: &'static str = "random";

    /// `Some(seed)` gives a reproducible sequence; `None` seeds from the OS.
    pub fn new(pool: Vec<String>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        Self {
            pool,
            rng: Mutex::new(rng),
        }
    }
}

impl ObjectiveSelector for RandomObjectives {
    fn next_objective(&self, previous: Option<&str>) -> Result<String, ObjectiveError> {
        if self.pool.is_empty() {
            return Err(ObjectiveError::EmptyPool);
        }

        let candidates: Vec<&String> = match previous {
            Some(prev) if self.pool.iter().any(|o| o != prev) => {
                self.pool.iter().filter(|o| o.as_str() != prev).collect()
            }
            _ => self.pool.iter().collect(),
        };

        let mut rng = self
            .rng
            .lock()
            .map_err(|e| ObjectiveError::Internal(format!("RNG lock poisoned: {e}")))?;

        candidates
            .choose(&mut *rng)
            .map(|o| (*o).clone())
            .ok_or(ObjectiveError::EmptyPool)
    }

    fn pool(&self) -> &[String] {
        &self.pool
    }
}
