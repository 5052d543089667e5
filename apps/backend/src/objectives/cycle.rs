//! Deterministic round-robin objective policy.

use std::sync::atomic::{AtomicUsize, Ordering};

use super::trait_def::{ObjectiveError, ObjectiveSelector};

/// Walks the pool in order, wrapping around. Shared by all groups.
pub struct CycleObjectives {
    pool: Vec<String>,
    cursor: AtomicUsize,
}

impl CycleObjectives {
    pub const NAME: &'static str = "cycle";

    pub fn new(pool: Vec<String>) -> Self {
        Self {
            pool,
            cursor: AtomicUsize::new(0),
        }
    }
}

impl ObjectiveSelector for CycleObjectives {
    fn next_objective(&self, _previous: Option<&str>) -> Result<String, ObjectiveError> {
        if self.pool.is_empty() {
            return Err(ObjectiveError::EmptyPool);
        }
        let i = self.cursor.fetch_add(1, Ordering::Relaxed) % self.pool.len();
        Ok(self.pool[i].clone())
    }

    fn pool(&self) -> &[String] {
        &self.pool
    }
}
