use std::sync::Arc;
use std::time::Duration;

use pose_arena::config::GameConfig;
use pose_arena::infra::state::build_state;
use pose_arena::objectives::CycleObjectives;
use pose_arena::oracle::PoseOracle;
use pose_arena::services::SessionCoordinator;
use pose_arena::state::app_state::AppState;

pub const OBJECTIVES: [&str; 3] = ["Arms Up", "T Pose", "Squat"];

/// Short rounds, fast oracle timeout, deterministic objectives.
pub fn test_config() -> GameConfig {
    GameConfig {
        round_seconds: 3,
        heartbeat_seconds: 5,
        tick_interval: Duration::from_millis(20),
        oracle_timeout: Duration::from_millis(500),
        objectives: names(&OBJECTIVES),
        objective_policy: "cycle".to_string(),
        ..GameConfig::default()
    }
}

pub fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

pub fn build_test_state(oracle: Arc<dyn PoseOracle>) -> AppState {
    build_test_state_with(test_config(), oracle)
}

pub fn build_test_state_with(config: GameConfig, oracle: Arc<dyn PoseOracle>) -> AppState {
    let objectives = Arc::new(CycleObjectives::new(config.objectives.clone()));
    build_state()
        .with_config(config)
        .with_oracle(oracle)
        .with_objectives(objectives)
        .build()
        .expect("test state should build")
}

/// Coordinator-level harness: one connection per group.
pub struct TestArena {
    pub state: AppState,
}

impl TestArena {
    pub fn new(oracle: Arc<dyn PoseOracle>) -> Self {
        Self {
            state: build_test_state(oracle),
        }
    }

    pub fn with_config(config: GameConfig, oracle: Arc<dyn PoseOracle>) -> Self {
        Self {
            state: build_test_state_with(config, oracle),
        }
    }

    pub fn coordinator(&self) -> &Arc<SessionCoordinator> {
        &self.state.coordinator
    }

    /// Runs `n` clock ticks.
    pub fn ticks(&self, n: usize) {
        for _ in 0..n {
            self.state.coordinator.tick();
        }
    }
}
