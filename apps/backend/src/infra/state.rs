use std::sync::Arc;

use tracing::info;

use crate::config::GameConfig;
use crate::error::AppError;
use crate::objectives::ObjectiveSelector;
use crate::oracle::{HttpPoseOracle, OracleAdapter, PoseOracle};
use crate::services::coordinator::SessionCoordinator;
use crate::state::app_state::AppState;
use crate::ws::hub::SyncHub;

/// Builder for creating AppState instances (used in both tests and main)
pub struct StateBuilder {
    config: GameConfig,
    oracle: Option<Arc<dyn PoseOracle>>,
    objectives: Option<Arc<dyn ObjectiveSelector>>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            config: GameConfig::default(),
            oracle: None,
            objectives: None,
        }
    }

    pub fn with_config(mut self, config: GameConfig) -> Self {
        self.config = config;
        self
    }

    /// Overrides the HTTP oracle built from `oracle_url`.
    pub fn with_oracle(mut self, oracle: Arc<dyn PoseOracle>) -> Self {
        self.oracle = Some(oracle);
        self
    }

    /// Overrides the policy named by `objective_policy`.
    pub fn with_objectives(mut self, objectives: Arc<dyn ObjectiveSelector>) -> Self {
        self.objectives = Some(objectives);
        self
    }

    pub fn build(self) -> Result<AppState, AppError> {
        self.config.validate()?;

        let oracle = match self.oracle {
            Some(oracle) => oracle,
            None => {
                let url = self.config.oracle_url.clone().ok_or_else(|| {
                    AppError::config("ARENA_ORACLE_URL must be set when no oracle is injected")
                })?;
                let http = HttpPoseOracle::new(url, self.config.oracle_timeout)
                    .map_err(|e| AppError::config(format!("oracle client: {e}")))?;
                Arc::new(http) as Arc<dyn PoseOracle>
            }
        };

        let objectives = match self.objectives {
            Some(objectives) => objectives,
            None => Arc::from(self.config.objective_selector()?),
        };

        let adapter = OracleAdapter::new(oracle, self.config.oracle_timeout);
        info!(
            oracle = adapter.oracle_name(),
            objectives = objectives.pool().len(),
            policy = %self.config.objective_policy,
            "Application state built"
        );

        let coordinator =
            SessionCoordinator::new(self.config, adapter, objectives, Arc::new(SyncHub::new()));
        Ok(AppState::new(Arc::new(coordinator)))
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
