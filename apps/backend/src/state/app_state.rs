use std::sync::Arc;

use crate::config::GameConfig;
use crate::services::coordinator::SessionCoordinator;
use crate::ws::hub::SyncHub;

/// Slack for the JSON envelope around a base64 frame.
const BODY_OVERHEAD: usize = 16 * 1024;

/// Application state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<SessionCoordinator>,
}

impl AppState {
    pub fn new(coordinator: Arc<SessionCoordinator>) -> Self {
        Self { coordinator }
    }

    pub fn config(&self) -> &GameConfig {
        self.coordinator.config()
    }

    pub fn hub(&self) -> &Arc<SyncHub> {
        self.coordinator.hub()
    }

    /// Largest JSON body accepted: a maximal frame in base64 plus overhead.
    pub fn json_body_limit(&self) -> usize {
        self.config().max_frame_bytes.div_ceil(3) * 4 + BODY_OVERHEAD
    }
}
