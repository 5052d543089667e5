//! One tournament: the group arena plus the shared heartbeat.

use parking_lot::Mutex;
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::config::GameConfig;
use crate::domain::{GroupPhase, SessionPhase};
use crate::services::registry::GroupRegistry;

/// Shared display countdown plus the monotonic clock counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Heartbeat {
    pub time_left: u32,
    pub tick: u64,
}

pub struct Session {
    id: Uuid,
    created_at: OffsetDateTime,
    registry: GroupRegistry,
    heartbeat: Mutex<Heartbeat>,
    heartbeat_seconds: u32,
}

impl Session {
    /// `tick` carries over from the previous session so it never goes back.
    pub fn new(config: &GameConfig, tick: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: OffsetDateTime::now_utc(),
            registry: GroupRegistry::new(config.max_group_size),
            heartbeat: Mutex::new(Heartbeat {
                time_left: config.heartbeat_seconds,
                tick,
            }),
            heartbeat_seconds: config.heartbeat_seconds,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    pub fn registry(&self) -> &GroupRegistry {
        &self.registry
    }

    pub fn heartbeat(&self) -> Heartbeat {
        *self.heartbeat.lock()
    }

    /// One clock tick. Once started, `time_left` counts down and wraps back
    /// to the configured value on reaching zero; it never ends anything.
    pub fn advance_heartbeat(&self) -> Heartbeat {
        let started = self.registry.is_started();
        let mut heartbeat = self.heartbeat.lock();
        heartbeat.tick += 1;
        if started {
            heartbeat.time_left = heartbeat.time_left.saturating_sub(1);
            if heartbeat.time_left == 0 {
                heartbeat.time_left = self.heartbeat_seconds;
            }
        }
        *heartbeat
    }

    /// Advances `tick` without touching `time_left`, so every group's marker
    /// moves past a session-wide phase change.
    pub fn bump_tick(&self) -> u64 {
        let mut heartbeat = self.heartbeat.lock();
        heartbeat.tick += 1;
        heartbeat.tick
    }

    pub fn phase(&self) -> SessionPhase {
        if !self.registry.is_started() {
            return SessionPhase::Lobby;
        }
        let cells = self.registry.cells();
        let all_champions = !cells.is_empty()
            && cells
                .iter()
                .all(|cell| cell.read(|g| g.phase == GroupPhase::ChampionSelected));
        if all_champions {
            SessionPhase::GameOver
        } else {
            SessionPhase::GroupStage
        }
    }
}
