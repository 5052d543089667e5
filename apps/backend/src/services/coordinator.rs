//! Session coordinator: resolves the caller's group and drives its state
//! machine, then publishes the committed result.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::GameConfig;
use crate::domain::game_transition::GroupTransition;
use crate::domain::lifecycle::accepts_frames_from;
use crate::domain::snapshot::PlayerRef;
use crate::domain::{
    apply, Applied, ConnectionId, FrameEffect, GroupEvent, GroupId, GroupPhase, PlayerId,
    PoseReading, RoundRules, SessionPhase, SyncSnapshot,
};
use crate::errors::domain::{DomainError, NotFoundKind};
use crate::objectives::ObjectiveSelector;
use crate::oracle::{ImageFrame, OracleAdapter};
use crate::services::registry::{GroupCell, LobbyEntry};
use crate::services::session::{Heartbeat, Session};
use crate::services::sync_gateway;
use crate::ws::hub::{HubEvent, SyncHub};

/// Result of `createGroup`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupCreated {
    pub group_id: GroupId,
    pub players: Vec<PlayerRef>,
    pub is_host: bool,
}

/// Result of a frame submission.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutcome {
    /// `None` when the frame was ignored without consulting the oracle.
    pub reading: Option<PoseReading>,
    pub effect: FrameEffect,
}

impl FrameOutcome {
    fn ignored() -> Self {
        Self {
            reading: None,
            effect: FrameEffect::Ignored,
        }
    }

    pub fn accepted(&self) -> bool {
        matches!(self.effect, FrameEffect::Scored { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSummary {
    pub group_id: GroupId,
    pub state: GroupPhase,
    pub round_no: u32,
    pub survivors: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub champion: Option<PlayerRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub phase: SessionPhase,
    pub started: bool,
    pub time_left: u32,
    pub tick: u64,
    pub groups: Vec<GroupSummary>,
}

pub struct SessionCoordinator {
    config: GameConfig,
    rules: RoundRules,
    session: RwLock<Arc<Session>>,
    oracle: OracleAdapter,
    objectives: Arc<dyn ObjectiveSelector>,
    hub: Arc<SyncHub>,
}

impl SessionCoordinator {
    pub fn new(
        config: GameConfig,
        oracle: OracleAdapter,
        objectives: Arc<dyn ObjectiveSelector>,
        hub: Arc<SyncHub>,
    ) -> Self {
        let session = Arc::new(Session::new(&config, 0));
        Self {
            rules: config.rules(),
            config,
            session: RwLock::new(session),
            oracle,
            objectives,
            hub,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn hub(&self) -> &Arc<SyncHub> {
        &self.hub
    }

    /// The session commands currently act on. Reset swaps it atomically.
    pub fn current_session(&self) -> Arc<Session> {
        self.session.read().clone()
    }

    pub fn open_connection(&self) -> ConnectionId {
        let connection = ConnectionId::new();
        debug!(connection_id = %connection, "Connection issued");
        connection
    }

    pub fn create_group(
        &self,
        connection: ConnectionId,
        names: &[String],
    ) -> Result<GroupCreated, DomainError> {
        let session = self.current_session();
        let cell = session
            .registry()
            .create_group(connection, names)
            .map_err(|e| rejected("create_group", e))?;

        let is_host = session.registry().host_connection() == Some(connection);
        let created = cell.read(|group| GroupCreated {
            group_id: group.id,
            players: group
                .players
                .iter()
                .map(|p| PlayerRef {
                    id: p.id,
                    name: p.display_name.clone(),
                })
                .collect(),
            is_host,
        });

        info!(
            group_id = %created.group_id,
            connection_id = %connection,
            players = created.players.len(),
            is_host = created.is_host,
            "Group created"
        );

        self.publish_lobby(&session);
        self.publish_group(&session, &cell);
        Ok(created)
    }

    pub fn list_groups(&self) -> Vec<LobbyEntry> {
        self.current_session().registry().list_groups()
    }

    /// Removes the connection's lobby group. `Ok(false)` if it had none.
    pub fn leave_lobby(&self, connection: ConnectionId) -> Result<bool, DomainError> {
        let session = self.current_session();
        let removed = session
            .registry()
            .remove_connection(connection)
            .map_err(|e| rejected("leave_lobby", e))?;

        match removed {
            Some(group_id) => {
                info!(group_id = %group_id, connection_id = %connection, "Group left lobby");
                self.publish_lobby(&session);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Host-only: every group leaves the lobby with its first objective.
    pub fn start_session(&self, connection: ConnectionId) -> Result<(), DomainError> {
        let session = self.current_session();
        let cells = session
            .registry()
            .mark_started(connection)
            .map_err(|e| rejected("start_session", e))?;

        for cell in &cells {
            let result = cell.transition(|group| {
                let objective = self.objectives.next_objective(None)?;
                apply(group, &self.rules, GroupEvent::Open { objective })
            });
            match result {
                Ok(applied) => log_transitions(cell.id(), &applied),
                Err(err) => warn!(group_id = %cell.id(), error = %err, "Group failed to open"),
            }
        }

        info!(session_id = %session.id(), groups = cells.len(), "Session started");
        self.hub.broadcast(HubEvent::GameStarted);
        self.publish_all(&session);
        Ok(())
    }

    pub fn start_turn(
        &self,
        connection: ConnectionId,
        player: PlayerId,
    ) -> Result<SyncSnapshot, DomainError> {
        let session = self.current_session();
        let cell = resolve(&session, connection)?;

        let applied = cell
            .transition(|group| apply(group, &self.rules, GroupEvent::StartTurn { player }))
            .map_err(|e| rejected("start_turn", e))?;

        log_transitions(cell.id(), &applied);
        Ok(self.publish_group(&session, &cell))
    }

    /// Scores a frame for the active player.
    ///
    /// The oracle is consulted outside the group lock. The reading is applied
    /// only if the group is still in the same turn when it comes back;
    /// otherwise it is discarded. An oracle failure leaves the score as it was.
    pub async fn submit_frame(
        &self,
        connection: ConnectionId,
        player: PlayerId,
        frame: ImageFrame,
    ) -> Result<FrameOutcome, DomainError> {
        let session = self.current_session();
        let cell = resolve(&session, connection)?;

        let turn_no = cell.read(|group| {
            if group.seat_of(player).is_none() {
                return Err(DomainError::not_found(
                    NotFoundKind::Player,
                    format!("player {player} is not in group {}", group.id),
                ));
            }
            Ok(accepts_frames_from(group, player).then_some(group.turn_no))
        })?;

        let Some(turn_no) = turn_no else {
            debug!(group_id = %cell.id(), player_id = %player, "Frame ignored outside the player's turn");
            return Ok(FrameOutcome::ignored());
        };

        let reading = self.oracle.classify(&frame).await.map_err(|err| {
            warn!(
                group_id = %cell.id(),
                player_id = %player,
                error = %err,
                "Oracle failure; score retained"
            );
            err
        })?;

        let applied = cell.transition(|group| {
            apply(
                group,
                &self.rules,
                GroupEvent::FrameScored {
                    player,
                    turn_no,
                    reading: reading.clone(),
                },
            )
        })?;

        let effect = applied.frame.clone().unwrap_or(FrameEffect::Ignored);
        if effect == FrameEffect::Ignored {
            debug!(group_id = %cell.id(), player_id = %player, turn_no, "Late or non-matching reading discarded");
        }
        if applied.changed {
            log_transitions(cell.id(), &applied);
            self.publish_committed(&session, &cell, &applied);
        }

        Ok(FrameOutcome {
            reading: Some(reading),
            effect,
        })
    }

    pub fn next_round(&self, connection: ConnectionId) -> Result<SyncSnapshot, DomainError> {
        let session = self.current_session();
        let cell = resolve(&session, connection)?;

        let applied = cell
            .transition(|group| {
                let objective = if group.phase == GroupPhase::RoundOver && group.survivor_count() > 1
                {
                    self.objectives.next_objective(group.objective.as_deref())?
                } else {
                    group.objective.clone().unwrap_or_default()
                };
                apply(group, &self.rules, GroupEvent::NextRound { objective })
            })
            .map_err(|e| rejected("next_round", e))?;

        log_transitions(cell.id(), &applied);
        Ok(self.publish_committed(&session, &cell, &applied))
    }

    /// One clock tick: heartbeat, then every group's round timer.
    pub fn tick(&self) -> Heartbeat {
        let session = self.current_session();
        let heartbeat = session.advance_heartbeat();

        for cell in session.registry().cells() {
            match cell.transition(|group| apply(group, &self.rules, GroupEvent::Tick)) {
                Ok(applied) => {
                    if let Some(cause) = applied.turn_end {
                        debug!(group_id = %cell.id(), ?cause, "Turn ended");
                    }
                    log_transitions(cell.id(), &applied);
                }
                Err(err) => warn!(group_id = %cell.id(), error = %err, "Tick rejected"),
            }
        }

        self.publish_all(&session);
        heartbeat
    }

    /// Replaces the session with an empty one. Once a host exists only the
    /// host may do this. Old groups are forced back to the lobby so late
    /// oracle readings find nothing to score.
    pub fn reset_session(&self, caller: Option<ConnectionId>) -> Result<Uuid, DomainError> {
        let old = {
            let mut slot = self.session.write();
            if let Some(host) = slot.registry().host_connection() {
                if caller != Some(host) {
                    return Err(rejected(
                        "reset_session",
                        DomainError::authorization("only the host may reset the session"),
                    ));
                }
            }
            let fresh = Arc::new(Session::new(&self.config, slot.heartbeat().tick));
            std::mem::replace(&mut *slot, fresh)
        };

        for cell in old.registry().cells() {
            if let Err(err) = cell.transition(|group| apply(group, &self.rules, GroupEvent::Reset)) {
                warn!(group_id = %cell.id(), error = %err, "Group reset failed");
            }
        }

        let session = self.current_session();
        info!(old_session = %old.id(), new_session = %session.id(), "Session reset");
        self.hub.broadcast(HubEvent::SessionReset);
        self.publish_lobby(&session);
        Ok(session.id())
    }

    /// Practice mode: classify without touching any group.
    pub async fn classify(&self, frame: &ImageFrame) -> Result<PoseReading, DomainError> {
        self.oracle.classify(frame).await
    }

    pub fn snapshot_for(&self, connection: Option<ConnectionId>) -> Result<SyncSnapshot, DomainError> {
        sync_gateway::snapshot_for(&self.current_session(), connection)
    }

    pub fn summary(&self) -> SessionSummary {
        let session = self.current_session();
        let heartbeat = session.heartbeat();
        let groups = session
            .registry()
            .cells()
            .iter()
            .map(|cell| {
                cell.read(|group| GroupSummary {
                    group_id: group.id,
                    state: group.phase,
                    round_no: group.round_no,
                    survivors: group.survivor_count(),
                    champion: group.champion_player().map(|p| PlayerRef {
                        id: p.id,
                        name: p.display_name.clone(),
                    }),
                })
            })
            .collect();

        SessionSummary {
            session_id: session.id(),
            phase: session.phase(),
            started: session.registry().is_started(),
            time_left: heartbeat.time_left,
            tick: heartbeat.tick,
            groups,
        }
    }

    /// Publishes after a command. Crowning the last group ends the session,
    /// so then every group is pushed under a fresh tick; otherwise only
    /// the owner of `cell` hears about it.
    fn publish_committed(
        &self,
        session: &Session,
        cell: &GroupCell,
        applied: &Applied,
    ) -> SyncSnapshot {
        let crowned = applied
            .transitions
            .iter()
            .any(|t| matches!(t, GroupTransition::ChampionSelected { .. }));
        if crowned && session.phase() == SessionPhase::GameOver {
            let tick = session.bump_tick();
            info!(session_id = %session.id(), tick, "Every group has a champion");
            self.publish_all(session);
            return sync_gateway::render(session, session.phase(), cell);
        }
        self.publish_group(session, cell)
    }

    /// Push adapter entry point: render once, deliver to the owner only.
    fn publish_group(&self, session: &Session, cell: &GroupCell) -> SyncSnapshot {
        let snapshot = sync_gateway::render(session, session.phase(), cell);
        if self.hub.is_connected(cell.owner()) {
            self.hub
                .send_to(cell.owner(), HubEvent::Snapshot(snapshot.clone()));
        }
        snapshot
    }

    fn publish_all(&self, session: &Session) {
        let phase = session.phase();
        for cell in session.registry().cells() {
            if self.hub.is_connected(cell.owner()) {
                let snapshot = sync_gateway::render(session, phase, &cell);
                self.hub.send_to(cell.owner(), HubEvent::Snapshot(snapshot));
            }
        }
    }

    fn publish_lobby(&self, session: &Session) {
        self.hub
            .broadcast(HubEvent::Lobby(session.registry().list_groups()));
    }
}

fn resolve(session: &Session, connection: ConnectionId) -> Result<Arc<GroupCell>, DomainError> {
    session.registry().group_for(connection).ok_or_else(|| {
        rejected(
            "resolve_group",
            DomainError::not_in_group(format!("connection {connection} has no group")),
        )
    })
}

fn rejected(operation: &'static str, err: DomainError) -> DomainError {
    if err.is_illegal_command() {
        warn!(operation, error = %err, "Command rejected");
    } else {
        debug!(operation, error = %err, "Command rejected");
    }
    err
}

fn log_transitions(group_id: GroupId, applied: &Applied) {
    for transition in &applied.transitions {
        match transition {
            GroupTransition::SessionOpened => {
                debug!(group_id = %group_id, "Group left the lobby")
            }
            GroupTransition::TurnReady { player_id } => {
                debug!(group_id = %group_id, player_id = %player_id, "Turn ready")
            }
            GroupTransition::TurnStarted { player_id } => {
                info!(group_id = %group_id, player_id = %player_id, "Turn started")
            }
            GroupTransition::PlayerEliminated { player_id } => {
                info!(group_id = %group_id, player_id = %player_id, cause = ?applied.turn_end, "Player eliminated")
            }
            GroupTransition::ChampionSelected { player_id } => {
                info!(group_id = %group_id, player_id = %player_id, "Champion selected")
            }
            GroupTransition::ReturnedToLobby => {
                debug!(group_id = %group_id, "Group returned to lobby")
            }
        }
    }
}
