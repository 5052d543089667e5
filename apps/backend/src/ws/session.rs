use std::sync::Arc;
use std::time::{Duration, Instant};

use actix::prelude::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use serde::Deserialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::{ConnectionId, SyncSnapshot};
use crate::errors::domain::DomainError;
use crate::services::coordinator::SessionCoordinator;
use crate::services::sync_gateway::DeliveryMarker;
use crate::state::app_state::AppState;
use crate::ws::hub::HubEvent;
use crate::ws::protocol::{ClientMsg, ErrorCode, ServerMsg, PROTOCOL_VERSION};

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(20);
const CLIENT_TIMEOUT: Duration = Duration::from_secs(40);

#[derive(Debug, Deserialize)]
pub struct WsQuery {
    pub connection_id: ConnectionId,
}

pub async fn upgrade(
    req: HttpRequest,
    stream: web::Payload,
    query: web::Query<WsQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let session = WsSession::new(query.connection_id, app_state.coordinator.clone());
    ws::start(session, &req, stream)
}

pub struct WsSession {
    connection: ConnectionId,
    coordinator: Arc<SessionCoordinator>,
    token: Option<Uuid>,
    marker: DeliveryMarker,

    last_heartbeat: Instant,
}

impl WsSession {
    fn new(connection: ConnectionId, coordinator: Arc<SessionCoordinator>) -> Self {
        Self {
            connection,
            coordinator,
            token: None,
            marker: DeliveryMarker::default(),
            last_heartbeat: Instant::now(),
        }
    }

    fn send_json(ctx: &mut ws::WebsocketContext<Self>, msg: &ServerMsg) {
        match serde_json::to_string(msg) {
            Ok(payload) => ctx.text(payload),
            Err(err) => warn!(error = %err, "[WS SESSION] failed to serialize outbound message"),
        }
    }

    fn send_error_and_close(
        &self,
        ctx: &mut ws::WebsocketContext<Self>,
        code: ErrorCode,
        message: impl Into<String>,
    ) {
        let msg = ServerMsg::Error {
            code,
            message: message.into(),
        };
        Self::send_json(ctx, &msg);
        ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
        ctx.stop();
    }

    /// Sends the group's snapshot if it is newer than the last one sent.
    fn deliver_snapshot(&mut self, ctx: &mut ws::WebsocketContext<Self>, snapshot: SyncSnapshot) {
        if self.marker.admit(&snapshot) {
            Self::send_json(ctx, &ServerMsg::GameUpdate { snapshot });
        } else {
            debug!(conn_id = %self.connection, "[WS SESSION] stale snapshot skipped");
        }
    }

    /// Current snapshot, if this connection owns a group.
    fn resync(&mut self, ctx: &mut ws::WebsocketContext<Self>) -> bool {
        match self.coordinator.snapshot_for(Some(self.connection)) {
            Ok(snapshot) => {
                self.deliver_snapshot(ctx, snapshot);
                true
            }
            Err(DomainError::NotInGroup(_)) => false,
            Err(err) => {
                warn!(conn_id = %self.connection, error = %err, "[WS SESSION] resync failed");
                false
            }
        }
    }

    fn start_heartbeat(&mut self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(HEARTBEAT_INTERVAL, |actor, ctx| {
            if Instant::now().duration_since(actor.last_heartbeat) > CLIENT_TIMEOUT {
                warn!(conn_id = %actor.connection, "[WS SESSION] heartbeat timed out");
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Normal)));
                ctx.stop();
                return;
            }
            ctx.ping(b"keepalive");
        });
    }

    fn detach(&mut self) {
        let Some(token) = self.token.take() else {
            return;
        };
        let remaining = self.coordinator.hub().unregister(self.connection, token);
        if remaining > 0 {
            return;
        }
        // Last socket gone: a lobby group goes with it.
        if !self.coordinator.current_session().registry().is_started() {
            if let Err(err) = self.coordinator.leave_lobby(self.connection) {
                debug!(conn_id = %self.connection, error = %err, "[WS SESSION] lobby leave skipped");
            }
        }
    }
}

impl Actor for WsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!(conn_id = %self.connection, "[WS SESSION] started");

        let recipient = ctx.address().recipient::<HubEvent>();
        self.token = Some(self.coordinator.hub().register(self.connection, recipient));

        Self::send_json(
            ctx,
            &ServerMsg::Hello {
                protocol: PROTOCOL_VERSION,
                connection_id: self.connection,
            },
        );
        Self::send_json(
            ctx,
            &ServerMsg::LobbyUpdate {
                groups: self.coordinator.list_groups(),
            },
        );
        self.resync(ctx);

        self.start_heartbeat(ctx);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        self.detach();
        info!(conn_id = %self.connection, "[WS SESSION] stopped");
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(payload)) => {
                self.last_heartbeat = Instant::now();
                ctx.pong(&payload);
            }
            Ok(ws::Message::Pong(_)) => {
                self.last_heartbeat = Instant::now();
            }
            Ok(ws::Message::Text(text)) => {
                self.last_heartbeat = Instant::now();

                let parsed: Result<ClientMsg, _> = serde_json::from_str(&text);
                let Ok(cmd) = parsed else {
                    self.send_error_and_close(ctx, ErrorCode::BadRequest, "Malformed JSON");
                    return;
                };

                match cmd {
                    ClientMsg::Hello { protocol } => {
                        if protocol != PROTOCOL_VERSION {
                            self.send_error_and_close(
                                ctx,
                                ErrorCode::BadProtocol,
                                "Unsupported protocol version",
                            );
                            return;
                        }
                        Self::send_json(
                            ctx,
                            &ServerMsg::Hello {
                                protocol: PROTOCOL_VERSION,
                                connection_id: self.connection,
                            },
                        );
                    }
                    ClientMsg::Resync => {
                        // An explicit resync always gets an answer.
                        self.marker.clear();
                        if !self.resync(ctx) {
                            Self::send_json(
                                ctx,
                                &ServerMsg::Error {
                                    code: ErrorCode::NotInGroup,
                                    message: "Connection has no group".to_string(),
                                },
                            );
                        }
                    }
                }
            }
            Ok(ws::Message::Binary(_)) => {
                self.last_heartbeat = Instant::now();
                self.send_error_and_close(ctx, ErrorCode::BadRequest, "Binary not supported");
            }
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Ok(ws::Message::Continuation(_)) | Ok(ws::Message::Nop) => {
                self.last_heartbeat = Instant::now();
            }
            Err(err) => {
                warn!(conn_id = %self.connection, error = %err, "[WS SESSION] protocol error");
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
                ctx.stop();
            }
        }
    }
}

impl Handler<HubEvent> for WsSession {
    type Result = ();

    fn handle(&mut self, msg: HubEvent, ctx: &mut Self::Context) -> Self::Result {
        match msg {
            HubEvent::Snapshot(snapshot) => self.deliver_snapshot(ctx, snapshot),
            HubEvent::Lobby(groups) => Self::send_json(ctx, &ServerMsg::LobbyUpdate { groups }),
            HubEvent::GameStarted => Self::send_json(ctx, &ServerMsg::GameStarted),
            HubEvent::SessionReset => {
                self.marker.clear();
                Self::send_json(ctx, &ServerMsg::SessionReset);
            }
        }
    }
}
