//! Connection and lobby routes.

use actix_web::{web, HttpResponse, Result};
use serde::{Deserialize, Serialize};

use crate::domain::ConnectionId;
use crate::error::AppError;
use crate::extractors::{Connection, ValidatedJson};
use crate::state::app_state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConnectionIssued {
    connection_id: ConnectionId,
}

#[derive(Debug, Deserialize)]
pub struct CreateGroupRequest {
    pub names: Vec<String>,
}

#[derive(Debug, Serialize)]
struct LeaveResponse {
    left: bool,
}

/// POST /api/connections
async fn open_connection(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let connection_id = app_state.coordinator.open_connection();
    Ok(HttpResponse::Created().json(ConnectionIssued { connection_id }))
}

/// GET /api/lobby
///
/// Every group in creation order; the first one is the host.
async fn list_groups(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(app_state.coordinator.list_groups()))
}

/// POST /api/groups
async fn create_group(
    connection: Connection,
    body: ValidatedJson<CreateGroupRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let created = app_state
        .coordinator
        .create_group(connection.id(), &body.names)?;
    Ok(HttpResponse::Created().json(created))
}

/// POST /api/groups/leave
///
/// Only possible before the session starts.
async fn leave_lobby(
    connection: Connection,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let left = app_state.coordinator.leave_lobby(connection.id())?;
    Ok(HttpResponse::Ok().json(LeaveResponse { left }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/connections").route(web::post().to(open_connection)));
    cfg.service(web::resource("/lobby").route(web::get().to(list_groups)));
    cfg.service(web::resource("/groups").route(web::post().to(create_group)));
    cfg.service(web::resource("/groups/leave").route(web::post().to(leave_lobby)));
}
