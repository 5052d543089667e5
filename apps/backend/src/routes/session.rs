//! Session lifecycle routes.

use actix_web::{web, HttpResponse, Result};
use serde::Serialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::extractors::Connection;
use crate::state::app_state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ResetResponse {
    session_id: Uuid,
}

/// POST /api/session/start
async fn start_session(
    connection: Connection,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    app_state.coordinator.start_session(connection.id())?;
    Ok(HttpResponse::Ok().json(app_state.coordinator.summary()))
}

/// GET /api/session
async fn get_session(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(app_state.coordinator.summary()))
}

/// DELETE /api/session
///
/// Anyone may reset a session without a host; afterwards only the host.
async fn reset_session(
    connection: Option<Connection>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let session_id = app_state
        .coordinator
        .reset_session(connection.map(|c| c.id()))?;
    Ok(HttpResponse::Ok().json(ResetResponse { session_id }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/session")
            .route(web::get().to(get_session))
            .route(web::delete().to(reset_session)),
    );
    cfg.service(web::resource("/session/start").route(web::post().to(start_session)));
}
