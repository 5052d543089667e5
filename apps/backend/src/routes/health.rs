use actix_web::{web, HttpResponse};
use serde::Serialize;
use time::OffsetDateTime;

use crate::domain::SessionPhase;
use crate::error::AppError;
use crate::state::app_state::AppState;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    app_version: &'static str,
    session_phase: SessionPhase,
    groups: usize,
    sockets: usize,
    session_created_at: String,
    time: String,
}

fn rfc3339(at: OffsetDateTime) -> String {
    at.format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "unknown".to_string())
}

async fn health(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let session = app_state.coordinator.current_session();

    Ok(HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        app_version: env!("CARGO_PKG_VERSION"),
        session_phase: session.phase(),
        groups: session.registry().len(),
        sockets: app_state.hub().socket_count(),
        session_created_at: rfc3339(session.created_at()),
        time: rfc3339(OffsetDateTime::now_utc()),
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::get().to(health));
}
