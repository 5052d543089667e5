//! Pull-mode synchronization.

use actix_web::http::header::{ETAG, IF_NONE_MATCH};
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse, Result};

use crate::error::AppError;
use crate::extractors::Connection;
use crate::http::etag::{if_none_match_hits, snapshot_etag};
use crate::state::app_state::AppState;

/// GET /api/snapshot
///
/// The caller's group snapshot with an ETag built from its `(version, tick)`
/// marker. Without `x-connection-id` the session's only group is used.
///
/// Supports `If-None-Match`: a matching tag yields `304 Not Modified` with no
/// body.
async fn get_snapshot(
    http_req: HttpRequest,
    connection: Option<Connection>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let snapshot = app_state
        .coordinator
        .snapshot_for(connection.map(|c| c.id()))?;
    let etag_value = snapshot_etag(&snapshot);

    let not_modified = http_req
        .headers()
        .get(IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|client| if_none_match_hits(client, &etag_value));
    if not_modified {
        return Ok(HttpResponse::build(StatusCode::NOT_MODIFIED)
            .insert_header((ETAG, etag_value))
            .finish());
    }

    Ok(HttpResponse::Ok()
        .insert_header((ETAG, etag_value))
        .json(snapshot))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/snapshot").route(web::get().to(get_snapshot)));
}
