use std::env;

use actix_cors::Cors;
use actix_web::http::header;

use crate::extractors::acting_player::PLAYER_HEADER;
use crate::extractors::connection::CONNECTION_HEADER;
use crate::trace_ctx::TRACE_HEADER;

const DEFAULT_ORIGINS: [&str; 2] = ["http://localhost:3000", "http://127.0.0.1:3000"];

/// Build CORS middleware from `CORS_ALLOWED_ORIGINS`:
/// - Only allow methods and identity headers the API actually uses
/// - Expose `x-trace-id` and `ETag` so the client can correlate and poll
pub fn cors_middleware() -> Cors {
    let origins = allowed_origins(&env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default());

    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::IF_NONE_MATCH,
            header::HeaderName::from_static(CONNECTION_HEADER),
            header::HeaderName::from_static(PLAYER_HEADER),
            header::HeaderName::from_static(TRACE_HEADER),
        ])
        .expose_headers(vec![header::HeaderName::from_static(TRACE_HEADER), header::ETAG])
        .max_age(3600);

    for origin in origins {
        cors = cors.allowed_origin(&origin);
    }
    cors
}

/// Comma-separated origins; empty, `null` and non-http entries are dropped.
/// Falls back to localhost when nothing valid remains.
pub fn allowed_origins(raw: &str) -> Vec<String> {
    let origins: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != "null")
        .filter(|s| s.starts_with("http://") || s.starts_with("https://"))
        .map(|s| s.trim_end_matches('/').to_string())
        .collect();

    if origins.is_empty() {
        DEFAULT_ORIGINS.iter().map(|s| s.to_string()).collect()
    } else {
        origins
    }
}
