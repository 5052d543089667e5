//! Opens the `request` span every handler log line inherits.
//!
//! Wire it inside `RequestTrace` (i.e. `.wrap(TraceSpan).wrap(RequestTrace)`)
//! so the trace id is already in the request extensions.

use std::future::{ready, Ready};

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::Error;
use futures_util::future::LocalBoxFuture;
use tracing::{info_span, Instrument, Span};

use crate::extractors::acting_player::PLAYER_HEADER;
use crate::extractors::connection::CONNECTION_HEADER;
use crate::trace_ctx::TraceId;

#[derive(Clone, Default)]
pub struct TraceSpan;

impl<S, B> Transform<S, ServiceRequest> for TraceSpan
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TraceSpanMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TraceSpanMiddleware { service }))
    }
}

pub struct TraceSpanMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for TraceSpanMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let span = request_span(&req);
        Box::pin(self.service.call(req).instrument(span))
    }
}

/// Route template rather than the raw path, so ids do not explode
/// cardinality. Arena identity headers ride along when present.
fn request_span(req: &ServiceRequest) -> Span {
    let trace_id = TraceId::of(req)
        .map(|id| id.to_string())
        .unwrap_or_else(|| "missing-trace-id".to_string());
    let route = req
        .match_pattern()
        .unwrap_or_else(|| req.path().to_string());

    info_span!(
        "request",
        trace_id = %trace_id,
        method = %req.method(),
        route = %route,
        connection_id = header_field(req, CONNECTION_HEADER),
        player_id = header_field(req, PLAYER_HEADER),
    )
}

fn header_field<'a>(req: &'a ServiceRequest, name: &str) -> &'a str {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
}
