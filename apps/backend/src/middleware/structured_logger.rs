use std::future::{ready, Ready};
use std::time::Instant;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::StatusCode;
use actix_web::Error as ActixError;
use futures_util::future::LocalBoxFuture;
use tracing::{error, info, warn};

use crate::extractors::connection::CONNECTION_HEADER;
use crate::trace_ctx::TraceId;

/// One `request_completed` line per request; level follows the status class.
pub struct StructuredLogger;

impl<S, B> Transform<S, ServiceRequest> for StructuredLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type InitError = ();
    type Transform = StructuredLoggerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(StructuredLoggerMiddleware { service }))
    }
}

pub struct StructuredLoggerMiddleware<S> {
    service: S,
}

/// Request facts captured before the handler consumes the request.
struct Completion {
    started: Instant,
    method: String,
    route: String,
    connection: String,
    trace_id: String,
}

impl Completion {
    fn capture(req: &ServiceRequest) -> Self {
        Self {
            started: Instant::now(),
            method: req.method().to_string(),
            route: req
                .match_pattern()
                .unwrap_or_else(|| req.path().to_string()),
            connection: req
                .headers()
                .get(CONNECTION_HEADER)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("-")
                .to_string(),
            trace_id: TraceId::of(req)
                .map(|id| id.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
        }
    }

    fn log(&self, status: StatusCode) {
        let duration_us = u64::try_from(self.started.elapsed().as_micros()).unwrap_or(u64::MAX);
        let status_code = status.as_u16();
        let (method, route, connection, trace_id) =
            (&self.method, &self.route, &self.connection, &self.trace_id);

        if status.is_server_error() {
            error!(http.method = %method, http.route = %route, http.status_code = status_code, duration_us, connection_id = %connection, trace_id = %trace_id, "request_completed");
        } else if status.is_client_error() {
            warn!(http.method = %method, http.route = %route, http.status_code = status_code, duration_us, connection_id = %connection, trace_id = %trace_id, "request_completed");
        } else {
            info!(http.method = %method, http.route = %route, http.status_code = status_code, duration_us, connection_id = %connection, trace_id = %trace_id, "request_completed");
        }
    }
}

impl<S, B> Service<ServiceRequest> for StructuredLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let completion = Completion::capture(&req);
        let fut = self.service.call(req);

        Box::pin(async move {
            let result = fut.await;
            let status = match &result {
                Ok(res) => res.status(),
                Err(err) => err.as_response_error().status_code(),
            };
            completion.log(status);
            result
        })
    }
}
