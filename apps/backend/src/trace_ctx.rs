//! Per-request trace identity.
//!
//! `RequestTrace` mints a [`TraceId`] (or adopts the caller's), stores it in the request extensions and
//! runs the handler inside a task-local scope so [`trace_id`] works anywhere
//! downstream, including inside `AppError` rendering.

use std::cell::RefCell;
use std::fmt;

use actix_web::HttpMessage;
use tokio::task_local;
use uuid::Uuid;

pub const TRACE_HEADER: &str = "x-trace-id";
const UNKNOWN: &str = "unknown";

task_local! {
    static TRACE_ID: RefCell<Option<TraceId>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceId(String);

impl TraceId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Accepts a caller-supplied id only if it is a UUID.
    pub fn from_inbound(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw.trim())
            .ok()
            .map(|id| Self(id.hyphenated().to_string()))
    }

    /// Reads the id `RequestTrace` stored on the request, if any.
    pub fn of(req: &impl HttpMessage) -> Option<Self> {
        req.extensions().get::<TraceId>().cloned()
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TraceId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// The current task's trace id, or `"unknown"` outside a request.
pub fn trace_id() -> String {
    TRACE_ID
        .try_with(|cell| cell.borrow().as_ref().map(|id| id.0.clone()))
        .ok()
        .flatten()
        .unwrap_or_else(|| UNKNOWN.to_string())
}

pub async fn with_trace_id<F, R>(trace_id: TraceId, future: F) -> R
where
    F: std::future::Future<Output = R>,
{
    TRACE_ID.scope(RefCell::new(Some(trace_id)), future).await
}
