use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};

use crate::domain::ConnectionId;
use crate::error::AppError;
use crate::errors::ErrorCode;

pub const CONNECTION_HEADER: &str = "x-connection-id";

/// Caller identity from the `x-connection-id` header.
///
/// Wrap in `Option` for routes where the identity is optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connection(pub ConnectionId);

impl Connection {
    pub fn id(&self) -> ConnectionId {
        self.0
    }
}

impl FromRequest for Connection {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(parse_header(req, CONNECTION_HEADER).map(Connection))
    }
}

/// Reads a UUID-shaped identity header.
pub(crate) fn parse_header<T: std::str::FromStr>(
    req: &HttpRequest,
    name: &'static str,
) -> Result<T, AppError> {
    let raw = req
        .headers()
        .get(name)
        .ok_or_else(|| {
            AppError::bad_request(ErrorCode::InvalidHeader, format!("Missing {name} header"))
        })?
        .to_str()
        .map_err(|_| {
            AppError::bad_request(ErrorCode::InvalidHeader, format!("{name} is not valid ASCII"))
        })?;

    raw.parse::<T>().map_err(|_| {
        AppError::bad_request(
            ErrorCode::InvalidHeader,
            format!("{name} must be a UUID, got: \"{raw}\""),
        )
    })
}
