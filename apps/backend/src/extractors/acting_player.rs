use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};

use crate::domain::PlayerId;
use crate::error::AppError;
use crate::extractors::connection::parse_header;

pub const PLAYER_HEADER: &str = "x-player-id";

/// The player a command acts for, from `x-player-id`. Whether that player may
/// act is the state machine's call, not this extractor's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActingPlayer(pub PlayerId);

impl ActingPlayer {
    pub fn id(&self) -> PlayerId {
        self.0
    }
}

impl FromRequest for ActingPlayer {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(parse_header(req, PLAYER_HEADER).map(ActingPlayer))
    }
}
