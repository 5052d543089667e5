//! In-game commands: turns, frames and round advancement.

use actix_web::{web, HttpResponse, Result};
use serde::{Deserialize, Serialize};

use crate::domain::FrameEffect;
use crate::error::AppError;
use crate::extractors::{ActingPlayer, Connection, ValidatedJson};
use crate::oracle::ImageFrame;
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct FrameRequest {
    /// `data:<mime>;base64,<payload>` or bare base64.
    pub image: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictResponse {
    /// Whether the reading was folded into the player's score.
    pub accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pose: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    pub objective_met: bool,
}

#[derive(Debug, Serialize)]
pub struct PracticeResponse {
    pub pose: String,
    pub confidence: f64,
}

/// POST /api/turn/start
async fn start_turn(
    connection: Connection,
    player: ActingPlayer,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let snapshot = app_state
        .coordinator
        .start_turn(connection.id(), player.id())?;
    Ok(HttpResponse::Ok().json(snapshot))
}

/// POST /api/predict
///
/// Frames from anyone but the active player while PLAYING come back with
/// `accepted: false` and no oracle call.
async fn predict(
    connection: Connection,
    player: ActingPlayer,
    body: ValidatedJson<FrameRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let frame = ImageFrame::decode(&body.image, app_state.config().max_frame_bytes)?;
    let outcome = app_state
        .coordinator
        .submit_frame(connection.id(), player.id(), frame)
        .await?;

    let (score, objective_met) = match outcome.effect {
        FrameEffect::Scored {
            score,
            objective_met,
        } => (Some(score), objective_met),
        FrameEffect::Ignored => (None, false),
    };

    Ok(HttpResponse::Ok().json(PredictResponse {
        accepted: score.is_some(),
        pose: outcome.reading.as_ref().map(|r| r.label.clone()),
        confidence: outcome.reading.as_ref().map(|r| r.confidence),
        score,
        objective_met,
    }))
}

/// POST /api/practice/predict
async fn practice_predict(
    body: ValidatedJson<FrameRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let frame = ImageFrame::decode(&body.image, app_state.config().max_frame_bytes)?;
    let reading = app_state.coordinator.classify(&frame).await?;
    Ok(HttpResponse::Ok().json(PracticeResponse {
        pose: reading.label,
        confidence: reading.confidence,
    }))
}

/// POST /api/round/next
async fn next_round(
    connection: Connection,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let snapshot = app_state.coordinator.next_round(connection.id())?;
    Ok(HttpResponse::Ok().json(snapshot))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/turn/start").route(web::post().to(start_turn)));
    cfg.service(web::resource("/predict").route(web::post().to(predict)));
    cfg.service(web::resource("/practice/predict").route(web::post().to(practice_predict)));
    cfg.service(web::resource("/round/next").route(web::post().to(next_round)));
}
