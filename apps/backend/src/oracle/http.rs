//! HTTP client for the external pose classifier.
//!
//! Request: `POST {url}` with `{"image": "<data URL>"}`.
//! Response: `{"pose": "<label>", "confidence": <number | string>}` where the
//! confidence is a percentage string (`"87.50"`, optionally with a trailing
//! `%`) or a number, read as a fraction when at most 1.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::PoseReading;
use crate::oracle::frame::ImageFrame;
use crate::oracle::trait_def::{OracleError, PoseOracle};

#[derive(Serialize)]
struct PredictRequest<'a> {
    image: &'a str,
}

#[derive(Deserialize)]
struct PredictResponse {
    pose: String,
    confidence: Value,
}

pub struct HttpPoseOracle {
    client: reqwest::Client,
    url: String,
}

impl HttpPoseOracle {
    pub const NAME: &'static str = "http";

    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, OracleError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| OracleError::Unavailable(format!("cannot build HTTP client: {e}")))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl PoseOracle for HttpPoseOracle {
    async fn classify(&self, frame: &ImageFrame) -> Result<PoseReading, OracleError> {
        let image = frame.to_data_url();
        let resp = self
            .client
            .post(&self.url)
            .json(&PredictRequest { image: &image })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    OracleError::Timeout
                } else {
                    OracleError::Unavailable(e.to_string())
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(OracleError::Unavailable(format!(
                "classifier answered with status {status}"
            )));
        }

        let body: PredictResponse = resp
            .json()
            .await
            .map_err(|e| OracleError::BadResponse(e.to_string()))?;

        Ok(PoseReading::new(body.pose, parse_confidence(&body.confidence)?))
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }
}

/// Normalises a classifier confidence to a fraction in 0..=1.
///
/// Strings are always percentages (`"87.50"`, `"1.00"`, `"50%"`). Bare
/// numbers above 1 are percentages, otherwise fractions.
pub fn parse_confidence(raw: &Value) -> Result<f64, OracleError> {
    let (value, percent) = match raw {
        Value::Number(n) => (n.as_f64(), false),
        Value::String(s) => (
            s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
            true,
        ),
        _ => (None, false),
    };
    let value =
        value.ok_or_else(|| OracleError::BadResponse(format!("confidence {raw} is not a number")))?;

    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return Err(OracleError::BadResponse(format!(
            "confidence {value} out of range"
        )));
    }

    Ok(if percent || value > 1.0 {
        value / 100.0
    } else {
        value
    })
}
