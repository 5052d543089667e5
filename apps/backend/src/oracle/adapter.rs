//! Timeout and retry policy around a [`PoseOracle`].

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::PoseReading;
use crate::errors::domain::{DomainError, OracleFailureKind};
use crate::oracle::frame::ImageFrame;
use crate::oracle::trait_def::{OracleError, PoseOracle};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(2000);
/// First call plus one retry.
pub const ATTEMPTS: u32 = 2;

#[derive(Clone)]
pub struct OracleAdapter {
    oracle: Arc<dyn PoseOracle>,
    timeout: Duration,
}

impl OracleAdapter {
    pub fn new(oracle: Arc<dyn PoseOracle>, timeout: Duration) -> Self {
        Self { oracle, timeout }
    }

    pub fn oracle_name(&self) -> &'static str {
        self.oracle.name()
    }

    /// Classify a frame, retrying once. Never holds any game lock.
    pub async fn classify(&self, frame: &ImageFrame) -> Result<PoseReading, DomainError> {
        let mut last = OracleError::Unavailable("no attempt made".into());

        for attempt in 1..=ATTEMPTS {
            let outcome = match tokio::time::timeout(self.timeout, self.oracle.classify(frame)).await
            {
                Ok(result) => result.and_then(validate),
                Err(_) => Err(OracleError::Timeout),
            };

            match outcome {
                Ok(reading) => {
                    debug!(
                        oracle = self.oracle.name(),
                        attempt,
                        label = %reading.label,
                        confidence = reading.confidence,
                        "Oracle reading"
                    );
                    return Ok(reading);
                }
                Err(err) => {
                    warn!(
                        oracle = self.oracle.name(),
                        attempt,
                        error = %err,
                        "Oracle attempt failed"
                    );
                    last = err;
                }
            }
        }

        Err(match last {
            OracleError::Timeout => DomainError::oracle(
                OracleFailureKind::Timeout,
                format!("pose oracle timed out after {ATTEMPTS} attempts"),
            ),
            other => DomainError::oracle(OracleFailureKind::Unavailable, other.to_string()),
        })
    }
}

fn validate(reading: PoseReading) -> Result<PoseReading, OracleError> {
    if reading.label.trim().is_empty() {
        return Err(OracleError::BadResponse("empty label".into()));
    }
    if !reading.confidence.is_finite() || !(0.0..=1.0).contains(&reading.confidence) {
        return Err(OracleError::BadResponse(format!(
            "confidence {} outside 0..=1",
            reading.confidence
        )));
    }
    Ok(reading)
}
