//! Pose oracle trait definition.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::PoseReading;
use crate::oracle::frame::ImageFrame;

/// Errors a single oracle attempt can produce.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OracleError {
    #[error("oracle did not answer in time")]
    Timeout,
    #[error("oracle unavailable: {0}")]
    Unavailable(String),
    #[error("oracle returned an unusable answer: {0}")]
    BadResponse(String),
}

/// External pose classifier: image in, label and confidence out.
///
/// Implementations are stateless request/response; the adapter owns
/// timeouts and retries.
#[async_trait]
pub trait PoseOracle: Send + Sync {
    async fn classify(&self, frame: &ImageFrame) -> Result<PoseReading, OracleError>;

    fn name(&self) -> &'static str;
}
