use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use pose_arena::domain::PoseReading;
use pose_arena::oracle::{ImageFrame, OracleError, PoseOracle};
use tokio::sync::{Notify, Semaphore};

/// Oracle that parks every call until the test releases it, so tests can
/// interleave commands with an in-flight classification.
pub struct GatedOracle {
    reading: PoseReading,
    gate: Semaphore,
    entered: Notify,
    calls: AtomicUsize,
}

impl GatedOracle {
    pub fn new(label: &str, confidence: f64) -> Self {
        Self {
            reading: PoseReading::new(label, confidence),
            gate: Semaphore::new(0),
            entered: Notify::new(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Resolves once a call is parked at the gate.
    pub async fn wait_entered(&self) {
        self.entered.notified().await;
    }

    /// Lets `n` parked (or future) calls through.
    pub fn release(&self, n: usize) {
        self.gate.add_permits(n);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PoseOracle for GatedOracle {
    async fn classify(&self, _frame: &ImageFrame) -> Result<PoseReading, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.entered.notify_one();
        let permit = self
            .gate
            .acquire()
            .await
            .map_err(|_| OracleError::Unavailable("gate closed".into()))?;
        permit.forget();
        Ok(self.reading.clone())
    }

    fn name(&self) -> &'static str {
        "gated"
    }
}
