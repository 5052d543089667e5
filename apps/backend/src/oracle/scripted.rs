//! In-process oracle that replays a script of answers.
//!
//! Used by tests and local demos where no classifier is running.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::PoseReading;
use crate::oracle::frame::ImageFrame;
use crate::oracle::trait_def::{OracleError, PoseOracle};

#[derive(Debug, Clone)]
pub struct ScriptedReply {
    delay: Option<Duration>,
    result: Result<PoseReading, OracleError>,
}

impl ScriptedReply {
    pub fn ok(label: &str, confidence: f64) -> Self {
        Self {
            delay: None,
            result: Ok(PoseReading::new(label, confidence)),
        }
    }

    pub fn fail(err: OracleError) -> Self {
        Self {
            delay: None,
            result: Err(err),
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// Pops one reply per call; once the script runs dry every call gets the
/// fallback (or `Unavailable` if none was set).
pub struct ScriptedOracle {
    script: Mutex<VecDeque<ScriptedReply>>,
    fallback: Option<PoseReading>,
    calls: AtomicUsize,
}

impl ScriptedOracle {
    pub const NAME: &'static str = "scripted";

    pub fn new(script: impl IntoIterator<Item = ScriptedReply>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            fallback: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Answers every call with the same reading.
    pub fn constant(label: &str, confidence: f64) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Some(PoseReading::new(label, confidence)),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn push(&self, reply: ScriptedReply) {
        self.script.lock().push_back(reply);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PoseOracle for ScriptedOracle {
    async fn classify(&self, _frame: &ImageFrame) -> Result<PoseReading, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().pop_front();

        match next {
            Some(reply) => {
                if let Some(delay) = reply.delay {
                    tokio::time::sleep(delay).await;
                }
                reply.result
            }
            None => self
                .fallback
                .clone()
                .ok_or_else(|| OracleError::Unavailable("script exhausted".into())),
        }
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }
}
