//! Round rules applied by the per-group state machine.

/// Default per-turn countdown, in clock ticks.
pub const DEFAULT_ROUND_SECONDS: u32 = 10;
/// Default score (0..=100) at which the objective counts as met.
pub const DEFAULT_SUCCESS_THRESHOLD: f64 = 90.0;
pub const MAX_SCORE: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundRules {
    pub round_seconds: u32,
    pub success_threshold: f64,
    /// Only readings whose label equals the objective update the score.
    pub require_label_match: bool,
}

impl Default for RoundRules {
    fn default() -> Self {
        Self {
            round_seconds: DEFAULT_ROUND_SECONDS,
            success_threshold: DEFAULT_SUCCESS_THRESHOLD,
            require_label_match: false,
        }
    }
}

/// Converts an oracle confidence fraction into a 0..=100 score.
pub fn score_from_confidence(confidence: f64) -> f64 {
    if !confidence.is_finite() {
        return 0.0;
    }
    (confidence * MAX_SCORE).clamp(0.0, MAX_SCORE)
}

/// Objective labels compare case-insensitively, ignoring outer whitespace.
pub fn labels_match(label: &str, objective: &str) -> bool {
    label.trim().eq_ignore_ascii_case(objective.trim())
}
