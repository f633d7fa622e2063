use serde::{Deserialize, Serialize};

use crate::Attempt;

/// The final result of a refinement run: the persisted trace document plus
/// the summary fields the CLIs report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOutcome {
    pub best_candidate: String,
    pub best_artifact: Option<String>,
    pub best_score: f64,
    /// True when at least one attempt evaluated without error.
    pub success: bool,
    /// True when the loop stopped because quality was already acceptable.
    pub early_stop: bool,
    pub early_stop_reason: Option<String>,
    pub iterations_used: usize,
    pub max_iterations: usize,
    pub threshold: f64,
    /// Ordered attempt history, insertion order = chronological order.
    pub history: Vec<Attempt>,
    pub total_duration_secs: f64,
}

impl RunOutcome {
    pub fn exit_code(&self) -> i32 {
        if self.success {
            0
        } else {
            1
        }
    }
}
