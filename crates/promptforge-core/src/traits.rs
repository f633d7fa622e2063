use async_trait::async_trait;

use crate::Evaluation;

/// Produces a quality signal for a candidate. Implementations wrap the
/// remote generate/review calls.
#[async_trait]
pub trait Evaluate: Send + Sync {
    async fn evaluate(&self, candidate: &str) -> anyhow::Result<Evaluation>;
}

/// Produces alternative candidates to try next, given the current candidate
/// and the feedback from its evaluation. The controller caps the list at
/// [`crate::MAX_VARIANTS`], preserving generation order.
pub trait Mutate: Send + Sync {
    fn variants(&self, candidate: &str, feedback: &str) -> Vec<String>;
}
