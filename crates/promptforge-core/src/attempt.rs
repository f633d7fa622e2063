use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether an attempt evaluated the iteration's candidate or one of the
/// alternatives produced for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptKind {
    Primary,
    Variant,
}

impl std::fmt::Display for AttemptKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttemptKind::Primary => write!(f, "candidate"),
            AttemptKind::Variant => write!(f, "variant"),
        }
    }
}

/// One recorded generate-and-score pass. Immutable once appended to the
/// run history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attempt {
    /// Iteration this attempt belongs to (1-based).
    pub iteration: usize,
    pub kind: AttemptKind,
    /// The input that was evaluated.
    pub candidate: String,
    /// Reference to the produced artifact (e.g. an image path), if any.
    pub artifact: Option<String>,
    pub score: f64,
    pub needs_improvement: bool,
    /// Critique text or metrics summary from the evaluation.
    pub critique: Option<String>,
    /// Error message when the evaluation failed.
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl Attempt {
    pub(crate) fn from_evaluation(
        iteration: usize,
        kind: AttemptKind,
        candidate: &str,
        eval: &Evaluation,
    ) -> Self {
        Self {
            iteration,
            kind,
            candidate: candidate.to_string(),
            artifact: eval.artifact.clone(),
            score: eval.score,
            needs_improvement: eval.needs_improvement,
            critique: Some(eval.feedback.clone()),
            error: None,
            timestamp: Utc::now(),
        }
    }

    /// A failed evaluation scores as the worst possible value but is still
    /// recorded so the trace shows what happened.
    pub(crate) fn from_failure(
        iteration: usize,
        kind: AttemptKind,
        candidate: &str,
        error: String,
    ) -> Self {
        Self {
            iteration,
            kind,
            candidate: candidate.to_string(),
            artifact: None,
            score: 0.0,
            needs_improvement: true,
            critique: None,
            error: Some(error),
            timestamp: Utc::now(),
        }
    }
}

/// Result of evaluating one candidate.
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// Numeric quality score. The scale is the evaluator's (0-1 accuracy,
    /// 0-10 critique score).
    pub score: f64,
    /// Reference to the artifact this evaluation produced, if any.
    pub artifact: Option<String>,
    /// Feedback handed to the mutator for the next pass.
    pub feedback: String,
    /// Whether the evaluator wants another pass. The evaluator owns the
    /// threshold comparison.
    pub needs_improvement: bool,
}
