use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, warn};

use promptforge_logging::{LogEvent, Logger};

use crate::{Attempt, AttemptKind, Evaluate, Evaluation, Mutate, RunOutcome};

/// Upper bound on alternatives tested per iteration.
pub const MAX_VARIANTS: usize = 3;

#[derive(Debug, Clone)]
pub struct RefinementConfig {
    /// Tool name, for logging.
    pub tool: String,
    /// Maximum loop passes (N >= 1).
    pub max_iterations: usize,
    /// Quality threshold for this run, carried into the trace. Acceptability
    /// itself is decided by the evaluator's `needs_improvement` flag.
    pub threshold: f64,
}

/// Tracks the highest-scoring attempt seen so far. Replaced only on a
/// strictly higher score; ties keep the incumbent.
struct Best {
    candidate: String,
    artifact: Option<String>,
    score: f64,
}

impl Best {
    fn observe(&mut self, attempt: &Attempt) {
        if attempt.score > self.score {
            self.candidate = attempt.candidate.clone();
            self.artifact = attempt.artifact.clone();
            self.score = attempt.score;
        }
    }
}

/// Drives the generate → score → decide → mutate loop.
///
/// Per-attempt failures degrade to a zero score and the loop continues; the
/// run as a whole only reports failure when every attempt errored.
pub struct RefinementController<'a> {
    evaluator: &'a dyn Evaluate,
    mutator: &'a dyn Mutate,
    config: RefinementConfig,
    logger: Arc<Logger>,
}

impl<'a> RefinementController<'a> {
    pub fn new(
        evaluator: &'a dyn Evaluate,
        mutator: &'a dyn Mutate,
        config: RefinementConfig,
        logger: Arc<Logger>,
    ) -> Self {
        Self {
            evaluator,
            mutator,
            config,
            logger,
        }
    }

    /// Run at most `max_iterations` passes starting from `initial`.
    pub async fn run(&self, initial: String) -> RunOutcome {
        let started = Instant::now();
        let n = self.config.max_iterations.max(1);

        self.logger.log(&LogEvent::RunStarted {
            tool: self.config.tool.clone(),
            candidate_preview: initial.chars().take(100).collect(),
            max_iterations: n,
            threshold: self.config.threshold,
        });

        let mut history: Vec<Attempt> = Vec::new();
        // Keyed by the literal candidate text: reuse is only valid when the
        // candidate is byte-identical to the one already scored.
        let mut cache: HashMap<String, Evaluation> = HashMap::new();
        let mut best = Best {
            candidate: initial.clone(),
            artifact: None,
            score: 0.0,
        };
        let mut current = initial;
        let mut any_success = false;
        let mut early_stop = false;
        let mut early_stop_reason = None;
        let mut iterations_used = 0;

        for iteration in 1..=n {
            iterations_used = iteration;
            self.logger.log(&LogEvent::IterationStarted {
                iteration,
                max_iterations: n,
            });

            // The score carried forward from variant testing is the single
            // allowed skip: no remote call is repeated for this candidate.
            let evaluation = match cache.get(&current) {
                Some(cached) => {
                    self.logger.log(&LogEvent::CachedScoreReused {
                        iteration,
                        score: cached.score,
                    });
                    let eval = cached.clone();
                    let attempt =
                        Attempt::from_evaluation(iteration, AttemptKind::Primary, &current, &eval);
                    best.observe(&attempt);
                    history.push(attempt);
                    any_success = true;
                    Some(eval)
                }
                None => match self.evaluator.evaluate(&current).await {
                    Ok(eval) => {
                        cache.insert(current.clone(), eval.clone());
                        let attempt = Attempt::from_evaluation(
                            iteration,
                            AttemptKind::Primary,
                            &current,
                            &eval,
                        );
                        self.logger.log(&LogEvent::AttemptCompleted {
                            iteration,
                            kind: AttemptKind::Primary.to_string(),
                            score: eval.score,
                            needs_improvement: eval.needs_improvement,
                        });
                        best.observe(&attempt);
                        history.push(attempt);
                        any_success = true;
                        Some(eval)
                    }
                    Err(e) => {
                        warn!(iteration, error = %e, "evaluation failed");
                        self.logger.log(&LogEvent::AttemptFailed {
                            iteration,
                            kind: AttemptKind::Primary.to_string(),
                            error: e.to_string(),
                        });
                        history.push(Attempt::from_failure(
                            iteration,
                            AttemptKind::Primary,
                            &current,
                            e.to_string(),
                        ));
                        None
                    }
                },
            };

            // Stopping rule A: quality already acceptable.
            if let Some(ref eval) = evaluation {
                if !eval.needs_improvement {
                    self.logger.log(&LogEvent::ThresholdMet {
                        iteration,
                        score: eval.score,
                    });
                    early_stop = true;
                    early_stop_reason = Some(format!(
                        "evaluator accepted score {:.2} (threshold {:.2})",
                        eval.score, self.config.threshold
                    ));
                    break;
                }
            }

            // Stopping rule B: iteration cap.
            if iteration == n {
                self.logger
                    .log(&LogEvent::MaxIterationsReached { iterations: n });
                break;
            }

            let (current_score, feedback) = match &evaluation {
                Some(eval) => (eval.score, eval.feedback.clone()),
                None => {
                    let err = history
                        .last()
                        .and_then(|a| a.error.clone())
                        .unwrap_or_default();
                    (0.0, err)
                }
            };

            let mut variants = self.mutator.variants(&current, &feedback);
            variants.truncate(MAX_VARIANTS);
            self.logger.log(&LogEvent::VariantsGenerated {
                iteration,
                count: variants.len(),
            });

            // Test each alternative; adopt whichever beats the current
            // candidate, carrying its cached score into the next pass.
            let mut adopted = current.clone();
            let mut adopted_score = current_score;
            for variant in variants {
                match self.evaluator.evaluate(&variant).await {
                    Ok(eval) => {
                        let attempt = Attempt::from_evaluation(
                            iteration,
                            AttemptKind::Variant,
                            &variant,
                            &eval,
                        );
                        self.logger.log(&LogEvent::AttemptCompleted {
                            iteration,
                            kind: AttemptKind::Variant.to_string(),
                            score: eval.score,
                            needs_improvement: eval.needs_improvement,
                        });
                        best.observe(&attempt);
                        history.push(attempt);
                        any_success = true;
                        if eval.score > adopted_score {
                            adopted_score = eval.score;
                            adopted = variant.clone();
                        }
                        cache.insert(variant, eval);
                    }
                    Err(e) => {
                        warn!(iteration, error = %e, "variant evaluation failed");
                        self.logger.log(&LogEvent::AttemptFailed {
                            iteration,
                            kind: AttemptKind::Variant.to_string(),
                            error: e.to_string(),
                        });
                        history.push(Attempt::from_failure(
                            iteration,
                            AttemptKind::Variant,
                            &variant,
                            e.to_string(),
                        ));
                    }
                }
            }

            if adopted != current {
                self.logger.log(&LogEvent::VariantAdopted {
                    iteration,
                    score: adopted_score,
                });
                debug!(iteration, score = adopted_score, "adopted variant");
                current = adopted;
            }
        }

        let duration = started.elapsed();
        self.logger.log(&LogEvent::RunCompleted {
            iterations: iterations_used,
            best_score: best.score,
            success: any_success,
            duration_secs: duration.as_secs_f64(),
        });

        RunOutcome {
            best_candidate: best.candidate,
            best_artifact: best.artifact,
            best_score: best.score,
            success: any_success,
            early_stop,
            early_stop_reason,
            iterations_used,
            max_iterations: n,
            threshold: self.config.threshold,
            history,
            total_duration_secs: duration.as_secs_f64(),
        }
    }
}
