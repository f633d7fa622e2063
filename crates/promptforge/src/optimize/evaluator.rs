use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use futures::{stream, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use promptforge_core::{Evaluate, Evaluation};
use promptforge_llm::{ChatMessage, LlmClient, SamplingParams};
use promptforge_score::overlap_score;

use crate::optimize::metrics::{CaseResult, PromptMetrics};
use crate::optimize::suite::{render_template, TestCase};

/// The accuracy above which a prompt is considered good enough to stop.
pub const TARGET_ACCURACY: f64 = 0.95;

/// Evaluates a prompt template by fanning out over the whole test suite in
/// parallel and aggregating the per-case measurements.
pub struct SuiteEvaluator {
    client: Arc<LlmClient>,
    suite: Vec<TestCase>,
    system_prompt: String,
    concurrency: usize,
}

impl SuiteEvaluator {
    pub fn new(client: Arc<LlmClient>, suite: Vec<TestCase>, system_prompt: String) -> Self {
        let concurrency = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);
        Self {
            client,
            suite,
            system_prompt,
            concurrency,
        }
    }

    pub fn suite_len(&self) -> usize {
        self.suite.len()
    }

    /// Run every test case against the template concurrently. Cases are
    /// independent; only the shared template is read across tasks.
    pub async fn run_suite(&self, template: &str) -> PromptMetrics {
        let case_futures: Vec<_> = self
            .suite
            .iter()
            .map(|case| self.run_case(template, case))
            .collect();
        let results: Vec<CaseResult> = stream::iter(case_futures)
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        PromptMetrics::aggregate(&results)
    }

    async fn run_case(&self, template: &str, case: &TestCase) -> CaseResult {
        let prompt = render_template(template, &case.input);
        let model = self.client.config().chat_model.clone();
        let started = Instant::now();

        // Transport failures degrade to an empty response: the case scores
        // zero and the run continues.
        let response = match self
            .client
            .chat(
                &model,
                vec![
                    ChatMessage::system(&self.system_prompt),
                    ChatMessage::user(&prompt),
                ],
                SamplingParams {
                    max_tokens: Some(50),
                    temperature: Some(0.0),
                },
            )
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "test case request failed");
                String::new()
            }
        };

        let latency_secs = started.elapsed().as_secs_f64();
        let token_count =
            prompt.split_whitespace().count() + response.split_whitespace().count();
        let success = !response.is_empty();
        let accuracy = overlap_score(&response, &case.expected_output);

        debug!(accuracy, latency_secs, token_count, "test case evaluated");
        CaseResult {
            accuracy,
            latency_secs,
            token_count,
            success,
        }
    }

    /// A/B test two prompts against the same suite.
    pub async fn compare(&self, prompt_a: &str, prompt_b: &str) -> AbReport {
        let metrics_a = self.run_suite(prompt_a).await;
        let metrics_b = self.run_suite(prompt_b).await;

        let winner = if metrics_a.avg_accuracy > metrics_b.avg_accuracy {
            "A".to_string()
        } else {
            "B".to_string()
        };
        let improvement = (metrics_a.avg_accuracy - metrics_b.avg_accuracy).abs();

        AbReport {
            prompt_a_metrics: metrics_a,
            prompt_b_metrics: metrics_b,
            winner,
            improvement,
        }
    }
}

#[async_trait]
impl Evaluate for SuiteEvaluator {
    async fn evaluate(&self, candidate: &str) -> anyhow::Result<Evaluation> {
        let metrics = self.run_suite(candidate).await;
        Ok(Evaluation {
            score: metrics.avg_accuracy,
            artifact: None,
            feedback: metrics.summary(),
            needs_improvement: metrics.avg_accuracy <= TARGET_ACCURACY,
        })
    }
}

/// Result of A/B testing two prompts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbReport {
    pub prompt_a_metrics: PromptMetrics,
    pub prompt_b_metrics: PromptMetrics,
    pub winner: String,
    pub improvement: f64,
}
