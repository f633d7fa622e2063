use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use promptforge_core::{Evaluate, Evaluation};
use promptforge_llm::{image_to_data_url, ChatMessage, ImageParams, LlmClient, SamplingParams};
use promptforge_score::{parse_review, DocType, Review, FALLBACK_SCORE};

use crate::schematic::PromptBuilder;

/// Evaluates a generation prompt by producing an image and having the review
/// model critique it.
///
/// Generation failure is a failed attempt; review failure degrades to the
/// acceptable-by-default fallback so a usable image is never discarded just
/// because the critique call broke.
pub struct SchematicEvaluator {
    client: Arc<LlmClient>,
    builder: PromptBuilder,
    /// The user's original request, shown to the reviewer.
    user_request: String,
    output_dir: PathBuf,
    base_name: String,
    extension: String,
    doc_type: DocType,
    threshold: f64,
    max_iterations: usize,
    /// Version suffix for saved images, one per generation.
    versions: AtomicUsize,
}

impl SchematicEvaluator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        client: Arc<LlmClient>,
        builder: PromptBuilder,
        user_request: String,
        output_dir: PathBuf,
        base_name: String,
        extension: String,
        doc_type: DocType,
        threshold: f64,
        max_iterations: usize,
    ) -> Self {
        Self {
            client,
            builder,
            user_request,
            output_dir,
            base_name,
            extension,
            doc_type,
            threshold,
            max_iterations,
            versions: AtomicUsize::new(0),
        }
    }

    async fn review(&self, image_path: &PathBuf, version: usize) -> Review {
        match self.try_review(image_path, version).await {
            Ok(review) => review,
            Err(e) => {
                warn!(error = %e, "review skipped");
                Review {
                    critique: "Image generated successfully (review skipped)".to_string(),
                    score: FALLBACK_SCORE,
                    needs_improvement: false,
                }
            }
        }
    }

    async fn try_review(&self, image_path: &PathBuf, version: usize) -> anyhow::Result<Review> {
        let data_url = image_to_data_url(image_path)?;
        let prompt = self.builder.review(
            &self.user_request,
            self.doc_type,
            self.threshold,
            version,
            self.max_iterations,
        );

        let model = self.client.config().review_model.clone();
        let critique = self
            .client
            .chat(
                &model,
                vec![ChatMessage::user_with_image(prompt, data_url)],
                SamplingParams::default(),
            )
            .await?;

        Ok(parse_review(&critique, self.threshold))
    }
}

#[async_trait]
impl Evaluate for SchematicEvaluator {
    async fn evaluate(&self, candidate: &str) -> anyhow::Result<Evaluation> {
        let image = self
            .client
            .generate_image(
                candidate,
                ImageParams {
                    size: "2048x2048".to_string(),
                    quality: "standard".to_string(),
                },
            )
            .await?;

        let version = self.versions.fetch_add(1, Ordering::SeqCst) + 1;
        let image_path = self
            .output_dir
            .join(format!("{}_v{}{}", self.base_name, version, self.extension));
        tokio::fs::write(&image_path, &image).await?;
        info!(path = %image_path.display(), bytes = image.len(), "saved generated image");

        let review = self.review(&image_path, version).await;
        info!(
            score = review.score,
            threshold = self.threshold,
            needs_improvement = review.needs_improvement,
            "review complete"
        );

        Ok(Evaluation {
            score: review.score,
            artifact: Some(image_path.display().to_string()),
            feedback: review.critique,
            needs_improvement: review.needs_improvement,
        })
    }
}
