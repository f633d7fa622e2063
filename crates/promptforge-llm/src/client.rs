use reqwest::Client;
use tracing::{debug, warn};

use crate::chat::{ChatRequest, ChatResponse};
use crate::image::{ImageRequest, ImageResponse};
use crate::{ChatMessage, ImageParams, LlmConfig, LlmError, SamplingParams};

/// Client for an OpenAI-compatible API.
///
/// One instance serves both endpoints: `/chat/completions` for completions
/// and critique calls, `/images/generations` for image generation.
pub struct LlmClient {
    http: Client,
    config: LlmConfig,
    api_key: String,
}

impl LlmClient {
    /// Build a client. Fails fast when no API key is available; this is the
    /// only fatal configuration error in the system.
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let api_key = config.get_api_key().ok_or(LlmError::MissingApiKey)?;
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| LlmError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            config,
            api_key,
        })
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Send a chat completion request and return the normalized text of the
    /// first choice.
    pub async fn chat(
        &self,
        model: &str,
        messages: Vec<ChatMessage>,
        params: SamplingParams,
    ) -> Result<String, LlmError> {
        let request = ChatRequest {
            model: model.to_string(),
            messages,
            max_tokens: params.max_tokens,
            temperature: params.temperature,
        };

        debug!(model, "sending chat completion request");
        let url = format!("{}/chat/completions", self.config.base_url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::from_reqwest(e, self.config.request_timeout_secs))?;

        let response = Self::check_status(response).await?;
        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::from_reqwest(e, self.config.request_timeout_secs))?;

        let choice = body.choices.into_iter().next().ok_or(LlmError::EmptyResponse)?;
        Ok(choice.message.into_text())
    }

    /// Generate a single image and return its raw bytes.
    ///
    /// The response carries either an inline base64 payload or a URL; a URL
    /// is fetched with the shorter download timeout.
    pub async fn generate_image(
        &self,
        prompt: &str,
        params: ImageParams,
    ) -> Result<Vec<u8>, LlmError> {
        let request = ImageRequest {
            model: self.config.image_model.clone(),
            prompt: prompt.to_string(),
            n: 1,
            size: params.size,
            quality: params.quality,
            response_format: "b64_json".to_string(),
        };

        debug!(model = %self.config.image_model, "sending image generation request");
        let url = format!("{}/images/generations", self.config.base_url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::from_reqwest(e, self.config.request_timeout_secs))?;

        let response = Self::check_status(response).await?;
        let body: ImageResponse = response
            .json()
            .await
            .map_err(|e| LlmError::from_reqwest(e, self.config.request_timeout_secs))?;

        let first = body.data.into_iter().next().ok_or(LlmError::MissingImageData)?;

        if let Some(bytes) = first.decode_b64()? {
            debug!(len = bytes.len(), "decoded inline image payload");
            return Ok(bytes);
        }

        if let Some(image_url) = first.url {
            debug!(url = %image_url, "downloading generated image");
            return self.download(&image_url).await;
        }

        Err(LlmError::MissingImageData)
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, LlmError> {
        let timeout = std::time::Duration::from_secs(self.config.download_timeout_secs);
        let response = self
            .http
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| LlmError::from_reqwest(e, self.config.download_timeout_secs))?;

        let response = Self::check_status(response).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| LlmError::from_reqwest(e, self.config.download_timeout_secs))?;
        Ok(bytes.to_vec())
    }

    /// Turn a non-2xx status into an error carrying the server's own
    /// explanation when the body is the usual `{"error": ...}` JSON.
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, LlmError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| {
                v.get("error").map(|e| {
                    e.get("message")
                        .and_then(|m| m.as_str())
                        .map(str::to_string)
                        .unwrap_or_else(|| e.to_string())
                })
            })
            .unwrap_or(body);

        warn!(status = status.as_u16(), detail = %detail, "API returned error status");
        Err(LlmError::Status {
            status: status.as_u16(),
            detail,
        })
    }
}
