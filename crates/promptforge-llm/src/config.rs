/// Configuration for the LLM client.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// API key (read from OPENAI_API_KEY env if not set).
    pub api_key: Option<String>,
    /// API base URL.
    pub base_url: String,
    /// Model for chat completions.
    pub chat_model: String,
    /// Model for critique/review calls.
    pub review_model: String,
    /// Model for image generation.
    pub image_model: String,
    /// Timeout for a single API request, in seconds.
    pub request_timeout_secs: u64,
    /// Timeout for downloading a generated image by URL, in seconds.
    pub download_timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://openrouter.ai/api/v1".to_string(),
            chat_model: "gpt-3.5-turbo".to_string(),
            review_model: "google/gemini-3-pro".to_string(),
            image_model: "google/gemini-3-pro-image-preview".to_string(),
            request_timeout_secs: 120,
            download_timeout_secs: 60,
        }
    }
}

impl LlmConfig {
    /// Build a config from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.api_key = std::env::var("OPENAI_API_KEY").ok();
        if let Ok(base) = std::env::var("OPENAI_API_BASE") {
            config.base_url = base;
        }
        if let Ok(model) = std::env::var("DEFAULT_MODEL") {
            config.chat_model = model;
        }
        if let Ok(model) = std::env::var("REVIEW_MODEL") {
            config.review_model = model;
        }
        if let Ok(model) = std::env::var("IMAGE_MODEL") {
            config.image_model = model;
        }
        config
    }

    /// Get API key from config or environment.
    pub fn get_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_chat_model(mut self, model: impl Into<String>) -> Self {
        self.chat_model = model.into();
        self
    }

    pub fn with_review_model(mut self, model: impl Into<String>) -> Self {
        self.review_model = model.into();
        self
    }

    pub fn with_image_model(mut self, model: impl Into<String>) -> Self {
        self.image_model = model.into();
        self
    }
}
