use thiserror::Error;

/// Errors from the LLM client.
///
/// Only [`LlmError::MissingApiKey`] is fatal; everything else is a
/// recoverable per-attempt failure.
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("OPENAI_API_KEY is not set")]
    MissingApiKey,

    #[error("API request timed out after {0} seconds")]
    Timeout(u64),

    #[error("API request failed (HTTP {status}): {detail}")]
    Status { status: u16, detail: String },

    #[error("API request failed: {0}")]
    Transport(String),

    #[error("Response contained no choices")]
    EmptyResponse,

    #[error("Response contained no image data")]
    MissingImageData,

    #[error("Failed to decode base64 image payload: {0}")]
    Decode(#[from] base64::DecodeError),
}

impl LlmError {
    /// Map a reqwest error, attributing timeouts to the given budget.
    pub(crate) fn from_reqwest(err: reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            LlmError::Timeout(timeout_secs)
        } else {
            LlmError::Transport(err.to_string())
        }
    }
}
