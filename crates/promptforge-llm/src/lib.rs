//! HTTP client for OpenAI-compatible chat and image endpoints.
//!
//! The variability of the wire format (string-or-blocks message content, the
//! alternate `reasoning` field, b64-or-url image payloads) is normalized here
//! so callers only ever see plain text and raw image bytes.

mod chat;
mod client;
mod config;
mod error;
mod image;

pub use chat::{ChatMessage, ContentPart, MessageContent, SamplingParams};
pub use client::LlmClient;
pub use config::LlmConfig;
pub use error::LlmError;
pub use image::{image_to_data_url, ImageParams};
