//! Wire types for the `/chat/completions` endpoint.

use serde::{Deserialize, Serialize};

/// A role-tagged message in the conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: MessageContent,
}

impl ChatMessage {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: MessageContent::Text(text.into()),
        }
    }

    /// A user message carrying text plus an attached image.
    pub fn user_with_image(text: impl Into<String>, image_data_url: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: MessageContent::Parts(vec![
                ContentPart::Text { text: text.into() },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: image_data_url.into(),
                    },
                },
            ]),
        }
    }
}

/// Message content is either a plain string or a list of typed parts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

/// A typed content block.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

/// Sampling parameters for a chat request.
#[derive(Debug, Clone, Default)]
pub struct SamplingParams {
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResponseMessage {
    #[serde(default)]
    pub content: Option<MessageContent>,
    /// Alternate field some providers populate when `content` is empty.
    #[serde(default)]
    pub reasoning: Option<String>,
}

impl ResponseMessage {
    /// Flatten the string-or-blocks content shape into plain text, falling
    /// back to `reasoning` when the content is empty.
    pub fn into_text(self) -> String {
        let text = match self.content {
            Some(MessageContent::Text(s)) => s,
            Some(MessageContent::Parts(parts)) => parts
                .into_iter()
                .filter_map(|part| match part {
                    ContentPart::Text { text } => Some(text),
                    ContentPart::ImageUrl { .. } => None,
                })
                .collect::<Vec<_>>()
                .join("\n"),
            None => String::new(),
        };

        if text.is_empty() {
            self.reasoning.unwrap_or_default()
        } else {
            text
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_content_passes_through() {
        let msg: ResponseMessage =
            serde_json::from_str(r#"{"content": "Positive"}"#).unwrap();
        assert_eq!(msg.into_text(), "Positive");
    }

    #[test]
    fn test_block_content_is_flattened() {
        let msg: ResponseMessage = serde_json::from_str(
            r#"{"content": [
                {"type": "text", "text": "SCORE: 9.0"},
                {"type": "text", "text": "VERDICT: ACCEPTABLE"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(msg.into_text(), "SCORE: 9.0\nVERDICT: ACCEPTABLE");
    }

    #[test]
    fn test_reasoning_fallback_when_content_empty() {
        let msg: ResponseMessage =
            serde_json::from_str(r#"{"content": "", "reasoning": "the answer is Neutral"}"#)
                .unwrap();
        assert_eq!(msg.into_text(), "the answer is Neutral");
    }

    #[test]
    fn test_content_takes_priority_over_reasoning() {
        let msg: ResponseMessage =
            serde_json::from_str(r#"{"content": "Negative", "reasoning": "ignored"}"#).unwrap();
        assert_eq!(msg.into_text(), "Negative");
    }

    #[test]
    fn test_missing_content_and_reasoning_yields_empty() {
        let msg: ResponseMessage = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(msg.into_text(), "");
    }

    #[test]
    fn test_image_message_serializes_typed_parts() {
        let msg = ChatMessage::user_with_image("review this", "data:image/png;base64,AAAA");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["content"][0]["type"], "text");
        assert_eq!(json["content"][1]["type"], "image_url");
        assert_eq!(
            json["content"][1]["image_url"]["url"],
            "data:image/png;base64,AAAA"
        );
    }
}
