//! Wire types for the `/images/generations` endpoint.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::LlmError;

/// Parameters for an image generation request.
#[derive(Debug, Clone)]
pub struct ImageParams {
    pub size: String,
    pub quality: String,
}

impl Default for ImageParams {
    fn default() -> Self {
        Self {
            size: "1024x1024".to_string(),
            quality: "standard".to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ImageRequest {
    pub model: String,
    pub prompt: String,
    pub n: u32,
    pub size: String,
    pub quality: String,
    pub response_format: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ImageResponse {
    #[serde(default)]
    pub data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ImageData {
    #[serde(default)]
    pub b64_json: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl ImageData {
    /// Decode the inline base64 payload, if present. Some providers wrap the
    /// payload across lines, so whitespace is stripped before decoding.
    pub fn decode_b64(&self) -> Result<Option<Vec<u8>>, LlmError> {
        match &self.b64_json {
            Some(b64) => {
                let cleaned: String = b64.chars().filter(|c| !c.is_whitespace()).collect();
                Ok(Some(BASE64.decode(cleaned.as_bytes())?))
            }
            None => Ok(None),
        }
    }
}

/// Encode an image file as a `data:` URL for attaching to a chat message.
pub fn image_to_data_url(path: &Path) -> std::io::Result<String> {
    let bytes = std::fs::read(path)?;
    let mime = match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "image/png",
    };
    Ok(format!("data:{};base64,{}", mime, BASE64.encode(&bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_b64_whitespace_is_stripped() {
        let data = ImageData {
            b64_json: Some("aGVs\nbG8g \r\nd29ybGQ=".to_string()),
            url: None,
        };
        let bytes = data.decode_b64().unwrap().unwrap();
        assert_eq!(bytes, b"hello world");
    }

    #[test]
    fn test_missing_b64_is_none() {
        let data = ImageData {
            b64_json: None,
            url: Some("https://example.com/img.png".to_string()),
        };
        assert!(data.decode_b64().unwrap().is_none());
    }

    #[test]
    fn test_invalid_b64_is_error() {
        let data = ImageData {
            b64_json: Some("!!not base64!!".to_string()),
            url: None,
        };
        assert!(data.decode_b64().is_err());
    }

    #[test]
    fn test_data_url_mime_from_extension() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("pic.jpg");
        std::fs::write(&path, b"\xff\xd8").unwrap();
        let url = image_to_data_url(&path).unwrap();
        assert!(url.starts_with("data:image/jpeg;base64,"));

        let path = dir.path().join("pic.bin");
        std::fs::write(&path, b"x").unwrap();
        let url = image_to_data_url(&path).unwrap();
        assert!(url.starts_with("data:image/png;base64,"));
    }
}
