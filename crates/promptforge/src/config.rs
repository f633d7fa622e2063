//! Project configuration file support.
//!
//! Loads configuration from `promptforge.toml` in the working directory and
//! resolves the effective LLM client config with precedence
//! CLI flag > environment > file > default.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use promptforge_llm::LlmConfig;

/// The config file name
pub const CONFIG_FILE_NAME: &str = "promptforge.toml";

/// Project-level configuration loaded from `promptforge.toml`
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// API base URL override
    pub base_url: Option<String>,
    /// Per-role model overrides
    #[serde(default)]
    pub models: ModelConfig,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ModelConfig {
    pub chat: Option<String>,
    pub review: Option<String>,
    pub image: Option<String>,
}

impl ProjectConfig {
    /// Load configuration from the working directory.
    ///
    /// Returns:
    /// - `Ok(Some(config))` if file exists and parses successfully
    /// - `Ok(None)` if file does not exist
    /// - `Err(...)` if file exists but fails to parse (hard error)
    pub fn load(working_dir: &Path) -> Result<Option<Self>> {
        let config_path = working_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        let config: ProjectConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        Ok(Some(config))
    }
}

/// Resolve the effective LLM config: defaults, then the project file, then
/// the environment on top.
pub fn resolve_llm_config(working_dir: &Path) -> Result<LlmConfig> {
    let mut config = LlmConfig::default();

    if let Some(file) = ProjectConfig::load(working_dir)? {
        if let Some(base) = file.base_url {
            config = config.with_base_url(base);
        }
        if let Some(model) = file.models.chat {
            config = config.with_chat_model(model);
        }
        if let Some(model) = file.models.review {
            config = config.with_review_model(model);
        }
        if let Some(model) = file.models.image {
            config = config.with_image_model(model);
        }
    }

    if let Ok(base) = std::env::var("OPENAI_API_BASE") {
        config = config.with_base_url(base);
    }
    if let Ok(model) = std::env::var("DEFAULT_MODEL") {
        config = config.with_chat_model(model);
    }
    if let Ok(model) = std::env::var("REVIEW_MODEL") {
        config = config.with_review_model(model);
    }
    if let Ok(model) = std::env::var("IMAGE_MODEL") {
        config = config.with_image_model(model);
    }
    config.api_key = std::env::var("OPENAI_API_KEY").ok();

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        assert!(ProjectConfig::load(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_parses_overrides() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"
base_url = "https://proxy.internal/v1"

[models]
chat = "gpt-4o-mini"
review = "gpt-4o"
"#,
        )
        .unwrap();

        let config = ProjectConfig::load(dir.path()).unwrap().unwrap();
        assert_eq!(config.base_url.as_deref(), Some("https://proxy.internal/v1"));
        assert_eq!(config.models.chat.as_deref(), Some("gpt-4o-mini"));
        assert_eq!(config.models.review.as_deref(), Some("gpt-4o"));
        assert!(config.models.image.is_none());
    }

    #[test]
    fn test_env_overrides_file_base_url() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "base_url = \"https://from-file/v1\"\n",
        )
        .unwrap();

        std::env::set_var("OPENAI_API_BASE", "https://from-env/v1");
        let config = resolve_llm_config(dir.path()).unwrap();
        std::env::remove_var("OPENAI_API_BASE");

        assert_eq!(config.base_url, "https://from-env/v1");
    }

    #[test]
    fn test_unknown_field_is_hard_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "base_urll = \"typo\"\n",
        )
        .unwrap();

        assert!(ProjectConfig::load(dir.path()).is_err());
    }
}
