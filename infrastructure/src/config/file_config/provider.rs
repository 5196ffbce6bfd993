//! Completion provider configuration from TOML (`[provider]` section)

use serde::{Deserialize, Serialize};

/// OpenAI-compatible chat completion endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// Base URL; `/chat/completions` is appended unless already present
    pub base_url: String,
    pub model: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Direct API key (prefer `api_key_env`)
    pub api_key: Option<String>,
    pub max_tokens: u32,
    pub temperature: Option<f64>,
    pub timeout_secs: u64,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            api_key: None,
            max_tokens: 2048,
            temperature: Some(0.7),
            timeout_secs: 120,
        }
    }
}

impl FileProviderConfig {
    /// Direct key if set, otherwise the value of `api_key_env`
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| {
                std::env::var(&self.api_key_env)
                    .ok()
                    .filter(|k| !k.trim().is_empty())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_section_partial_override() {
        let config: super::super::FileConfig = toml::from_str(
            r#"
[provider]
base_url = "http://localhost:11434/v1"
model = "qwen2.5"
temperature = 0.2
"#,
        )
        .unwrap();
        assert_eq!(config.provider.model, "qwen2.5");
        assert_eq!(config.provider.temperature, Some(0.2));
        assert_eq!(config.provider.timeout_secs, 120);
    }

    #[test]
    fn test_direct_key_wins() {
        let config = FileProviderConfig {
            api_key: Some("sk-direct".to_string()),
            api_key_env: "COUNCIL_TEST_UNSET_KEY_VAR".to_string(),
            ..Default::default()
        };
        assert_eq!(config.resolve_api_key().as_deref(), Some("sk-direct"));

        let config = FileProviderConfig {
            api_key: Some("  ".to_string()),
            ..config
        };
        assert_eq!(config.resolve_api_key(), None);
    }
}
