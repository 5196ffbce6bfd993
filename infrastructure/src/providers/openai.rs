//! OpenAI-compatible chat completion adapter
//!
//! Works against any server that speaks the `/chat/completions` protocol
//! (OpenAI, Azure-style gateways, local llama.cpp or Ollama servers).

use crate::config::FileProviderConfig;
use async_trait::async_trait;
use council_application::ports::completion::{
    CompletionError, CompletionRequest, CompletionService,
};
use council_domain::util::truncate_str;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, warn};

const ERROR_BODY_CHARS: usize = 320;

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Value,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

/// Completion service backed by a chat completions endpoint.
///
/// Every participant shares the same model; the prompt carries the role.
pub struct OpenAiCompletionService {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    max_tokens: u32,
    temperature: Option<f64>,
}

impl OpenAiCompletionService {
    pub fn from_config(config: &FileProviderConfig) -> Result<Self, CompletionError> {
        if config.model.trim().is_empty() {
            return Err(CompletionError::Configuration(
                "provider.model must not be empty".to_string(),
            ));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .map_err(|e| {
                CompletionError::Configuration(format!("failed to build HTTP client: {}", e))
            })?;

        let api_key = config.resolve_api_key();
        if api_key.is_none() {
            warn!(
                "No API key found (set {} or provider.api_key); sending unauthenticated requests",
                config.api_key_env
            );
        }

        Ok(Self {
            client,
            endpoint: chat_endpoint(&config.base_url),
            model: config.model.clone(),
            api_key,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn payload(&self, prompt: &str) -> Value {
        let mut payload = json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
            "max_tokens": self.max_tokens,
        });
        if let Some(temperature) = self.temperature {
            payload["temperature"] = json!(temperature);
        }
        payload
    }
}

#[async_trait]
impl CompletionService for OpenAiCompletionService {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        debug!(
            "POST {} for {} ({})",
            self.endpoint,
            request.participant,
            request.purpose.as_str()
        );

        let mut builder = self.client.post(&self.endpoint).json(&self.payload(&request.prompt));
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(map_transport_error)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::RequestFailed(format!(
                "{}: {}",
                status,
                truncate_str(body.trim(), ERROR_BODY_CHARS)
            )));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::RequestFailed(format!("invalid response: {}", e)))?;

        let text = body
            .choices
            .first()
            .map(|choice| message_text(&choice.message.content))
            .unwrap_or_default();
        if text.trim().is_empty() {
            return Err(CompletionError::EmptyResponse);
        }
        Ok(text)
    }
}

fn map_transport_error(e: reqwest::Error) -> CompletionError {
    if e.is_timeout() {
        CompletionError::Timeout
    } else if e.is_connect() {
        CompletionError::ConnectionError(e.to_string())
    } else {
        CompletionError::RequestFailed(e.to_string())
    }
}

/// Append `/chat/completions` unless the URL already ends with it
fn chat_endpoint(base_url: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    if base.ends_with("/chat/completions") {
        base.to_string()
    } else {
        format!("{}/chat/completions", base)
    }
}

/// Message content is either a plain string or a list of typed parts
fn message_text(content: &Value) -> String {
    match content {
        Value::String(text) => text.clone(),
        Value::Array(parts) => parts
            .iter()
            .filter_map(|part| part.get("text").and_then(Value::as_str))
            .collect::<Vec<_>>()
            .join(""),
        _ => String::new(),
    }
}
