//! Local Ollama chat provider.
//!
//! Talks to `POST {base_url}/api/chat` with streaming disabled. No credential.

use super::{
    factory::ProviderFactory, non_empty, ChatMessage, CompletionConfig, CompletionResponse,
    LlmProvider, ProviderError, TokenUsage,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Ollama provider.
#[derive(Debug)]
pub struct OllamaProvider {
    base_url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl OllamaProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
            client: reqwest::Client::new(),
        }
    }

    /// Build from JSON settings: `base_url`, `timeout_secs`.
    pub fn from_config(config: &JsonValue) -> Self {
        let base_url = config["base_url"]
            .as_str()
            .unwrap_or(DEFAULT_OLLAMA_BASE_URL);
        let mut provider = Self::new(base_url);
        if let Some(secs) = config["timeout_secs"].as_u64() {
            provider.timeout = Duration::from_secs(secs);
        }
        provider
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url)
    }
}

/// Ollama chat request format.
#[derive(Debug, Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
}

/// Ollama chat response format.
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    #[serde(default)]
    model: Option<String>,
    message: Option<OllamaMessage>,
    #[serde(default)]
    prompt_eval_count: u32,
    #[serde(default)]
    eval_count: u32,
}

#[derive(Debug, Deserialize)]
struct OllamaMessage {
    content: Option<String>,
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        config: &CompletionConfig,
    ) -> Result<CompletionResponse, ProviderError> {
        let request = OllamaRequest {
            model: &config.model,
            messages: &messages,
            stream: false,
            options: OllamaOptions {
                temperature: config.temperature,
            },
        };

        let response = self
            .client
            .post(self.chat_url())
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(e, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let body: OllamaResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        let content = non_empty(body.message.and_then(|m| m.content))?;

        Ok(CompletionResponse {
            content,
            usage: TokenUsage {
                prompt_tokens: body.prompt_eval_count,
                completion_tokens: body.eval_count,
            },
            model: body.model.unwrap_or_else(|| config.model.clone()),
        })
    }

    fn name(&self) -> &str {
        "ollama"
    }
}

/// Factory for Ollama providers.
///
/// ## Configuration Format
/// ```json
/// {
///   "base_url": "http://localhost:11434",
///   "timeout_secs": 120
/// }
/// ```
pub struct OllamaProviderFactory;

impl ProviderFactory for OllamaProviderFactory {
    fn provider_type(&self) -> &'static str {
        "ollama"
    }

    fn create(&self, config: &JsonValue) -> Result<Arc<dyn LlmProvider>, ProviderError> {
        self.validate_config(config)?;
        Ok(Arc::new(OllamaProvider::from_config(config)))
    }

    fn validate_config(&self, config: &JsonValue) -> Result<(), ProviderError> {
        if let Some(url) = config["base_url"].as_str() {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ProviderError::NotConfigured(
                    "base_url must start with http:// or https://".to_string(),
                ));
            }
        }
        Ok(())
    }
}
