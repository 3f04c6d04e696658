//! OpenAI provider.
//!
//! Tries the chat completions endpoint first. If that call fails or yields no
//! text, retries once against the responses endpoint with the prompt inlined.
//!
//! ## Security
//!
//! The API key is held as an [`ApiCredential`] and only exposed when the
//! `Authorization` header is set.

use super::{
    factory::ProviderFactory, non_empty, secrets::ApiCredential, ChatMessage, CompletionConfig,
    CompletionResponse, LlmProvider, ProviderError, TokenUsage,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use std::time::Duration;

/// Environment variable name for the OpenAI API key.
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Prefix for the single-input responses endpoint.
pub const RESPONSES_INSTRUCTION: &str = "Responda SOMENTE com JSON no formato exigido.";

/// OpenAI provider.
pub struct OpenAiProvider {
    credential: ApiCredential,
    base_url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("credential", &self.credential)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl OpenAiProvider {
    pub fn new(credential: ApiCredential) -> Self {
        Self {
            credential,
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            client: reqwest::Client::new(),
        }
    }

    /// Build from JSON settings with environment fallback for the key.
    ///
    /// Keys: `api_key`, `base_url`, `timeout_secs`, and `api_key_env` to
    /// read the key from a variable other than `OPENAI_API_KEY`.
    pub fn from_config(config: &JsonValue) -> Result<Self, ProviderError> {
        let env_var = config["api_key_env"].as_str().unwrap_or(OPENAI_API_KEY_ENV);
        let credential =
            ApiCredential::from_config_or_env(config, "api_key", env_var, "OpenAI API key")?;

        let mut provider = Self::new(credential);
        if let Some(url) = config["base_url"].as_str() {
            provider = provider.with_base_url(url);
        }
        if let Some(secs) = config["timeout_secs"].as_u64() {
            provider.timeout = Duration::from_secs(secs);
        }
        Ok(provider)
    }

    /// Set custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    async fn post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<reqwest::Response, ProviderError> {
        // SECURITY: Only expose the credential here, at the point of use
        let response = self
            .client
            .post(format!("{}/{}", self.base_url, path))
            .bearer_auth(self.credential.expose())
            .timeout(self.timeout)
            .json(body)
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(e, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<OpenAiError>()
                .await
                .map(|e| e.error.message)
                .unwrap_or_else(|_| status.to_string());
            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }

    async fn chat_completion(
        &self,
        messages: &[ChatMessage],
        config: &CompletionConfig,
    ) -> Result<CompletionResponse, ProviderError> {
        let request = ChatRequest {
            model: &config.model,
            messages,
            temperature: config.temperature,
        };

        let body: ChatResponse = self
            .post("chat/completions", &request)
            .await?
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        let content = non_empty(
            body.choices
                .into_iter()
                .next()
                .and_then(|c| c.message.content),
        )?;

        Ok(CompletionResponse {
            content,
            usage: body.usage.map(TokenUsage::from).unwrap_or_default(),
            model: body.model.unwrap_or_else(|| config.model.clone()),
        })
    }

    async fn response_completion(
        &self,
        messages: &[ChatMessage],
        config: &CompletionConfig,
    ) -> Result<CompletionResponse, ProviderError> {
        let prompt = messages
            .iter()
            .filter(|m| m.role == "user")
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        let request = ResponsesRequest {
            model: &config.model,
            input: format!("{}\n{}", RESPONSES_INSTRUCTION, prompt),
        };

        let body: ResponsesResponse = self
            .post("responses", &request)
            .await?
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        let model = body.model.clone().unwrap_or_else(|| config.model.clone());
        let usage = body.usage.clone().map(TokenUsage::from).unwrap_or_default();
        let content = non_empty(body.text())?;

        Ok(CompletionResponse {
            content,
            usage,
            model,
        })
    }
}

/// Chat completions request format.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<OpenAiUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Responses API request format.
#[derive(Debug, Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    input: String,
}

#[derive(Debug, Deserialize)]
struct ResponsesResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    output_text: Option<String>,
    #[serde(default)]
    output: Vec<ResponsesOutputItem>,
    #[serde(default)]
    usage: Option<OpenAiUsage>,
}

impl ResponsesResponse {
    /// `output_text` when present, else the concatenated `output_text` parts.
    fn text(self) -> Option<String> {
        if let Some(text) = self.output_text.filter(|t| !t.trim().is_empty()) {
            return Some(text);
        }

        let joined: String = self
            .output
            .into_iter()
            .flat_map(|item| item.content)
            .filter(|part| part.kind == "output_text")
            .filter_map(|part| part.text)
            .collect();

        if joined.is_empty() {
            None
        } else {
            Some(joined)
        }
    }
}

#[derive(Debug, Deserialize)]
struct ResponsesOutputItem {
    #[serde(default)]
    content: Vec<ResponsesContentPart>,
}

#[derive(Debug, Deserialize)]
struct ResponsesContentPart {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

/// Usage block; chat and responses endpoints name the fields differently.
#[derive(Debug, Clone, Deserialize)]
struct OpenAiUsage {
    #[serde(default, alias = "input_tokens")]
    prompt_tokens: u32,
    #[serde(default, alias = "output_tokens")]
    completion_tokens: u32,
}

impl From<OpenAiUsage> for TokenUsage {
    fn from(usage: OpenAiUsage) -> Self {
        TokenUsage {
            prompt_tokens: usage.prompt_tokens,
            completion_tokens: usage.completion_tokens,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiError {
    error: OpenAiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorDetail {
    message: String,
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        config: &CompletionConfig,
    ) -> Result<CompletionResponse, ProviderError> {
        match self.chat_completion(&messages, config).await {
            Ok(response) => Ok(response),
            Err(e) => {
                tracing::warn!(error = %e, "Chat completions failed, trying responses endpoint");
                self.response_completion(&messages, config)
                    .await
                    .inspect_err(|e| {
                        tracing::error!(error = %e, "Responses endpoint failed too");
                    })
            }
        }
    }

    fn name(&self) -> &str {
        "openai"
    }
}

/// Factory for OpenAI providers.
///
/// ## Configuration Format
/// ```json
/// {
///   "api_key": "sk-...",                      // Optional, falls back to OPENAI_API_KEY env
///   "base_url": "https://api.openai.com/v1",  // Optional
///   "timeout_secs": 60                        // Optional, per request
/// }
/// ```
pub struct OpenAiProviderFactory;

impl ProviderFactory for OpenAiProviderFactory {
    fn provider_type(&self) -> &'static str {
        "openai"
    }

    fn create(&self, config: &JsonValue) -> Result<Arc<dyn LlmProvider>, ProviderError> {
        self.validate_config(config)?;
        Ok(Arc::new(OpenAiProvider::from_config(config)?))
    }

    fn validate_config(&self, config: &JsonValue) -> Result<(), ProviderError> {
        let env_var = config["api_key_env"].as_str().unwrap_or(OPENAI_API_KEY_ENV);
        if !ApiCredential::is_available(config, "api_key", env_var) {
            return Err(ProviderError::NotConfigured(format!(
                "OpenAI API key required: set 'api_key' in config or {} env",
                env_var
            )));
        }

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
