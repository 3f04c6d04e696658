//! Model provider abstractions for triagem-runtime.
//!
//! This module defines the trait for model providers and includes
//! implementations for a local Ollama server, the OpenAI API, and a stub
//! used in development.
//!
//! ## Security
//!
//! Providers that need a key use the [`secrets`] module. See
//! [`ApiCredential`] for the handling rules.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use triagem_core::ConsultationError;

mod factory;
mod ollama;
mod openai;
pub mod secrets;
mod stub;

pub use factory::{ProviderFactory, ProviderRegistry};
pub use ollama::{OllamaProvider, OllamaProviderFactory};
pub use openai::{OpenAiProvider, OpenAiProviderFactory};
pub use secrets::{ApiCredential, CredentialSource};
pub use stub::{StubProvider, StubProviderFactory};

/// System message sent ahead of every prompt.
pub const JSON_ONLY_INSTRUCTION: &str = "Responda APENAS com JSON válido no formato pedido.";

/// Errors from model providers.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    ParseError(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Provider returned an empty response")]
    EmptyResponse,
}

impl ProviderError {
    /// Map a reqwest failure, keeping timeouts distinct.
    pub(crate) fn from_reqwest(error: reqwest::Error, timeout: Duration) -> Self {
        if error.is_timeout() {
            ProviderError::Timeout(timeout)
        } else {
            ProviderError::HttpError(error.to_string())
        }
    }
}

impl From<ProviderError> for ConsultationError {
    fn from(error: ProviderError) -> Self {
        ConsultationError::Transport(error.to_string())
    }
}

/// Configuration for a completion request.
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    /// Model to use
    pub model: String,

    /// Temperature (0.0 for deterministic)
    pub temperature: f32,

    /// Deadline for the whole call, fallback endpoints included
    pub timeout: Duration,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.0,
            timeout: Duration::from_secs(150),
        }
    }
}

/// A chat message for model completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role: "system" or "user"
    pub role: String,

    /// Message content
    pub content: String,
}

impl ChatMessage {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

}

/// Response from a model completion.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Generated content
    pub content: String,

    /// Token usage, when the provider reports it
    pub usage: TokenUsage,

    /// Model used
    pub model: String,
}

/// Token usage from a completion.
#[derive(Debug, Clone, Default)]
pub struct TokenUsage {
    /// Tokens in the prompt
    pub prompt_tokens: u32,

    /// Tokens in the completion
    pub completion_tokens: u32,
}

impl TokenUsage {
    /// Total tokens used. Saturates; the counts come from the provider.
    pub fn total(&self) -> u32 {
        self.prompt_tokens.saturating_add(self.completion_tokens)
    }
}

/// Provider abstraction allows swapping model backends.
///
/// This is the ONLY place where model calls are made. Nothing in
/// `triagem-core` calls it.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Execute a chat completion.
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        config: &CompletionConfig,
    ) -> Result<CompletionResponse, ProviderError>;

    /// Get provider name for logs.
    fn name(&self) -> &str;
}

/// Reject blank completions before they reach the validator.
pub(crate) fn non_empty(content: Option<String>) -> Result<String, ProviderError> {
    content
        .filter(|c| !c.trim().is_empty())
        .ok_or(ProviderError::EmptyResponse)
}
