//! Development provider that never calls a model.
//!
//! Every completion fails with `NotConfigured`, so decisions always come from
//! the rules.

use super::{
    factory::ProviderFactory, ChatMessage, CompletionConfig, CompletionResponse, LlmProvider,
    ProviderError,
};
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::sync::Arc;

#[derive(Debug, Default, Clone, Copy)]
pub struct StubProvider;

#[async_trait]
impl LlmProvider for StubProvider {
    async fn complete(
        &self,
        _messages: Vec<ChatMessage>,
        _config: &CompletionConfig,
    ) -> Result<CompletionResponse, ProviderError> {
        Err(ProviderError::NotConfigured(
            "stub mode does not call a model".to_string(),
        ))
    }

    fn name(&self) -> &str {
        "stub"
    }
}

pub struct StubProviderFactory;

impl ProviderFactory for StubProviderFactory {
    fn provider_type(&self) -> &'static str {
        "stub"
    }

    fn create(&self, _config: &JsonValue) -> Result<Arc<dyn LlmProvider>, ProviderError> {
        Ok(Arc::new(StubProvider))
    }
}
