//! Provider factory pattern for dynamic provider registration.
//!
//! Providers register factories that create instances from JSON settings.
//! Lookups are case-insensitive: names are lower-cased on both sides.
//!
//! ## Usage
//!
//! ```ignore
//! let registry = ProviderRegistry::with_defaults();
//! let provider = registry.resolve("ollama", &settings)?;
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value as JsonValue;
use triagem_core::ConsultationError;

use super::{LlmProvider, ProviderError};

/// Factory for creating model providers from configuration.
pub trait ProviderFactory: Send + Sync {
    /// Unique, lower-case identifier for this provider type.
    fn provider_type(&self) -> &'static str;

    /// Create a provider instance from JSON settings.
    fn create(&self, config: &JsonValue) -> Result<Arc<dyn LlmProvider>, ProviderError>;

    /// Validate settings without creating a provider.
    fn validate_config(&self, _config: &JsonValue) -> Result<(), ProviderError> {
        Ok(())
    }
}

/// Registry of available provider factories.
#[derive(Default)]
pub struct ProviderRegistry {
    factories: BTreeMap<String, Arc<dyn ProviderFactory>>,
}

impl ProviderRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in providers registered.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(super::OllamaProviderFactory));
        registry.register(Arc::new(super::OpenAiProviderFactory));
        registry.register(Arc::new(super::StubProviderFactory));
        registry
    }

    /// Register a provider factory, replacing any factory with the same type.
    pub fn register(&mut self, factory: Arc<dyn ProviderFactory>) {
        self.factories
            .insert(factory.provider_type().to_lowercase(), factory);
    }

    fn factory(&self, provider_type: &str) -> Option<&Arc<dyn ProviderFactory>> {
        self.factories.get(&provider_type.trim().to_lowercase())
    }

    /// The dispatch used by the orchestrator.
    ///
    /// Unknown names are `UnsupportedProvider`; a known provider that cannot
    /// be built is a transport failure.
    pub fn resolve(
        &self,
        provider_type: &str,
        config: &JsonValue,
    ) -> Result<Arc<dyn LlmProvider>, ConsultationError> {
        let factory = self
            .factory(provider_type)
            .ok_or_else(|| ConsultationError::UnsupportedProvider(provider_type.to_string()))?;
        factory.create(config).map_err(ConsultationError::from)
    }

    /// List available provider types.
    pub fn available_types(&self) -> Vec<&str> {
        self.factories.keys().map(|s| s.as_str()).collect()
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.available_types())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{ChatMessage, CompletionConfig, CompletionResponse, TokenUsage};
    use async_trait::async_trait;

    struct MockProvider {
        name: String,
    }

    #[async_trait]
    impl LlmProvider for MockProvider {
        async fn complete(
            &self,
            _messages: Vec<ChatMessage>,
            _config: &CompletionConfig,
        ) -> Result<CompletionResponse, ProviderError> {
            Ok(CompletionResponse {
                content: "mock response".to_string(),
                usage: TokenUsage::default(),
                model: "mock".to_string(),
            })
        }

        fn name(&self) -> &str {
            &self.name
        }
    }

    struct MockProviderFactory;

    impl ProviderFactory for MockProviderFactory {
        fn provider_type(&self) -> &'static str {
            "Mock"
        }

        fn create(&self, config: &JsonValue) -> Result<Arc<dyn LlmProvider>, ProviderError> {
            let name = config["name"].as_str().unwrap_or("mock-provider").to_string();
            Ok(Arc::new(MockProvider { name }))
        }
    }

    #[test]
    fn test_registry_register_and_resolve_case_insensitive() {
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(MockProviderFactory));
        assert_eq!(registry.available_types(), vec!["mock"]);

        let config = serde_json::json!({"name": "test-mock"});
        let provider = registry.resolve(" MoCk ", &config).unwrap();
        assert_eq!(provider.name(), "test-mock");
    }

    #[test]
    fn test_resolve_unknown_is_unsupported() {
        let registry = ProviderRegistry::with_defaults();
        let result = registry.resolve("gemini", &serde_json::json!({}));
        assert!(matches!(
            result,
            Err(ConsultationError::UnsupportedProvider(name)) if name == "gemini"
        ));
    }

    #[test]
    fn test_resolve_build_failure_is_transport() {
        let registry = ProviderRegistry::with_defaults();
        let result = registry.resolve(
            "openai",
            &serde_json::json!({"api_key": "", "api_key_env": "TRIAGEM_TEST_KEY_UNSET_5"}),
        );
        assert!(matches!(result, Err(ConsultationError::Transport(_))));
    }

    #[test]
    fn test_default_registry() {
        let registry = ProviderRegistry::with_defaults();
        assert_eq!(registry.available_types(), vec!["ollama", "openai", "stub"]);
        assert_eq!(
            registry.resolve("STUB", &serde_json::json!({})).unwrap().name(),
            "stub"
        );
    }
}
