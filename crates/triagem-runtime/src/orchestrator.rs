//! Decision orchestrator.
//!
//! One request, start to finish:
//! - Rules run first (deterministic, no I/O)
//! - The model is consulted once, under a deadline
//! - `reconcile` picks the model path or the fallback
//! - The webhook is notified, best-effort
//!
//! `decide` never fails for a validated process. Provider misconfiguration
//! is detected when the orchestrator is built and surfaces per request as a
//! fallback decision.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

use triagem_core::{
    reconcile, ConsultationError, Decision, DecisionSource, Process, Reconciliation, RuleEngine,
};

use crate::config::RuntimeConfig;
use crate::notify::{DecisionNotification, WebhookNotifier};
use crate::prompts::{build_prompt, preliminary_observations};
use crate::providers::{
    ChatMessage, CompletionConfig, LlmProvider, ProviderError, ProviderRegistry,
    JSON_ONLY_INSTRUCTION,
};

/// Everything known about one decision.
#[derive(Debug, Clone, Serialize)]
pub struct DecisionReport {
    pub decision: Decision,
    pub source: DecisionSource,
    pub provider: String,
    pub model: String,
    pub decided_at: DateTime<Utc>,
}

/// Runs the rules, the model and reconciliation for each process.
///
/// Holds only immutable state, so one instance can be shared across tasks.
pub struct DecisionOrchestrator {
    /// `Err` when the configured provider could not be built
    provider: Result<Arc<dyn LlmProvider>, ConsultationError>,

    provider_name: String,

    completion: CompletionConfig,

    engine: RuleEngine,

    notifier: WebhookNotifier,
}

impl DecisionOrchestrator {
    /// Build from configuration with the default provider registry.
    pub fn from_config(config: &RuntimeConfig) -> Self {
        DecisionOrchestratorBuilder::new().config(config.clone()).build()
    }

    pub fn builder() -> DecisionOrchestratorBuilder {
        DecisionOrchestratorBuilder::new()
    }

    pub fn provider_name(&self) -> &str {
        &self.provider_name
    }

    pub fn model(&self) -> &str {
        &self.completion.model
    }

    /// Decide a process. The process must already be validated.
    pub async fn decide(&self, process: &Process) -> DecisionReport {
        let outcome = self.engine.evaluate(process);
        let prompt = build_prompt(process, &preliminary_observations(&outcome));

        let reply = self.consult(prompt).await;
        let Reconciliation { decision, source } = reconcile(&outcome, reply);

        tracing::info!(
            processo = %process.numero_processo,
            decision = %decision.decision,
            fallback = source.is_fallback(),
            provider = %self.provider_name,
            "Decision reached"
        );

        self.notifier
            .notify(&DecisionNotification {
                input: process,
                output: &decision,
                provider: &self.provider_name,
                model: &self.completion.model,
            })
            .await;

        DecisionReport {
            decision,
            source,
            provider: self.provider_name.clone(),
            model: self.completion.model.clone(),
            decided_at: Utc::now(),
        }
    }

    /// One model call under the completion deadline.
    async fn consult(&self, prompt: String) -> Result<String, ConsultationError> {
        let provider = self.provider.as_ref().map_err(Clone::clone)?;
        let messages = vec![
            ChatMessage::system(JSON_ONLY_INSTRUCTION),
            ChatMessage::user(prompt),
        ];

        let timeout = self.completion.timeout;
        match tokio::time::timeout(timeout, provider.complete(messages, &self.completion)).await {
            Ok(Ok(response)) => {
                tracing::debug!(
                    provider = provider.name(),
                    model = %response.model,
                    tokens = response.usage.total(),
                    "Model replied"
                );
                Ok(response.content)
            }
            Ok(Err(e)) => Err(e.into()),
            Err(_) => Err(ProviderError::Timeout(timeout).into()),
        }
    }
}

impl std::fmt::Debug for DecisionOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecisionOrchestrator")
            .field("provider", &self.provider_name)
            .field("available", &self.provider.is_ok())
            .field("completion", &self.completion)
            .field("notifier", &self.notifier.is_enabled())
            .finish()
    }
}

/// Builder for DecisionOrchestrator.
pub struct DecisionOrchestratorBuilder {
    provider: Option<Arc<dyn LlmProvider>>,
    config: RuntimeConfig,
    registry: ProviderRegistry,
    notifier: Option<WebhookNotifier>,
}

impl DecisionOrchestratorBuilder {
    pub fn new() -> Self {
        Self {
            provider: None,
            config: RuntimeConfig::default(),
            registry: ProviderRegistry::with_defaults(),
            notifier: None,
        }
    }

    /// Use this provider instead of resolving one from the registry.
    pub fn provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn registry(mut self, registry: ProviderRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn notifier(mut self, notifier: WebhookNotifier) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Build the orchestrator. Never fails; see [`DecisionOrchestrator`].
    pub fn build(self) -> DecisionOrchestrator {
        let (provider, provider_name) = match self.provider {
            Some(provider) => {
                let name = provider.name().to_string();
                (Ok(provider), name)
            }
            None => {
                let name = self.config.provider_name();
                let resolved = self
                    .registry
                    .resolve(&name, &self.config.provider_settings());
                match &resolved {
                    Err(e @ ConsultationError::UnsupportedProvider(_)) => tracing::error!(
                        provider = %name,
                        available = ?self.registry.available_types(),
                        error = %e,
                        "Unsupported model provider, every decision will use the fallback"
                    ),
                    Err(e) => tracing::warn!(
                        provider = %name,
                        error = %e,
                        "Model provider unavailable, every decision will use the fallback"
                    ),
                    Ok(_) => {}
                }
                (resolved, name)
            }
        };

        let completion = CompletionConfig {
            model: self.config.llm.model.clone(),
            temperature: 0.0,
            timeout: self.config.llm.timeout,
        };

        DecisionOrchestrator {
            provider,
            provider_name,
            completion,
            engine: RuleEngine::new(),
            notifier: self
                .notifier
                .unwrap_or_else(|| WebhookNotifier::new(&self.config.webhook)),
        }
    }
}

impl Default for DecisionOrchestratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
