//! # triagem-runtime
//!
//! Model consultation for triagem.
//!
//! This crate wraps the deterministic evaluation in `triagem-core` with the
//! parts that do I/O: model providers, configuration loading and the
//! decision webhook.
//!
//! ## Important
//!
//! The model is advisory. Whatever it answers, `triagem-core` applies rule
//! precedence afterwards, and any failure on the model path degrades to a
//! rule-only decision.
//!
//! ## Example
//!
//! ```rust,ignore
//! use triagem_runtime::{DecisionOrchestrator, RuntimeConfig};
//!
//! let config = RuntimeConfig::load(None)?;
//! let orchestrator = DecisionOrchestrator::from_config(&config);
//!
//! let report = orchestrator.decide(&process).await;
//! println!("{} ({:?})", report.decision.decision, report.source);
//! ```

pub mod config;
pub mod notify;
pub mod orchestrator;
pub mod prompts;
pub mod providers;

pub use config::{ConfigError, RuntimeConfig};
pub use notify::{DecisionNotification, WebhookNotifier};
pub use orchestrator::{DecisionOrchestrator, DecisionOrchestratorBuilder, DecisionReport};
pub use providers::{
    ApiCredential, ChatMessage, CompletionConfig, CompletionResponse, LlmProvider, ProviderError,
    ProviderFactory, ProviderRegistry,
};
