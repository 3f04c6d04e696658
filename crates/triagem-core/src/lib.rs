//! # triagem-core
//!
//! Deterministic acquisition-policy evaluation for legal processes.
//!
//! This crate answers, for a process record:
//! - Do the acquisition policies settle the case on their own?
//! - If a model is consulted, which parts of its answer may stand?
//! - What do we return when the model is unavailable?
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: Same process and same model reply, same decision
//! 2. **No I/O**: No network, no LLM calls; the reply is an input
//! 3. **Rules dominate**: A blocking or missing-document citation always wins
//! 4. **Total**: `reconcile` returns a well-formed decision for every input
//!
//! ## Example
//!
//! ```rust,ignore
//! use triagem_core::{preliminary_checks, reconcile, ConsultationError, Process};
//!
//! let process = Process::from_json(&body)?;
//! let outcome = preliminary_checks(&process);
//! let reply: Result<String, ConsultationError> = ask_model(&process, &outcome).await;
//! let result = reconcile(&outcome, reply);
//!
//! println!("{}: {}", result.decision.decision, result.decision.rationale);
//! ```

pub mod decision;
pub mod fallback;
pub mod policy;
pub mod precedence;
pub mod process;
pub mod reconcile;
pub mod rules;
pub mod validation;

// Re-export main types at crate root
pub use decision::{Decision, DecisionValue, ModelDecision};
pub use fallback::synthesize_fallback;
pub use policy::{Policy, PolicyCode, UnknownPolicy};
pub use precedence::enforce;
pub use process::{Document, Movement, Process, ProcessError};
pub use reconcile::{reconcile, ConsultationError, DecisionSource, Reconciliation};
pub use rules::{preliminary_checks, Rule, RuleEngine, RuleOutcome, RuleVerdict};
pub use validation::{normalize, parse_model_output, DecisionError};

/// Evaluate a process with the rules only, as if the model were unavailable.
///
/// Useful for dry runs and for callers that never consult a model.
pub fn evaluate_offline(process: &Process) -> Reconciliation {
    let outcome = preliminary_checks(process);
    reconcile(
        &outcome,
        Err(ConsultationError::Transport("model not consulted".to_string())),
    )
}
