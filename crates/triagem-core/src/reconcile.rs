//! Reconciliation of the model reply with the rule outcome.
//!
//! This is the one place that decides between the model path and the
//! fallback path:
//!
//! ```text
//! Ok(text) ──► parse_model_output ──► normalize ──► enforce ──┐
//!                  │ Err                 │ Err                ├──► finalize
//! Err(..) ─────────┴─────────────────────┴──► fallback ───────┘
//! ```
//!
//! Whatever happens upstream, the caller receives a well-formed decision.

use serde::Serialize;
use thiserror::Error;

use crate::decision::Decision;
use crate::fallback::{self, synthesize_fallback};
use crate::precedence::{self, enforce};
use crate::rules::RuleOutcome;
use crate::validation::{normalize, parse_model_output};

/// Why the model could not be consulted.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConsultationError {
    /// The provider was reachable in principle but the call failed.
    #[error("Model provider unavailable: {0}")]
    Transport(String),

    #[error("Unsupported model provider: {0}")]
    UnsupportedProvider(String),
}

/// Where the final decision came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecisionSource {
    /// Model answer, validated and passed through precedence.
    Model,

    /// Rule-only decision; `reason` says what failed.
    Fallback { reason: String },
}

impl DecisionSource {
    pub fn is_fallback(&self) -> bool {
        matches!(self, DecisionSource::Fallback { .. })
    }
}

/// Final decision plus its provenance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reconciliation {
    pub decision: Decision,
    pub source: DecisionSource,
}

/// Resolve a model reply into the final decision.
pub fn reconcile(outcome: &RuleOutcome, reply: Result<String, ConsultationError>) -> Reconciliation {
    let (decision, source) = match reply {
        Ok(text) => match parse_model_output(&text).and_then(|m| normalize(m, outcome)) {
            Ok(decision) => (enforce(decision, &outcome.citations), DecisionSource::Model),
            Err(e) => {
                tracing::warn!(error = %e, "Model output rejected, using fallback");
                fallback(outcome, e.to_string())
            }
        },
        Err(e @ ConsultationError::Transport(_)) => {
            tracing::warn!(error = %e, "Model consultation failed, using fallback");
            fallback(outcome, e.to_string())
        }
        Err(e @ ConsultationError::UnsupportedProvider(_)) => {
            tracing::error!(error = %e, "Model provider misconfigured, using fallback");
            fallback(outcome, e.to_string())
        }
    };

    Reconciliation {
        decision: finalize(decision),
        source,
    }
}

fn fallback(outcome: &RuleOutcome, reason: String) -> (Decision, DecisionSource) {
    (
        synthesize_fallback(outcome),
        DecisionSource::Fallback { reason },
    )
}

/// Output boundary: sorted, unique citations and a non-empty rationale.
fn finalize(mut decision: Decision) -> Decision {
    decision.canonicalize_citations();
    if !decision.has_rationale() {
        decision.rationale = default_rationale(&decision).to_string();
    }
    decision
}

fn default_rationale(decision: &Decision) -> &'static str {
    use crate::decision::DecisionValue::*;
    match decision.decision {
        Incomplete => precedence::MISSING_DOCUMENT_RATIONALE,
        Rejected => precedence::RULE_REJECTION_RATIONALE,
        Approved => fallback::RULE_APPLIED_RATIONALE,
    }
}
