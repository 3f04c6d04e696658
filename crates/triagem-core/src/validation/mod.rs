//! Validation and normalization of model output.
//!
//! The model is the untrusted party. Its text is parsed, checked against the
//! decision schema, and only then normalized against the rule outcome. Any
//! failure here sends the caller to the fallback; nothing is best-effort
//! repaired.

mod schema;

pub use schema::validate_decision_schema;

use thiserror::Error;

use crate::decision::{Decision, DecisionValue, ModelDecision};
use crate::rules::RuleOutcome;

/// Rationale used when an invalid model decision is replaced by the rules'.
pub const RULE_ADJUSTED_RATIONALE: &str = "Ajuste automático com base nas regras determinísticas.";

/// Errors from model-output validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecisionError {
    #[error("Model output is not parseable: {0}")]
    Parse(String),

    #[error("Model output failed validation: {}", .0.join("; "))]
    Validation(Vec<String>),
}

/// Slice from the first `{` to the last `}`.
pub fn extract_json_span(text: &str) -> Result<&str, DecisionError> {
    let first = text.find('{');
    let last = text.rfind('}');

    match (first, last) {
        (Some(first), Some(last)) if last > first => Ok(&text[first..=last]),
        _ => Err(DecisionError::Parse(
            "model response contains no JSON object".to_string(),
        )),
    }
}

/// Parse raw model text into a schema-valid decision.
pub fn parse_model_output(text: &str) -> Result<ModelDecision, DecisionError> {
    let span = extract_json_span(text)?;

    let value: serde_json::Value =
        serde_json::from_str(span).map_err(|e| DecisionError::Parse(e.to_string()))?;

    validate_decision_schema(&value).map_err(DecisionError::Validation)?;

    serde_json::from_value(value).map_err(|e| DecisionError::Validation(vec![e.to_string()]))
}

/// Turn a validated model decision into a `Decision`, filling gaps from the rules.
///
/// - empty `citacoes` are taken from the rule citations;
/// - a decision value outside the enumeration is replaced by the rule
///   suggestion; with no suggestion to fall back on this is a validation error.
pub fn normalize(model: ModelDecision, outcome: &RuleOutcome) -> Result<Decision, DecisionError> {
    let mut citacoes = model.citacoes;
    if citacoes.is_empty() {
        citacoes = outcome
            .citations
            .iter()
            .map(|c| c.as_str().to_string())
            .collect();
    }

    let mut rationale = model.rationale;
    let decision = match model.decision.parse::<DecisionValue>() {
        Ok(value) => value,
        Err(reason) => {
            let suggested = outcome
                .suggestion
                .ok_or_else(|| DecisionError::Validation(vec![reason.clone()]))?;
            tracing::warn!(
                invalid = %model.decision,
                replacement = %suggested,
                "Model decision outside enumeration, using rule suggestion"
            );
            if rationale.is_empty() {
                rationale = RULE_ADJUSTED_RATIONALE.to_string();
            }
            suggested
        }
    };

    Ok(Decision {
        decision,
        rationale,
        citacoes,
    })
}
