//! Deterministic rule engine.
//!
//! Rules run in a fixed order and the first conclusive verdict wins:
//!
//! 1. Sphere (POL-4)
//! 2. Condemnation value (POL-2 / POL-3)
//! 3. Delegation without reservation (POL-6)
//! 4. Death without estate admission (POL-5)
//! 5. Finality of judgment + execution phase (POL-8 / POL-1)
//!
//! When nothing concludes, the outcome carries no suggestion and the model
//! decides, with whatever observations were collected along the way.

mod condemnation;
mod documents;
mod finality;
pub mod patterns;
mod sphere;

pub use condemnation::CondemnationValueRule;
pub use documents::{DeathWithoutAdmissionRule, DelegationWithoutReservationRule};
pub use finality::FinalityRule;
pub use sphere::SphereRule;

use serde::Serialize;
use std::collections::BTreeSet;

use crate::decision::DecisionValue;
use crate::policy::PolicyCode;
use crate::process::Process;

/// What a single rule concluded about a process.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleVerdict {
    /// Nothing to report.
    Pass,

    /// Non-binding observation. Recorded, evaluation continues.
    Observe { reason: String, citation: PolicyCode },

    /// Conclusive verdict. Evaluation stops here.
    Conclude {
        decision: DecisionValue,
        reason: String,
        citation: PolicyCode,
    },
}

/// A deterministic acquisition rule.
pub trait Rule: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Policies this rule may cite.
    fn policy_scope(&self) -> &'static [PolicyCode];

    /// Evaluate the rule. Must be total for any validated process.
    fn check(&self, process: &Process) -> RuleVerdict;
}

/// Result of running the rule engine.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RuleOutcome {
    /// `None` means the rules are inconclusive and the model decides.
    pub suggestion: Option<DecisionValue>,

    /// Human-readable reasons, in evaluation order
    pub reasons: Vec<String>,

    /// Cited policies (deduplicated by construction)
    pub citations: BTreeSet<PolicyCode>,
}

impl RuleOutcome {
    /// Whether a rule reached a conclusive verdict.
    pub fn is_conclusive(&self) -> bool {
        self.suggestion.is_some()
    }

    pub fn cites(&self, code: PolicyCode) -> bool {
        self.citations.contains(&code)
    }
}

/// Runs the fixed, ordered rule list.
pub struct RuleEngine {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleEngine {
    /// Engine with the acquisition rules in their mandated order.
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(SphereRule),
                Box::new(CondemnationValueRule),
                Box::new(DelegationWithoutReservationRule),
                Box::new(DeathWithoutAdmissionRule),
                Box::new(FinalityRule),
            ],
        }
    }

    /// Names of the rules in evaluation order.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Evaluate a process.
    pub fn evaluate(&self, process: &Process) -> RuleOutcome {
        let mut outcome = RuleOutcome::default();

        for rule in &self.rules {
            let verdict = rule.check(process);
            tracing::debug!(
                rule = rule.name(),
                processo = %process.numero_processo,
                verdict = ?verdict,
                "Rule evaluated"
            );

            match verdict {
                RuleVerdict::Pass => {}
                RuleVerdict::Observe { reason, citation } => {
                    outcome.reasons.push(reason);
                    outcome.citations.insert(citation);
                }
                RuleVerdict::Conclude {
                    decision,
                    reason,
                    citation,
                } => {
                    // A conclusive rule reports only its own finding.
                    return RuleOutcome {
                        suggestion: Some(decision),
                        reasons: vec![reason],
                        citations: BTreeSet::from([citation]),
                    };
                }
            }
        }

        outcome
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Evaluate a process with the default rule engine.
pub fn preliminary_checks(process: &Process) -> RuleOutcome {
    RuleEngine::new().evaluate(process)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eligible_process() -> Process {
        Process::new("0001234-56.2020.8.26.0100")
            .with_esfera("cível")
            .with_sigla_tribunal("TJSP")
            .with_valor(67592.0)
            .with_document("Certidão de Trânsito em Julgado", "Certifico que a sentença transitou.")
            .with_movement("Iniciado cumprimento definitivo de sentença")
    }

    #[test]
    fn test_rule_order() {
        assert_eq!(
            RuleEngine::new().rule_names(),
            vec![
                "sphere",
                "condemnation_value",
                "delegation_without_reservation",
                "death_without_admission",
                "finality",
            ]
        );
    }

    #[test]
    fn test_labor_sphere_rejected() {
        let process = Process::new("1").with_esfera("trabalhista").with_valor(50_000.0);
        let outcome = preliminary_checks(&process);

        assert_eq!(outcome.suggestion, Some(DecisionValue::Rejected));
        assert_eq!(outcome.citations, BTreeSet::from([PolicyCode::Pol4]));
        assert_eq!(outcome.reasons.len(), 1);
    }

    #[test]
    fn test_labor_sphere_short_circuits_missing_value() {
        // Labor sphere and missing value: only the first rule may speak.
        let process = Process::new("1")
            .with_sigla_tribunal("TRT2")
            .with_document("Certidão de óbito", "falecimento do autor");
        let outcome = preliminary_checks(&process);

        assert_eq!(outcome.suggestion, Some(DecisionValue::Rejected));
        assert_eq!(outcome.citations, BTreeSet::from([PolicyCode::Pol4]));
        assert!(!outcome.cites(PolicyCode::Pol2));
    }

    #[test]
    fn test_missing_value_incomplete() {
        let process = Process::new("1");
        let outcome = preliminary_checks(&process);

        assert_eq!(outcome.suggestion, Some(DecisionValue::Incomplete));
        assert_eq!(outcome.citations, BTreeSet::from([PolicyCode::Pol2]));
    }

    #[test]
    fn test_low_value_rejected_with_formatted_amount() {
        let process = Process::new("1").with_valor(500.0);
        let outcome = preliminary_checks(&process);

        assert_eq!(outcome.suggestion, Some(DecisionValue::Rejected));
        assert_eq!(outcome.citations, BTreeSet::from([PolicyCode::Pol3]));
        assert!(outcome.reasons[0].contains("500.00"));
    }

    #[test]
    fn test_value_at_threshold_passes() {
        let process = Process::new("1").with_valor(1000.0);
        let outcome = preliminary_checks(&process);
        assert!(!outcome.cites(PolicyCode::Pol3));
    }

    #[test]
    fn test_delegation_without_reservation_rejected() {
        let process = eligible_process().with_document(
            "Substabelecimento",
            "Substabelecimento,\nsem reserva de poderes, ao advogado X.",
        );
        let outcome = preliminary_checks(&process);

        assert_eq!(outcome.suggestion, Some(DecisionValue::Rejected));
        assert_eq!(outcome.citations, BTreeSet::from([PolicyCode::Pol6]));
    }

    #[test]
    fn test_delegation_checked_before_death() {
        let process = eligible_process()
            .with_document("Substabelecimento sem reserva", "")
            .with_document("Certidão de óbito", "");
        let outcome = preliminary_checks(&process);
        assert_eq!(outcome.citations, BTreeSet::from([PolicyCode::Pol6]));
    }

    #[test]
    fn test_death_without_admission_rejected() {
        let process = eligible_process().with_document("Certidão de Óbito", "Autor faleceu.");
        let outcome = preliminary_checks(&process);

        assert_eq!(outcome.suggestion, Some(DecisionValue::Rejected));
        assert_eq!(outcome.citations, BTreeSet::from([PolicyCode::Pol5]));
    }

    #[test]
    fn test_death_with_admission_in_another_document_passes() {
        let process = eligible_process()
            .with_document("Certidão de Óbito", "Autor faleceu.")
            .with_document("Decisão", "Deferida a habilitação dos sucessores.");
        let outcome = preliminary_checks(&process);

        assert!(!outcome.cites(PolicyCode::Pol5));
        assert_eq!(outcome.suggestion, None);
    }

    #[test]
    fn test_missing_finality_incomplete() {
        let process = Process::new("1")
            .with_valor(5000.0)
            .with_document("Sentença", "Julgo procedente o pedido.");
        let outcome = preliminary_checks(&process);

        assert_eq!(outcome.suggestion, Some(DecisionValue::Incomplete));
        assert_eq!(outcome.citations, BTreeSet::from([PolicyCode::Pol8]));
    }

    #[test]
    fn test_finality_without_execution_defers_with_observation() {
        let process = Process::new("1")
            .with_valor(5000.0)
            .with_document("Certidão de Trânsito em Julgado", "");
        let outcome = preliminary_checks(&process);

        assert_eq!(outcome.suggestion, None);
        assert_eq!(outcome.citations, BTreeSet::from([PolicyCode::Pol1]));
        assert_eq!(outcome.reasons.len(), 1);
        assert!(outcome.reasons[0].contains("execução"));
    }

    #[test]
    fn test_finality_and_execution_defers_cleanly() {
        let outcome = preliminary_checks(&eligible_process());

        assert_eq!(outcome.suggestion, None);
        assert!(outcome.reasons.is_empty());
        assert!(outcome.citations.is_empty());
        assert!(!outcome.is_conclusive());
    }

    #[test]
    fn test_payment_order_counts_as_execution() {
        let process = Process::new("1")
            .with_valor(5000.0)
            .with_document("Certidão de Trânsito em Julgado", "")
            .with_document("Ofício", "Expedido precatório.");
        let outcome = preliminary_checks(&process);
        assert!(outcome.citations.is_empty());
    }

    #[test]
    fn test_evaluation_is_repeatable() {
        let process = eligible_process().with_document("Certidão de óbito", "");
        let engine = RuleEngine::new();
        assert_eq!(engine.evaluate(&process), engine.evaluate(&process));
    }
}
