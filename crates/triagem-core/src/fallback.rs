//! Decision synthesis when the model cannot be used.

use crate::decision::{Decision, DecisionValue};
use crate::policy::PolicyCode;
use crate::rules::RuleOutcome;

pub const RULE_APPLIED_RATIONALE: &str = "Regra determinística aplicada.";
pub const MISSING_INFORMATION_RATIONALE: &str = "Documento ou informação essencial ausente.";
pub const MODEL_UNAVAILABLE_RATIONALE: &str =
    "Trânsito/execução/valor parecem consistentes; LLM indisponível.";

/// Derive a decision from the rule outcome alone.
///
/// Total: every suggestion, including none, maps to a decision. An
/// inconclusive outcome becomes `approved` and additionally cites POL-1 and
/// POL-2, since the rules found nothing against the process.
pub fn synthesize_fallback(outcome: &RuleOutcome) -> Decision {
    match outcome.suggestion {
        Some(DecisionValue::Rejected) => {
            Decision::new(DecisionValue::Rejected, RULE_APPLIED_RATIONALE)
                .with_citations(&outcome.citations)
        }
        Some(DecisionValue::Incomplete) => {
            Decision::new(DecisionValue::Incomplete, MISSING_INFORMATION_RATIONALE)
                .with_citations(&outcome.citations)
        }
        Some(DecisionValue::Approved) | None => {
            let mut decision = Decision::new(DecisionValue::Approved, MODEL_UNAVAILABLE_RATIONALE)
                .with_citations(&outcome.citations);
            decision.merge_citations(&[PolicyCode::Pol1, PolicyCode::Pol2]);
            decision
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    fn outcome(suggestion: Option<DecisionValue>, codes: &[PolicyCode]) -> RuleOutcome {
        RuleOutcome {
            suggestion,
            reasons: vec!["x".to_string()],
            citations: codes.iter().copied().collect(),
        }
    }

    #[test]
    fn test_rejected_suggestion() {
        let decision = synthesize_fallback(&outcome(Some(DecisionValue::Rejected), &[PolicyCode::Pol4]));
        assert_eq!(decision.decision, DecisionValue::Rejected);
        assert_eq!(decision.rationale, RULE_APPLIED_RATIONALE);
        assert_eq!(decision.citacoes, vec!["POL-4"]);
    }

    #[test]
    fn test_incomplete_suggestion() {
        let decision =
            synthesize_fallback(&outcome(Some(DecisionValue::Incomplete), &[PolicyCode::Pol8]));
        assert_eq!(decision.decision, DecisionValue::Incomplete);
        assert_eq!(decision.rationale, MISSING_INFORMATION_RATIONALE);
        assert_eq!(decision.citacoes, vec!["POL-8"]);
    }

    #[test]
    fn test_no_suggestion_approves_with_advisory_citations() {
        let decision = synthesize_fallback(&outcome(None, &[]));
        assert_eq!(decision.decision, DecisionValue::Approved);
        assert!(decision.rationale.contains("LLM indisponível"));
        assert_eq!(decision.citacoes, vec!["POL-1", "POL-2"]);
    }

    #[test]
    fn test_observation_citations_are_merged() {
        let decision = synthesize_fallback(&outcome(None, &[PolicyCode::Pol1, PolicyCode::Pol7]));
        assert_eq!(decision.citacoes, vec!["POL-1", "POL-2", "POL-7"]);
    }

    proptest! {
        #[test]
        fn prop_fallback_is_total(
            suggestion in prop::option::of(prop::sample::select(DecisionValue::ALL.to_vec())),
            codes in prop::collection::btree_set(prop::sample::select(PolicyCode::ALL.to_vec()), 0..8),
        ) {
            let outcome = RuleOutcome { suggestion, reasons: vec![], citations: codes.clone() };
            let decision = synthesize_fallback(&outcome);

            prop_assert!(decision.has_rationale());
            for code in &codes {
                prop_assert!(decision.cites(*code));
            }
            let unique: BTreeSet<&String> = decision.citacoes.iter().collect();
            prop_assert_eq!(unique.len(), decision.citacoes.len());
            match suggestion {
                Some(DecisionValue::Rejected) => prop_assert_eq!(decision.decision, DecisionValue::Rejected),
                Some(DecisionValue::Incomplete) => prop_assert_eq!(decision.decision, DecisionValue::Incomplete),
                _ => prop_assert_eq!(decision.decision, DecisionValue::Approved),
            }
        }
    }
}
