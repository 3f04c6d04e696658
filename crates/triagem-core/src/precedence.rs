//! Precedence enforcement: deterministic outcomes over model answers.
//!
//! Applied after the model responds. Strict, non-configurable order:
//! 1. If the rules cited POL-8 → `incomplete`
//! 2. Else if the rules cited any of POL-3/4/5/6 → `rejected`
//! 3. Else → the model's decision stands
//!
//! Advisory codes (POL-1, POL-2, POL-7) never change a decision here.

use std::collections::BTreeSet;

use crate::decision::{Decision, DecisionValue};
use crate::policy::PolicyCode;

/// Default rationale when POL-8 forces `incomplete`.
pub const MISSING_DOCUMENT_RATIONALE: &str = "Falta documento essencial (ex.: trânsito em julgado).";

/// Default rationale when a blocking policy forces `rejected`.
pub const RULE_REJECTION_RATIONALE: &str = "Reprovação por regra determinística.";

/// Override `decision` wherever a rule citation mandates an outcome.
pub fn enforce(mut decision: Decision, rule_citations: &BTreeSet<PolicyCode>) -> Decision {
    if rule_citations.contains(&PolicyCode::Pol8) {
        if decision.decision != DecisionValue::Incomplete {
            tracing::info!(
                model_decision = %decision.decision,
                "POL-8 cited by rules, forcing incomplete"
            );
        }
        decision.decision = DecisionValue::Incomplete;
        decision.merge_citations(&[PolicyCode::Pol8]);
        if !decision.has_rationale() {
            decision.rationale = MISSING_DOCUMENT_RATIONALE.to_string();
        }
        return decision;
    }

    let blocking: Vec<PolicyCode> = rule_citations
        .iter()
        .copied()
        .filter(PolicyCode::is_blocking)
        .collect();

    if !blocking.is_empty() {
        if decision.decision != DecisionValue::Rejected {
            tracing::info!(
                model_decision = %decision.decision,
                blocking = ?blocking,
                "Blocking policy cited by rules, forcing rejected"
            );
        }
        decision.decision = DecisionValue::Rejected;
        decision.merge_citations(&blocking);
        if !decision.has_rationale() {
            decision.rationale = RULE_REJECTION_RATIONALE.to_string();
        }
        return decision;
    }

    decision
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn decision(value: DecisionValue, rationale: &str, citacoes: &[&str]) -> Decision {
        Decision {
            decision: value,
            rationale: rationale.to_string(),
            citacoes: citacoes.iter().map(|c| c.to_string()).collect(),
        }
    }

    fn codes(list: &[PolicyCode]) -> BTreeSet<PolicyCode> {
        list.iter().copied().collect()
    }

    #[test]
    fn test_pol8_forces_incomplete() {
        let out = enforce(
            decision(DecisionValue::Approved, "", &["POL-1"]),
            &codes(&[PolicyCode::Pol8]),
        );
        assert_eq!(out.decision, DecisionValue::Incomplete);
        assert_eq!(out.citacoes, vec!["POL-1", "POL-8"]);
        assert_eq!(out.rationale, MISSING_DOCUMENT_RATIONALE);
    }

    #[test]
    fn test_pol8_wins_over_blocking_set() {
        let out = enforce(
            decision(DecisionValue::Approved, "ok", &[]),
            &codes(&[PolicyCode::Pol4, PolicyCode::Pol8]),
        );
        assert_eq!(out.decision, DecisionValue::Incomplete);
        assert_eq!(out.citacoes, vec!["POL-8"]);
        assert_eq!(out.rationale, "ok");
    }

    #[test]
    fn test_blocking_forces_rejected_and_merges() {
        let out = enforce(
            decision(DecisionValue::Approved, "", &["POL-7", "POL-6"]),
            &codes(&[PolicyCode::Pol6, PolicyCode::Pol3, PolicyCode::Pol1]),
        );
        assert_eq!(out.decision, DecisionValue::Rejected);
        assert_eq!(out.citacoes, vec!["POL-3", "POL-6", "POL-7"]);
        assert_eq!(out.rationale, RULE_REJECTION_RATIONALE);
    }

    #[test]
    fn test_model_rationale_is_kept() {
        let out = enforce(
            decision(DecisionValue::Approved, "Modelo aprovou.", &[]),
            &codes(&[PolicyCode::Pol5]),
        );
        assert_eq!(out.decision, DecisionValue::Rejected);
        assert_eq!(out.rationale, "Modelo aprovou.");
    }

    #[test]
    fn test_only_empty_rationale_gets_default() {
        let out = enforce(
            decision(DecisionValue::Approved, " ", &[]),
            &codes(&[PolicyCode::Pol5]),
        );
        assert_eq!(out.rationale, " ");

        let out = enforce(
            decision(DecisionValue::Approved, "", &[]),
            &codes(&[PolicyCode::Pol8]),
        );
        assert_eq!(out.rationale, MISSING_DOCUMENT_RATIONALE);
    }

    #[test]
    fn test_advisory_codes_leave_decision_untouched() {
        let original = decision(DecisionValue::Approved, "ok", &["POL-7", "POL-1"]);
        let out = enforce(
            original.clone(),
            &codes(&[PolicyCode::Pol1, PolicyCode::Pol2, PolicyCode::Pol7]),
        );
        assert_eq!(out, original);
    }

    fn any_decision() -> impl Strategy<Value = Decision> {
        (
            prop::sample::select(DecisionValue::ALL.to_vec()),
            prop_oneof![Just(String::new()), "[a-z ]{1,20}"],
            prop::collection::vec("POL-[1-9]", 0..4),
        )
            .prop_map(|(decision, rationale, citacoes)| Decision {
                decision,
                rationale,
                citacoes,
            })
    }

    fn any_citations() -> impl Strategy<Value = BTreeSet<PolicyCode>> {
        prop::collection::btree_set(prop::sample::select(PolicyCode::ALL.to_vec()), 0..8)
    }

    proptest! {
        #[test]
        fn prop_pol8_always_incomplete(d in any_decision(), mut c in any_citations()) {
            c.insert(PolicyCode::Pol8);
            let out = enforce(d, &c);
            prop_assert_eq!(out.decision, DecisionValue::Incomplete);
            prop_assert!(out.cites(PolicyCode::Pol8));
            prop_assert!(out.has_rationale());
        }

        #[test]
        fn prop_blocking_always_rejected(
            d in any_decision(),
            mut c in any_citations(),
            blocker in prop::sample::select(PolicyCode::BLOCKING.to_vec()),
        ) {
            c.remove(&PolicyCode::Pol8);
            c.insert(blocker);
            let out = enforce(d, &c);
            prop_assert_eq!(out.decision, DecisionValue::Rejected);
            prop_assert!(out.cites(blocker));
            prop_assert!(out.has_rationale());
        }

        #[test]
        fn prop_advisory_is_identity(
            d in any_decision(),
            c in prop::collection::btree_set(
                prop::sample::select(vec![PolicyCode::Pol1, PolicyCode::Pol2, PolicyCode::Pol7]),
                0..3,
            ),
        ) {
            let out = enforce(d.clone(), &c);
            prop_assert_eq!(out, d);
        }

        #[test]
        fn prop_forced_citations_are_sorted_and_unique(d in any_decision(), c in any_citations()) {
            let forced = c.contains(&PolicyCode::Pol8) || c.iter().any(|p| p.is_blocking());
            let out = enforce(d, &c);
            if forced {
                let mut expected = out.citacoes.clone();
                expected.sort();
                expected.dedup();
                prop_assert_eq!(out.citacoes, expected);
            }
        }
    }
}
