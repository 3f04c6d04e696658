//! Document-scanning rules (POL-6, POL-5).

use crate::decision::DecisionValue;
use crate::policy::PolicyCode;
use crate::process::Process;

use super::patterns::{death_without_estate_admission, mentions_delegation_without_reservation};
use super::{Rule, RuleVerdict};

/// Rejects when any document substitutes powers without reservation.
///
/// Name and text are matched separately per document.
pub struct DelegationWithoutReservationRule;

impl Rule for DelegationWithoutReservationRule {
    fn name(&self) -> &'static str {
        "delegation_without_reservation"
    }

    fn policy_scope(&self) -> &'static [PolicyCode] {
        &[PolicyCode::Pol6]
    }

    fn check(&self, process: &Process) -> RuleVerdict {
        let found = process.documentos.iter().any(|d| {
            mentions_delegation_without_reservation(&d.nome)
                || mentions_delegation_without_reservation(&d.texto)
        });

        if found {
            return RuleVerdict::Conclude {
                decision: DecisionValue::Rejected,
                reason: "Substabelecimento sem reserva de poderes.".to_string(),
                citation: PolicyCode::Pol6,
            };
        }
        RuleVerdict::Pass
    }
}

/// Rejects when a death is reported and no estate admission appears.
///
/// All documents are scanned as one blob: an admission in any document
/// clears a death reported in another.
pub struct DeathWithoutAdmissionRule;

impl Rule for DeathWithoutAdmissionRule {
    fn name(&self) -> &'static str {
        "death_without_admission"
    }

    fn policy_scope(&self) -> &'static [PolicyCode] {
        &[PolicyCode::Pol5]
    }

    fn check(&self, process: &Process) -> RuleVerdict {
        let blob = process
            .documentos
            .iter()
            .map(|d| d.searchable_text())
            .collect::<Vec<_>>()
            .join(" ");

        if death_without_estate_admission(&blob) {
            return RuleVerdict::Conclude {
                decision: DecisionValue::Rejected,
                reason: "Óbito do autor sem habilitação no inventário.".to_string(),
                citation: PolicyCode::Pol5,
            };
        }
        RuleVerdict::Pass
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delegation_split_across_name_and_text_does_not_match() {
        // The phrase must appear within one field.
        let process = Process::new("1").with_document("Substabelecimento", "sem reserva");
        assert_eq!(DelegationWithoutReservationRule.check(&process), RuleVerdict::Pass);
    }

    #[test]
    fn test_delegation_in_text() {
        let process = Process::new("1")
            .with_document("Petição", "Junta substabelecimento, sem reserva de iguais.");
        assert!(matches!(
            DelegationWithoutReservationRule.check(&process),
            RuleVerdict::Conclude { citation: PolicyCode::Pol6, .. }
        ));
    }

    #[test]
    fn test_no_documents_passes_both() {
        let process = Process::new("1");
        assert_eq!(DelegationWithoutReservationRule.check(&process), RuleVerdict::Pass);
        assert_eq!(DeathWithoutAdmissionRule.check(&process), RuleVerdict::Pass);
    }

    #[test]
    fn test_death_in_name_only() {
        let process = Process::new("1").with_document("Certidão de óbito", "");
        assert!(matches!(
            DeathWithoutAdmissionRule.check(&process),
            RuleVerdict::Conclude { citation: PolicyCode::Pol5, .. }
        ));
    }
}
