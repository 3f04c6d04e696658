//! Finality and execution-phase rule (POL-8 / POL-1).

use crate::decision::DecisionValue;
use crate::policy::PolicyCode;
use crate::process::Process;

use super::patterns::{mentions_definitive_enforcement, mentions_finality, mentions_payment_order};
use super::{Rule, RuleVerdict};

/// Requires proof of finality; notes a missing execution phase.
///
/// Missing finality is conclusive (`incomplete`). Missing execution signals
/// are only an observation for the model.
pub struct FinalityRule;

impl FinalityRule {
    fn has_finality(process: &Process) -> bool {
        process
            .documentos
            .iter()
            .any(|d| mentions_finality(&d.nome) || mentions_finality(&d.texto))
    }

    fn in_execution(process: &Process) -> bool {
        let movements = process
            .movimentos
            .iter()
            .map(|m| m.descricao.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        if mentions_definitive_enforcement(&movements) {
            return true;
        }

        let documents = process
            .documentos
            .iter()
            .map(|d| d.searchable_text())
            .collect::<Vec<_>>()
            .join(" ");
        mentions_payment_order(&documents)
    }
}

impl Rule for FinalityRule {
    fn name(&self) -> &'static str {
        "finality"
    }

    fn policy_scope(&self) -> &'static [PolicyCode] {
        &[PolicyCode::Pol8, PolicyCode::Pol1]
    }

    fn check(&self, process: &Process) -> RuleVerdict {
        if !Self::has_finality(process) {
            return RuleVerdict::Conclude {
                decision: DecisionValue::Incomplete,
                reason: "Falta comprovação do trânsito em julgado.".to_string(),
                citation: PolicyCode::Pol8,
            };
        }

        if !Self::in_execution(process) {
            return RuleVerdict::Observe {
                reason: "Trânsito presente, mas sinais de execução não identificados.".to_string(),
                citation: PolicyCode::Pol1,
            };
        }

        RuleVerdict::Pass
    }
}
