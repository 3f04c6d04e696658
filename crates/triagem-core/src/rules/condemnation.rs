//! Condemnation value rule (POL-2 / POL-3).

use crate::decision::DecisionValue;
use crate::policy::{PolicyCode, MINIMUM_CONDEMNATION_VALUE};
use crate::process::Process;

use super::{Rule, RuleVerdict};

/// Requires an informed value at or above the acquisition minimum.
pub struct CondemnationValueRule;

impl Rule for CondemnationValueRule {
    fn name(&self) -> &'static str {
        "condemnation_value"
    }

    fn policy_scope(&self) -> &'static [PolicyCode] {
        &[PolicyCode::Pol2, PolicyCode::Pol3]
    }

    fn check(&self, process: &Process) -> RuleVerdict {
        match process.valor_condenacao {
            None => RuleVerdict::Conclude {
                decision: DecisionValue::Incomplete,
                reason: "Valor de condenação ausente.".to_string(),
                citation: PolicyCode::Pol2,
            },
            Some(value) if value < MINIMUM_CONDEMNATION_VALUE => RuleVerdict::Conclude {
                decision: DecisionValue::Rejected,
                reason: format!(
                    "Valor de condenação inferior a R$1.000 (R${:.2}).",
                    value
                ),
                citation: PolicyCode::Pol3,
            },
            Some(_) => RuleVerdict::Pass,
        }
    }
}
