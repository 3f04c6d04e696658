//! Sphere rule (POL-4): labor-court cases are never acquired.

use crate::decision::DecisionValue;
use crate::policy::PolicyCode;
use crate::process::Process;

use super::patterns::is_labor_sphere;
use super::{Rule, RuleVerdict};

/// Rejects processes in the labor sphere or from a regional labor court.
pub struct SphereRule;

impl Rule for SphereRule {
    fn name(&self) -> &'static str {
        "sphere"
    }

    fn policy_scope(&self) -> &'static [PolicyCode] {
        &[PolicyCode::Pol4]
    }

    fn check(&self, process: &Process) -> RuleVerdict {
        if is_labor_sphere(process.esfera.as_deref(), process.sigla_tribunal.as_deref()) {
            return RuleVerdict::Conclude {
                decision: DecisionValue::Rejected,
                reason: "Condenação na esfera trabalhista.".to_string(),
                citation: PolicyCode::Pol4,
            };
        }
        RuleVerdict::Pass
    }
}
