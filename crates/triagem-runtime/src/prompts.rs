//! Prompt construction for the acquisition model.
//!
//! The prompt has three parts:
//! 1. Policy preamble (role, the eight policies, output contract) - static
//! 2. Preliminary observations from the rule engine - non-binding
//! 3. The process record as pretty JSON

use triagem_core::policy;
use triagem_core::{Process, RuleOutcome};

/// Role and decision framing placed ahead of the policy list.
pub const ROLE_PROMPT: &str = r#"
Você é um analista de aquisição de créditos judiciais.

Sua tarefa é decidir se o crédito do processo abaixo pode ser adquirido,
aplicando EXCLUSIVAMENTE as políticas listadas. Não invente critérios.
"#;

/// Output contract the validator enforces.
pub const OUTPUT_CONTRACT_PROMPT: &str = r#"
## Formato de saída (JSON)
{
  "decision": "approved" | "rejected" | "incomplete",
  "rationale": "justificativa curta em português",
  "citacoes": ["POL-n", ...]
}

- "rejected" quando alguma política de não compra se aplica;
- "incomplete" quando falta documento ou informação essencial;
- "approved" apenas quando nenhuma política impede a compra.

Cite em "citacoes" todas as políticas que fundamentam a decisão.
Responda SOMENTE com o objeto JSON, sem texto antes ou depois.
"#;

/// Used when the rules produced no observation.
pub const NO_OBSERVATIONS: &str = "Sem observações determinísticas relevantes.";

/// Role, policy list and output contract.
pub fn policy_preamble() -> String {
    let policies = policy::registry()
        .map(|p| format!("- {}: {}", p.code, p.text))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "{}\n## Políticas\n{}\n{}",
        ROLE_PROMPT.trim_start(),
        policies,
        OUTPUT_CONTRACT_PROMPT
    )
    .trim()
    .to_string()
}

/// Rule reasons joined with `"; "`, or [`NO_OBSERVATIONS`].
pub fn preliminary_observations(outcome: &RuleOutcome) -> String {
    if outcome.reasons.is_empty() {
        NO_OBSERVATIONS.to_string()
    } else {
        outcome.reasons.join("; ")
    }
}

/// Full user prompt for one process.
pub fn build_prompt(process: &Process, observations: &str) -> String {
    // Serializing plain data with string keys cannot fail.
    let data = serde_json::to_string_pretty(process).unwrap_or_default();
    format!(
        "{}\n\nOBSERVAÇÕES PRELIMINARES (não-vinculantes): {}\n\nDADOS DO PROCESSO:\n{}",
        policy_preamble(),
        observations,
        data
    )
}
