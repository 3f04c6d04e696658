//! Static acquisition-policy registry.
//!
//! Eight named policies, fixed at compile time. Codes are what the rule
//! engine cites and what the model is asked to cite; the text exists only
//! to give a citation its meaning.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Minimum condemnation value accepted for acquisition (currency-agnostic).
pub const MINIMUM_CONDEMNATION_VALUE: f64 = 1000.0;

/// Error for codes outside the registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown policy code: {0}")]
pub struct UnknownPolicy(pub String);

/// A policy code (`POL-1`..`POL-8`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PolicyCode {
    /// Finality of judgment plus execution phase.
    Pol1,
    /// Condemnation value must be informed.
    Pol2,
    /// Condemnation value below the minimum.
    Pol3,
    /// Labor sphere.
    Pol4,
    /// Death of the plaintiff without estate admission.
    Pol5,
    /// Delegation of powers without reservation.
    Pol6,
    /// Fees must be reported when present.
    Pol7,
    /// Essential document missing.
    Pol8,
}

impl PolicyCode {
    /// All codes in registry order.
    pub const ALL: [PolicyCode; 8] = [
        PolicyCode::Pol1,
        PolicyCode::Pol2,
        PolicyCode::Pol3,
        PolicyCode::Pol4,
        PolicyCode::Pol5,
        PolicyCode::Pol6,
        PolicyCode::Pol7,
        PolicyCode::Pol8,
    ];

    /// Codes that force `rejected` when the rule engine cites them.
    pub const BLOCKING: [PolicyCode; 4] = [
        PolicyCode::Pol3,
        PolicyCode::Pol4,
        PolicyCode::Pol5,
        PolicyCode::Pol6,
    ];

    /// Wire form, e.g. `"POL-4"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyCode::Pol1 => "POL-1",
            PolicyCode::Pol2 => "POL-2",
            PolicyCode::Pol3 => "POL-3",
            PolicyCode::Pol4 => "POL-4",
            PolicyCode::Pol5 => "POL-5",
            PolicyCode::Pol6 => "POL-6",
            PolicyCode::Pol7 => "POL-7",
            PolicyCode::Pol8 => "POL-8",
        }
    }

    /// Fixed human-readable policy text.
    pub fn text(&self) -> &'static str {
        match self {
            PolicyCode::Pol1 => {
                "Só compramos crédito de processos transitados em julgado e em fase de execução."
            }
            PolicyCode::Pol2 => "Exigir valor de condenação informado.",
            PolicyCode::Pol3 => "Valor de condenação < R$ 1.000,00 → não compra.",
            PolicyCode::Pol4 => "Condenações na esfera trabalhista → não compra.",
            PolicyCode::Pol5 => "Óbito do autor sem habilitação no inventário → não compra.",
            PolicyCode::Pol6 => "Substabelecimento sem reserva de poderes → não compra.",
            PolicyCode::Pol7 => {
                "Informar honorários contratuais, periciais e sucumbenciais quando existirem."
            }
            PolicyCode::Pol8 => {
                "Se faltar documento essencial (ex.: trânsito em julgado não comprovado) → incomplete."
            }
        }
    }

    /// Whether a rule citing this code forces `rejected`.
    pub fn is_blocking(&self) -> bool {
        Self::BLOCKING.contains(self)
    }
}

impl fmt::Display for PolicyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyCode {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase();
        PolicyCode::ALL
            .into_iter()
            .find(|code| code.as_str() == normalized)
            .ok_or_else(|| UnknownPolicy(s.to_string()))
    }
}

impl TryFrom<String> for PolicyCode {
    type Error = UnknownPolicy;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PolicyCode> for String {
    fn from(code: PolicyCode) -> Self {
        code.as_str().to_string()
    }
}

/// A registry entry, as exposed to prompts and the CLI.
#[derive(Debug, Clone, Serialize)]
pub struct Policy {
    pub code: PolicyCode,
    pub text: &'static str,
}

/// The full registry in code order.
pub fn registry() -> impl Iterator<Item = Policy> {
    PolicyCode::ALL.into_iter().map(|code| Policy {
        code,
        text: code.text(),
    })
}
