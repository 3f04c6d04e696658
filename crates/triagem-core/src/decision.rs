//! Decision records returned to callers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::policy::PolicyCode;

/// One of the three acquisition outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionValue {
    Approved,
    Rejected,
    Incomplete,
}

impl DecisionValue {
    pub const ALL: [DecisionValue; 3] = [
        DecisionValue::Approved,
        DecisionValue::Rejected,
        DecisionValue::Incomplete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionValue::Approved => "approved",
            DecisionValue::Rejected => "rejected",
            DecisionValue::Incomplete => "incomplete",
        }
    }
}

impl fmt::Display for DecisionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DecisionValue {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approved" => Ok(DecisionValue::Approved),
            "rejected" => Ok(DecisionValue::Rejected),
            "incomplete" => Ok(DecisionValue::Incomplete),
            other => Err(format!("invalid decision value: '{}'", other)),
        }
    }
}

/// Final decision for a process.
///
/// `citacoes` holds raw codes: the model may cite codes outside the
/// registry and those are passed through, not dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub decision: DecisionValue,
    pub rationale: String,
    pub citacoes: Vec<String>,
}

impl Decision {
    pub fn new(decision: DecisionValue, rationale: impl Into<String>) -> Self {
        Self {
            decision,
            rationale: rationale.into(),
            citacoes: Vec::new(),
        }
    }

    /// Replace citations with the given policy codes, sorted.
    pub fn with_citations<'a>(mut self, codes: impl IntoIterator<Item = &'a PolicyCode>) -> Self {
        self.citacoes = codes.into_iter().map(|c| c.as_str().to_string()).collect();
        self.canonicalize_citations();
        self
    }

    /// Merge codes into the citation list, keeping it sorted and deduplicated.
    pub fn merge_citations<'a>(&mut self, codes: impl IntoIterator<Item = &'a PolicyCode>) {
        self.citacoes
            .extend(codes.into_iter().map(|c| c.as_str().to_string()));
        self.canonicalize_citations();
    }

    /// Sort and deduplicate citations (trimmed, empty entries dropped).
    pub fn canonicalize_citations(&mut self) {
        let set: BTreeSet<String> = self
            .citacoes
            .iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();
        self.citacoes = set.into_iter().collect();
    }

    /// Only an empty string counts as missing; whitespace is kept as given.
    pub fn has_rationale(&self) -> bool {
        !self.rationale.is_empty()
    }

    pub fn cites(&self, code: PolicyCode) -> bool {
        self.citacoes.iter().any(|c| c == code.as_str())
    }
}

/// Decision exactly as the model emitted it, after schema validation.
///
/// `decision` stays a string so the normalizer can still guard against
/// values outside the enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ModelDecision {
    pub decision: String,
    pub rationale: String,
    pub citacoes: Vec<String>,
}
