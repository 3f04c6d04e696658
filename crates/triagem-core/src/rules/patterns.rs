//! Text heuristics used by the rule engine.
//!
//! Every predicate here is a pure function over a text blob so it can be
//! tested without building a process. Matching is case-insensitive,
//! Unicode-aware, and `.` spans line breaks (`(?is)`), since court documents
//! wrap phrases across lines freely.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // =========================================================================
    // FINALITY / EXECUTION
    // =========================================================================

    /// "Trânsito em julgado": the judgment can no longer be appealed.
    pub static ref FINALITY_PATTERN: Regex = Regex::new(
        r"(?is)tr[aâ]nsito.*julgado"
    ).unwrap();

    /// Definitive enforcement of the judgment, as recorded in movements.
    pub static ref DEFINITIVE_ENFORCEMENT_PATTERN: Regex = Regex::new(
        r"(?is)cumprimento.*definitivo"
    ).unwrap();

    /// Small-value payment order (RPV).
    pub static ref SMALL_VALUE_ORDER_PATTERN: Regex = Regex::new(
        r"(?is)\bRPV\b|Requisi[cç][aã]o\s+de\s+Pequeno\s+Valor"
    ).unwrap();

    /// Court-issued payment order.
    pub static ref PAYMENT_ORDER_PATTERN: Regex = Regex::new(
        r"(?is)Precat[óo]rio"
    ).unwrap();

    // =========================================================================
    // DISQUALIFYING SIGNALS
    // =========================================================================

    /// Power-of-attorney substitution without reservation of powers.
    pub static ref DELEGATION_WITHOUT_RESERVATION_PATTERN: Regex = Regex::new(
        r"(?is)substabelecimento.*sem\s+reserva"
    ).unwrap();

    /// Death of a party.
    pub static ref DEATH_PATTERN: Regex = Regex::new(
        r"(?i)\b[óo]bito\b"
    ).unwrap();

    /// Estate admission of heirs.
    pub static ref ESTATE_ADMISSION_PATTERN: Regex = Regex::new(
        r"(?i)habilita[cç][aã]o"
    ).unwrap();
}

/// Sphere value that marks labor-court cases.
pub const LABOR_SPHERE: &str = "trabalhista";

/// Court acronym prefix of the regional labor courts.
pub const LABOR_COURT_PREFIX: &str = "TRT";

/// Check if text mentions a final, non-appealable judgment.
pub fn mentions_finality(text: &str) -> bool {
    FINALITY_PATTERN.is_match(text)
}

/// Check if a movement description records definitive enforcement.
pub fn mentions_definitive_enforcement(text: &str) -> bool {
    DEFINITIVE_ENFORCEMENT_PATTERN.is_match(text)
}

/// Check if document text carries a payment-order signal (RPV or precatório).
pub fn mentions_payment_order(text: &str) -> bool {
    SMALL_VALUE_ORDER_PATTERN.is_match(text) || PAYMENT_ORDER_PATTERN.is_match(text)
}

/// Check if text carries a delegation of powers without reservation.
pub fn mentions_delegation_without_reservation(text: &str) -> bool {
    DELEGATION_WITHOUT_RESERVATION_PATTERN.is_match(text)
}

/// Check if text reports a death with no estate admission anywhere in it.
pub fn death_without_estate_admission(text: &str) -> bool {
    DEATH_PATTERN.is_match(text) && !ESTATE_ADMISSION_PATTERN.is_match(text)
}

/// Check if the sphere or court acronym places the case in labor courts.
pub fn is_labor_sphere(esfera: Option<&str>, sigla_tribunal: Option<&str>) -> bool {
    let sphere_is_labor = esfera
        .map(|e| e.trim().to_lowercase() == LABOR_SPHERE)
        .unwrap_or(false);
    let court_is_labor = sigla_tribunal
        .map(|s| s.to_uppercase().starts_with(LABOR_COURT_PREFIX))
        .unwrap_or(false);
    sphere_is_labor || court_is_labor
}
