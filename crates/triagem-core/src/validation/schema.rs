//! JSON Schema validation for model decisions.
//!
//! The schema is embedded at compile time and compiled once.

use std::sync::OnceLock;

/// Embedded decision schema.
const DECISION_SCHEMA_JSON: &str = include_str!("../../schema/decision.schema.json");

/// Compiled JSON Schema validator (initialized once, reused).
static COMPILED_SCHEMA: OnceLock<Result<jsonschema::Validator, String>> = OnceLock::new();

/// Get or initialize the compiled schema validator.
fn get_validator() -> Result<&'static jsonschema::Validator, String> {
    let result = COMPILED_SCHEMA.get_or_init(|| {
        let schema_value: serde_json::Value = match serde_json::from_str(DECISION_SCHEMA_JSON) {
            Ok(v) => v,
            Err(e) => return Err(format!("Invalid schema JSON: {}", e)),
        };

        match jsonschema::options().build(&schema_value) {
            Ok(v) => Ok(v),
            Err(e) => Err(format!("Failed to compile schema: {}", e)),
        }
    });

    result.as_ref().map_err(|e| e.clone())
}

/// Validate a JSON value against the decision schema.
///
/// Returns every violation, formatted as `"<message> at <path>"`.
pub fn validate_decision_schema(value: &serde_json::Value) -> Result<(), Vec<String>> {
    let validator = get_validator().map_err(|e| vec![e])?;

    let errors: Vec<String> = validator
        .iter_errors(value)
        .map(|e| format!("{} at {}", e, e.instance_path))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
