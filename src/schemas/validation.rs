use crate::error::TravelError;
use crate::schemas::SchemaHandle;
use jsonschema::{Draft, JSONSchema};
use serde_json::Value;

const MAX_SCHEMA_ERRORS: usize = 3;

/// Validate a parsed LLM response against the schema registered for `T`.
///
/// Estimator agents call this after [`crate::llm::LlmAdvisor::extract_json`]
/// succeeds, before trusting the payload. A validation failure is never
/// fatal: the caller falls back to its deterministic estimate and records a
/// [`TravelError::ValidationFailure`] warning (§7).
pub fn validate_structured_payload(
    schema: &SchemaHandle,
    payload: &Value,
) -> Result<(), TravelError> {
    let validator = JSONSchema::options()
        .with_draft(Draft::Draft7)
        .compile(schema.schema_json())
        .map_err(|err| {
            TravelError::ValidationFailure(format!(
                "failed to prepare `{}` schema for validation: {}",
                schema.schema_name(),
                err
            ))
        })?;

    if let Err(errors) = validator.validate(payload) {
        let mut details = Vec::new();
        let mut truncated = false;

        for (idx, error) in errors.enumerate() {
            if idx < MAX_SCHEMA_ERRORS {
                let mut path = error.instance_path.to_string();
                if path.is_empty() {
                    path = "<root>".to_string();
                }
                details.push(format!("{}: {}", path, error));
            } else {
                truncated = true;
                break;
            }
        }

        let mut detail_str = if details.is_empty() {
            "structured payload failed schema validation".to_string()
        } else {
            details.join("; ")
        };

        if truncated {
            detail_str.push_str("; additional errors truncated");
        }

        return Err(TravelError::ValidationFailure(format!(
            "payload does not match `{}` schema: {}",
            schema.schema_name(),
            detail_str
        )));
    }

    Ok(())
}
