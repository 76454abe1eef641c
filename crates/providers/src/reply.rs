//! Turning a model's chat reply into a typed action.
//!
//! Models are told to answer with raw JSON but regularly wrap it in a
//! markdown fence anyway, so a single surrounding ```` ``` ```` / ```` ```json ````
//! fence is stripped first. What remains must be JSON (else
//! [`InferenceError::MalformedReply`]) shaped like an action (else
//! [`InferenceError::Schema`]).

use intentgate_core::{Action, InferenceError, RawAction, SchemaViolation};

/// Remove one surrounding markdown code fence, if present.
pub fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = match rest.find("```") {
        Some(end) => &rest[..end],
        None => rest,
    };
    inner.strip_prefix("json").unwrap_or(inner).trim()
}

/// Parse and validate reply content.
pub fn parse_reply(content: &str) -> Result<Action, InferenceError> {
    let body = strip_code_fence(content);
    if body.is_empty() {
        return Err(InferenceError::MalformedReply("empty reply content".into()));
    }

    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| InferenceError::MalformedReply(format!("reply is not JSON: {e}")))?;

    let raw: RawAction = serde_json::from_value(value)
        .map_err(|e| SchemaViolation::NotAnAction(e.to_string()))?;

    Ok(Action::from_raw(raw)?)
}
