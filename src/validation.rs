//! Input validation for workflow variables
//!
//! Identifiers received from the scheduler become path segments when the
//! package archive location is built, so they are restricted to a safe
//! character set. Serialized structures written back into the context are
//! bounded in size.

use crate::constants::package::MAX_DESCRIPTOR_BYTES_CEILING;
use crate::error::{AppoError, Result};
use serde_json::Value;

/// Maximum identifier length accepted as a path segment
const MAX_IDENTIFIER_LENGTH: usize = 64;

/// Maximum size of a serialized value written into the context
///
/// Twice the descriptor ceiling, so rules projected from any accepted
/// descriptor still fit once re-encoded as JSON.
const MAX_CONTEXT_VALUE_BYTES: usize = 2 * MAX_DESCRIPTOR_BYTES_CEILING as usize;

/// Maximum nesting depth for serialized context values
const MAX_JSON_DEPTH: usize = 16;

/// Validates an identifier that will be used as a filesystem path segment
///
/// Accepts 1 to 64 characters from `[A-Za-z0-9_-]`.
pub fn validate_identifier(name: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(AppoError::InvalidInput(format!("{name} must not be empty")));
    }

    if value.len() > MAX_IDENTIFIER_LENGTH {
        return Err(AppoError::InvalidInput(format!(
            "{name} too long: {} chars (max: {MAX_IDENTIFIER_LENGTH})",
            value.len()
        )));
    }

    if let Some(bad) = value
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
    {
        return Err(AppoError::InvalidInput(format!(
            "{name} contains invalid character '{bad}'"
        )));
    }

    Ok(())
}

/// Validates a structured value before it is stored in the context
pub fn validate_context_value(name: &str, value: &Value) -> Result<()> {
    let serialized = serde_json::to_string(value)?;

    if serialized.len() > MAX_CONTEXT_VALUE_BYTES {
        return Err(AppoError::InvalidInput(format!(
            "{name} too large: {} bytes (max: {MAX_CONTEXT_VALUE_BYTES})",
            serialized.len()
        )));
    }

    validate_json_depth(name, value, 0)
}

fn validate_json_depth(name: &str, value: &Value, current_depth: usize) -> Result<()> {
    if current_depth > MAX_JSON_DEPTH {
        return Err(AppoError::InvalidInput(format!(
            "{name} nesting too deep: {current_depth} (max: {MAX_JSON_DEPTH})"
        )));
    }

    match value {
        Value::Object(map) => map
            .values()
            .try_for_each(|v| validate_json_depth(name, v, current_depth + 1)),
        Value::Array(arr) => arr
            .iter()
            .try_for_each(|v| validate_json_depth(name, v, current_depth + 1)),
        _ => Ok(()),
    }
}
