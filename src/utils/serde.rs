/*!
 * Serde utilities for leniently typed descriptor fields.
 *
 * Package descriptors are authored by hand and by a range of packaging
 * tools, so numeric fields show up quoted as often as not.
 */

use serde::{Deserialize, Deserializer};

/// Deserialize an optional numeric value that may be represented as a number or string.
///
/// Accepts:
/// - Missing/null (returns None)
/// - Integer numbers
/// - Floating-point numbers (truncated)
/// - String representations of numbers
///
/// ```yaml
/// ttl: 86400      # Direct integer
/// ttl: "86400"    # String that parses to integer
/// ttl: null       # Returns None
/// ```
///
/// # Usage with serde
///
/// ```rust
/// use serde::Deserialize;
/// use appo_core::utils::serde::deserialize_optional_numeric;
///
/// #[derive(Deserialize)]
/// struct DnsRule {
///     #[serde(default, deserialize_with = "deserialize_optional_numeric")]
///     ttl: Option<i64>,
/// }
/// ```
pub fn deserialize_optional_numeric<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let value: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                Ok(Some(i))
            } else if let Some(f) = n.as_f64() {
                Ok(Some(f as i64))
            } else {
                Err(D::Error::custom(format!("Invalid numeric value: {n}")))
            }
        }
        Some(serde_json::Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse::<i64>()
                .map(Some)
                .or_else(|_| trimmed.parse::<f64>().map(|f| Some(f as i64)))
                .map_err(|_| D::Error::custom(format!("Cannot parse '{s}' as numeric")))
        }
        Some(other) => Err(D::Error::custom(format!(
            "Expected numeric value, found: {other}"
        ))),
    }
}

/// Deserialize an optional scalar as text.
///
/// Descriptor authors rarely quote identifiers, so `packageId: 20210101` or
/// `version: 1.0` arrive as numbers. Strings, numbers and booleans are
/// rendered as text; null returns None. Sequences and mappings are rejected.
pub fn deserialize_optional_string<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let value: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(serde_json::Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "Expected scalar value, found: {other}"
        ))),
    }
}

/// Like [`deserialize_optional_string`], with null read as an empty string
pub fn deserialize_lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_optional_string(deserializer).map(Option::unwrap_or_default)
}

/// Deserialize an optional boolean that may be written as `"true"`/`"false"`
pub fn deserialize_optional_bool<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let value: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::Bool(b)) => Ok(Some(b)),
        Some(serde_json::Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "" => Ok(None),
            "true" => Ok(Some(true)),
            "false" => Ok(Some(false)),
            _ => Err(D::Error::custom(format!("Cannot parse '{s}' as boolean"))),
        },
        Some(other) => Err(D::Error::custom(format!(
            "Expected boolean value, found: {other}"
        ))),
    }
}
