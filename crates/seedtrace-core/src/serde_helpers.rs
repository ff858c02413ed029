//! Deserializers for loosely-typed upstream JSON
//!
//! Event and plant feeds come from mock fixtures and several backends, so field
//! types drift (`"batchId": 42`, `"harvested": "true"`). These helpers read what
//! they can and treat everything else as absent instead of failing the record.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Render a JSON scalar as a display string
///
/// Strings are trimmed; empty strings, `null`, arrays and objects are absent.
#[must_use]
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Read a JSON value as a truthy flag
///
/// Mirrors how dashboard feeds encode flags: booleans, `"true"`/`"yes"`/`"1"`,
/// and non-zero numbers are true.
#[must_use]
pub fn value_is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "true" | "yes" | "1"
        ),
        Value::Null | Value::Array(_) | Value::Object(_) => false,
    }
}

/// `Option<String>` field that accepts any scalar and never fails
///
/// Use with `#[serde(default, deserialize_with = "lenient_string::deserialize")]`.
pub mod lenient_string {
    use super::{scalar_to_string, Deserialize, Deserializer, Value};

    /// Deserialize any JSON value into an optional display string
    ///
    /// # Errors
    /// Only propagates errors from the underlying deserializer itself.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(scalar_to_string(&value))
    }
}

/// `bool` field that accepts flags in any of the shapes [`value_is_truthy`] knows
pub mod lenient_bool {
    use super::{value_is_truthy, Deserialize, Deserializer, Value};

    /// Deserialize any JSON value into a flag
    ///
    /// # Errors
    /// Only propagates errors from the underlying deserializer itself.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(value_is_truthy(&value))
    }
}

/// `f64` field that accepts numbers or numeric strings, defaulting to zero
pub mod lenient_number {
    use super::{Deserialize, Deserializer, Value};

    /// Deserialize any JSON value into a number
    ///
    /// # Errors
    /// Only propagates errors from the underlying deserializer itself.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::Number(n) => n.as_f64().unwrap_or_default(),
            Value::String(s) => s.trim().parse().unwrap_or_default(),
            _ => 0.0,
        })
    }
}
