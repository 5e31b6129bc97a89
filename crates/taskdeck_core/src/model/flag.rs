//! Boolean coercion for loosely-typed boundary values.
//!
//! Transports such as query strings or hand-written JSON may carry flags as
//! strings or numbers. Every such value is normalized here exactly once;
//! downstream code only ever sees `bool`.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Maps an arbitrary JSON value onto a boolean flag.
///
/// | input                                   | result |
/// |-----------------------------------------|--------|
/// | `true` / `false`                        | itself |
/// | string `true`, `1`, `yes`, `on` (any case, trimmed) | `true` |
/// | any other string                        | `false` |
/// | number equal to `1`                     | `true` |
/// | any other number                        | `false` |
/// | `null`, array, object                   | `false` |
pub fn coerce_flag(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::String(text) => coerce_flag_str(text),
        Value::Number(number) => number.as_f64() == Some(1.0),
        Value::Null | Value::Array(_) | Value::Object(_) => false,
    }
}

/// String arm of [`coerce_flag`], usable for raw query parameters.
pub fn coerce_flag_str(text: &str) -> bool {
    matches!(
        text.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

/// Absent query parameters are `false`.
pub fn coerce_query_flag(raw: Option<&str>) -> bool {
    raw.is_some_and(coerce_flag_str)
}

/// Serde adapter for optional flags in request bodies.
///
/// A missing field stays `None`; any present value (including `null`) is
/// coerced through [`coerce_flag`].
pub fn deserialize_loose_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(Some(coerce_flag(&value)))
}
