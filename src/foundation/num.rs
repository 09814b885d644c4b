//! Tolerant numeric coercion for hand-written layout JSON.
//!
//! Layout files come from many producers; numbers show up as JSON numbers, numeric strings, or
//! garbage. These helpers never fail: unusable values become "unset" (or NaN for coordinates, so
//! the bounds pass can tell "absent" from "broken").

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Interpret a JSON value as a finite `f64`.
///
/// Accepts numbers and trimmed numeric strings. Everything else, including non-finite parses
/// such as `"inf"`, yields `None`.
pub fn coerce_f64(v: &Value) -> Option<f64> {
    let n = match v {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Like [`coerce_f64`] but falls back to `default` when the value is unusable.
pub fn f64_or(v: Option<&Value>, default: f64) -> f64 {
    v.and_then(coerce_f64).unwrap_or(default)
}

/// Round a pixel coordinate to the nearest integer, halves away from zero.
pub fn round_px(v: f64) -> i64 {
    v.round() as i64
}

/// Serde adapter: optional number that tolerates strings and junk.
pub(crate) fn de_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(deserializer)?;
    Ok(coerce_f64(&v))
}

/// Serde adapter for coordinates: `null` reads as 0, junk reads as NaN.
///
/// Absent fields never reach this function; they take the field default (0).
pub(crate) fn de_coord<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(deserializer)?;
    if v.is_null() {
        return Ok(0.0);
    }
    Ok(coerce_f64(&v).unwrap_or(f64::NAN))
}

/// Serde adapter: optional string that also accepts numbers and booleans.
pub(crate) fn de_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(deserializer)?;
    Ok(match v {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/num.rs"]
mod tests;
