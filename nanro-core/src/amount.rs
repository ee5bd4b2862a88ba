//! Lenient monetary amounts.
//!
//! The banking API is inconsistent about money: the same field can arrive as
//! `1500`, `1500.5`, `"1500.50"` or `"1,500.50"` depending on the endpoint.
//! Everything that enters the crate goes through [`coerce_amount`] so the
//! rest of the code only ever sees `f64`.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Convert a raw JSON value into an amount.
///
/// Numbers pass through. Strings are trimmed, stripped of thousands
/// separators and a leading `+`, then parsed. Anything else (null, bools,
/// arrays, objects, garbage, NaN/inf) becomes `0.0`.
pub fn coerce_amount(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_amount_str(s),
        _ => None,
    };
    parsed.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Parse a numeric string, returning `None` when it isn't one.
pub fn parse_amount_str(raw: &str) -> Option<f64> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    let cleaned = cleaned.strip_prefix('+').unwrap_or(&cleaned);
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok()
}

/// Serde helper: `#[serde(default, deserialize_with = "lenient_f64")]`.
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_amount(&value))
}

/// Like [`lenient_f64`] but keeps absence distinct from zero.
pub fn lenient_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => None,
        other => Some(coerce_amount(&other)),
    })
}
