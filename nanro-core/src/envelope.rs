//! The `{success, data, message, errors}` wrapper every endpoint returns.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Option<Value>,
}

impl<T> Envelope<T> {
    /// First field-level message from the error map, in the order the server sent it.
    ///
    /// Accepts `{"field": "msg"}` and `{"field": ["msg", ...]}`.
    pub fn first_field_error(&self) -> Option<String> {
        self.errors.as_ref().and_then(first_field_error)
    }
}

pub fn first_field_error(errors: &Value) -> Option<String> {
    let map = errors.as_object()?;
    map.values().find_map(|v| match v {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Array(items) => items
            .iter()
            .find_map(|i| i.as_str().filter(|s| !s.is_empty()).map(str::to_string)),
        _ => None,
    })
}
