//! JSON document helpers
//!
//! The document store may hand back numeric ids (`"id": 3`) for rows seeded by
//! hand, while everything this service writes uses string ids. These helpers
//! normalise both forms.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Int(i64),
    Float(f64),
}

/// Deserialize an optional id that may be encoded as a JSON string or number.
pub fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<StringOrNumber>::deserialize(deserializer)?;
    Ok(value.map(|v| match v {
        StringOrNumber::String(s) => s,
        StringOrNumber::Int(n) => n.to_string(),
        StringOrNumber::Float(f) => f.to_string(),
    }))
}

/// Render a scalar JSON value the way it appears in a query string.
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Id of a stored document, if it has one.
pub fn document_id(doc: &Value) -> Option<String> {
    doc.get("id").and_then(scalar_to_string)
}

/// Remove the `password` field from a user document (or a list of them).
pub fn redact_password(mut doc: Value) -> Value {
    match &mut doc {
        Value::Object(map) => {
            map.remove("password");
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                if let Value::Object(map) = item {
                    map.remove("password");
                }
            }
        }
        _ => {}
    }
    doc
}
