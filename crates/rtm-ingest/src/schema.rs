//! Type skeleton of an export, for inspecting unfamiliar files.

use serde_json::{Map, Value, json};

/// Describe the shape of a JSON value.
///
/// Objects become `{"type": "object", "properties": {...}}`, arrays
/// `{"type": "array", "items": ...}` described from their first element
/// (`"unknown"` when empty), and scalars `{"type": <name>}`.
pub fn extract_schema(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let properties: Map<String, Value> = map
                .iter()
                .map(|(key, child)| (key.clone(), extract_schema(child)))
                .collect();
            json!({"type": "object", "properties": properties})
        }
        Value::Array(items) => {
            let element = items.first().map_or_else(|| json!("unknown"), extract_schema);
            json!({"type": "array", "items": element})
        }
        Value::Null => json!({"type": "null"}),
        Value::Bool(_) => json!({"type": "boolean"}),
        Value::Number(_) => json!({"type": "number"}),
        Value::String(_) => json!({"type": "string"}),
    }
}
