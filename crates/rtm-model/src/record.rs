//! Source records (tasks and notes) backed by raw JSON objects.
//!
//! Exports carry many optional and inconsistently spelled fields, so a
//! record keeps the original JSON and exposes typed accessors for the few
//! fields the conversion relies on.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single task or note from an export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Value);

impl Record {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// The raw JSON value.
    pub fn value(&self) -> &Value {
        &self.0
    }

    /// Top-level field lookup.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Dotted-path lookup; see [`lookup_path`].
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        lookup_path(&self.0, path)
    }

    pub fn id(&self) -> Option<String> {
        self.field("id").and_then(value_key)
    }

    pub fn parent_id(&self) -> Option<String> {
        self.field("parent_id").and_then(value_key)
    }

    pub fn series_id(&self) -> Option<String> {
        self.field("series_id").and_then(value_key)
    }

    pub fn list_id(&self) -> Option<String> {
        self.field("list_id").and_then(value_key)
    }

    /// Tag names, with non-string tags rendered as text.
    pub fn tags(&self) -> Vec<String> {
        match self.field("tags") {
            Some(Value::Array(items)) => items.iter().map(scalar_text).collect(),
            _ => Vec::new(),
        }
    }

    /// True when the field holds `true` or the string `"true"`.
    pub fn flag(&self, key: &str) -> bool {
        match self.field(key) {
            Some(Value::Bool(value)) => *value,
            Some(Value::String(value)) => value == "true",
            _ => false,
        }
    }
}

impl From<Value> for Record {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Resolve a dotted path (`due.date`, `tags.0`) against a JSON value.
///
/// Object segments are keys, array segments are indices. Traversal stops
/// at falsy intermediates (`null`, `false`, `0`, `""`), mirroring how the
/// exports were originally consumed. A present `null` leaf is returned as
/// `Some(Value::Null)`, distinct from a missing field.
pub fn lookup_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return None;
    }
    let mut current = root;
    for segment in path.split('.') {
        if !is_truthy(current) {
            return None;
        }
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// JavaScript-style truthiness of a JSON value.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(value) => *value,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Normalise an identifier value to a string key.
///
/// Strings are used as-is and numbers by their JSON text; empty strings,
/// zero and non-scalar values count as absent.
pub fn value_key(value: &Value) -> Option<String> {
    if !is_truthy(value) {
        return None;
    }
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(_) => Some("true".to_string()),
        _ => None,
    }
}

/// Render a scalar as plain text (strings without quotes).
pub fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_lookup_nested_path() {
        let value = json!({"due": {"date": "2025-01-02"}, "tags": ["a", "b"]});
        assert_eq!(lookup_path(&value, "due.date"), Some(&json!("2025-01-02")));
        assert_eq!(lookup_path(&value, "tags.1"), Some(&json!("b")));
        assert_eq!(lookup_path(&value, "tags.9"), None);
        assert_eq!(lookup_path(&value, ""), None);
    }

    #[test]
    fn test_lookup_keeps_null_leaf() {
        let value = json!({"date_completed": null});
        assert_eq!(lookup_path(&value, "date_completed"), Some(&Value::Null));
        assert_eq!(lookup_path(&value, "date_completed.x"), None);
    }

    #[test]
    fn test_lookup_stops_at_falsy_intermediate() {
        let value = json!({"a": 0, "b": ""});
        assert_eq!(lookup_path(&value, "a.x"), None);
        assert_eq!(lookup_path(&value, "b.x"), None);
    }

    #[test]
    fn test_ids_normalise_numbers_and_blanks() {
        let record = Record::new(json!({"id": 42, "parent_id": "", "series_id": "S1"}));
        assert_eq!(record.id().as_deref(), Some("42"));
        assert_eq!(record.parent_id(), None);
        assert_eq!(record.series_id().as_deref(), Some("S1"));
        assert_eq!(record.list_id(), None);
    }

    #[test]
    fn test_flag_accepts_bool_and_text() {
        let record = Record::new(json!({"a": true, "b": "true", "c": "yes", "d": false}));
        assert!(record.flag("a"));
        assert!(record.flag("b"));
        assert!(!record.flag("c"));
        assert!(!record.flag("d"));
        assert!(!record.flag("missing"));
    }

    #[test]
    fn test_tags_render_scalars() {
        let record = Record::new(json!({"tags": ["work", 7]}));
        assert_eq!(record.tags(), vec!["work".to_string(), "7".to_string()]);
        let untagged = Record::new(json!({"tags": "oops"}));
        assert!(untagged.tags().is_empty());
    }
}
