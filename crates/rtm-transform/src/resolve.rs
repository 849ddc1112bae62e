//! Resolution of template columns to record values.

use rtm_model::{Mapping, Record, is_truthy, lookup_path};
use serde_json::Value;

const LENGTH_SUFFIX: &str = ".length";

/// Resolves template headers against a record and the export root.
///
/// `None` means the value is missing; `Some(Value::Null)` is a present
/// null. Both render as an empty cell.
#[derive(Debug, Clone, Copy)]
pub struct FieldResolver<'a> {
    mapping: &'a Mapping,
    root: &'a Value,
}

impl<'a> FieldResolver<'a> {
    pub fn new(mapping: &'a Mapping, root: &'a Value) -> Self {
        Self { mapping, root }
    }

    /// Value for a header, with the content fallback, `.length` paths and
    /// the priority remap applied.
    pub fn resolve(&self, header: &str, record: &Record) -> Option<Value> {
        let path = self.mapping.path_for(header);
        let mut value = self.lookup(path, record).cloned();

        if header.eq_ignore_ascii_case("CONTENT")
            && value.as_ref().is_none_or(|v| v.as_str() == Some(""))
            && (record.field("content").is_some() || record.field("title").is_some())
        {
            value = Some(content_fallback(record));
        }

        if value.is_none()
            && let Some(base) = path.strip_suffix(LENGTH_SUFFIX)
        {
            let target = lookup_path(record.value(), base)
                .filter(|v| is_truthy(v))
                .or_else(|| lookup_path(self.root, base));
            value = match target {
                Some(Value::Array(items)) => Some(Value::from(items.len())),
                Some(Value::String(text)) if !text.is_empty() => {
                    Some(Value::from(text.chars().count()))
                }
                _ => None,
            };
        }

        if header.eq_ignore_ascii_case("PRIORITY") {
            value = value.map(remap_priority);
        }
        value
    }

    /// Dotted-path lookup on the record, falling back to the export root.
    pub fn lookup<'r>(&self, path: &str, record: &'r Record) -> Option<&'r Value>
    where
        'a: 'r,
    {
        record.get_path(path).or_else(|| lookup_path(self.root, path))
    }
}

/// First non-empty of `content` and `title`, else an empty string.
fn content_fallback(record: &Record) -> Value {
    ["content", "title"]
        .iter()
        .filter_map(|key| record.field(key))
        .find(|v| is_truthy(v))
        .cloned()
        .unwrap_or_else(|| Value::String(String::new()))
}

/// `P1`..`P3` map to 1..3, any other string to 4.
pub fn remap_priority(value: Value) -> Value {
    match value {
        Value::String(text) => Value::from(match text.as_str() {
            "P1" => 1,
            "P2" => 2,
            "P3" => 3,
            _ => 4,
        }),
        other => other,
    }
}
