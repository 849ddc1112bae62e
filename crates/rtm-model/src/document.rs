//! The loaded export document and its list index.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::record::{Record, scalar_text, value_key};

/// A list (project) declared in the export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListInfo {
    pub id: String,
    pub name: Option<String>,
}

/// An immutable snapshot of an export file.
#[derive(Debug, Clone)]
pub struct ExportDocument {
    root: Value,
}

impl ExportDocument {
    pub fn new(root: Value) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Lists with a usable id, in document order.
    pub fn lists(&self) -> Vec<ListInfo> {
        let Some(Value::Array(items)) = self.root.get("lists") else {
            return Vec::new();
        };
        items
            .iter()
            .filter_map(|item| {
                let id = item.get("id").and_then(value_key)?;
                let name = item.get("name").filter(|v| !v.is_null()).map(scalar_text);
                Some(ListInfo { id, name })
            })
            .collect()
    }

    /// Note objects from the top-level `notes` array.
    pub fn notes(&self) -> Vec<Record> {
        match self.root.get("notes") {
            Some(Value::Array(items)) => items
                .iter()
                .filter(|item| item.is_object())
                .cloned()
                .map(Record::new)
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Lookup from list id to list name.
#[derive(Debug, Clone, Default)]
pub struct ListIndex {
    names: HashMap<String, Option<String>>,
}

impl ListIndex {
    pub fn from_document(document: &ExportDocument) -> Self {
        let mut names = HashMap::new();
        for list in document.lists() {
            names.insert(list.id, list.name);
        }
        Self { names }
    }

    /// Name of the list a record belongs to, if both are known.
    pub fn name_for(&self, record: &Record) -> Option<&str> {
        let list_id = record.list_id()?;
        self.names.get(&list_id)?.as_deref()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
