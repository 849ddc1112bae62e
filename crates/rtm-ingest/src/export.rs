//! Export document loading and row selection.

use std::path::Path;

use rtm_model::{ExportDocument, Record, lookup_path};
use serde_json::Value;
use tracing::debug;

use crate::error::{IngestError, Result};

/// Read and parse an export file.
pub fn load_export(path: &Path) -> Result<ExportDocument> {
    let text = std::fs::read_to_string(path).map_err(|e| IngestError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let root: Value = serde_json::from_str(&text).map_err(|e| IngestError::Json {
        path: path.to_path_buf(),
        source: e,
    })?;
    debug!(path = %path.display(), bytes = text.len(), "loaded export");
    Ok(ExportDocument::new(root))
}

/// Candidate rows of a document.
///
/// With a rows path the value at that dotted path must be an array.
/// Without one, a top-level array is used as-is and any other document
/// becomes a single row.
pub fn select_rows(document: &ExportDocument, rows_path: Option<&str>) -> Result<Vec<Record>> {
    let root = document.root();
    let items = match rows_path.map(str::trim).filter(|p| !p.is_empty()) {
        Some(path) => match lookup_path(root, path) {
            Some(Value::Array(items)) => items.clone(),
            _ => {
                return Err(IngestError::RowsPathNotArray {
                    rows_path: path.to_string(),
                });
            }
        },
        None => match root {
            Value::Array(items) => items.clone(),
            other => vec![other.clone()],
        },
    };
    Ok(items.into_iter().map(Record::new).collect())
}
