//! Import template header reading.

use std::path::Path;

use csv::ReaderBuilder;
use tracing::debug;

use crate::error::{IngestError, Result};

/// Column headers from the first record of a CSV template.
///
/// Headers are trimmed and a leading byte-order mark is removed. Rows after
/// the first are ignored.
pub fn read_template_headers(path: &Path) -> Result<Vec<String>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| IngestError::Csv {
            path: path.to_path_buf(),
            source: e,
        })?;

    let first = reader.records().next().transpose().map_err(|e| IngestError::Csv {
        path: path.to_path_buf(),
        source: e,
    })?;
    let headers: Vec<String> = first
        .map(|record| {
            record
                .iter()
                .map(|field| field.trim_matches('\u{feff}').trim().to_string())
                .collect()
        })
        .unwrap_or_default();

    if headers.iter().all(String::is_empty) {
        return Err(IngestError::EmptyTemplate {
            path: path.to_path_buf(),
        });
    }
    debug!(path = %path.display(), columns = headers.len(), "read template headers");
    Ok(headers)
}
