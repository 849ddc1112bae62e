//! Header to source-path mapping files.

use std::path::Path;

use rtm_model::Mapping;
use serde_json::Value;

use crate::error::{IngestError, Result};

/// Load a JSON object mapping template headers to dotted source paths.
pub fn load_mapping(path: &Path) -> Result<Mapping> {
    let text = std::fs::read_to_string(path).map_err(|e| IngestError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let value: Value = serde_json::from_str(&text).map_err(|e| IngestError::Json {
        path: path.to_path_buf(),
        source: e,
    })?;
    let Value::Object(entries) = value else {
        return Err(IngestError::MappingFormat {
            path: path.to_path_buf(),
            reason: "expected a JSON object".to_string(),
        });
    };

    let mut mapping = Mapping::new();
    for (header, target) in entries {
        let Value::String(source_path) = target else {
            return Err(IngestError::MappingFormat {
                path: path.to_path_buf(),
                reason: format!("value for '{header}' is not a string"),
            });
        };
        mapping.insert(header, source_path);
    }
    Ok(mapping)
}
