//! Default input discovery in the data directory.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::debug;

use crate::error::{IngestError, Result};

/// File name prefix of RTM export files.
pub const EXPORT_PREFIX: &str = "rememberthemilk_export";

/// The most recently modified export file in `dir`, if any.
pub fn discover_latest_export(dir: &Path) -> Result<Option<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut newest: Option<(SystemTime, PathBuf)> = None;
    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let matches_prefix = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with(EXPORT_PREFIX));
        if !matches_prefix {
            continue;
        }
        let modified = entry
            .metadata()
            .and_then(|meta| meta.modified())
            .unwrap_or(SystemTime::UNIX_EPOCH);
        if newest.as_ref().is_none_or(|(best, _)| modified > *best) {
            newest = Some((modified, path));
        }
    }

    if let Some((_, path)) = &newest {
        debug!(path = %path.display(), "discovered latest export");
    }
    Ok(newest.map(|(_, path)| path))
}
