//! Error types for export and template ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading inputs.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Directory not found or not readable.
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Failed to read directory entries.
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Parsing Errors ===
    /// File is not valid JSON.
    #[error("failed to parse JSON {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Template could not be read as CSV.
    #[error("failed to parse CSV template {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Template has no header row.
    #[error("template has no header row: {path}")]
    EmptyTemplate { path: PathBuf },

    // === Shape Errors ===
    /// The rows path does not lead to an array.
    #[error("rows path '{rows_path}' does not resolve to an array")]
    RowsPathNotArray { rows_path: String },

    /// Mapping file is not an object of header to path strings.
    #[error("unexpected mapping format in {path}: {reason}")]
    MappingFormat { path: PathBuf, reason: String },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
