//! Data model for converting RTM exports into Todoist import rows.
//!
//! - **record**: tasks and notes as JSON-backed records with typed accessors
//! - **document**: the loaded export and its list index
//! - **mapping**: header to source-path mapping
//! - **emission**: linearized rows and the audit trace

pub mod document;
pub mod emission;
pub mod mapping;
pub mod record;

pub use document::{ExportDocument, ListIndex, ListInfo};
pub use emission::{Emission, EmissionKind, TraceEntry};
pub use mapping::Mapping;
pub use record::{Record, is_truthy, lookup_path, scalar_text, value_key};
