//! Input loading for the RTM to Todoist converter.
//!
//! # Features
//!
//! - **Export Loading**: Parse export JSON and select candidate rows
//! - **Templates**: Read import template column headers
//! - **Mappings**: Load header to source-path mappings
//! - **Discovery**: Find the newest export in a data directory
//! - **Schema**: Summarise the type structure of an export
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use rtm_ingest::{load_export, read_template_headers, select_rows};
//!
//! let document = load_export(Path::new("data/rememberthemilk_export.json"))?;
//! let rows = select_rows(&document, Some("tasks"))?;
//! let headers = read_template_headers(Path::new("data/todoist_template.csv"))?;
//! ```

mod discovery;
mod error;
mod export;
mod mapping;
mod schema;
mod template;

// === Error Types ===
pub use error::{IngestError, Result};

// === Export Loading ===
pub use export::{load_export, select_rows};

// === Templates and Mappings ===
pub use mapping::load_mapping;
pub use template::read_template_headers;

// === Discovery ===
pub use discovery::{EXPORT_PREFIX, discover_latest_export};

// === Schema ===
pub use schema::extract_schema;
