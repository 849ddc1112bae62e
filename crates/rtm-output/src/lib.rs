//! Output generation for Todoist imports.
//!
//! - **Rows**: one CSV line per task or note, in linearized order
//! - **Cells**: the importer's escaping rules
//! - **Writers**: the CSV and the JSON trace of used records
//! - **Naming**: list-specific output file names

mod cell;
mod emit;
mod error;
mod naming;
mod schedule;
mod writer;

pub use cell::{cell_text, escape_cell, format_cell, header_line};
pub use emit::{RenderedOutput, RowEmitter, SOURCE_LABEL, TaskColumn, render_rows};
pub use error::{OutputError, Result};
pub use naming::{list_suffix, sanitize_list_name, single_list_name, suffixed_output_path};
pub use schedule::{Start, compose_date, due_value, recurrence_rule, start_of, time_of_day};
pub use writer::{csv_contents, trace_json, write_csv, write_outputs};
