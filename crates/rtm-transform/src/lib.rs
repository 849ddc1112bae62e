//! Transformation stages between a loaded export and rendered rows.
//!
//! - **predicate**: optional row pre-selection language
//! - **filter**: completed, trashed and orphan exclusion
//! - **linearize**: depth-first task/note ordering
//! - **resolve**: template header to value resolution
//! - **recurrence**: RRULE subset to Todoist phrases
//! - **datetime**: timestamp parsing and the date basis

pub mod datetime;
pub mod filter;
pub mod linearize;
pub mod predicate;
pub mod recurrence;
pub mod resolve;

pub use datetime::{DateBasis, Moment, format_date, format_time, parse_dtstart, parse_moment};
pub use filter::{FilterOutcome, FilterStats, filter_records};
pub use linearize::{Linearization, Linearizer, NoteIndex, linearize};
pub use predicate::{Predicate, PredicateError, PredicateParser, retain_matching};
pub use recurrence::{RecurrenceRule, ordinal_suffix, translate};
pub use resolve::FieldResolver;
