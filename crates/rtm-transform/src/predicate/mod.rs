//! Row predicate language used to pre-select candidate rows.
//!
//! Predicates are parsed once and evaluated against each row before the
//! filter pipeline runs. They never execute code and never fail at
//! evaluation time: a missing field or a type mismatch simply compares
//! false.
//!
//! # Syntax
//!
//! ## Values
//! - `row.a.b` or bare `a.b` - dotted path into the row
//! - `data.a.b` - dotted path into the export document
//! - `list` / `listName` - name of the row's list
//! - `"text"`, `'text'`, `42`, `-1.5`, `true`, `false`, `null` - literals
//!
//! ## Comparisons
//! - `==`, `!=`, `<`, `<=`, `>`, `>=`
//! - `contains` - substring of a string, or member of an array
//! - `exists(path)` - the path resolves to a non-null value
//!
//! A bare value is tested for truthiness.
//!
//! ## Boolean Operators
//! - `&&` / `and`
//! - `||` / `or`
//! - `!` / `not`
//! - `()` - grouping
//!
//! Groups, negations and chained operators nest at most [`MAX_DEPTH`]
//! levels deep.
//!
//! # Example
//!
//! ```
//! use rtm_model::Record;
//! use rtm_transform::predicate::{PredicateContext, PredicateParser};
//! use serde_json::json;
//!
//! let predicate = PredicateParser::parse("priority == 'P1' && !exists(date_completed)").unwrap();
//! let row = Record::new(json!({"priority": "P1"}));
//! let document = json!({});
//! let context = PredicateContext::new(&row, &document, None);
//! assert!(predicate.matches(&context));
//! ```

mod ast;
mod error;
mod evaluator;
mod lexer;
mod parser;

pub use ast::{CompareOp, Operand, Predicate, Scope};
pub use error::{PredicateError, PredicateResult};
pub use evaluator::{PredicateContext, retain_matching};
pub use parser::{MAX_DEPTH, PredicateParser};

#[cfg(test)]
mod tests;
