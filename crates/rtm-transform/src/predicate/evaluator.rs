//! Evaluation of parsed predicates against rows.

use std::cmp::Ordering;

use rtm_model::{ListIndex, Record, is_truthy, lookup_path};
use serde_json::Value;
use tracing::debug;

use super::ast::{CompareOp, Operand, Predicate, Scope};

/// What a predicate can see while evaluating one row.
#[derive(Debug, Clone, Copy)]
pub struct PredicateContext<'a> {
    pub row: &'a Record,
    pub document: &'a Value,
    pub list_name: Option<&'a str>,
}

impl<'a> PredicateContext<'a> {
    pub fn new(row: &'a Record, document: &'a Value, list_name: Option<&'a str>) -> Self {
        Self {
            row,
            document,
            list_name,
        }
    }

    fn value_of(&self, operand: &Operand) -> Option<Value> {
        match operand {
            Operand::Path { scope, path } => {
                let root = match scope {
                    Scope::Row => self.row.value(),
                    Scope::Document => self.document,
                };
                if path.is_empty() {
                    Some(root.clone())
                } else {
                    lookup_path(root, path).cloned()
                }
            }
            Operand::ListName => self.list_name.map(|name| Value::String(name.to_string())),
            Operand::Literal(value) => Some(value.clone()),
        }
    }
}

impl Predicate {
    /// Whether the row in `context` satisfies this predicate.
    pub fn matches(&self, context: &PredicateContext<'_>) -> bool {
        match self {
            Self::Compare { left, op, right } => {
                compare(context.value_of(left), *op, context.value_of(right))
            }
            Self::Exists(operand) => context.value_of(operand).is_some_and(|v| !v.is_null()),
            Self::Truthy(operand) => context.value_of(operand).is_some_and(|v| is_truthy(&v)),
            Self::Not(inner) => !inner.matches(context),
            Self::And(left, right) => left.matches(context) && right.matches(context),
            Self::Or(left, right) => left.matches(context) || right.matches(context),
        }
    }
}

/// Keep the rows matching `predicate`. Returns the number removed.
pub fn retain_matching(
    rows: &mut Vec<Record>,
    predicate: &Predicate,
    document: &Value,
    lists: &ListIndex,
) -> usize {
    let before = rows.len();
    rows.retain(|row| {
        let context = PredicateContext::new(row, document, lists.name_for(row));
        predicate.matches(&context)
    });
    let removed = before - rows.len();
    debug!(removed, kept = rows.len(), "applied row predicate");
    removed
}

fn compare(left: Option<Value>, op: CompareOp, right: Option<Value>) -> bool {
    match op {
        CompareOp::Eq => loose_eq(left.as_ref(), right.as_ref()),
        CompareOp::Ne => !loose_eq(left.as_ref(), right.as_ref()),
        CompareOp::Contains => match (left, right) {
            (Some(Value::String(haystack)), Some(Value::String(needle))) => {
                haystack.contains(needle.as_str())
            }
            (Some(Value::Array(items)), needle) => {
                items.iter().any(|item| loose_eq(Some(item), needle.as_ref()))
            }
            _ => false,
        },
        CompareOp::Lt => ordering(left, right).is_some_and(Ordering::is_lt),
        CompareOp::Le => ordering(left, right).is_some_and(Ordering::is_le),
        CompareOp::Gt => ordering(left, right).is_some_and(Ordering::is_gt),
        CompareOp::Ge => ordering(left, right).is_some_and(Ordering::is_ge),
    }
}

/// Equality where a missing value equals `null` and numbers compare by
/// magnitude.
fn loose_eq(left: Option<&Value>, right: Option<&Value>) -> bool {
    match (left.unwrap_or(&Value::Null), right.unwrap_or(&Value::Null)) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        (a, b) => a == b,
    }
}

fn ordering(left: Option<Value>, right: Option<Value>) -> Option<Ordering> {
    match (left?, right?) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => Some(a.cmp(&b)),
        _ => None,
    }
}
