use rtm_model::{ExportDocument, ListIndex, Record};
use serde_json::{Value, json};

use super::*;

fn eval(expr: &str, row: Value) -> bool {
    let predicate = PredicateParser::parse(expr).expect("parse");
    let row = Record::new(row);
    let document = json!({"owner": "sam", "limits": {"max": 3}});
    predicate.matches(&PredicateContext::new(&row, &document, Some("Work")))
}

#[test]
fn test_equality_on_paths_and_literals() {
    assert!(eval("priority == 'P1'", json!({"priority": "P1"})));
    assert!(eval("row.priority != \"P2\"", json!({"priority": "P1"})));
    assert!(eval("estimate == 2", json!({"estimate": 2.0})));
    assert!(!eval("priority == 'P1'", json!({})));
}

#[test]
fn test_missing_equals_null() {
    assert!(eval("date_completed == null", json!({})));
    assert!(eval("date_completed == null", json!({"date_completed": null})));
    assert!(!eval("date_completed == null", json!({"date_completed": 5})));
}

#[test]
fn test_ordering_requires_matching_types() {
    assert!(eval("due < 100", json!({"due": 50})));
    assert!(eval("name >= 'b'", json!({"name": "bravo"})));
    assert!(!eval("due < 100", json!({"due": "50"})));
    assert!(!eval("due > 1", json!({})));
}

#[test]
fn test_contains_strings_and_arrays() {
    assert!(eval("name contains 'milk'", json!({"name": "buy milk"})));
    assert!(eval("tags contains 'home'", json!({"tags": ["work", "home"]})));
    assert!(!eval("tags contains 'gym'", json!({"tags": ["work"]})));
    assert!(!eval("count contains 1", json!({"count": 1})));
}

#[test]
fn test_boolean_operators_and_grouping() {
    let row = json!({"a": 1, "b": 0, "c": "x"});
    assert!(eval("a && !b", row.clone()));
    assert!(eval("b or c", row.clone()));
    assert!(!eval("not (a and c)", row.clone()));
    assert!(eval("a == 2 || b == 0 && c == 'x'", row));
}

#[test]
fn test_scopes_and_list_name() {
    assert!(eval("data.owner == 'sam'", json!({})));
    assert!(eval("data.limits.max >= 3", json!({})));
    assert!(eval("list == 'Work'", json!({})));
    assert!(eval("listName contains 'or'", json!({})));
    assert!(eval("exists(row)", json!({})));
}

#[test]
fn test_exists_ignores_null() {
    assert!(eval("exists(series_id)", json!({"series_id": "S"})));
    assert!(!eval("exists(series_id)", json!({"series_id": null})));
    assert!(eval("!exists(date_trashed)", json!({})));
}

#[test]
fn test_parse_errors() {
    assert_eq!(PredicateParser::parse("   "), Err(PredicateError::Empty));
    assert!(matches!(
        PredicateParser::parse("a =="),
        Err(PredicateError::UnexpectedEnd { .. })
    ));
    assert!(matches!(
        PredicateParser::parse("(a"),
        Err(PredicateError::UnexpectedEnd { .. })
    ));
    assert!(matches!(
        PredicateParser::parse("a b"),
        Err(PredicateError::UnexpectedToken { position: 2, .. })
    ));
    assert!(matches!(
        PredicateParser::parse("exists a"),
        Err(PredicateError::UnexpectedToken { .. })
    ));
}

#[test]
fn test_nesting_is_capped() {
    let too_deep = MAX_DEPTH + 1;
    let groups = format!("{}a", "(".repeat(10_000));
    let negations = format!("{}a", "!".repeat(10_000));
    let chain = format!("{}a", "a && ".repeat(too_deep));
    for expr in [groups, negations, chain] {
        assert_eq!(
            PredicateParser::parse(&expr),
            Err(PredicateError::TooDeep { limit: MAX_DEPTH })
        );
    }

    let nested = format!("{}a{}", "(".repeat(MAX_DEPTH), ")".repeat(MAX_DEPTH));
    assert!(eval(&nested, json!({"a": 1})));
    assert!(eval(&format!("{}a", "!!".repeat(10)), json!({"a": 1})));
    let chain = format!("{}a", "a && ".repeat(MAX_DEPTH - 1));
    assert!(eval(&chain, json!({"a": 1})));
}

#[test]
fn test_error_messages() {
    let err = PredicateParser::parse("a == )").expect_err("should fail");
    assert_eq!(
        err.to_string(),
        "unexpected ')' at position 5, expected a value or path"
    );
}

#[test]
fn test_retain_uses_list_names() {
    let document = ExportDocument::new(json!({
        "lists": [{"id": "L1", "name": "Home"}, {"id": "L2", "name": "Work"}]
    }));
    let lists = ListIndex::from_document(&document);
    let mut rows = vec![
        Record::new(json!({"id": "1", "list_id": "L1"})),
        Record::new(json!({"id": "2", "list_id": "L2"})),
        Record::new(json!({"id": "3"})),
    ];
    let predicate = PredicateParser::parse("list == 'Work' || !exists(list_id)").expect("parse");
    let removed = retain_matching(&mut rows, &predicate, document.root(), &lists);
    assert_eq!(removed, 1);
    let ids: Vec<String> = rows.iter().filter_map(Record::id).collect();
    assert_eq!(ids, ["2", "3"]);
}
