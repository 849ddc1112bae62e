//! CSV cell formatting.
//!
//! Cells are escaped the way the Todoist importer has been fed historically:
//! backslashes are doubled and single quotes get a backslash before the
//! usual CSV quoting is applied.

use rtm_model::scalar_text;
use serde_json::Value;

/// Plain text of a value before escaping.
///
/// Arrays are joined with `;` so they never introduce extra columns.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Array(items) => items.iter().map(scalar_text).collect::<Vec<_>>().join(";"),
        Value::Object(_) => value.to_string(),
        other => scalar_text(other),
    }
}

/// Escape text for a single CSV cell.
pub fn escape_cell(text: &str) -> String {
    let escaped = text.replace('\\', "\\\\").replace('\'', "\\'");
    if needs_quotes(&escaped) {
        format!("\"{}\"", escaped.replace('"', "\"\""))
    } else {
        escaped
    }
}

/// Format an optional value as a CSV cell; missing and null are empty.
pub fn format_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(value) => escape_cell(&cell_text(value)),
    }
}

/// The template header row, quoted only where CSV requires it.
pub fn header_line(headers: &[String]) -> String {
    headers
        .iter()
        .map(|header| {
            if needs_quotes(header) {
                format!("\"{}\"", header.replace('"', "\"\""))
            } else {
                header.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}

fn needs_quotes(text: &str) -> bool {
    text.contains(',') || text.contains('"') || text.contains('\n')
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_missing_and_null_are_empty() {
        assert_eq!(format_cell(None), "");
        assert_eq!(format_cell(Some(&Value::Null)), "");
    }

    #[test]
    fn test_scalars_render_as_text() {
        assert_eq!(format_cell(Some(&json!("plain"))), "plain");
        assert_eq!(format_cell(Some(&json!(4))), "4");
        assert_eq!(format_cell(Some(&json!(true))), "true");
    }

    #[test]
    fn test_arrays_join_with_semicolons() {
        assert_eq!(format_cell(Some(&json!(["a", null, 3]))), "a;;3");
    }

    #[test]
    fn test_objects_are_compact_json() {
        assert_eq!(
            format_cell(Some(&json!({"k": "v"}))),
            "\"{\"\"k\"\":\"\"v\"\"}\""
        );
    }

    #[test]
    fn test_escaping_order() {
        assert_eq!(escape_cell(r"C:\temp"), r"C:\\temp");
        assert_eq!(escape_cell("it's"), r"it\'s");
        assert_eq!(escape_cell("a, b"), "\"a, b\"");
        assert_eq!(escape_cell("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_cell("line\nbreak"), "\"line\nbreak\"");
    }

    #[test]
    fn test_header_line_quotes_only_when_needed() {
        let headers = vec!["TYPE".to_string(), "a,b".to_string(), "it's".to_string()];
        assert_eq!(header_line(&headers), "TYPE,\"a,b\",it's");
    }
}
