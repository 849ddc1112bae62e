//! Composition of the task `DATE` column.
//!
//! A plain due date becomes `YYYY-MM-DD` (plus ` at HH:MM` when the task
//! says its due date carries a time). A recurring task becomes a Todoist
//! phrase such as `every first Monday of month at 09:30 starting
//! 2025-10-09`.

use rtm_model::{Record, is_truthy, scalar_text};
use rtm_transform::datetime::{Moment, find_dtstart};
use rtm_transform::{DateBasis, format_date, format_time, parse_dtstart, translate};
use serde_json::Value;

const DUE_FIELDS: [&str; 6] = ["date_due", "due_on", "due_date", "due", "due.date", "date"];
const RULE_FIELDS: [&str; 7] = [
    "repeat",
    "rrule",
    "recurrence",
    "recurrence_rule",
    "repeat_rule",
    "repeat_rules",
    "recur",
];
const NESTED_RULE_FIELDS: [&str; 2] = ["rrule", "rule"];
const TIME_FIELDS: [&str; 5] = ["due_time", "time", "start_time", "dtstart", "dtstart_time"];
const START_FIELDS: [&str; 5] = ["date_start", "start_date", "dtstart", "date_scheduled", "start"];

const DUE_HAS_TIME: &str = "date_due_has_time";
const START_HAS_TIME: &str = "date_start_has_time";

/// Text for the `DATE` cell of a task.
///
/// `mapped` is the value the template mapping resolved for the column, if
/// any; the usual RTM due fields are consulted when it is missing or empty.
pub fn compose_date(task: &Record, mapped: Option<&Value>, basis: DateBasis) -> String {
    let due = mapped.filter(|v| is_present(v)).or_else(|| due_value(task));
    match recurrence_rule(task) {
        Some(rule) => recurring_date(task, rule, due, basis),
        None => plain_date(task, due, basis),
    }
}

/// First non-empty RTM due field. `due` only counts when scalar.
pub fn due_value(task: &Record) -> Option<&Value> {
    DUE_FIELDS.iter().find_map(|field| {
        task.get_path(field)
            .filter(|v| is_present(v))
            .filter(|v| *field != "due" || !(v.is_object() || v.is_array()))
    })
}

/// The first non-blank recurrence rule string on a task.
pub fn recurrence_rule(task: &Record) -> Option<&str> {
    let direct = RULE_FIELDS
        .iter()
        .find_map(|field| task.get_path(field).and_then(rule_text));
    direct.or_else(|| match task.field("repeat") {
        Some(Value::Object(repeat)) => NESTED_RULE_FIELDS
            .iter()
            .find_map(|key| repeat.get(*key).and_then(rule_text)),
        _ => None,
    })
}

fn rule_text(value: &Value) -> Option<&str> {
    value.as_str().filter(|text| !text.trim().is_empty())
}

/// Time of day for a recurrence phrase.
///
/// Taken from a time-qualified `date_due`, then the common time fields
/// (lower or upper case), then a `DTSTART:`/`DTSTART=` stamp in the rule.
pub fn time_of_day(task: &Record, rule: &str, basis: DateBasis) -> Option<String> {
    if task.flag(DUE_HAS_TIME)
        && let Some(due) = task.field("date_due").filter(|v| is_truthy(v))
    {
        let time = format_time(due, basis);
        if !time.is_empty() {
            return Some(time);
        }
    }
    TIME_FIELDS
        .iter()
        .find_map(|field| either_case(task, field))
        .map(scalar_text)
        .or_else(|| find_dtstart(rule, true).map(|stamp| stamp.clock()))
}

/// Where a recurrence starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Start<'a> {
    /// A start field (or `date_due`) on the task.
    Field(&'a Value),
    /// The rule's own `DTSTART`.
    DtStart(Moment),
}

impl Start<'_> {
    pub fn date(&self, basis: DateBasis) -> String {
        match self {
            Self::Field(value) => format_date(value, basis),
            Self::DtStart(moment) => moment.date(basis).format("%Y-%m-%d").to_string(),
        }
    }

    pub fn time(&self, basis: DateBasis) -> String {
        match self {
            Self::Field(value) => format_time(value, basis),
            Self::DtStart(moment) => moment
                .time(basis)
                .map(|time| time.format("%H:%M").to_string())
                .unwrap_or_default(),
        }
    }
}

/// Start of a recurring task: a start field, else the rule's `DTSTART`,
/// else `date_due`.
pub fn start_of<'a>(task: &'a Record, rule: &str) -> Option<Start<'a>> {
    START_FIELDS
        .iter()
        .find_map(|field| either_case(task, field))
        .map(Start::Field)
        .or_else(|| parse_dtstart(rule).map(Start::DtStart))
        .or_else(|| {
            task.field("date_due")
                .filter(|v| !v.is_null())
                .map(Start::Field)
        })
}

fn recurring_date(task: &Record, rule: &str, due: Option<&Value>, basis: DateBasis) -> String {
    let time = time_of_day(task, rule, basis);
    let phrase = translate(rule, time.as_deref());
    if phrase.is_empty() {
        return due.map(|v| format_date(v, basis)).unwrap_or_default();
    }

    let Some(start) = start_of(task, rule) else {
        return phrase;
    };
    let start_date = start.date(basis);
    if start_date.is_empty() {
        return phrase;
    }

    let mut text = format!("{phrase} starting {start_date}");
    let start_is_due = matches!(start, Start::Field(value) if task.field("date_due") == Some(value));
    if task.flag(START_HAS_TIME) || (start_is_due && task.flag(DUE_HAS_TIME)) {
        let start_time = start.time(basis);
        if !start_time.is_empty() {
            text.push_str(" at ");
            text.push_str(&start_time);
        }
    }
    text
}

fn plain_date(task: &Record, due: Option<&Value>, basis: DateBasis) -> String {
    let date = due.map(|v| format_date(v, basis)).unwrap_or_default();
    if date.is_empty() || !task.flag(DUE_HAS_TIME) {
        return date;
    }
    let time = task
        .field("date_due")
        .filter(|v| is_truthy(v))
        .map(|v| format_time(v, basis))
        .unwrap_or_default();
    if time.is_empty() {
        date
    } else {
        format!("{date} at {time}")
    }
}

fn is_present(value: &Value) -> bool {
    !value.is_null() && value.as_str() != Some("")
}

fn either_case<'a>(task: &'a Record, field: &str) -> Option<&'a Value> {
    task.get_path(field)
        .filter(|v| is_truthy(v))
        .or_else(|| task.get_path(&field.to_ascii_uppercase()).filter(|v| is_truthy(v)))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn date(task: Value) -> String {
        compose_date(&Record::new(task), None, DateBasis::Utc)
    }

    #[test]
    fn test_plain_due_dates() {
        assert_eq!(date(json!({"date_due": 1_760_006_400_000_i64})), "2025-10-09");
        assert_eq!(
            date(json!({"date_due": 1_760_006_400_000_i64, "date_due_has_time": true})),
            "2025-10-09 at 10:40"
        );
        assert_eq!(date(json!({"due": {"date": "2025-03-04"}})), "2025-03-04");
        assert_eq!(date(json!({"due_on": "", "date": "2025-01-02"})), "2025-01-02");
        assert_eq!(date(json!({})), "");
    }

    #[test]
    fn test_mapped_value_wins_when_present() {
        let task = Record::new(json!({"date_due": 1_760_006_400_000_i64}));
        let mapped = json!("2024-12-31");
        assert_eq!(compose_date(&task, Some(&mapped), DateBasis::Utc), "2024-12-31");
        assert_eq!(compose_date(&task, Some(&json!("")), DateBasis::Utc), "2025-10-09");
    }

    #[test]
    fn test_recurrence_with_due_time() {
        let task = json!({
            "repeat": "FREQ=DAILY;INTERVAL=1",
            "date_due": 1_758_823_200_000_i64,
            "date_due_has_time": "true",
        });
        assert_eq!(date(task), "every day at 18:00 starting 2025-09-25 at 18:00");
    }

    #[test]
    fn test_bare_due_date_gets_no_time() {
        let task = json!({"date_due": "2025-10-09", "date_due_has_time": true});
        assert_eq!(date(task), "2025-10-09");
    }

    #[test]
    fn test_recurrence_with_bare_due_date_gets_no_time() {
        let task = json!({
            "repeat": "FREQ=DAILY",
            "date_due": "2025-10-09",
            "date_due_has_time": true,
        });
        assert_eq!(date(task), "every day starting 2025-10-09");
    }

    #[test]
    fn test_recurrence_with_explicit_start() {
        let task = json!({
            "rrule": "RRULE:FREQ=MONTHLY;BYDAY=MO;BYSETPOS=1",
            "date_start": 1_760_006_400_000_i64,
            "date_start_has_time": true,
        });
        assert_eq!(
            date(task),
            "every first Monday of month starting 2025-10-09 at 10:40"
        );
    }

    #[test]
    fn test_recurrence_time_and_start_from_dtstart() {
        let task = json!({"repeat": "FREQ=WEEKLY;BYDAY=TU,TH;DTSTART=20251009T034000Z"});
        assert_eq!(
            date(task),
            "every Tuesday, Thursday at 03:40 starting 2025-10-09"
        );
    }

    #[test]
    fn test_recurrence_time_fields() {
        let task = json!({"repeat": "FREQ=YEARLY", "TIME": "07:05", "start": "2026-01-01"});
        assert_eq!(date(task), "every year at 07:05 starting 2026-01-01");
    }

    #[test]
    fn test_nested_rule_objects() {
        let task = json!({"repeat": {"rrule": "FREQ=DAILY;INTERVAL=2"}});
        assert_eq!(date(task), "every 2 days");
    }

    #[test]
    fn test_unsupported_rule_falls_back_to_due_date() {
        let task = json!({"repeat": "FREQ=HOURLY", "date_due": "2025-05-06"});
        assert_eq!(date(task), "2025-05-06");
    }

    #[test]
    fn test_blank_rules_are_ignored() {
        let task = json!({"repeat": "  ", "date_due": "2025-05-06"});
        assert_eq!(date(task), "2025-05-06");
    }
}
