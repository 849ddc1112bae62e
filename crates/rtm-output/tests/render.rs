//! Rendering a small export end to end.

use rtm_model::{EmissionKind, ExportDocument, Mapping, Record};
use rtm_output::{RowEmitter, csv_contents, render_rows};
use rtm_transform::{DateBasis, FieldResolver, NoteIndex, filter_records, linearize};
use serde_json::json;

const HEADERS: [&str; 14] = [
    "TYPE",
    "CONTENT",
    "DESCRIPTION",
    "PRIORITY",
    "INDENT",
    "AUTHOR",
    "RESPONSIBLE",
    "DATE",
    "DATE_LANG",
    "TIMEZONE",
    "DURATION",
    "DURATION_UNIT",
    "DEADLINE",
    "DEADLINE_LANG",
];

fn export() -> ExportDocument {
    ExportDocument::new(json!({
        "lists": [{"id": "L1", "name": "Errands"}],
        "tasks": [
            {"id": "T2", "parent_id": "T1", "name": "Whole milk", "priority": "P3", "list_id": "L1"},
            {
                "id": "T1", "series_id": "S1", "name": "Buy milk", "priority": "P1",
                "tags": ["errand"], "list_id": "L1",
                "date_due": 1_760_006_400_000_i64, "date_due_has_time": true
            },
            {"id": "T3", "name": "Old chore", "date_completed": 1_700_000_000_000_i64},
            {
                "id": "T4", "name": "Call mom", "priority": "PN",
                "repeat": "FREQ=WEEKLY;BYDAY=SU", "date_due": 1_758_801_600_000_i64
            }
        ],
        "notes": [
            {
                "id": "N1", "series_id": "S1", "content": "2 litres, semi-skimmed",
                "date_created": 1_758_801_600_000_i64, "date_modified": 1_758_877_200_000_i64
            },
            {"id": "N2", "series_id": "T3", "content": "gone with its task"}
        ]
    }))
}

#[test]
fn test_renders_tasks_notes_and_children_in_order() {
    let document = export();
    let rows: Vec<Record> = document.root()["tasks"]
        .as_array()
        .into_iter()
        .flatten()
        .cloned()
        .map(Record::new)
        .collect();
    let filtered = filter_records(rows);
    assert_eq!(filtered.stats.completed, 1);

    let notes = document.notes();
    let index = NoteIndex::new(&notes);
    let linear = linearize(&filtered.records, &index);

    let headers: Vec<String> = HEADERS.iter().map(|h| (*h).to_string()).collect();
    let mapping: Mapping = [("CONTENT", "name"), ("PRIORITY", "priority")]
        .into_iter()
        .collect();
    let resolver = FieldResolver::new(&mapping, document.root());
    let emitter = RowEmitter::new(&headers, resolver, DateBasis::Utc);
    let output = render_rows(&emitter, &linear.emissions);

    insta::assert_snapshot!(csv_contents(&headers, &output.lines), @r#"
TYPE,CONTENT,DESCRIPTION,PRIORITY,INDENT,AUTHOR,RESPONSIBLE,DATE,DATE_LANG,TIMEZONE,DURATION,DURATION_UNIT,DEADLINE,DEADLINE_LANG
task,Buy milk @errand @from_rtm,,1,1,,,2025-10-09 at 10:40,en,,,,,
note,"2 litres, semi-skimmed

date added 2025-09-25
date last modified 2025-09-26",,,,,,,,,,,,
task,Whole milk @from_rtm,,3,2,,,,en,,,,,
task,Call mom @from_rtm,,4,1,,,every Sunday starting 2025-09-25,en,,,,,
"#);

    let kinds: Vec<EmissionKind> = output.trace.iter().map(|entry| entry.kind).collect();
    assert_eq!(
        kinds,
        [
            EmissionKind::Task,
            EmissionKind::Note,
            EmissionKind::Task,
            EmissionKind::Task
        ]
    );
    assert_eq!(output.trace[1].data["id"], "N1");
    assert_eq!(output.trace[0].data, document.root()["tasks"][1]);
}

#[test]
fn test_monthly_recurrence_row() {
    let document = ExportDocument::new(json!({}));
    let task = Record::new(json!({
        "id": "R1",
        "content": "Standup",
        "rrule": "RRULE:FREQ=MONTHLY;BYDAY=MO;BYSETPOS=1",
        "due_time": "09:30",
    }));
    let headers = vec!["TYPE".to_string(), "CONTENT".to_string(), "DATE".to_string()];
    let mapping = Mapping::default();
    let emitter = RowEmitter::new(
        &headers,
        FieldResolver::new(&mapping, document.root()),
        DateBasis::Utc,
    );
    insta::assert_snapshot!(
        emitter.task_row(&task, 1),
        @"task,Standup @from_rtm,every first Monday of month at 09:30"
    );
}
