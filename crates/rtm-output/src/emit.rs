//! Row emission for the Todoist import template.

use rtm_model::{Emission, EmissionKind, Record, TraceEntry, is_truthy};
use rtm_transform::{DateBasis, FieldResolver};
use serde_json::Value;
use tracing::trace;

use crate::cell::{cell_text, escape_cell, format_cell};
use crate::schedule::compose_date;

/// Label appended to every task's content.
pub const SOURCE_LABEL: &str = "from_rtm";

const CREATED_FIELDS: [&str; 3] = ["date_created", "created", "created_on"];
const MODIFIED_FIELDS: [&str; 4] = ["date_modified", "modified", "updated_on", "updated"];

/// How a template column is filled on task rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskColumn {
    Type,
    Indent,
    DateLang,
    /// Always blank on task rows.
    Blank,
    Content,
    Date,
    /// Resolved through the mapping.
    Mapped,
}

impl TaskColumn {
    pub fn classify(header: &str) -> Self {
        match header.to_ascii_uppercase().as_str() {
            "TYPE" => Self::Type,
            "INDENT" => Self::Indent,
            "DATE_LANG" => Self::DateLang,
            "TIMEZONE" | "DURATION" | "DURATION_UNIT" | "DEADLINE" | "DEADLINE_LANG" => {
                Self::Blank
            }
            "CONTENT" => Self::Content,
            "DATE" => Self::Date,
            _ => Self::Mapped,
        }
    }
}

/// Builds CSV lines for tasks and notes.
#[derive(Debug, Clone, Copy)]
pub struct RowEmitter<'a> {
    headers: &'a [String],
    resolver: FieldResolver<'a>,
    basis: DateBasis,
}

impl<'a> RowEmitter<'a> {
    pub fn new(headers: &'a [String], resolver: FieldResolver<'a>, basis: DateBasis) -> Self {
        Self {
            headers,
            resolver,
            basis,
        }
    }

    /// The CSV line for one emission.
    pub fn render(&self, emission: &Emission<'_>) -> String {
        match emission.kind {
            EmissionKind::Task => self.task_row(emission.record, emission.depth),
            EmissionKind::Note => self.note_row(emission.record),
        }
    }

    pub fn task_row(&self, task: &Record, depth: usize) -> String {
        self.join(|header| match TaskColumn::classify(header) {
            TaskColumn::Type => escape_cell(EmissionKind::Task.as_str()),
            TaskColumn::Indent => depth.to_string(),
            TaskColumn::DateLang => "en".to_string(),
            TaskColumn::Blank => String::new(),
            TaskColumn::Content => escape_cell(&self.task_content(header, task)),
            TaskColumn::Date => {
                let mapped = self.resolver.resolve(header, task);
                escape_cell(&compose_date(task, mapped.as_ref(), self.basis))
            }
            TaskColumn::Mapped => format_cell(self.resolver.resolve(header, task).as_ref()),
        })
    }

    /// Only `TYPE` and `CONTENT` are filled on note rows.
    pub fn note_row(&self, note: &Record) -> String {
        self.join(|header| match TaskColumn::classify(header) {
            TaskColumn::Type => escape_cell(EmissionKind::Note.as_str()),
            TaskColumn::Content => escape_cell(&self.note_content(header, note)),
            _ => String::new(),
        })
    }

    /// Task content followed by `@tag` labels and the source label.
    pub fn task_content(&self, header: &str, task: &Record) -> String {
        let content = self.content_text(header, task);
        let labels: Vec<String> = task
            .tags()
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(SOURCE_LABEL))
            .map(|tag| format!("@{tag}"))
            .collect();
        if content.is_empty() {
            labels.join(" ")
        } else {
            format!("{content} {}", labels.join(" "))
        }
    }

    /// Note content followed by a blank line and its date lines.
    ///
    /// `date last modified` only appears when it falls on a different day
    /// than `date added`.
    pub fn note_content(&self, header: &str, note: &Record) -> String {
        let content = self.content_text(header, note);

        let mut date_lines = Vec::new();
        let created = first_truthy(note, &CREATED_FIELDS)
            .map(|v| rtm_transform::format_date(v, self.basis))
            .unwrap_or_default();
        if !created.is_empty() {
            date_lines.push(format!("date added {created}"));
        }
        let modified = first_truthy(note, &MODIFIED_FIELDS)
            .map(|v| rtm_transform::format_date(v, self.basis))
            .unwrap_or_default();
        if !modified.is_empty() && modified != created {
            date_lines.push(format!("date last modified {modified}"));
        }

        match (content.is_empty(), date_lines.is_empty()) {
            (true, _) => date_lines.join("\n"),
            (false, true) => content,
            (false, false) => format!("{content}\n\n{}", date_lines.join("\n")),
        }
    }

    fn content_text(&self, header: &str, record: &Record) -> String {
        self.resolver
            .resolve(header, record)
            .filter(is_truthy)
            .map(|v| cell_text(&v))
            .unwrap_or_default()
    }

    fn join(&self, cell: impl Fn(&str) -> String) -> String {
        self.headers
            .iter()
            .map(|header| cell(header.as_str()))
            .collect::<Vec<_>>()
            .join(",")
    }
}

fn first_truthy<'r>(record: &'r Record, fields: &[&str]) -> Option<&'r Value> {
    fields
        .iter()
        .find_map(|field| record.get_path(field).filter(|v| is_truthy(v)))
}

/// Rendered CSV lines (without the header) and the matching trace.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderedOutput {
    pub lines: Vec<String>,
    pub trace: Vec<TraceEntry>,
}

/// Render every emission, in order, into a line and a trace entry.
pub fn render_rows(emitter: &RowEmitter<'_>, emissions: &[Emission<'_>]) -> RenderedOutput {
    let mut output = RenderedOutput {
        lines: Vec::with_capacity(emissions.len()),
        trace: Vec::with_capacity(emissions.len()),
    };
    for emission in emissions {
        let line = emitter.render(emission);
        trace!(kind = %emission.kind, depth = emission.depth, "rendered row");
        output.lines.push(line);
        output.trace.push(emission.trace_entry());
    }
    output
}
