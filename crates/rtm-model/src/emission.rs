//! Ordered emissions and the audit trace written alongside the CSV.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::record::Record;

/// Whether an output row comes from a task or a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmissionKind {
    Task,
    Note,
}

impl EmissionKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::Note => "note",
        }
    }
}

impl std::fmt::Display for EmissionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One linearized output row, borrowing its source record.
///
/// `depth` is the tree level of the task (1 for roots); notes carry the
/// depth of their owning task.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Emission<'a> {
    pub kind: EmissionKind,
    pub record: &'a Record,
    pub depth: usize,
}

impl<'a> Emission<'a> {
    pub fn task(record: &'a Record, depth: usize) -> Self {
        Self {
            kind: EmissionKind::Task,
            record,
            depth,
        }
    }

    pub fn note(record: &'a Record, depth: usize) -> Self {
        Self {
            kind: EmissionKind::Note,
            record,
            depth,
        }
    }

    /// Trace entry holding a deep copy of the record.
    pub fn trace_entry(&self) -> TraceEntry {
        TraceEntry {
            kind: self.kind,
            data: self.record.value().clone(),
        }
    }
}

/// Entry of the used-records trace (`{"type": ..., "data": ...}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEntry {
    #[serde(rename = "type")]
    pub kind: EmissionKind,
    pub data: Value,
}
