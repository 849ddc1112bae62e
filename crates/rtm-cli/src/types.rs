use std::path::PathBuf;

use rtm_transform::FilterStats;

/// Outcome of one conversion run.
#[derive(Debug, Clone)]
pub struct ConvertResult {
    pub input: PathBuf,
    pub rows_read: usize,
    /// Rows dropped by the row predicate, when one was given.
    pub predicate_removed: Option<usize>,
    pub filter: FilterStats,
    pub tasks: usize,
    pub notes: usize,
    pub unreachable: Vec<String>,
    /// Tasks without an id.
    pub skipped: usize,
    /// Sanitized list name appended to the output file names.
    pub list_suffix: Option<String>,
    pub output: PathBuf,
    pub output_json: PathBuf,
    /// False for dry runs.
    pub written: bool,
}

impl ConvertResult {
    pub fn rows_written(&self) -> usize {
        self.tasks + self.notes
    }
}

/// One list with its task counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSummary {
    pub id: String,
    pub name: Option<String>,
    pub tasks: usize,
    /// Tasks surviving the completed/trashed/orphan filter.
    pub open: usize,
}
