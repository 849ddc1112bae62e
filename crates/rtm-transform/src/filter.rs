//! Exclusion of completed, trashed and orphaned records.
//!
//! Stages run in a fixed order and only ever remove records:
//!
//! 1. completed records (`date_completed` present and non-null)
//! 2. trashed records and every descendant of one
//! 3. orphans whose `parent_id` no longer resolves, to a fixed point

use std::collections::HashSet;

use rtm_model::{Record, lookup_path};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// Per-stage removal counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FilterStats {
    pub input: usize,
    pub completed: usize,
    pub trashed: usize,
    pub orphaned: usize,
    /// Pruning passes that removed at least one orphan.
    pub orphan_passes: usize,
    pub kept: usize,
}

/// Records surviving the filter, in original order.
#[derive(Debug, Clone, Default)]
pub struct FilterOutcome {
    pub records: Vec<Record>,
    pub stats: FilterStats,
}

/// Run all exclusion stages.
pub fn filter_records(records: Vec<Record>) -> FilterOutcome {
    let input = records.len();
    let (records, completed) = exclude_completed(records);
    let (records, trashed) = exclude_trashed(records);
    let (records, orphaned, orphan_passes) = prune_orphans(records);
    let stats = FilterStats {
        input,
        completed,
        trashed,
        orphaned,
        orphan_passes,
        kept: records.len(),
    };
    debug!(?stats, "filter stages complete");
    FilterOutcome { records, stats }
}

/// Drop records with a non-null `date_completed`. Returns the removed count.
pub fn exclude_completed(records: Vec<Record>) -> (Vec<Record>, usize) {
    let before = records.len();
    let kept: Vec<Record> = records
        .into_iter()
        .filter(|record| {
            lookup_path(record.value(), "date_completed").is_none_or(Value::is_null)
        })
        .collect();
    let removed = before - kept.len();
    (kept, removed)
}

/// Drop trashed records and all their descendants.
pub fn exclude_trashed(records: Vec<Record>) -> (Vec<Record>, usize) {
    let mut trashed: HashSet<String> = records
        .iter()
        .filter(|record| is_trashed(record))
        .filter_map(Record::id)
        .collect();

    if !trashed.is_empty() {
        loop {
            let mut grew = false;
            for record in &records {
                let Some(id) = record.id() else { continue };
                if trashed.contains(&id) {
                    continue;
                }
                if record.parent_id().is_some_and(|pid| trashed.contains(&pid)) {
                    trashed.insert(id);
                    grew = true;
                }
            }
            if !grew {
                break;
            }
        }
    }

    let before = records.len();
    let kept: Vec<Record> = records
        .into_iter()
        .filter(|record| record.id().is_none_or(|id| !trashed.contains(&id)))
        .collect();
    let removed = before - kept.len();
    if removed > 0 {
        debug!(removed, seeds = trashed.len(), "excluded trashed subtrees");
    }
    (kept, removed)
}

fn is_trashed(record: &Record) -> bool {
    match lookup_path(record.value(), "date_trashed") {
        None | Some(Value::Null) => false,
        Some(Value::String(text)) => !text.is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(_) => true,
    }
}

/// Repeatedly drop records whose parent is not among the survivors.
///
/// Returns the kept records, the removed count and the number of passes
/// that removed something.
pub fn prune_orphans(mut records: Vec<Record>) -> (Vec<Record>, usize, usize) {
    let mut removed = 0;
    let mut passes = 0;
    loop {
        let ids: HashSet<String> = records.iter().filter_map(Record::id).collect();
        let before = records.len();
        records.retain(|record| {
            if record.id().is_none() {
                return true;
            }
            record.parent_id().is_none_or(|pid| ids.contains(&pid))
        });
        let dropped = before - records.len();
        if dropped == 0 {
            break;
        }
        removed += dropped;
        passes += 1;
        debug!(pass = passes, dropped, "pruned orphans");
    }
    (records, removed, passes)
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    fn records(values: Value) -> Vec<Record> {
        match values {
            Value::Array(items) => items.into_iter().map(Record::new).collect(),
            _ => Vec::new(),
        }
    }

    fn ids(records: &[Record]) -> Vec<String> {
        records.iter().filter_map(Record::id).collect()
    }

    #[test]
    fn test_completed_records_are_dropped() {
        let input = records(json!([
            {"id": "1"},
            {"id": "2", "date_completed": 1},
            {"id": "3", "date_completed": null},
        ]));
        let (kept, removed) = exclude_completed(input);
        assert_eq!(ids(&kept), ["1", "3"]);
        assert_eq!(removed, 1);
    }

    #[test]
    fn test_trashed_subtrees_are_dropped() {
        let input = records(json!([
            {"id": "A", "date_trashed": 1},
            {"id": "B", "parent_id": "A"},
            {"id": "C", "parent_id": "B"},
            {"id": "D", "date_trashed": ""},
            {"id": "E", "parent_id": "D"},
        ]));
        let (kept, removed) = exclude_trashed(input);
        assert_eq!(ids(&kept), ["D", "E"]);
        assert_eq!(removed, 3);
    }

    #[test]
    fn test_descendants_listed_before_trashed_ancestor() {
        let input = records(json!([
            {"id": "C", "parent_id": "B"},
            {"id": "B", "parent_id": "A"},
            {"id": "A", "date_trashed": "2025-01-01"},
        ]));
        let (kept, _) = exclude_trashed(input);
        assert!(kept.is_empty());
    }

    #[test]
    fn test_orphans_cascade() {
        let input = records(json!([
            {"id": "1", "parent_id": "missing"},
            {"id": "2", "parent_id": "1"},
            {"id": "3", "parent_id": "2"},
            {"id": "4"},
            {"parent_id": "nowhere"},
        ]));
        let (kept, removed, passes) = prune_orphans(input);
        assert_eq!(ids(&kept), ["4"]);
        assert_eq!(kept.len(), 2);
        assert_eq!(removed, 3);
        assert_eq!(passes, 3);
    }

    #[test]
    fn test_pipeline_counts_each_stage() {
        let input = records(json!([
            {"id": "P", "date_completed": 5},
            {"id": "C", "parent_id": "P"},
            {"id": "T", "date_trashed": 5},
            {"id": "K"},
        ]));
        let outcome = filter_records(input);
        assert_eq!(ids(&outcome.records), ["K"]);
        assert_eq!(
            outcome.stats,
            FilterStats {
                input: 4,
                completed: 1,
                trashed: 1,
                orphaned: 1,
                orphan_passes: 1,
                kept: 1,
            }
        );
    }
}
