//! Ordering and exclusion invariants over generated forests.

use std::collections::{HashMap, HashSet};

use proptest::prelude::*;
use rtm_model::{EmissionKind, Record};
use rtm_transform::{NoteIndex, filter_records, linearize};
use serde_json::{Value, json};

/// Parent slot for each task: `None` for roots, else an earlier task.
fn forest_strategy() -> impl Strategy<Value = Vec<Option<usize>>> {
    (1usize..24).prop_flat_map(|size| {
        (0..size)
            .map(|index| {
                if index == 0 {
                    Just(None::<usize>).boxed()
                } else {
                    prop::option::of(0..index).boxed()
                }
            })
            .collect::<Vec<_>>()
    })
}

fn build_tasks(parents: &[Option<usize>], order: &[usize]) -> Vec<Record> {
    order
        .iter()
        .map(|&index| {
            let mut task = json!({"id": format!("T{index}"), "series_id": format!("S{index}")});
            if let Some(parent) = parents[index] {
                task["parent_id"] = Value::String(format!("T{parent}"));
            }
            Record::new(task)
        })
        .collect()
}

fn shuffled(len: usize) -> impl Strategy<Value = Vec<usize>> {
    Just((0..len).collect::<Vec<_>>()).prop_shuffle()
}

proptest! {
    #[test]
    fn every_task_once_and_parents_first(
        (parents, order) in forest_strategy().prop_flat_map(|p| {
            let len = p.len();
            (Just(p), shuffled(len))
        })
    ) {
        let tasks = build_tasks(&parents, &order);
        let notes = NoteIndex::default();
        let result = linearize(&tasks, &notes);

        let mut position: HashMap<String, (usize, usize)> = HashMap::new();
        for (slot, emission) in result.emissions.iter().enumerate() {
            let id = emission.record.id().unwrap_or_default();
            prop_assert!(position.insert(id, (slot, emission.depth)).is_none());
        }
        prop_assert_eq!(position.len(), tasks.len());
        prop_assert!(result.unreachable.is_empty());

        for task in &tasks {
            let (slot, depth) = position[&task.id().unwrap_or_default()];
            match task.parent_id() {
                Some(parent) => {
                    let (parent_slot, parent_depth) = position[&parent];
                    prop_assert!(parent_slot < slot);
                    prop_assert_eq!(parent_depth + 1, depth);
                }
                None => prop_assert_eq!(depth, 1),
            }
        }
    }

    #[test]
    fn notes_follow_their_owner(
        parents in forest_strategy(),
        note_owners in prop::collection::vec(0usize..24, 0..12),
    ) {
        let order: Vec<usize> = (0..parents.len()).collect();
        let tasks = build_tasks(&parents, &order);
        let notes: Vec<Record> = note_owners
            .iter()
            .enumerate()
            .filter(|(_, owner)| **owner < parents.len())
            .map(|(index, owner)| Record::new(json!({"id": format!("N{index}"), "series_id": format!("S{owner}")})))
            .collect();
        let index = NoteIndex::new(&notes);
        let result = linearize(&tasks, &index);

        prop_assert_eq!(result.note_count(), notes.len());
        let mut owner_series: Option<String> = None;
        for emission in &result.emissions {
            match emission.kind {
                EmissionKind::Task => owner_series = emission.record.series_id(),
                EmissionKind::Note => prop_assert_eq!(&emission.record.series_id(), &owner_series),
            }
        }
    }

    #[test]
    fn filter_leaves_no_dangling_parents(
        parents in forest_strategy(),
        trashed in prop::collection::vec(any::<bool>(), 24),
        completed in prop::collection::vec(any::<bool>(), 24),
    ) {
        let order: Vec<usize> = (0..parents.len()).collect();
        let mut tasks = build_tasks(&parents, &order);
        for (index, task) in tasks.iter_mut().enumerate() {
            let mut value = task.value().clone();
            if trashed[index] {
                value["date_trashed"] = json!("2025-01-01");
            }
            if completed[index] {
                value["date_completed"] = json!(1);
            }
            *task = Record::new(value);
        }

        let outcome = filter_records(tasks);
        let kept: HashSet<String> = outcome.records.iter().filter_map(Record::id).collect();
        for record in &outcome.records {
            if let Some(parent) = record.parent_id() {
                prop_assert!(kept.contains(&parent));
            }
        }

        // No survivor descends from a trashed task.
        for (index, _) in parents.iter().enumerate() {
            if !kept.contains(&format!("T{index}")) {
                continue;
            }
            let mut cursor = Some(index);
            while let Some(current) = cursor {
                prop_assert!(!trashed[current]);
                cursor = parents[current];
            }
        }
        prop_assert_eq!(
            outcome.stats.kept + outcome.stats.completed + outcome.stats.trashed + outcome.stats.orphaned,
            outcome.stats.input
        );
    }
}
