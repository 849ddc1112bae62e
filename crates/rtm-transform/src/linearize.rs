//! Depth-first ordering of the task forest.
//!
//! Tasks form a forest through `parent_id`. The output order is pre-order:
//! a task, then its notes in original order, then each child subtree in
//! original appearance order. Traversal uses an explicit stack.

use std::collections::{HashMap, HashSet};

use rtm_model::{Emission, EmissionKind, Record};
use tracing::{debug, warn};

/// Notes grouped by the key tasks use to find them.
///
/// A note is keyed by its `series_id`, else its own `id`. Notes with
/// neither are never emitted.
#[derive(Debug, Default)]
pub struct NoteIndex<'a> {
    notes: &'a [Record],
    by_key: HashMap<String, Vec<usize>>,
}

impl<'a> NoteIndex<'a> {
    pub fn new(notes: &'a [Record]) -> Self {
        let mut by_key: HashMap<String, Vec<usize>> = HashMap::new();
        for (index, note) in notes.iter().enumerate() {
            if let Some(key) = note.series_id().or_else(|| note.id()) {
                by_key.entry(key).or_default().push(index);
            }
        }
        Self { notes, by_key }
    }

    /// Indices of notes owned by a task: the task's `series_id` bucket,
    /// else its `id` bucket.
    pub fn owned_by(&self, task: &Record) -> &[usize] {
        task.series_id()
            .and_then(|key| self.by_key.get(&key))
            .or_else(|| task.id().and_then(|key| self.by_key.get(&key)))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn note(&self, index: usize) -> &'a Record {
        &self.notes[index]
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

/// Ordered emissions plus tasks that could not be placed.
#[derive(Debug, Default)]
pub struct Linearization<'a> {
    pub emissions: Vec<Emission<'a>>,
    /// Ids of tasks only reachable through a parent cycle.
    pub unreachable: Vec<String>,
    /// Tasks without an id.
    pub skipped: usize,
}

impl Linearization<'_> {
    pub fn task_count(&self) -> usize {
        self.emissions.iter().filter(|e| e.kind == EmissionKind::Task).count()
    }

    pub fn note_count(&self) -> usize {
        self.emissions.len() - self.task_count()
    }
}

/// Incremental forest walker. Use [`linearize`] for the full scan.
#[derive(Debug)]
pub struct Linearizer<'a, 'n> {
    tasks: &'a [Record],
    notes: &'n NoteIndex<'a>,
    ids: Vec<Option<String>>,
    known: HashSet<String>,
    children: HashMap<String, Vec<usize>>,
    emitted: HashSet<String>,
    claimed_notes: HashSet<usize>,
    emissions: Vec<Emission<'a>>,
}

impl<'a, 'n> Linearizer<'a, 'n> {
    pub fn new(tasks: &'a [Record], notes: &'n NoteIndex<'a>) -> Self {
        let ids: Vec<Option<String>> = tasks.iter().map(Record::id).collect();
        let known: HashSet<String> = ids.iter().flatten().cloned().collect();
        let mut children: HashMap<String, Vec<usize>> = HashMap::new();
        for (index, task) in tasks.iter().enumerate() {
            if let Some(parent) = task.parent_id().filter(|pid| known.contains(pid)) {
                children.entry(parent).or_default().push(index);
            }
        }
        Self {
            tasks,
            notes,
            ids,
            known,
            children,
            emitted: HashSet::new(),
            claimed_notes: HashSet::new(),
            emissions: Vec::new(),
        }
    }

    pub fn is_emitted(&self, id: &str) -> bool {
        self.emitted.contains(id)
    }

    /// Emit the subtree rooted at `tasks[index]` at `depth`.
    ///
    /// Tasks already emitted (and tasks without an id) are skipped, so
    /// calling this twice for the same task changes nothing.
    pub fn emit(&mut self, index: usize, depth: usize) {
        let (tasks, notes) = (self.tasks, self.notes);
        let mut stack = vec![(index, depth)];
        while let Some((current, depth)) = stack.pop() {
            let Some(id) = self.ids.get(current).cloned().flatten() else {
                continue;
            };
            if self.emitted.contains(&id) {
                continue;
            }
            let task = &tasks[current];
            self.emissions.push(Emission::task(task, depth));
            for &note in notes.owned_by(task) {
                if self.claimed_notes.insert(note) {
                    self.emissions.push(Emission::note(notes.note(note), depth));
                }
            }
            self.emitted.insert(id.clone());
            if let Some(children) = self.children.get(&id) {
                stack.extend(children.iter().rev().map(|&child| (child, depth + 1)));
            }
        }
    }

    /// Scan tasks in original order, emitting every root subtree.
    pub fn run(mut self) -> Linearization<'a> {
        let mut skipped = 0;
        for index in 0..self.tasks.len() {
            if self.ids[index].is_none() {
                skipped += 1;
                continue;
            }
            let waits_for_parent = self.tasks[index]
                .parent_id()
                .is_some_and(|pid| self.known.contains(&pid) && !self.emitted.contains(&pid));
            if waits_for_parent {
                continue;
            }
            self.emit(index, 1);
        }

        let mut unreachable = Vec::new();
        let mut seen = HashSet::new();
        for id in self.ids.iter().flatten() {
            if !self.emitted.contains(id) && seen.insert(id) {
                unreachable.push(id.clone());
            }
        }
        if !unreachable.is_empty() {
            warn!(
                count = unreachable.len(),
                ids = ?unreachable,
                "tasks unreachable through parent links (cycle)"
            );
        }
        if skipped > 0 {
            debug!(skipped, "skipped tasks without id");
        }

        Linearization {
            emissions: self.emissions,
            unreachable,
            skipped,
        }
    }
}

/// Order tasks and their notes depth-first.
pub fn linearize<'a>(tasks: &'a [Record], notes: &NoteIndex<'a>) -> Linearization<'a> {
    Linearizer::new(tasks, notes).run()
}
