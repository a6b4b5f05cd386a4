//! Lazy-deletion priority queue over tasks.
//!
//! Entries live in an append-only arena; the heap itself is an array of
//! arena slots ordered by `(key, seq)`. Removing a task only flags its entry,
//! and flagged entries are skipped when they surface at the root.

use chrono::NaiveDate;
use std::collections::HashMap;

use crate::error::PlannerError;
use crate::models::Task;
use crate::priority::KeyPolicy;

#[derive(Debug, Clone)]
pub struct QueueEntry {
    pub key: i64,
    /// Insertion counter; breaks ties first-in-first-served
    pub seq: u64,
    pub task: Task,
    pub removed: bool,
}

#[derive(Debug, Default)]
pub struct TaskQueue {
    entries: Vec<QueueEntry>,
    heap: Vec<usize>,
    live: HashMap<i64, usize>,
    counter: u64,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a queue keyed by `policy` for every task
    pub fn from_tasks<I>(tasks: I, policy: &KeyPolicy, today: NaiveDate) -> Self
    where
        I: IntoIterator<Item = Task>,
    {
        let mut queue = Self::new();
        for task in tasks {
            let key = policy.derive(&task, today);
            queue.add_task(task, key);
        }
        queue
    }

    /// Insert a task, superseding any live entry for the same id
    pub fn add_task(&mut self, task: Task, key: i64) {
        if self.live.contains_key(&task.id) {
            // Cannot fail: the id was just found live
            let _ = self.remove_task(task.id);
        }

        let seq = self.counter;
        self.counter += 1;

        let slot = self.entries.len();
        let id = task.id;
        self.entries.push(QueueEntry {
            key,
            seq,
            task,
            removed: false,
        });
        heap_push(&mut self.heap, &self.entries, slot);
        self.live.insert(id, slot);
    }

    /// Tombstone the live entry for `task_id`; the heap is not compacted
    pub fn remove_task(&mut self, task_id: i64) -> Result<(), PlannerError> {
        let slot = self
            .live
            .remove(&task_id)
            .ok_or_else(|| PlannerError::task_not_found(task_id))?;
        self.entries[slot].removed = true;
        Ok(())
    }

    /// Re-key a task. A task that was never queued is simply inserted.
    pub fn update_task(&mut self, task: Task, key: i64) {
        if let Err(err) = self.remove_task(task.id) {
            tracing::warn!(task_id = task.id, %err, "update of unqueued task, inserting");
        }
        self.add_task(task, key);
    }

    pub fn pop_min(&mut self) -> Result<Task, PlannerError> {
        while let Some(slot) = heap_pop(&mut self.heap, &self.entries) {
            let entry = &self.entries[slot];
            if entry.removed {
                continue;
            }
            self.live.remove(&entry.task.id);
            return Ok(entry.task.clone());
        }
        Err(PlannerError::EmptyQueue)
    }

    /// Live entries in ascending `(key, seq)` order, leaving the queue untouched
    pub fn ordered_entries(&self) -> Vec<&QueueEntry> {
        let mut heap = self.heap.clone();
        let mut ordered = Vec::with_capacity(self.live.len());
        while let Some(slot) = heap_pop(&mut heap, &self.entries) {
            let entry = &self.entries[slot];
            if !entry.removed {
                ordered.push(entry);
            }
        }
        ordered
    }

    pub fn snapshot_ordered(&self) -> Vec<Task> {
        self.ordered_entries()
            .into_iter()
            .map(|entry| entry.task.clone())
            .collect()
    }

    pub fn contains(&self, task_id: i64) -> bool {
        self.live.contains_key(&task_id)
    }

    /// Number of live tasks
    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Physical heap size, tombstones included
    pub fn heap_len(&self) -> usize {
        self.heap.len()
    }
}

fn precedes(entries: &[QueueEntry], a: usize, b: usize) -> bool {
    let (left, right) = (&entries[a], &entries[b]);
    (left.key, left.seq) < (right.key, right.seq)
}

fn heap_push(heap: &mut Vec<usize>, entries: &[QueueEntry], slot: usize) {
    heap.push(slot);
    let mut pos = heap.len() - 1;
    while pos > 0 {
        let parent = (pos - 1) / 2;
        if !precedes(entries, heap[pos], heap[parent]) {
            break;
        }
        heap.swap(pos, parent);
        pos = parent;
    }
}

fn heap_pop(heap: &mut Vec<usize>, entries: &[QueueEntry]) -> Option<usize> {
    if heap.is_empty() {
        return None;
    }
    let last = heap.len() - 1;
    heap.swap(0, last);
    let root = heap.pop();

    let len = heap.len();
    let mut pos = 0;
    loop {
        let left = 2 * pos + 1;
        if left >= len {
            break;
        }
        let right = left + 1;
        let mut smallest = left;
        if right < len && precedes(entries, heap[right], heap[left]) {
            smallest = right;
        }
        if !precedes(entries, heap[smallest], heap[pos]) {
            break;
        }
        heap.swap(pos, smallest);
        pos = smallest;
    }
    root
}
