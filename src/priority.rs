use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::Task;

/// Width of one priority tier in the composite key.
///
/// With 100, a task due 100 or more days out collides with the next tier's
/// base. Callers planning further ahead raise `tier_span` (e.g. 10000).
pub const DEFAULT_TIER_SPAN: i64 = 100;

/// Largest accepted `tier_span`; keeps every key far inside `i64`
pub const MAX_TIER_SPAN: i64 = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPolicy {
    pub tier_span: i64,
}

impl Default for KeyPolicy {
    fn default() -> Self {
        Self {
            tier_span: DEFAULT_TIER_SPAN,
        }
    }
}

impl KeyPolicy {
    pub fn new(tier_span: i64) -> Self {
        Self { tier_span }
    }

    /// Composite key: `tier_base * tier_span + days_left`, lower is more urgent.
    ///
    /// Overdue and due-today tasks count as zero days left, as do tasks
    /// without a due date. Saturates instead of wrapping.
    pub fn derive(&self, task: &Task, today: NaiveDate) -> i64 {
        let base = task.priority.tier_base().saturating_mul(self.tier_span);
        match task.due_date {
            Some(due) => base.saturating_add(days_left(due, today)),
            None => base,
        }
    }
}

/// Whole days from `today` until `due`, clamped at zero
pub fn days_left(due: NaiveDate, today: NaiveDate) -> i64 {
    (due - today).num_days().max(0)
}

pub fn derive_key(task: &Task, today: NaiveDate) -> i64 {
    KeyPolicy::default().derive(task, today)
}
