use chrono::{DateTime, Utc};

use crate::error::PlannerError;
use crate::models::{CycleRecord, Event, EventDraft, NewCycle, Task, TaskChanges, TaskDraft};
use crate::projection::DateRange;

/// Date column a task range query filters on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskDateField {
    DueDate,
    CompletedAt,
}

/// Per-owner record storage the planner reads from and writes through.
///
/// Every query and mutation is partitioned by `owner`; a record id that
/// belongs to another owner behaves exactly like a missing one.
pub trait Store {
    fn find_tasks(&self, owner: &str) -> Result<Vec<Task>, PlannerError>;

    fn find_tasks_in_range(
        &self,
        owner: &str,
        field: TaskDateField,
        range: &DateRange,
    ) -> Result<Vec<Task>, PlannerError>;

    fn find_events(&self, owner: &str, sorted_by_date: bool) -> Result<Vec<Event>, PlannerError>;

    fn find_events_in_range(&self, owner: &str, range: &DateRange) -> Result<Vec<Event>, PlannerError>;

    /// Most recently recorded cycle
    fn find_latest_cycle(&self, owner: &str) -> Result<Option<CycleRecord>, PlannerError>;

    /// Cycle history, latest period start first
    fn find_cycles(&self, owner: &str) -> Result<Vec<CycleRecord>, PlannerError>;

    fn insert_task(&self, owner: &str, draft: &TaskDraft, now: DateTime<Utc>) -> Result<Task, PlannerError>;

    fn update_task(&self, owner: &str, id: i64, changes: &TaskChanges) -> Result<Task, PlannerError>;

    fn complete_task(&self, owner: &str, id: i64, now: DateTime<Utc>) -> Result<Task, PlannerError>;

    fn delete_task(&self, owner: &str, id: i64) -> Result<(), PlannerError>;

    fn insert_event(&self, owner: &str, draft: &EventDraft, now: DateTime<Utc>) -> Result<Event, PlannerError>;

    fn delete_event(&self, owner: &str, id: i64) -> Result<(), PlannerError>;

    /// Store a cycle and the "Menstrual Cycle" event on its next date
    fn insert_cycle(&self, owner: &str, cycle: &NewCycle, now: DateTime<Utc>) -> Result<CycleRecord, PlannerError>;

    /// Remove every task, event and cycle of `owner`, returning how many rows went
    fn delete_owner_data(&self, owner: &str) -> Result<usize, PlannerError>;
}
