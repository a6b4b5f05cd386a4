use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::analytics::{self, Analytics};
use crate::error::PlannerError;
use crate::models::{
    CalendarEntry, CycleInput, CycleRecord, Event, EventDraft, Notification, Task, TaskChanges,
    TaskDraft,
};
use crate::notifications::today_notifications;
use crate::priority::KeyPolicy;
use crate::projection::{build_calendar, project_cycle, CycleProjection, DateRange};
use crate::queue::TaskQueue;
use crate::store::{Store, TaskDateField};

/// Everything the dashboard shows for one owner on one day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub tasks: Vec<Task>,
    pub events: Vec<Event>,
    pub cycle: Option<CycleRecord>,
    pub projection: Option<CycleProjection>,
    pub notifications: Vec<Notification>,
}

/// Request-scoped entry point: fetch an owner's records, then run the
/// in-memory core over them. Nothing computed here outlives the call.
pub struct Planner<S: Store> {
    store: S,
    policy: KeyPolicy,
}

impl<S: Store> Planner<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            policy: KeyPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: KeyPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn policy(&self) -> KeyPolicy {
        self.policy
    }

    /// All of the owner's tasks, most urgent first
    pub fn ordered_tasks(&self, owner: &str, today: NaiveDate) -> Result<Vec<Task>, PlannerError> {
        let tasks = self.store.find_tasks(owner)?;
        let queue = TaskQueue::from_tasks(tasks, &self.policy, today);
        tracing::debug!(owner, tasks = queue.len(), "ordered tasks");
        Ok(queue.snapshot_ordered())
    }

    pub fn notifications(&self, owner: &str, today: NaiveDate) -> Result<Vec<Notification>, PlannerError> {
        let window = DateRange::day(today);
        let tasks = self
            .store
            .find_tasks_in_range(owner, TaskDateField::DueDate, &window)?;
        let events = self.store.find_events_in_range(owner, &window)?;
        let cycle = self.store.find_latest_cycle(owner)?;
        Ok(today_notifications(&tasks, &events, cycle.as_ref(), today))
    }

    pub fn calendar(&self, owner: &str, range: &DateRange) -> Result<Vec<CalendarEntry>, PlannerError> {
        let tasks = self
            .store
            .find_tasks_in_range(owner, TaskDateField::DueDate, range)?;
        let events = self.store.find_events_in_range(owner, range)?;
        let cycle = self.store.find_latest_cycle(owner)?;
        let entries = build_calendar(&tasks, &events, cycle.as_ref(), range)?;
        tracing::debug!(
            owner,
            start = %range.start(),
            end = %range.end(),
            entries = entries.len(),
            "calendar projected"
        );
        Ok(entries)
    }

    pub fn dashboard(&self, owner: &str, today: NaiveDate) -> Result<Dashboard, PlannerError> {
        let tasks = self.ordered_tasks(owner, today)?;
        let events = self.store.find_events(owner, true)?;
        let cycle = self.store.find_latest_cycle(owner)?;
        let projection = cycle.as_ref().map(project_cycle).transpose()?;
        let notifications = self.notifications(owner, today)?;
        Ok(Dashboard {
            tasks,
            events,
            cycle,
            projection,
            notifications,
        })
    }

    pub fn analytics(&self, owner: &str, today: NaiveDate) -> Result<Analytics, PlannerError> {
        let tasks = self.store.find_tasks(owner)?;
        let events = self.store.find_events(owner, false)?;
        Ok(analytics::summarize(&tasks, &events, today))
    }

    pub fn add_task(&self, owner: &str, draft: &TaskDraft, now: DateTime<Utc>) -> Result<Task, PlannerError> {
        self.store.insert_task(owner, draft, now)
    }

    pub fn update_task(&self, owner: &str, id: i64, changes: &TaskChanges) -> Result<Task, PlannerError> {
        self.store.update_task(owner, id, changes)
    }

    pub fn complete_task(&self, owner: &str, id: i64, now: DateTime<Utc>) -> Result<Task, PlannerError> {
        self.store.complete_task(owner, id, now)
    }

    pub fn delete_task(&self, owner: &str, id: i64) -> Result<(), PlannerError> {
        self.store.delete_task(owner, id)
    }

    pub fn events(&self, owner: &str) -> Result<Vec<Event>, PlannerError> {
        self.store.find_events(owner, true)
    }

    pub fn add_event(&self, owner: &str, draft: &EventDraft, now: DateTime<Utc>) -> Result<Event, PlannerError> {
        self.store.insert_event(owner, draft, now)
    }

    pub fn delete_event(&self, owner: &str, id: i64) -> Result<(), PlannerError> {
        self.store.delete_event(owner, id)
    }

    /// Validate raw input, then record the cycle; invalid lengths never reach the store
    pub fn track_cycle(&self, owner: &str, input: &CycleInput, now: DateTime<Utc>) -> Result<CycleRecord, PlannerError> {
        let cycle = input.validate()?;
        self.store.insert_cycle(owner, &cycle, now)
    }

    pub fn cycles(&self, owner: &str) -> Result<Vec<CycleRecord>, PlannerError> {
        self.store.find_cycles(owner)
    }

    pub fn delete_account(&self, owner: &str) -> Result<usize, PlannerError> {
        let removed = self.store.delete_owner_data(owner)?;
        tracing::warn!(owner, removed, "account data removed");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;
    use crate::models::{NotificationKind, Priority};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn planner() -> Planner<Database> {
        Planner::new(Database::open_in_memory().unwrap())
    }

    #[test]
    fn ordered_tasks_follow_composite_key() {
        let planner = planner();
        let now = Utc::now();
        let today = date(2024, 3, 1);
        let low = planner
            .add_task("ada", &TaskDraft::new("low", Priority::Low, Some(today)), now)
            .unwrap();
        let high_late = planner
            .add_task("ada", &TaskDraft::new("high later", Priority::High, Some(date(2024, 3, 9))), now)
            .unwrap();
        let high_soon = planner
            .add_task("ada", &TaskDraft::new("high soon", Priority::High, Some(date(2024, 3, 2))), now)
            .unwrap();

        let ids: Vec<i64> = planner
            .ordered_tasks("ada", today)
            .unwrap()
            .iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec![high_soon.id, high_late.id, low.id]);
        assert!(planner.ordered_tasks("bob", today).unwrap().is_empty());
    }

    #[test]
    fn invalid_cycle_input_is_rejected_before_storage() {
        let planner = planner();
        let input = CycleInput::new(date(2024, 1, 1), -3);
        assert!(matches!(
            planner.track_cycle("ada", &input, Utc::now()),
            Err(PlannerError::InvalidCycleInput(_))
        ));
        let oversized = CycleInput::new(date(2024, 1, 1), 28).with_period_length(50_000_000);
        assert!(matches!(
            planner.track_cycle("ada", &oversized, Utc::now()),
            Err(PlannerError::InvalidCycleInput(_))
        ));
        assert!(planner.cycles("ada").unwrap().is_empty());
    }

    #[test]
    fn dashboard_bundles_projection_and_notifications() {
        let planner = planner();
        let now = Utc::now();
        let today = date(2024, 1, 27);
        planner
            .track_cycle("ada", &CycleInput::new(date(2024, 1, 1), 28), now)
            .unwrap();
        planner
            .add_task("ada", &TaskDraft::new("today", Priority::Medium, Some(today)), now)
            .unwrap();

        let dashboard = planner.dashboard("ada", today).unwrap();
        assert_eq!(dashboard.tasks.len(), 1);
        let projection = dashboard.projection.unwrap();
        assert_eq!(projection.next_date, date(2024, 1, 29));
        let kinds: Vec<NotificationKind> = dashboard.notifications.iter().map(|n| n.kind).collect();
        assert_eq!(kinds, vec![NotificationKind::Task, NotificationKind::Cycle]);
        // The tracked cycle also shows up as an event on its next date
        assert_eq!(dashboard.events.len(), 1);
    }
}
