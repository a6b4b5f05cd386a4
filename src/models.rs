use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::PlannerError;

/// Days between the projected fertility window start and the next cycle date
pub const FERTILITY_START_OFFSET_DAYS: i64 = 16;
/// Days between the projected fertility window end and the next cycle date
pub const FERTILITY_END_OFFSET_DAYS: i64 = 12;
pub const DEFAULT_PERIOD_LENGTH: i64 = 5;
pub const DEFAULT_CATEGORY: &str = "General";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Priority {
    High,
    Medium,
    Low,
    Unspecified,
}

impl Priority {
    /// Base of the composite ordering key; lower sorts first
    pub fn tier_base(self) -> i64 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
            Priority::Unspecified => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
            Priority::Unspecified => "Unspecified",
        }
    }

    /// Stored tier names are matched exactly; anything else is unranked
    pub fn parse(value: &str) -> Self {
        match value {
            "High" => Priority::High,
            "Medium" => Priority::Medium,
            "Low" => Priority::Low,
            _ => Priority::Unspecified,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Priority {
    fn from(value: String) -> Self {
        Priority::parse(&value)
    }
}

impl From<Priority> for String {
    fn from(value: Priority) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub owner: String,
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
    pub category: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Completion flag and timestamp always move together
    pub fn mark_completed(&mut self, now: DateTime<Utc>) {
        self.completed = true;
        self.completed_at = Some(now);
    }
}

/// Fields supplied when creating a task; the store assigns id and timestamps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
    pub category: String,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>, priority: Priority, due_date: Option<NaiveDate>) -> Self {
        Self {
            title: title.into(),
            description: None,
            priority,
            due_date,
            category: DEFAULT_CATEGORY.to_string(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Partial update for an existing task; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub due_date: Option<NaiveDate>,
    pub category: Option<String>,
}

impl TaskChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
            && self.category.is_none()
    }

    pub fn apply(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = Some(description.clone());
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = Some(due_date);
        }
        if let Some(category) = &self.category {
            task.category = category.clone();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub owner: String,
    pub title: String,
    pub date: NaiveDate,
    pub category: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDraft {
    pub title: String,
    pub date: NaiveDate,
    pub category: String,
    pub description: Option<String>,
}

impl EventDraft {
    pub fn new(title: impl Into<String>, date: NaiveDate, category: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            date,
            category: category.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Raw cycle tracking input, as typed by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleInput {
    pub last_date: NaiveDate,
    pub cycle_length: i64,
    pub period_length: i64,
}

impl CycleInput {
    pub fn new(last_date: NaiveDate, cycle_length: i64) -> Self {
        Self {
            last_date,
            cycle_length,
            period_length: DEFAULT_PERIOD_LENGTH,
        }
    }

    pub fn with_period_length(mut self, period_length: i64) -> Self {
        self.period_length = period_length;
        self
    }

    /// Reject non-positive lengths, or a period longer than the cycle, and derive the stored dates
    pub fn validate(&self) -> Result<NewCycle, PlannerError> {
        let cycle_length = positive_length("cycle length", self.cycle_length)?;
        let period_length = positive_length("period length", self.period_length)?;
        if period_length > cycle_length {
            return Err(PlannerError::InvalidCycleInput(format!(
                "period length {} exceeds cycle length {}",
                period_length, cycle_length
            )));
        }

        let next_date = Duration::try_days(self.cycle_length)
            .and_then(|length| self.last_date.checked_add_signed(length))
            .ok_or_else(|| {
                PlannerError::InvalidCycleInput(format!(
                    "cycle length {} overflows the calendar",
                    self.cycle_length
                ))
            })?;

        Ok(NewCycle {
            last_date: self.last_date,
            cycle_length,
            period_length,
            next_date,
            fertility_start: next_date - Duration::days(FERTILITY_START_OFFSET_DAYS),
            fertility_end: next_date - Duration::days(FERTILITY_END_OFFSET_DAYS),
        })
    }
}

fn positive_length(name: &str, value: i64) -> Result<u32, PlannerError> {
    if value <= 0 {
        return Err(PlannerError::InvalidCycleInput(format!(
            "{} must be a positive number of days, got {}",
            name, value
        )));
    }
    u32::try_from(value).map_err(|_| {
        PlannerError::InvalidCycleInput(format!("{} of {} days is too large", name, value))
    })
}

/// Validated cycle with derived dates, not yet stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewCycle {
    pub last_date: NaiveDate,
    pub cycle_length: u32,
    pub period_length: u32,
    pub next_date: NaiveDate,
    pub fertility_start: NaiveDate,
    pub fertility_end: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleRecord {
    pub id: i64,
    pub owner: String,
    pub last_date: NaiveDate,
    pub cycle_length: u32,
    pub period_length: u32,
    pub next_date: NaiveDate,
    pub fertility_start: NaiveDate,
    pub fertility_end: NaiveDate,
    pub tracked_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Task,
    Event,
    Cycle,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub due: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Task,
    Event,
    Cycle,
    Fertility,
}

/// Background and border color of a calendar entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorPair {
    pub background: &'static str,
    pub border: &'static str,
}

/// One calendar widget item; field names follow the widget's JSON contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEntry {
    pub id: String,
    pub title: String,
    pub start: NaiveDate,
    pub all_day: bool,
    pub background_color: String,
    pub border_color: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl CalendarEntry {
    pub fn new(id: String, title: String, start: NaiveDate, colors: ColorPair, kind: EntryKind) -> Self {
        Self {
            id,
            title,
            start,
            all_day: true,
            background_color: colors.background.to_string(),
            border_color: colors.border.to_string(),
            kind,
            completed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn unknown_priority_strings_are_unspecified() {
        assert_eq!(Priority::parse("High"), Priority::High);
        assert_eq!(Priority::parse("high"), Priority::Unspecified);
        assert_eq!(Priority::parse(""), Priority::Unspecified);
        assert_eq!(Priority::Unspecified.tier_base(), 3);
    }

    #[test]
    fn priority_serializes_as_plain_string() {
        let json = serde_json::to_string(&Priority::Medium).unwrap();
        assert_eq!(json, "\"Medium\"");
        let parsed: Priority = serde_json::from_str("\"Urgent\"").unwrap();
        assert_eq!(parsed, Priority::Unspecified);
    }

    #[test]
    fn cycle_input_derives_next_date_and_fertility_window() {
        let cycle = CycleInput::new(date(2024, 1, 1), 28).validate().unwrap();
        assert_eq!(cycle.next_date, date(2024, 1, 29));
        assert_eq!(cycle.fertility_start, date(2024, 1, 13));
        assert_eq!(cycle.fertility_end, date(2024, 1, 17));
        assert_eq!(cycle.period_length, 5);
    }

    #[test]
    fn cycle_input_rejects_non_positive_lengths() {
        let zero_cycle = CycleInput::new(date(2024, 1, 1), 0).validate();
        assert!(matches!(zero_cycle, Err(PlannerError::InvalidCycleInput(_))));

        let negative_period = CycleInput::new(date(2024, 1, 1), 28)
            .with_period_length(-2)
            .validate();
        assert!(matches!(negative_period, Err(PlannerError::InvalidCycleInput(_))));
    }

    #[test]
    fn period_longer_than_cycle_is_rejected() {
        let huge = CycleInput::new(date(2024, 1, 1), 28)
            .with_period_length(50_000_000)
            .validate();
        assert!(matches!(huge, Err(PlannerError::InvalidCycleInput(_))));

        let whole_cycle = CycleInput::new(date(2024, 1, 1), 28)
            .with_period_length(28)
            .validate()
            .unwrap();
        assert_eq!(whole_cycle.period_length, 28);
    }

    #[test]
    fn calendar_entry_uses_widget_field_names() {
        let colors = ColorPair { background: "#f48fb1", border: "#ec407a" };
        let entry = CalendarEntry::new(
            "cycle_0".to_string(),
            "Period".to_string(),
            date(2024, 1, 29),
            colors,
            EntryKind::Cycle,
        );
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["start"], "2024-01-29");
        assert_eq!(value["allDay"], true);
        assert_eq!(value["backgroundColor"], "#f48fb1");
        assert_eq!(value["type"], "cycle");
        assert!(value.get("completed").is_none());
    }

    #[test]
    fn changes_apply_only_set_fields() {
        let mut task = Task {
            id: 1,
            owner: "ada".to_string(),
            title: "Write report".to_string(),
            description: None,
            priority: Priority::Low,
            due_date: Some(date(2024, 3, 1)),
            category: DEFAULT_CATEGORY.to_string(),
            completed: false,
            created_at: Utc::now(),
            completed_at: None,
        };
        let changes = TaskChanges {
            priority: Some(Priority::High),
            ..TaskChanges::default()
        };
        changes.apply(&mut task);
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.title, "Write report");
        assert_eq!(task.due_date, Some(date(2024, 3, 1)));
    }
}
