//! Date-window projection: cycle forecasts and the unified calendar view.

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::error::PlannerError;
use crate::models::{CalendarEntry, ColorPair, CycleRecord, EntryKind, Event, Priority, Task};

pub const HIGH_COLORS: ColorPair = ColorPair { background: "#ff9f89", border: "#e57373" };
pub const MEDIUM_COLORS: ColorPair = ColorPair { background: "#ffcc80", border: "#ffb74d" };
pub const LOW_COLORS: ColorPair = ColorPair { background: "#a5d6a7", border: "#81c784" };
pub const WORKOUT_COLORS: ColorPair = ColorPair { background: "#90caf9", border: "#64b5f6" };
pub const STUDY_COLORS: ColorPair = ColorPair { background: "#ce93d8", border: "#ba68c8" };
pub const OTHER_EVENT_COLORS: ColorPair = ColorPair { background: "#80deea", border: "#4dd0e1" };
pub const PERIOD_COLORS: ColorPair = ColorPair { background: "#f48fb1", border: "#ec407a" };
pub const FERTILITY_COLORS: ColorPair = ColorPair { background: "#c5e1a5", border: "#aed581" };

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Half-open date range `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, PlannerError> {
        if end < start {
            return Err(PlannerError::InvalidRange(format!(
                "end {} is before start {}",
                end, start
            )));
        }
        Ok(Self { start, end })
    }

    /// Parse date-only `YYYY-MM-DD` bounds; timestamps are rejected
    pub fn parse(start: &str, end: &str) -> Result<Self, PlannerError> {
        Self::new(parse_bound(start)?, parse_bound(end)?)
    }

    /// The calendar month containing `date`
    pub fn month_of(date: NaiveDate) -> Self {
        let start = date.with_day(1).unwrap_or(date);
        let end = start
            .checked_add_months(chrono::Months::new(1))
            .unwrap_or(NaiveDate::MAX);
        Self { start, end }
    }

    /// A single day
    pub fn day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date.succ_opt().unwrap_or(NaiveDate::MAX),
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

fn parse_bound(value: &str) -> Result<NaiveDate, PlannerError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|e| {
        PlannerError::InvalidRange(format!("'{}' is not a YYYY-MM-DD date: {}", value, e))
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleProjection {
    pub next_date: NaiveDate,
    pub period_days: Vec<NaiveDate>,
    pub fertility_window: (NaiveDate, NaiveDate),
}

impl CycleProjection {
    /// Every day of the fertility window, start and end inclusive
    pub fn fertility_days(&self) -> Vec<NaiveDate> {
        let (start, end) = self.fertility_window;
        start.iter_days().take_while(|day| *day <= end).collect()
    }
}

fn validate_record(record: &CycleRecord) -> Result<(), PlannerError> {
    if record.cycle_length == 0
        || record.period_length == 0
        || record.period_length > record.cycle_length
    {
        return Err(PlannerError::InvalidCycleInput(format!(
            "stored cycle {} has cycle length {} and period length {}",
            record.id, record.cycle_length, record.period_length
        )));
    }
    Ok(())
}

pub fn project_cycle(record: &CycleRecord) -> Result<CycleProjection, PlannerError> {
    validate_record(record)?;

    let period_days = record
        .next_date
        .iter_days()
        .take(record.period_length as usize)
        .collect();

    Ok(CycleProjection {
        next_date: record.next_date,
        period_days,
        fertility_window: (record.fertility_start, record.fertility_end),
    })
}

pub fn task_colors(priority: Priority) -> ColorPair {
    match priority {
        Priority::High => HIGH_COLORS,
        Priority::Medium => MEDIUM_COLORS,
        Priority::Low | Priority::Unspecified => LOW_COLORS,
    }
}

pub fn event_colors(category: &str) -> ColorPair {
    match category {
        "Workout" => WORKOUT_COLORS,
        "Study" => STUDY_COLORS,
        _ => OTHER_EVENT_COLORS,
    }
}

/// Project tasks, events and the cycle forecast onto the days of `range`.
///
/// Output is grouped by source: tasks, events, period days, fertility days.
/// Callers wanting date order sort it themselves.
pub fn build_calendar(
    tasks: &[Task],
    events: &[Event],
    cycle: Option<&CycleRecord>,
    range: &DateRange,
) -> Result<Vec<CalendarEntry>, PlannerError> {
    let mut entries = Vec::new();

    for task in tasks {
        let Some(due) = task.due_date else { continue };
        if !range.contains(due) {
            continue;
        }
        let mut entry = CalendarEntry::new(
            task.id.to_string(),
            task.title.clone(),
            due,
            task_colors(task.priority),
            EntryKind::Task,
        );
        entry.completed = Some(task.completed);
        entries.push(entry);
    }

    for event in events.iter().filter(|event| range.contains(event.date)) {
        entries.push(CalendarEntry::new(
            event.id.to_string(),
            event.title.clone(),
            event.date,
            event_colors(&event.category),
            EntryKind::Event,
        ));
    }

    if let Some(record) = cycle {
        validate_record(record)?;
        let period = Span {
            first: record.next_date,
            len: i64::from(record.period_length),
            id_prefix: "cycle",
            label: "Period",
            colors: PERIOD_COLORS,
            kind: EntryKind::Cycle,
        };
        let fertility = Span {
            first: record.fertility_start,
            len: (record.fertility_end - record.fertility_start).num_days() + 1,
            id_prefix: "fertility",
            label: "Fertility Window",
            colors: FERTILITY_COLORS,
            kind: EntryKind::Fertility,
        };
        period.push_within(range, &mut entries);
        fertility.push_within(range, &mut entries);
    }

    Ok(entries)
}

/// Consecutive days `[first, first + len)` drawn as one labelled run
struct Span {
    first: NaiveDate,
    len: i64,
    id_prefix: &'static str,
    label: &'static str,
    colors: ColorPair,
    kind: EntryKind,
}

impl Span {
    /// Only the days inside `range` are visited. The first day of the span
    /// carries the label, even when it falls outside the range.
    fn push_within(&self, range: &DateRange, entries: &mut Vec<CalendarEntry>) {
        let len = self.len.max(0);
        let from = (range.start - self.first).num_days().clamp(0, len);
        let to = (range.end - self.first).num_days().clamp(from, len);
        for i in from..to {
            let title = if i == 0 { self.label } else { "" };
            entries.push(CalendarEntry::new(
                format!("{}_{}", self.id_prefix, i),
                title.to_string(),
                shift_days(self.first, i),
                self.colors,
                self.kind,
            ));
        }
    }
}

/// Days from `today` until `date`; negative when `date` is past
pub fn days_until(date: NaiveDate, today: NaiveDate) -> i64 {
    (date - today).num_days()
}

/// Shift `date` by whole days, saturating at the calendar bounds
pub fn shift_days(date: NaiveDate, days: i64) -> NaiveDate {
    Duration::try_days(days)
        .and_then(|delta| date.checked_add_signed(delta))
        .unwrap_or(if days < 0 { NaiveDate::MIN } else { NaiveDate::MAX })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CycleInput, DEFAULT_CATEGORY};
    use chrono::Utc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn cycle(last: NaiveDate, length: i64, period: i64) -> CycleRecord {
        let new = CycleInput::new(last, length)
            .with_period_length(period)
            .validate()
            .unwrap();
        CycleRecord {
            id: 1,
            owner: "ada".to_string(),
            last_date: new.last_date,
            cycle_length: new.cycle_length,
            period_length: new.period_length,
            next_date: new.next_date,
            fertility_start: new.fertility_start,
            fertility_end: new.fertility_end,
            tracked_at: Utc::now(),
        }
    }

    fn task(id: i64, priority: Priority, due: NaiveDate) -> Task {
        Task {
            id,
            owner: "ada".to_string(),
            title: format!("task {}", id),
            description: None,
            priority,
            due_date: Some(due),
            category: DEFAULT_CATEGORY.to_string(),
            completed: false,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    fn event(id: i64, category: &str, on: NaiveDate) -> Event {
        Event {
            id,
            owner: "ada".to_string(),
            title: format!("event {}", id),
            date: on,
            category: category.to_string(),
            description: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn projects_period_days_and_fertility_window() {
        let projection = project_cycle(&cycle(date(2024, 1, 1), 28, 5)).unwrap();
        assert_eq!(projection.next_date, date(2024, 1, 29));
        assert_eq!(
            projection.period_days,
            vec![
                date(2024, 1, 29),
                date(2024, 1, 30),
                date(2024, 1, 31),
                date(2024, 2, 1),
                date(2024, 2, 2),
            ]
        );
        assert_eq!(projection.fertility_window, (date(2024, 1, 13), date(2024, 1, 17)));
        assert_eq!(projection.fertility_days().len(), 5);
    }

    #[test]
    fn zero_length_stored_cycle_is_invalid() {
        let mut record = cycle(date(2024, 1, 1), 28, 5);
        record.period_length = 0;
        assert!(matches!(project_cycle(&record), Err(PlannerError::InvalidCycleInput(_))));
    }

    #[test]
    fn task_inside_range_gets_one_entry_with_tier_colors() {
        let tasks = vec![task(7, Priority::High, date(2024, 3, 10))];
        let march = DateRange::new(date(2024, 3, 1), date(2024, 4, 1)).unwrap();
        let entries = build_calendar(&tasks, &[], None, &march).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, "7");
        assert_eq!(entries[0].start, date(2024, 3, 10));
        assert_eq!(entries[0].background_color, HIGH_COLORS.background);
        assert_eq!(entries[0].border_color, HIGH_COLORS.border);
        assert_eq!(entries[0].completed, Some(false));

        let april = DateRange::new(date(2024, 4, 1), date(2024, 5, 1)).unwrap();
        assert!(build_calendar(&tasks, &[], None, &april).unwrap().is_empty());
    }

    #[test]
    fn range_end_is_exclusive() {
        let tasks = vec![task(1, Priority::Low, date(2024, 4, 1))];
        let march = DateRange::new(date(2024, 3, 1), date(2024, 4, 1)).unwrap();
        assert!(build_calendar(&tasks, &[], None, &march).unwrap().is_empty());
    }

    #[test]
    fn unrecognized_tier_and_category_fall_back() {
        let tasks = vec![task(1, Priority::Unspecified, date(2024, 3, 2))];
        let events = vec![
            event(2, "Workout", date(2024, 3, 3)),
            event(3, "Study", date(2024, 3, 4)),
            event(4, "Health", date(2024, 3, 5)),
        ];
        let range = DateRange::month_of(date(2024, 3, 15));
        let entries = build_calendar(&tasks, &events, None, &range).unwrap();
        assert_eq!(entries[0].background_color, LOW_COLORS.background);
        assert_eq!(entries[1].background_color, WORKOUT_COLORS.background);
        assert_eq!(entries[2].background_color, STUDY_COLORS.background);
        assert_eq!(entries[3].background_color, OTHER_EVENT_COLORS.background);
        assert!(entries[1..].iter().all(|e| e.completed.is_none()));
    }

    #[test]
    fn cycle_days_are_clipped_to_range_and_labelled_once() {
        let record = cycle(date(2024, 1, 1), 28, 5);
        let february = DateRange::month_of(date(2024, 2, 10));
        let entries = build_calendar(&[], &[], Some(&record), &february).unwrap();

        let period: Vec<&CalendarEntry> =
            entries.iter().filter(|e| e.kind == EntryKind::Cycle).collect();
        assert_eq!(period.len(), 2);
        assert_eq!(period[0].id, "cycle_3");
        assert_eq!(period[0].start, date(2024, 2, 1));
        // The labelled first day fell in January
        assert!(period.iter().all(|e| e.title.is_empty()));
        assert!(entries.iter().all(|e| e.kind != EntryKind::Fertility));

        let january = DateRange::month_of(date(2024, 1, 20));
        let entries = build_calendar(&[], &[], Some(&record), &january).unwrap();
        let kinds: Vec<EntryKind> = entries.iter().map(|e| e.kind).collect();
        assert_eq!(kinds.iter().filter(|k| **k == EntryKind::Cycle).count(), 3);
        assert_eq!(kinds.iter().filter(|k| **k == EntryKind::Fertility).count(), 5);
        let fertility_first = entries
            .iter()
            .find(|e| e.id == "fertility_0")
            .unwrap();
        assert_eq!(fertility_first.title, "Fertility Window");
        assert_eq!(fertility_first.start, date(2024, 1, 13));
        let period_first = entries.iter().find(|e| e.id == "cycle_0").unwrap();
        assert_eq!(period_first.title, "Period");
    }

    #[test]
    fn long_period_only_materializes_days_in_range() {
        let record = cycle(date(2024, 1, 1), 365, 365);
        let january = DateRange::month_of(date(2025, 1, 10));
        let entries = build_calendar(&[], &[], Some(&record), &january).unwrap();
        assert_eq!(entries.len(), 31);
        assert_eq!(entries[0].id, "cycle_1");
        assert_eq!(entries[0].start, date(2025, 1, 1));
        assert_eq!(entries[30].id, "cycle_31");
    }

    #[test]
    fn stored_period_longer_than_cycle_is_invalid() {
        let mut record = cycle(date(2024, 1, 1), 28, 5);
        record.period_length = 50_000_000;
        let range = DateRange::month_of(date(2024, 1, 1));
        assert!(matches!(
            build_calendar(&[], &[], Some(&record), &range),
            Err(PlannerError::InvalidCycleInput(_))
        ));
        assert!(matches!(project_cycle(&record), Err(PlannerError::InvalidCycleInput(_))));
    }

    #[test]
    fn entries_are_grouped_by_source() {
        let record = cycle(date(2024, 2, 20), 14, 2);
        let tasks = vec![task(1, Priority::Medium, date(2024, 3, 20))];
        let events = vec![event(2, "Study", date(2024, 3, 1))];
        let range = DateRange::month_of(date(2024, 3, 1));
        let entries = build_calendar(&tasks, &events, Some(&record), &range).unwrap();
        let kinds: Vec<EntryKind> = entries.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![EntryKind::Task, EntryKind::Event, EntryKind::Cycle, EntryKind::Cycle]
        );
    }

    #[test]
    fn building_twice_is_identical() {
        let record = cycle(date(2024, 1, 1), 28, 5);
        let tasks = vec![task(1, Priority::High, date(2024, 1, 15))];
        let events = vec![event(2, "Workout", date(2024, 1, 16))];
        let range = DateRange::month_of(date(2024, 1, 1));
        let first = build_calendar(&tasks, &events, Some(&record), &range).unwrap();
        let second = build_calendar(&tasks, &events, Some(&record), &range).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn range_validation() {
        assert!(matches!(
            DateRange::new(date(2024, 3, 2), date(2024, 3, 1)),
            Err(PlannerError::InvalidRange(_))
        ));
        let empty = DateRange::new(date(2024, 3, 1), date(2024, 3, 1)).unwrap();
        assert!(empty.is_empty());
        assert!(!empty.contains(date(2024, 3, 1)));

        let parsed = DateRange::parse("2024-03-01", "2024-04-01").unwrap();
        assert_eq!(parsed.start(), date(2024, 3, 1));
        assert!(matches!(
            DateRange::parse("2024-03-01T00:00:00Z", "2024-04-01"),
            Err(PlannerError::InvalidRange(_))
        ));
    }

    #[test]
    fn december_rolls_into_next_year() {
        let range = DateRange::month_of(date(2024, 12, 25));
        assert_eq!(range.start(), date(2024, 12, 1));
        assert_eq!(range.end(), date(2025, 1, 1));
    }
}
