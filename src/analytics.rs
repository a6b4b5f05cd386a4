use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{Event, Priority, Task};
use crate::projection::shift_days;

pub const TREND_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    /// Short weekday name, e.g. "Mon"
    pub day: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Analytics {
    pub completed_tasks: usize,
    pub pending_tasks: usize,
    pub high_priority: usize,
    pub medium_priority: usize,
    pub low_priority: usize,
    pub workout_events: usize,
    pub study_events: usize,
    pub other_events: usize,
    pub completion_trend: Vec<TrendPoint>,
}

/// Counts over one owner's records plus completions for the last week, oldest day first.
///
/// Completion days are UTC calendar days. "Other" counts only events whose
/// category is literally "Other", not every unlisted category.
pub fn summarize(tasks: &[Task], events: &[Event], today: NaiveDate) -> Analytics {
    let mut summary = Analytics::default();

    for task in tasks {
        if task.completed {
            summary.completed_tasks += 1;
        } else {
            summary.pending_tasks += 1;
        }
        match task.priority {
            Priority::High => summary.high_priority += 1,
            Priority::Medium => summary.medium_priority += 1,
            Priority::Low => summary.low_priority += 1,
            Priority::Unspecified => {}
        }
    }

    for event in events {
        match event.category.as_str() {
            "Workout" => summary.workout_events += 1,
            "Study" => summary.study_events += 1,
            "Other" => summary.other_events += 1,
            _ => {}
        }
    }

    summary.completion_trend = (0..TREND_DAYS)
        .rev()
        .map(|offset| {
            let day = shift_days(today, -offset);
            let count = tasks
                .iter()
                .filter(|task| task.completed)
                .filter_map(|task| task.completed_at)
                .filter(|at| at.date_naive() == day)
                .count();
            TrendPoint {
                date: day,
                day: day.format("%a").to_string(),
                count,
            }
        })
        .collect();

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DEFAULT_CATEGORY;
    use chrono::{TimeZone, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn task(id: i64, priority: Priority, completed_on: Option<NaiveDate>) -> Task {
        let completed_at = completed_on.map(|day| {
            Utc.from_utc_datetime(&day.and_hms_opt(15, 30, 0).unwrap())
        });
        Task {
            id,
            owner: "ada".to_string(),
            title: format!("task {}", id),
            description: None,
            priority,
            due_date: None,
            category: DEFAULT_CATEGORY.to_string(),
            completed: completed_at.is_some(),
            created_at: Utc::now(),
            completed_at,
        }
    }

    fn event(id: i64, category: &str) -> Event {
        Event {
            id,
            owner: "ada".to_string(),
            title: format!("event {}", id),
            date: date(2024, 5, 1),
            category: category.to_string(),
            description: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn counts_by_status_tier_and_category() {
        let today = date(2024, 5, 10);
        let tasks = vec![
            task(1, Priority::High, Some(today)),
            task(2, Priority::High, None),
            task(3, Priority::Low, None),
            task(4, Priority::Unspecified, Some(date(2024, 5, 8))),
        ];
        let events = vec![
            event(1, "Workout"),
            event(2, "Study"),
            event(3, "Other"),
            event(4, "Health"),
        ];
        let summary = summarize(&tasks, &events, today);
        assert_eq!(summary.completed_tasks, 2);
        assert_eq!(summary.pending_tasks, 2);
        assert_eq!(summary.high_priority, 2);
        assert_eq!(summary.medium_priority, 0);
        assert_eq!(summary.low_priority, 1);
        assert_eq!(summary.workout_events, 1);
        assert_eq!(summary.study_events, 1);
        assert_eq!(summary.other_events, 1);
    }

    #[test]
    fn trend_covers_last_week_oldest_first() {
        let today = date(2024, 5, 10);
        let tasks = vec![
            task(1, Priority::High, Some(today)),
            task(2, Priority::High, Some(today)),
            task(3, Priority::Low, Some(date(2024, 5, 4))),
            task(4, Priority::Low, Some(date(2024, 5, 3))),
        ];
        let trend = summarize(&tasks, &[], today).completion_trend;
        assert_eq!(trend.len(), 7);
        assert_eq!(trend[0].date, date(2024, 5, 4));
        assert_eq!(trend[0].count, 1);
        assert_eq!(trend[0].day, "Sat");
        assert_eq!(trend[6].date, today);
        assert_eq!(trend[6].count, 2);
        assert_eq!(trend.iter().map(|p| p.count).sum::<usize>(), 3);
    }
}
