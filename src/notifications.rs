use chrono::NaiveDate;

use crate::models::{CycleRecord, Event, Notification, NotificationKind, Task};
use crate::projection::{days_until, DateRange};

/// How many days ahead an upcoming cycle starts triggering an alert
pub const CYCLE_LOOKAHEAD_DAYS: i64 = 3;

pub const CYCLE_NOTIFICATION_TITLE: &str = "Upcoming menstrual cycle";

/// Same-day alerts: tasks due today, events today, then an upcoming cycle.
///
/// Order follows insertion, not date.
pub fn today_notifications(
    tasks: &[Task],
    events: &[Event],
    cycle: Option<&CycleRecord>,
    today: NaiveDate,
) -> Vec<Notification> {
    let window = DateRange::day(today);
    let mut notifications = Vec::new();

    for task in tasks {
        if let Some(due) = task.due_date.filter(|due| window.contains(*due)) {
            notifications.push(Notification {
                kind: NotificationKind::Task,
                title: task.title.clone(),
                due,
            });
        }
    }

    for event in events.iter().filter(|event| window.contains(event.date)) {
        notifications.push(Notification {
            kind: NotificationKind::Event,
            title: event.title.clone(),
            due: event.date,
        });
    }

    if let Some(record) = cycle {
        let days = days_until(record.next_date, today);
        if (0..=CYCLE_LOOKAHEAD_DAYS).contains(&days) {
            notifications.push(Notification {
                kind: NotificationKind::Cycle,
                title: CYCLE_NOTIFICATION_TITLE.to_string(),
                due: record.next_date,
            });
        }
    }

    notifications
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Priority, DEFAULT_CATEGORY};
    use chrono::Utc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn task(id: i64, due: Option<NaiveDate>) -> Task {
        Task {
            id,
            owner: "ada".to_string(),
            title: format!("task {}", id),
            description: None,
            priority: Priority::Medium,
            due_date: due,
            category: DEFAULT_CATEGORY.to_string(),
            completed: false,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    fn event(id: i64, on: NaiveDate) -> Event {
        Event {
            id,
            owner: "ada".to_string(),
            title: format!("event {}", id),
            date: on,
            category: "Study".to_string(),
            description: None,
            created_at: Utc::now(),
        }
    }

    fn cycle_due(next_date: NaiveDate) -> CycleRecord {
        CycleRecord {
            id: 1,
            owner: "ada".to_string(),
            last_date: next_date - chrono::Duration::days(28),
            cycle_length: 28,
            period_length: 5,
            next_date,
            fertility_start: next_date - chrono::Duration::days(16),
            fertility_end: next_date - chrono::Duration::days(12),
            tracked_at: Utc::now(),
        }
    }

    #[test]
    fn includes_only_items_due_today_in_source_order() {
        let today = date(2024, 5, 10);
        let tasks = vec![
            task(1, Some(today)),
            task(2, Some(date(2024, 5, 11))),
            task(3, None),
            task(4, Some(today)),
        ];
        let events = vec![event(5, date(2024, 5, 9)), event(6, today)];

        let notes = today_notifications(&tasks, &events, None, today);
        let titles: Vec<&str> = notes.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["task 1", "task 4", "event 6"]);
        assert_eq!(notes[2].kind, NotificationKind::Event);
    }

    #[test]
    fn cycle_alert_boundary_is_three_days() {
        let today = date(2024, 5, 10);

        let three_out = cycle_due(date(2024, 5, 13));
        let notes = today_notifications(&[], &[], Some(&three_out), today);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].kind, NotificationKind::Cycle);
        assert_eq!(notes[0].title, CYCLE_NOTIFICATION_TITLE);
        assert_eq!(notes[0].due, date(2024, 5, 13));

        let four_out = cycle_due(date(2024, 5, 14));
        assert!(today_notifications(&[], &[], Some(&four_out), today).is_empty());

        let today_cycle = cycle_due(today);
        assert_eq!(today_notifications(&[], &[], Some(&today_cycle), today).len(), 1);

        let past = cycle_due(date(2024, 5, 9));
        assert!(today_notifications(&[], &[], Some(&past), today).is_empty());
    }

    #[test]
    fn cycle_alert_comes_last() {
        let today = date(2024, 5, 10);
        let record = cycle_due(date(2024, 5, 11));
        let notes = today_notifications(&[task(1, Some(today))], &[event(2, today)], Some(&record), today);
        let kinds: Vec<NotificationKind> = notes.iter().map(|n| n.kind).collect();
        assert_eq!(
            kinds,
            vec![NotificationKind::Task, NotificationKind::Event, NotificationKind::Cycle]
        );
    }
}
