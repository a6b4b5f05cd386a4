use chrono::NaiveDate;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use crate::models::{Notification, NotificationKind};
use crate::projection::{days_until, CycleProjection, FERTILITY_COLORS, PERIOD_COLORS};
use crate::tui::widgets::color::parse_color;
use crate::Config;

fn notification_line(notification: &Notification) -> Line<'static> {
    let (icon, label) = match notification.kind {
        NotificationKind::Task => ("●", "Task"),
        NotificationKind::Event => ("◆", "Event"),
        NotificationKind::Cycle => ("♥", "Cycle"),
    };
    Line::from(vec![
        Span::styled(format!("{} {:<6}", icon, label), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!("{}  ({})", notification.title, notification.due)),
    ])
}

/// Summary of the latest cycle relative to today
pub fn cycle_summary(projection: &CycleProjection, today: NaiveDate) -> Vec<String> {
    let days = days_until(projection.next_date, today);
    let next = match days {
        0 => "Next period starts today".to_string(),
        d if d < 0 => format!("Next period was expected {} days ago", -d),
        d => format!("Next period in {} days", d),
    };
    let (fertile_start, fertile_end) = projection.fertility_window;
    vec![
        format!("{} ({})", next, projection.next_date),
        format!("Period days: {}", projection.period_days.len()),
        format!("Fertile window: {} to {}", fertile_start, fertile_end),
    ]
}

pub fn render_notifications(
    f: &mut Frame,
    area: Rect,
    notifications: &[Notification],
    projection: Option<&CycleProjection>,
    list_state: &mut ListState,
    config: &Config,
    today: NaiveDate,
) {
    let theme = config.get_active_theme();
    let fg = parse_color(&theme.fg);

    let areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(5)])
        .split(area);

    let items: Vec<ListItem> = if notifications.is_empty() {
        vec![ListItem::new("Nothing due today")]
    } else {
        notifications.iter().map(|n| ListItem::new(notification_line(n))).collect()
    };
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(format!("Today, {}", today)))
        .style(Style::default().fg(fg))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    f.render_stateful_widget(list, areas[0], list_state);

    let cycle_block = Block::default()
        .borders(Borders::ALL)
        .title("Cycle")
        .border_style(Style::default().fg(parse_color(PERIOD_COLORS.border)));
    let lines: Vec<Line> = match projection {
        Some(projection) => cycle_summary(projection, today)
            .into_iter()
            .enumerate()
            .map(|(i, text)| {
                // last line is the fertile window
                if i == 2 {
                    Line::styled(text, Style::default().fg(parse_color(FERTILITY_COLORS.border)))
                } else {
                    Line::from(text)
                }
            })
            .collect(),
        None => vec![Line::from("No cycle tracked. Use `tempo track-cycle`.")],
    };
    f.render_widget(Paragraph::new(lines).block(cycle_block).style(Style::default().fg(fg)), areas[1]);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn summary_counts_days_to_next_period() {
        let projection = CycleProjection {
            next_date: date(2024, 1, 29),
            period_days: date(2024, 1, 29).iter_days().take(5).collect(),
            fertility_window: (date(2024, 1, 13), date(2024, 1, 17)),
        };
        let lines = cycle_summary(&projection, date(2024, 1, 27));
        assert_eq!(lines[0], "Next period in 2 days (2024-01-29)");
        assert_eq!(lines[1], "Period days: 5");
        assert_eq!(lines[2], "Fertile window: 2024-01-13 to 2024-01-17");
        assert!(cycle_summary(&projection, date(2024, 2, 1))[0].starts_with("Next period was expected 3 days ago"));
    }
}
