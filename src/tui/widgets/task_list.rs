use chrono::NaiveDate;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, List, ListItem, ListState, Paragraph, Scrollbar, ScrollbarOrientation,
    ScrollbarState, Wrap,
};
use ratatui::Frame;

use crate::models::Task;
use crate::priority::{days_left, KeyPolicy};
use crate::projection::{days_until, task_colors};
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};
use crate::Config;

/// Human label for how far off a task's due date is
pub fn due_label(task: &Task, today: NaiveDate) -> String {
    let Some(due) = task.due_date else {
        return "no due date".to_string();
    };
    match days_until(due, today) {
        0 => "due today".to_string(),
        1 => "due tomorrow".to_string(),
        d if d < 0 => format!("overdue {}d", -d),
        d => format!("in {}d", d),
    }
}

pub fn render_task_list(
    f: &mut Frame,
    area: Rect,
    tasks: &[Task],
    list_state: &mut ListState,
    config: &Config,
    today: NaiveDate,
) {
    let theme = config.get_active_theme();
    let highlight_bg = parse_color(&theme.highlight_bg);
    let highlight_fg = if theme.highlight_fg.is_empty() {
        get_contrast_text_color(highlight_bg)
    } else {
        parse_color(&theme.highlight_fg)
    };
    let max_width = area.width.saturating_sub(6) as usize;

    let items: Vec<ListItem> = tasks
        .iter()
        .map(|task| {
            let tier = parse_color(task_colors(task.priority).border);
            let check = if task.completed { "✓" } else { "○" };
            let mut text = format!("{} {} ({})", check, task.title, due_label(task, today));
            if text.chars().count() > max_width {
                text = text.chars().take(max_width.saturating_sub(3)).collect::<String>() + "...";
            }
            let style = if task.completed {
                Style::default().add_modifier(Modifier::DIM | Modifier::CROSSED_OUT)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::styled("▌ ", Style::default().fg(tier)),
                Span::styled(text, style),
            ]))
        })
        .collect();

    let areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);
    let (list_area, scrollbar_area) = (areas[0], areas[1]);

    let total = items.len();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(format!("Tasks ({})", total)))
        .style(Style::default().fg(parse_color(&theme.fg)))
        .highlight_style(Style::default().fg(highlight_fg).bg(highlight_bg));
    f.render_stateful_widget(list, list_area, list_state);

    let visible = list_area.height.saturating_sub(2) as usize;
    if total > visible && visible > 0 {
        let mut scrollbar_state = ScrollbarState::new(total)
            .viewport_content_length(visible)
            .position(list_state.selected().unwrap_or(0));
        let scrollbar = Scrollbar::default()
            .orientation(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("↑"))
            .end_symbol(Some("↓"));
        let inner = Rect::new(scrollbar_area.x, list_area.y + 1, scrollbar_area.width, visible as u16);
        f.render_stateful_widget(scrollbar, inner, &mut scrollbar_state);
    }
}

pub fn render_task_detail(
    f: &mut Frame,
    area: Rect,
    task: Option<&Task>,
    policy: KeyPolicy,
    config: &Config,
    today: NaiveDate,
) {
    let theme = config.get_active_theme();
    let block = Block::default().borders(Borders::ALL).title("Details");

    let Some(task) = task else {
        let empty = Paragraph::new("No tasks. Add one with `tempo add-task`.")
            .block(block)
            .style(Style::default().fg(parse_color(&theme.fg)))
            .wrap(Wrap { trim: true });
        f.render_widget(empty, area);
        return;
    };

    let colors = task_colors(task.priority);
    let badge_bg = parse_color(colors.background);
    let label = Style::default().add_modifier(Modifier::BOLD);

    let mut lines = vec![
        Line::from(Span::styled(task.title.clone(), label)),
        Line::from(""),
        Line::from(vec![
            Span::styled("Priority: ", label),
            Span::styled(
                format!(" {} ", task.priority),
                Style::default().fg(get_contrast_text_color(badge_bg)).bg(badge_bg),
            ),
        ]),
        Line::from(vec![
            Span::styled("Due: ", label),
            Span::raw(match task.due_date {
                Some(due) => format!("{} ({})", due, due_label(task, today)),
                None => "none".to_string(),
            }),
        ]),
        Line::from(vec![Span::styled("Category: ", label), Span::raw(task.category.clone())]),
        Line::from(vec![
            Span::styled("Status: ", label),
            Span::raw(match task.completed_at {
                Some(at) => format!("completed {}", at.format("%Y-%m-%d %H:%M")),
                None if task.completed => "completed".to_string(),
                None => "pending".to_string(),
            }),
        ]),
        Line::from(vec![
            Span::styled("Order key: ", label),
            Span::raw(format!(
                "{} ({} days left)",
                policy.derive(task, today),
                task.due_date.map(|d| days_left(d, today)).unwrap_or(0)
            )),
        ]),
    ];
    if let Some(description) = task.description.as_deref().filter(|d| !d.is_empty()) {
        lines.push(Line::from(""));
        lines.push(Line::from(description.to_string()));
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().fg(parse_color(&theme.fg)))
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Priority, TaskDraft};
    use chrono::Utc;

    fn task_due(due: Option<NaiveDate>) -> Task {
        let draft = TaskDraft::new("t", Priority::Low, due);
        Task {
            id: 1,
            owner: "ada".to_string(),
            title: draft.title,
            description: None,
            priority: draft.priority,
            due_date: draft.due_date,
            category: draft.category,
            completed: false,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    #[test]
    fn due_labels() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        assert_eq!(due_label(&task_due(None), today), "no due date");
        assert_eq!(due_label(&task_due(Some(today)), today), "due today");
        assert_eq!(due_label(&task_due(today.succ_opt()), today), "due tomorrow");
        assert_eq!(due_label(&task_due(today.pred_opt()), today), "overdue 1d");
        assert_eq!(
            due_label(&task_due(NaiveDate::from_ymd_opt(2024, 3, 15)), today),
            "in 5d"
        );
    }
}
