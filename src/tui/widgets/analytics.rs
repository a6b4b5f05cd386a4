use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::analytics::Analytics;
use crate::projection::{
    HIGH_COLORS, LOW_COLORS, MEDIUM_COLORS, OTHER_EVENT_COLORS, STUDY_COLORS, WORKOUT_COLORS,
};
use crate::tui::widgets::color::parse_color;
use crate::Config;

/// Bar of `count` scaled so `max` fills `width` cells; non-zero counts get at least one cell
pub fn trend_bar(count: usize, max: usize, width: usize) -> String {
    if count == 0 || max == 0 {
        return String::new();
    }
    let cells = (count * width / max).max(1);
    "█".repeat(cells)
}

fn count_line(label: &str, value: usize, color: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled("■ ", Style::default().fg(parse_color(color))),
        Span::raw(format!("{:<10}{:>5}", label, value)),
    ])
}

pub fn render_analytics(f: &mut Frame, area: Rect, analytics: &Analytics, config: &Config) {
    let theme = config.get_active_theme();
    let fg = parse_color(&theme.fg);
    let bold = Style::default().add_modifier(Modifier::BOLD);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(30), Constraint::Min(10)])
        .split(area);

    let counts = vec![
        Line::styled("Tasks", bold),
        Line::from(format!("  {:<10}{:>5}", "Completed", analytics.completed_tasks)),
        Line::from(format!("  {:<10}{:>5}", "Pending", analytics.pending_tasks)),
        Line::from(""),
        Line::styled("By priority", bold),
        count_line("High", analytics.high_priority, HIGH_COLORS.border),
        count_line("Medium", analytics.medium_priority, MEDIUM_COLORS.border),
        count_line("Low", analytics.low_priority, LOW_COLORS.border),
        Line::from(""),
        Line::styled("Events", bold),
        count_line("Workout", analytics.workout_events, WORKOUT_COLORS.border),
        count_line("Study", analytics.study_events, STUDY_COLORS.border),
        count_line("Other", analytics.other_events, OTHER_EVENT_COLORS.border),
    ];
    f.render_widget(
        Paragraph::new(counts)
            .block(Block::default().borders(Borders::ALL).title("Summary"))
            .style(Style::default().fg(fg)),
        columns[0],
    );

    let max = analytics.completion_trend.iter().map(|p| p.count).max().unwrap_or(0);
    // day label (4) + count (4) + borders
    let bar_width = columns[1].width.saturating_sub(12) as usize;
    let highlight = parse_color(&theme.highlight_bg);
    let trend: Vec<Line> = analytics
        .completion_trend
        .iter()
        .map(|point| {
            Line::from(vec![
                Span::raw(format!("{:<4}", point.day)),
                Span::styled(trend_bar(point.count, max, bar_width), Style::default().fg(highlight)),
                Span::raw(format!(" {}", point.count)),
            ])
        })
        .collect();
    f.render_widget(
        Paragraph::new(trend)
            .block(Block::default().borders(Borders::ALL).title("Completed, last 7 days"))
            .style(Style::default().fg(fg)),
        columns[1],
    );
}
