use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};
use ratatui::Frame;

use crate::models::{CalendarEntry, EntryKind};
use crate::projection::DateRange;
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};
use crate::Config;

fn kind_marker(kind: EntryKind) -> &'static str {
    match kind {
        EntryKind::Task => "T",
        EntryKind::Event => "E",
        EntryKind::Cycle => "P",
        EntryKind::Fertility => "F",
    }
}

/// One calendar row; unlabeled span days show as a bare color strip
fn entry_line(entry: &CalendarEntry) -> Line<'static> {
    let bg = parse_color(&entry.background_color);
    let marker = Span::styled(
        format!(" {} ", kind_marker(entry.kind)),
        Style::default()
            .fg(get_contrast_text_color(bg))
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    );
    let title_style = if entry.completed == Some(true) {
        Style::default().add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default()
    };
    Line::from(vec![
        Span::raw(format!("{}  ", entry.start.format("%a %d"))),
        marker,
        Span::raw(" "),
        Span::styled(entry.title.clone(), title_style),
    ])
}

pub fn render_calendar(
    f: &mut Frame,
    area: Rect,
    entries: &[CalendarEntry],
    month: &DateRange,
    list_state: &mut ListState,
    config: &Config,
) {
    let theme = config.get_active_theme();
    let highlight_bg = parse_color(&theme.highlight_bg);
    let title = format!("{} ({} entries)", month.start().format("%B %Y"), entries.len());
    let block = Block::default().borders(Borders::ALL).title(title);

    let items: Vec<ListItem> = if entries.is_empty() {
        vec![ListItem::new("Nothing scheduled this month")]
    } else {
        entries.iter().map(|e| ListItem::new(entry_line(e))).collect()
    };

    let list = List::new(items)
        .block(block)
        .style(Style::default().fg(parse_color(&theme.fg)))
        .highlight_style(Style::default().bg(highlight_bg).fg(get_contrast_text_color(highlight_bg)));
    f.render_stateful_widget(list, area, list_state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::PERIOD_COLORS;
    use chrono::NaiveDate;

    #[test]
    fn row_shows_weekday_marker_and_title() {
        let entry = CalendarEntry::new(
            "cycle_0".to_string(),
            "Period".to_string(),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            PERIOD_COLORS,
            EntryKind::Cycle,
        );
        let text: String = entry_line(&entry).spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "Fri 01   P  Period");
    }
}
