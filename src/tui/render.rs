use ratatui::layout::Alignment;
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders};
use ratatui::Frame;

use crate::tui::app::Tab;
use crate::tui::widgets::{
    analytics::render_analytics,
    calendar::render_calendar,
    color::parse_color,
    notifications::render_notifications,
    status_bar::render_status_bar,
    tabs::render_tabs,
    task_list::{render_task_detail, render_task_list},
};
use crate::tui::{App, Layout};

pub fn render(f: &mut Frame, app: &mut App, layout: &Layout) {
    let theme = app.config.get_active_theme();
    let outer_block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Tempo · {}", app.owner))
        .title_alignment(Alignment::Center)
        .style(Style::default().fg(parse_color(&theme.fg)).bg(parse_color(&theme.bg)));
    f.render_widget(outer_block, f.area());

    render_tabs(f, layout.tabs_area, app.ui.current_tab, app.notifications.len(), &app.config);

    match app.ui.current_tab {
        Tab::Tasks => {
            render_task_list(f, layout.list_area, &app.tasks, &mut app.ui.list_state, &app.config, app.today);
            render_task_detail(
                f,
                layout.detail_area,
                app.selected_task(),
                app.planner.policy(),
                &app.config,
                app.today,
            );
        }
        Tab::Calendar => {
            render_calendar(
                f,
                layout.content_area,
                &app.calendar,
                &app.month,
                &mut app.ui.list_state,
                &app.config,
            );
        }
        Tab::Notifications => {
            render_notifications(
                f,
                layout.content_area,
                &app.notifications,
                app.projection.as_ref(),
                &mut app.ui.list_state,
                &app.config,
                app.today,
            );
        }
        Tab::Analytics => render_analytics(f, layout.content_area, &app.analytics, &app.config),
    }

    let hints = app.key_hints();
    render_status_bar(f, layout.status_area, app.status.message.as_deref(), &hints, &app.config);
}
