use ratatui::layout::{Constraint, Direction, Layout as RatLayout, Rect};

pub struct Layout {
    pub inner_area: Rect, // inside the outer border
    pub tabs_area: Rect,
    pub content_area: Rect,
    /// Left part of the content area (task list)
    pub list_area: Rect,
    /// Right part of the content area (selected task)
    pub detail_area: Rect,
    pub status_area: Rect,
}

impl Layout {
    /// Height: 2 borders + tabs + 5 content lines + status + 1 spare
    pub const MIN_WIDTH: u16 = 40;
    pub const MIN_HEIGHT: u16 = 10;

    /// Share of the content width given to the task list
    const LIST_WIDTH_PERCENT: u16 = 60;

    pub fn calculate(size: Rect) -> Self {
        let width = size.width.max(Self::MIN_WIDTH + 2);
        let height = size.height.max(Self::MIN_HEIGHT + 2);
        let size = Rect::new(size.x, size.y, width, height);

        let inner_area = Rect::new(
            size.x + 1,
            size.y + 1,
            size.width.saturating_sub(2),
            size.height.saturating_sub(2),
        );

        let vertical = RatLayout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Tabs
                Constraint::Min(1),    // Content
                Constraint::Length(1), // Status
            ])
            .split(inner_area);

        let horizontal = RatLayout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(Self::LIST_WIDTH_PERCENT),
                Constraint::Min(10),
            ])
            .split(vertical[1]);

        Self {
            inner_area,
            tabs_area: vertical[0],
            content_area: vertical[1],
            list_area: horizontal[0],
            detail_area: horizontal[1],
            status_area: vertical[2],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_terminals_are_clamped_to_minimum() {
        let layout = Layout::calculate(Rect::new(0, 0, 10, 4));
        assert_eq!(layout.inner_area.width, Layout::MIN_WIDTH);
        assert_eq!(layout.inner_area.height, Layout::MIN_HEIGHT);
        assert_eq!(layout.tabs_area.height, 1);
        assert_eq!(layout.status_area.height, 1);
    }

    #[test]
    fn content_splits_into_list_and_detail() {
        let layout = Layout::calculate(Rect::new(0, 0, 102, 30));
        assert_eq!(layout.content_area.height, 26);
        assert_eq!(layout.list_area.width + layout.detail_area.width, layout.content_area.width);
        assert_eq!(layout.list_area.width, 60);
    }
}
