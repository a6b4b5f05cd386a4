use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::tui::widgets::color::{get_contrast_text_color, parse_color};
use crate::Config;

const SEPARATOR: &str = " • ";
const ELLIPSIS: &str = "...";

pub fn render_status_bar(f: &mut Frame, area: Rect, message: Option<&str>, key_hints: &[String], config: &Config) {
    let theme = config.get_active_theme();
    let width = area.width as usize;

    let paragraph = match message {
        Some(msg) => {
            let highlight_bg = parse_color(&theme.highlight_bg);
            Paragraph::new(truncate(msg, width)).style(
                Style::default()
                    .fg(get_contrast_text_color(highlight_bg))
                    .bg(highlight_bg)
                    .add_modifier(Modifier::BOLD),
            )
        }
        None => Paragraph::new(fit_hints(key_hints, width))
            .style(Style::default().fg(parse_color(&theme.fg)).bg(parse_color(&theme.bg))),
    };

    f.render_widget(paragraph, area);
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(ELLIPSIS.len())).collect();
    out.push_str(ELLIPSIS);
    out
}

/// Join as many hints as fit in `width`, marking dropped ones with an ellipsis
fn fit_hints(hints: &[String], width: usize) -> String {
    let mut line = String::new();
    for hint in hints {
        let sep = if line.is_empty() { "" } else { SEPARATOR };
        let needed = line.chars().count() + sep.chars().count() + hint.chars().count();
        if needed > width {
            if line.is_empty() {
                return truncate(hint, width);
            }
            if line.chars().count() + ELLIPSIS.len() <= width {
                line.push_str(ELLIPSIS);
            }
            return line;
        }
        line.push_str(sep);
        line.push_str(hint);
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hints_that_do_not_fit_are_elided() {
        let hints = vec!["q: quit".to_string(), "r: reload".to_string(), "Tab: tabs".to_string()];
        assert_eq!(fit_hints(&hints, 80), "q: quit • r: reload • Tab: tabs");
        assert_eq!(fit_hints(&hints, 22), "q: quit • r: reload...");
        assert_eq!(fit_hints(&hints, 5), "q:...");
    }
}
