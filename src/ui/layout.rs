//! Layout utilities and common components

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    widgets::{Paragraph, Wrap},
};

/// Draw a centered message in place of content
pub fn draw_placeholder(frame: &mut Frame, area: Rect, message: &str, style: Style) {
    let [_, middle, _] = Layout::vertical([
        Constraint::Percentage(40),
        Constraint::Length(2),
        Constraint::Min(0),
    ])
    .areas(area);

    let placeholder =
        Paragraph::new(message).style(style).alignment(Alignment::Center).wrap(Wrap { trim: true });

    frame.render_widget(placeholder, middle);
}

/// Create a centered rectangle with the given percentage of width and height
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(r);

    Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(popup_layout[1])[1]
}

/// Wrap text to `width` display columns
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }
    let lines: Vec<String> =
        textwrap::wrap(text, width).into_iter().map(|line| line.into_owned()).collect();
    if lines.is_empty() { vec![String::new()] } else { lines }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_text_short() {
        let result = wrap_text("hello world", 20);
        assert_eq!(result, vec!["hello world"]);
    }

    #[test]
    fn wrap_text_long() {
        let result = wrap_text("this is a longer text that needs wrapping", 20);
        assert!(result.len() > 1);
        for line in &result {
            assert!(line.chars().count() <= 20);
        }
    }

    #[test]
    fn wrap_counts_columns_not_bytes() {
        let result = wrap_text("بِسْمِ اللَّهِ", 20);
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn wrap_text_empty() {
        assert_eq!(wrap_text("", 20), vec![""]);
    }

    #[test]
    fn wrap_text_zero_width() {
        assert_eq!(wrap_text("hello", 0), vec!["hello"]);
    }

    #[test]
    fn centered_rect_is_inside() {
        let outer = Rect::new(0, 0, 100, 50);
        let inner = centered_rect(60, 50, outer);
        assert!(inner.x >= outer.x && inner.right() <= outer.right());
        assert_eq!(inner.width, 60);
    }
}
