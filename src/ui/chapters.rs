//! Chapter picker

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::app::state::AppState;
use crate::reader::Reader;
use crate::theme::Theme;

/// Draw the catalogue as a scrolling list
pub fn draw(frame: &mut Frame, area: Rect, state: &mut AppState, reader: &Reader, theme: &Theme) {
    let block = Block::default()
        .title(" Surahs ")
        .title_bottom(Line::from(" [j/k] move  [Enter] open  [Esc] back ").centered())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_focused))
        .style(Style::default().bg(theme.bg_primary));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Update visible height for scroll calculations
    state.picker.visible_height = inner.height as usize;

    if reader.chapters.is_empty() {
        let msg = Paragraph::new("No surahs available\n\nOpen one directly with :surah <n>")
            .style(Style::default().fg(theme.fg_muted))
            .wrap(Wrap { trim: true });
        frame.render_widget(msg, inner);
        return;
    }

    let current = reader.chapter().map(|c| c.number);
    let start = state.picker.scroll_offset;
    let lines: Vec<Line> = reader
        .chapters
        .iter()
        .enumerate()
        .skip(start)
        .take(inner.height as usize)
        .map(|(index, summary)| {
            let style = if index == state.picker.selected_index {
                Style::default()
                    .fg(theme.bg_primary)
                    .bg(theme.accent_primary)
                    .add_modifier(Modifier::BOLD)
            } else if current == Some(summary.number) {
                // Chapter being read (but not selected)
                Style::default().fg(theme.accent_secondary)
            } else {
                Style::default().fg(theme.fg_primary)
            };
            let mut spans = vec![Span::styled(summary.label(), style)];
            let mut extra = Vec::new();
            if let Some(kind) = &summary.revelation_type {
                extra.push(kind.clone());
            }
            if let Some(total) = summary.total_verses {
                extra.push(format!("{} verses", total));
            }
            if !extra.is_empty() {
                spans.push(Span::styled(
                    format!("  {}", extra.join(" · ")),
                    Style::default().fg(theme.fg_muted),
                ));
            }
            spans.push(Span::styled(
                format!("  {}", summary.name_arabic),
                Style::default().fg(theme.arabic),
            ));
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}
