//! Word detail overlay

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::layout::centered_rect;
use crate::app::context::OpenWord;
use crate::theme::Theme;
use crate::word_detail::DetailSource;

/// Draw the open word as a centered overlay
pub fn draw(frame: &mut Frame, area: Rect, open: &OpenWord, theme: &Theme) {
    let overlay_area = centered_rect(60, 50, area);
    frame.render_widget(Clear, overlay_area);

    let title = format!(" {}:{} word {} ", open.word.surah, open.word.ayah, open.word.word);
    let block = Block::default()
        .title(title)
        .title_bottom(Line::from(" [p] play  [Esc] close ").centered())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_focused))
        .style(Style::default().bg(theme.bg_secondary));

    let detail = &open.detail;
    let label = Style::default().fg(theme.fg_muted);
    let value = Style::default().fg(theme.fg_primary);

    let mut lines = vec![
        Line::from(Span::styled(
            detail.arabic.clone(),
            Style::default().fg(theme.arabic).add_modifier(Modifier::BOLD),
        ))
        .centered(),
        Line::from(""),
        Line::from(vec![
            Span::styled("Transliteration  ", label),
            Span::styled(detail.transliteration.clone(), value),
        ]),
        Line::from(vec![
            Span::styled("Meaning          ", label),
            Span::styled(detail.meaning.clone(), value),
        ]),
        Line::from(vec![
            Span::styled("Root             ", label),
            Span::styled(detail.root.clone(), value),
        ]),
    ];
    if detail.source == DetailSource::Local {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Word details unavailable, showing the verse text",
            Style::default().fg(theme.warning),
        )));
    }

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, overlay_area);
}
