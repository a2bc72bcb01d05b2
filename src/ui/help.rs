//! Key reference overlay

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::layout::centered_rect;
use crate::theme::Theme;

const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Playback",
        &[
            ("Space", "Toggle play"),
            (", / .", "Previous / next verse (also Ctrl+Left / Ctrl+Right)"),
            ("Enter", "Play selected verse"),
            ("m  r  s", "Mute, repeat, speed"),
            ("0-9", "Seek to n tenths"),
            ("z", "Minimize player"),
        ],
    ),
    (
        "Reading",
        &[
            ("j / k", "Select verse"),
            ("h / l", "Select word"),
            ("[ / ]", "Previous / next page"),
            ("w  p", "Word detail, play word"),
            ("i  I", "Bismillah words, play Bismillah"),
            ("h / l  p", "With Bismillah words open: pick and play one"),
            ("y  Y  b", "Copy, share, bookmark verse"),
            ("c", "Pick a surah"),
            ("Esc", "Close word view"),
        ],
    ),
    (
        "Commands",
        &[
            (":surah <n>", "Open a surah"),
            (":goto <n>", "Jump to an ayah"),
            (":page-size <n>", "Verses per page"),
            (":autoplay [on|off]", "Play word audio on open"),
            (":reciter <name>", "Husary, Basfar or Alafasy"),
            (":q", "Quit"),
        ],
    ),
];

pub fn draw(frame: &mut Frame, area: Rect, theme: &Theme) {
    let overlay_area = centered_rect(70, 80, area);
    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
        .title(" Help ")
        .title_bottom(Line::from(" [Esc] close ").centered())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_focused))
        .style(Style::default().bg(theme.bg_secondary));

    let mut lines = Vec::new();
    for (title, keys) in SECTIONS {
        lines.push(Line::from(Span::styled(
            *title,
            Style::default().fg(theme.accent_primary).add_modifier(Modifier::BOLD),
        )));
        for (key, description) in keys.iter() {
            lines.push(Line::from(vec![
                Span::styled(format!("  {:<20}", key), Style::default().fg(theme.accent_secondary)),
                Span::styled(*description, Style::default().fg(theme.fg_primary)),
            ]));
        }
        lines.push(Line::from(""));
    }

    frame.render_widget(Paragraph::new(lines).block(block), overlay_area);
}
