//! Player bar at the bottom of the reader

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Block, Borders, LineGauge, Paragraph},
};

use crate::player::{MediaBackend, Player, format_time};
use crate::theme::Theme;

/// Rows the bar needs; nothing until a verse is current
pub fn height<M: MediaBackend>(player: &Player<M>) -> u16 {
    match (player.current(), player.state().minimized) {
        (None, _) => 0,
        (Some(_), true) => 1,
        (Some(_), false) => 4,
    }
}

/// `0:12 / 1:05`, with `--:--` while the duration is unknown
pub fn time_label(position: f64, duration: Option<f64>) -> String {
    let total = duration.map(format_time).unwrap_or_else(|| "--:--".to_string());
    format!("{} / {}", format_time(position), total)
}

pub fn draw<M: MediaBackend>(frame: &mut Frame, area: Rect, player: &Player<M>, theme: &Theme) {
    let Some(entry) = player.current() else {
        return;
    };
    let state = player.state();
    let (position, duration) = player.progress();
    let icon = if state.is_playing { "▶" } else { "⏸" };

    let title = vec![
        Span::styled(format!("{} ", icon), Style::default().fg(theme.playing)),
        Span::styled(
            entry.header(),
            Style::default().fg(theme.fg_secondary).add_modifier(Modifier::BOLD),
        ),
    ];

    if state.minimized {
        let mut spans = title;
        spans.push(Span::styled(
            format!("  {}", time_label(position, duration)),
            Style::default().fg(theme.fg_muted),
        ));
        let bar = Paragraph::new(Line::from(spans)).style(Style::default().bg(theme.bg_secondary));
        frame.render_widget(bar, area);
        return;
    }

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(theme.border))
        .style(Style::default().bg(theme.bg_secondary));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [title_area, gauge_area, status_area] =
        Layout::vertical([Constraint::Length(1); 3]).areas(inner);

    let mut spans = title;
    spans.push(Span::styled(format!("  {}", entry.excerpt()), Style::default().fg(theme.arabic)));
    frame.render_widget(Paragraph::new(Line::from(spans)), title_area);

    let ratio = match duration {
        Some(total) if total > 0.0 => (position / total).clamp(0.0, 1.0),
        _ => 0.0,
    };
    let gauge = LineGauge::default()
        .filled_style(Style::default().fg(theme.accent_primary))
        .unfilled_style(Style::default().fg(theme.bg_tertiary))
        .line_set(symbols::line::THICK)
        .label(time_label(position, duration))
        .ratio(ratio);
    frame.render_widget(gauge, gauge_area);

    let flag = |on: bool, label: &'static str| {
        let color = if on { theme.success } else { theme.fg_muted };
        Span::styled(label, Style::default().fg(color))
    };
    let status = Line::from(vec![
        flag(state.repeat, "repeat"),
        Span::raw("  "),
        flag(state.muted, "muted"),
        Span::raw("  "),
        Span::styled(format!("{}x", state.speed()), Style::default().fg(theme.info)),
        Span::styled(
            "   [space] play/pause  [,/.] prev/next  [0-9] seek  [z] minimize",
            Style::default().fg(theme.fg_muted),
        ),
    ]);
    frame.render_widget(Paragraph::new(status), status_area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_label_formats_both_ends() {
        assert_eq!(time_label(12.4, Some(65.0)), "0:12 / 1:05");
    }

    #[test]
    fn unknown_duration_is_dashed() {
        assert_eq!(time_label(3.0, None), "0:03 / --:--");
        assert_eq!(time_label(f64::NAN, None), "0:00 / --:--");
    }
}
